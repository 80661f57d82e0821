use crate::error::Result;
use crate::models::Reading;
use crate::processor::validator::REQUIRED_COLUMNS;
use std::io::Write;

/// Writes readings in the upload format, so an export can be ingested again.
pub fn write_csv<W: Write>(readings: &[Reading], writer: W) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(REQUIRED_COLUMNS)?;

    for r in readings {
        csv_writer.write_record([
            r.vehicle_id.clone(),
            r.timestamp.format("%Y-%m-%d %H:%M:%S%.f").to_string(),
            r.temperature.to_string(),
            r.humidity.to_string(),
            r.location.clone(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(readings.len())
}
