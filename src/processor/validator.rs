use crate::error::{PipelineError, Result};
use crate::models::Reading;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::io::Read;
use tracing::debug;

pub const REQUIRED_COLUMNS: [&str; 5] = [
    "vehicle_id",
    "timestamp",
    "temperature",
    "humidity",
    "location",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// An uploaded table before any validation: a header row and string cells.
#[derive(Debug, Clone, Default)]
pub struct RawBatch {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawBatch {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = csv_reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in csv_reader.records() {
            rows.push(record?.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }
}

/// Column positions of the required fields within a batch header.
struct ColumnIndex {
    vehicle_id: usize,
    timestamp: usize,
    temperature: usize,
    humidity: usize,
    location: usize,
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|name| position(*name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(PipelineError::Schema { missing });
        }

        for extra in headers
            .iter()
            .filter(|h| !REQUIRED_COLUMNS.contains(&h.trim()))
        {
            debug!("Ignoring extra column '{}'", extra);
        }

        // All present, checked above.
        let index = |name: &str| position(name).unwrap_or_default();
        Ok(Self {
            vehicle_id: index("vehicle_id"),
            timestamp: index("timestamp"),
            temperature: index("temperature"),
            humidity: index("humidity"),
            location: index("location"),
        })
    }
}

/// Checks the batch schema and converts every row into a [`Reading`].
///
/// A single bad row rejects the whole batch; nothing is returned for storage
/// unless every row is valid.
pub fn validate(batch: &RawBatch) -> Result<Vec<Reading>> {
    let columns = ColumnIndex::resolve(&batch.headers)?;

    batch
        .rows
        .iter()
        .enumerate()
        .map(|(i, cells)| -> Result<Reading> {
            let row = i + 1;
            let cell = |idx: usize| cells.get(idx).map(|c| c.trim()).unwrap_or("");

            Ok(Reading {
                vehicle_id: required_text(row, "vehicle_id", cell(columns.vehicle_id))?,
                timestamp: timestamp_field(row, cell(columns.timestamp))?,
                temperature: number_field(row, "temperature", cell(columns.temperature))?,
                humidity: number_field(row, "humidity", cell(columns.humidity))?,
                location: required_text(row, "location", cell(columns.location))?,
            })
        })
        .collect()
}

/// Parses the date-time shapes accepted on upload. Values carrying an offset
/// are converted to UTC.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Some(t.naive_utc());
    }
    if let Ok(t) = DateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(t.naive_utc());
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn required_text(row: usize, column: &'static str, value: &str) -> Result<String> {
    if value.is_empty() {
        return Err(parse_error(row, column, value, "value is required"));
    }
    Ok(value.to_string())
}

fn timestamp_field(row: usize, value: &str) -> Result<NaiveDateTime> {
    parse_timestamp(value)
        .ok_or_else(|| parse_error(row, "timestamp", value, "not a date-time"))
}

fn number_field(row: usize, column: &'static str, value: &str) -> Result<f64> {
    let number: f64 = value
        .parse()
        .map_err(|e: std::num::ParseFloatError| parse_error(row, column, value, &e.to_string()))?;
    if !number.is_finite() {
        return Err(parse_error(row, column, value, "not a finite number"));
    }
    Ok(number)
}

fn parse_error(row: usize, column: &'static str, value: &str, reason: &str) -> PipelineError {
    PipelineError::Parse {
        row,
        column,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
