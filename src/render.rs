//! Plain-text rendering of reports for the terminal.

use crate::processor::forecast::{ForecastOutcome, SeriesPoint};
use crate::processor::report::{Dashboard, Report};
use std::fmt;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Displays a [`Report`] as the sections of the dashboard.
pub struct TextReport<'a>(pub &'a Report);

impl fmt::Display for TextReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Report::NoData => writeln!(f, "No data available. Upload a CSV to begin."),
            Report::Ready(dashboard) => write_dashboard(f, dashboard),
        }
    }
}

fn write_dashboard(f: &mut fmt::Formatter<'_>, d: &Dashboard) -> fmt::Result {
    writeln!(f, "Key Metrics")?;
    writeln!(
        f,
        "  Avg. Temperature:   {:.2} °C",
        d.metrics.mean_temperature
    )?;
    writeln!(f, "  Excursions (>8°C):  {}", d.metrics.excursions)?;
    writeln!(f, "  Total Records:      {}", d.metrics.records)?;
    writeln!(f, "  Vehicles:           {}", d.vehicles.join(", "))?;
    writeln!(f)?;

    writeln!(
        f,
        "Temperature Trends ({} filtered records)",
        d.filtered_records
    )?;
    if d.trends.is_empty() {
        writeln!(f, "  No readings match the filter.")?;
    }
    for (vehicle, points) in &d.trends {
        writeln!(f, "  {}", vehicle)?;
        for p in points {
            write_point(f, "    ", p)?;
        }
    }
    writeln!(f)?;

    writeln!(f, "Location of Excursions")?;
    if d.excursion_locations.is_empty() {
        writeln!(f, "  No excursions found in selected range.")?;
    }
    for e in &d.excursion_locations {
        writeln!(f, "  {}  {}", e.vehicle_id, e.location)?;
    }

    match &d.forecast {
        Some(ForecastOutcome::Series(points)) => {
            writeln!(f)?;
            writeln!(f, "24-Hour Temperature Forecast")?;
            for p in points {
                write_point(f, "  ", p)?;
            }
        }
        Some(ForecastOutcome::Warning(message)) => {
            writeln!(f)?;
            writeln!(f, "Warning: {}", message)?;
        }
        None => {}
    }

    Ok(())
}

fn write_point(f: &mut fmt::Formatter<'_>, indent: &str, p: &SeriesPoint) -> fmt::Result {
    let time = p.timestamp.format(TIME_FORMAT);
    writeln!(f, "{}{}  {:>7.2} °C", indent, time, p.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::aggregator::{ExcursionLocation, Metrics};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn dashboard(forecast: Option<ForecastOutcome>) -> Dashboard {
        let timestamp = NaiveDate::from_ymd_opt(2024, 2, 2)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap();
        let mut trends = BTreeMap::new();
        let point = SeriesPoint {
            timestamp,
            value: 9.5,
        };
        trends.insert("V1".to_string(), vec![point]);

        Dashboard {
            metrics: Metrics {
                mean_temperature: 9.5,
                excursions: 1,
                records: 1,
            },
            vehicles: vec!["V1".to_string()],
            filtered_records: 1,
            trends,
            excursion_locations: vec![ExcursionLocation {
                vehicle_id: "V1".to_string(),
                location: "Lyon".to_string(),
            }],
            forecast,
        }
    }

    #[test]
    fn test_no_data_notice() {
        assert_eq!(
            TextReport(&Report::NoData).to_string(),
            "No data available. Upload a CSV to begin.\n"
        );
    }

    #[test]
    fn test_dashboard_sections() {
        let report = Report::Ready(dashboard(None));
        let text = TextReport(&report).to_string();
        assert!(text.contains("Avg. Temperature:   9.50 °C"));
        assert!(text.contains("Excursions (>8°C):  1"));
        assert!(text.contains("2024-02-02 14:30"));
        assert!(text.contains("  V1  Lyon"));
        assert!(!text.contains("Forecast"));
    }

    #[test]
    fn test_forecast_warning_is_shown() {
        let warning = ForecastOutcome::Warning(
            "Forecasting failed: need at least 2 points to fit, got 1".to_string(),
        );
        let report = Report::Ready(dashboard(Some(warning)));
        let text = TextReport(&report).to_string();
        assert!(text.contains("Warning: Forecasting failed"));
        assert!(text.contains("Key Metrics"));
    }
}
