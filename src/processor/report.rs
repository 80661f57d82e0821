use crate::models::{FilterCriteria, Reading};
use crate::processor::aggregator::{self, ExcursionLocation, Metrics};
use crate::processor::forecast::{self, ForecastOutcome, Forecaster, SeriesPoint};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Report {
    /// Nothing stored yet.
    NoData,
    Ready(Dashboard),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    /// Metrics over everything stored, independent of the filter.
    pub metrics: Metrics,
    pub vehicles: Vec<String>,
    pub filtered_records: usize,
    pub trends: BTreeMap<String, Vec<SeriesPoint>>,
    pub excursion_locations: Vec<ExcursionLocation>,
    /// Absent when the filter matches nothing.
    pub forecast: Option<ForecastOutcome>,
}

pub fn build_report<F: Forecaster>(
    readings: &[Reading],
    criteria: &FilterCriteria,
    forecaster: &F,
) -> Report {
    let metrics = match aggregator::summarize(readings) {
        Some(metrics) => metrics,
        None => {
            info!("No data available");
            return Report::NoData;
        }
    };

    let filtered = aggregator::filter(readings, criteria);
    info!(
        "Report over {} readings, {} after filter (vehicle={})",
        readings.len(),
        filtered.len(),
        criteria.vehicle
    );

    let trends = aggregator::trend_series(&filtered)
        .into_iter()
        .map(|(vehicle, points)| {
            let points = points
                .into_iter()
                .map(|(timestamp, value)| SeriesPoint { timestamp, value })
                .collect();
            (vehicle, points)
        })
        .collect();

    let forecast = if filtered.is_empty() {
        None
    } else {
        Some(forecast::forecast(&filtered, forecaster))
    };

    Report::Ready(Dashboard {
        metrics,
        vehicles: aggregator::vehicle_ids(readings),
        filtered_records: filtered.len(),
        trends,
        excursion_locations: aggregator::excursion_locations(&filtered),
        forecast,
    })
}
