use crate::models::{FilterCriteria, Reading, VehicleSelector};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub mean_temperature: f64,
    pub excursions: usize,
    pub records: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcursionLocation {
    pub vehicle_id: String,
    pub location: String,
}

/// `None` when there is nothing to average.
pub fn mean_temperature(readings: &[Reading]) -> Option<f64> {
    if readings.is_empty() {
        return None;
    }
    let total: f64 = readings.iter().map(|r| r.temperature).sum();
    Some(total / readings.len() as f64)
}

pub fn excursion_count(readings: &[Reading]) -> usize {
    readings.iter().filter(|r| r.is_excursion()).count()
}

pub fn summarize(readings: &[Reading]) -> Option<Metrics> {
    Some(Metrics {
        mean_temperature: mean_temperature(readings)?,
        excursions: excursion_count(readings),
        records: readings.len(),
    })
}

/// Applies the vehicle selector, then the date range when both ends are set.
/// Bounds are inclusive and compared against the calendar date of each reading.
pub fn filter(readings: &[Reading], criteria: &FilterCriteria) -> Vec<Reading> {
    let range = criteria.date_range();

    readings
        .iter()
        .filter(|r| match &criteria.vehicle {
            VehicleSelector::All => true,
            VehicleSelector::Only(id) => r.vehicle_id == *id,
        })
        .filter(|r| match range {
            Some((start, end)) => {
                let day = r.timestamp.date();
                start <= day && day <= end
            }
            None => true,
        })
        .cloned()
        .collect()
}

pub fn excursion_locations(readings: &[Reading]) -> Vec<ExcursionLocation> {
    readings
        .iter()
        .filter(|r| r.is_excursion())
        .map(|r| ExcursionLocation {
            vehicle_id: r.vehicle_id.clone(),
            location: r.location.clone(),
        })
        .collect()
}

/// Distinct vehicle ids, sorted.
pub fn vehicle_ids(readings: &[Reading]) -> Vec<String> {
    readings
        .iter()
        .map(|r| r.vehicle_id.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Temperature over time, one chronologically ordered series per vehicle.
pub fn trend_series(readings: &[Reading]) -> BTreeMap<String, Vec<(NaiveDateTime, f64)>> {
    let mut series: BTreeMap<String, Vec<(NaiveDateTime, f64)>> = BTreeMap::new();
    for r in readings {
        series
            .entry(r.vehicle_id.clone())
            .or_default()
            .push((r.timestamp, r.temperature));
    }
    for points in series.values_mut() {
        points.sort_by_key(|(ts, _)| *ts);
    }
    series
}
