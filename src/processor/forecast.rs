use crate::error::ForecastError;
use crate::models::Reading;
use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use tracing::{debug, warn};

/// Number of future periods requested from the forecasting capability.
pub const FORECAST_HORIZON: usize = 24;
pub const FORECAST_FREQUENCY: Frequency = Frequency::Hourly;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Hourly,
}

impl Frequency {
    pub fn step(self) -> Duration {
        match self {
            Frequency::Hourly => Duration::hours(1),
        }
    }
}

/// A (time, value) pair, the shape both fed into and read back from a forecaster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

/// One predicted period as produced by a forecasting capability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub timestamp: NaiveDateTime,
    pub predicted: f64,
}

/// A forecasting capability: fit a model to a series, then predict forward.
pub trait Forecaster {
    type Model;

    fn fit(&self, series: &[SeriesPoint]) -> Result<Self::Model, ForecastError>;

    fn predict(
        &self,
        model: &Self::Model,
        horizon: usize,
        frequency: Frequency,
    ) -> Result<Vec<Prediction>, ForecastError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastOutcome {
    Series(Vec<SeriesPoint>),
    Warning(String),
}

/// Temperature over time in chronological order.
pub fn to_series(readings: &[Reading]) -> Vec<SeriesPoint> {
    let mut series: Vec<SeriesPoint> = readings
        .iter()
        .map(|r| SeriesPoint {
            timestamp: r.timestamp,
            value: r.temperature,
        })
        .collect();
    series.sort_by_key(|p| p.timestamp);
    series
}

pub fn from_forecast(predictions: &[Prediction]) -> Vec<SeriesPoint> {
    predictions
        .iter()
        .map(|p| SeriesPoint {
            timestamp: p.timestamp,
            value: p.predicted,
        })
        .collect()
}

/// Runs the capability over the readings. A failing capability yields a
/// warning instead of an error so the rest of the report still renders.
pub fn forecast<F: Forecaster>(readings: &[Reading], forecaster: &F) -> ForecastOutcome {
    let series = to_series(readings);

    let result = forecaster
        .fit(&series)
        .and_then(|model| forecaster.predict(&model, FORECAST_HORIZON, FORECAST_FREQUENCY));

    match result {
        Ok(predictions) => {
            debug!(
                "Forecast produced {} points from {} readings",
                predictions.len(),
                series.len()
            );
            ForecastOutcome::Series(from_forecast(&predictions))
        }
        Err(e) => {
            warn!("Forecasting failed: {}", e);
            ForecastOutcome::Warning(format!("Forecasting failed: {}", e))
        }
    }
}

/// Least-squares linear trend over time.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearTrendForecaster;

#[derive(Debug, Clone)]
pub struct LinearTrend {
    origin: NaiveDateTime,
    last: NaiveDateTime,
    slope: f64, // per hour
    intercept: f64,
}

impl LinearTrend {
    fn hours_since_origin(&self, t: NaiveDateTime) -> f64 {
        hours_between(self.origin, t)
    }
}

fn hours_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_milliseconds() as f64 / 3_600_000.0
}

impl Forecaster for LinearTrendForecaster {
    type Model = LinearTrend;

    fn fit(&self, series: &[SeriesPoint]) -> Result<LinearTrend, ForecastError> {
        let (first, last) = match (series.first(), series.last()) {
            (Some(first), Some(last)) if series.len() >= 2 => (first.timestamp, last.timestamp),
            _ => {
                return Err(ForecastError::InsufficientData {
                    required: 2,
                    actual: series.len(),
                });
            }
        };

        let n = series.len() as f64;
        let xs: Vec<f64> = series
            .iter()
            .map(|p| hours_between(first, p.timestamp))
            .collect();
        let mean_x = xs.iter().sum::<f64>() / n;
        let mean_y = series.iter().map(|p| p.value).sum::<f64>() / n;

        let (sxx, sxy) = xs
            .iter()
            .zip(series)
            .fold((0.0, 0.0), |(sxx, sxy), (x, p)| {
                let dx = x - mean_x;
                (sxx + dx * dx, sxy + dx * (p.value - mean_y))
            });
        if sxx <= f64::EPSILON {
            return Err(ForecastError::Degenerate);
        }

        let slope = sxy / sxx;
        Ok(LinearTrend {
            origin: first,
            last,
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    fn predict(
        &self,
        model: &LinearTrend,
        horizon: usize,
        frequency: Frequency,
    ) -> Result<Vec<Prediction>, ForecastError> {
        let mut timestamp = model.last;

        let mut predictions = Vec::with_capacity(horizon);
        for _ in 0..horizon {
            timestamp += frequency.step();
            let hours = model.hours_since_origin(timestamp);
            predictions.push(Prediction {
                timestamp,
                predicted: model.intercept + model.slope * hours,
            });
        }
        Ok(predictions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 8, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn reading(hour: u32, temperature: f64) -> Reading {
        Reading {
            vehicle_id: "V1".to_string(),
            timestamp: at(hour),
            temperature,
            humidity: 50.0,
            location: "Depot".to_string(),
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    struct FailingForecaster;

    impl Forecaster for FailingForecaster {
        type Model = ();

        fn fit(&self, _series: &[SeriesPoint]) -> Result<(), ForecastError> {
            Err(ForecastError::Other("optimizer did not converge".to_string()))
        }

        fn predict(
            &self,
            _: &(),
            _: usize,
            _: Frequency,
        ) -> Result<Vec<Prediction>, ForecastError> {
            unreachable!("predict is never called without a model")
        }
    }

    #[test]
    fn test_to_series_is_chronological() {
        let readings = vec![reading(5, 1.0), reading(2, 2.0), reading(9, 3.0)];
        let series = to_series(&readings);
        let hours: Vec<NaiveDateTime> = series.iter().map(|p| p.timestamp).collect();
        assert_eq!(hours, vec![at(2), at(5), at(9)]);
        assert_eq!(series[0].value, 2.0);
    }

    #[test]
    fn test_from_forecast_keeps_predicted_value() {
        let predictions = vec![Prediction {
            timestamp: at(3),
            predicted: 4.5,
        }];
        assert_eq!(
            from_forecast(&predictions),
            vec![SeriesPoint {
                timestamp: at(3),
                value: 4.5,
            }]
        );
    }

    #[test]
    fn test_linear_trend_extends_line_hourly() {
        let readings = vec![reading(0, 2.0), reading(1, 4.0), reading(2, 6.0)];

        match forecast(&readings, &LinearTrendForecaster) {
            ForecastOutcome::Series(points) => {
                assert_eq!(points.len(), FORECAST_HORIZON);
                assert_eq!(points[0].timestamp, at(3));
                assert!(close(points[0].value, 8.0));
                assert_eq!(points[23].timestamp, at(2) + Duration::hours(24));
                assert!(close(points[23].value, 54.0));
            }
            other => panic!("expected series, got {:?}", other),
        }
    }

    #[test]
    fn test_predict_honours_horizon() {
        let series = to_series(&[reading(0, 1.0), reading(2, 3.0)]);
        let model = LinearTrendForecaster.fit(&series).unwrap();
        let predictions = LinearTrendForecaster
            .predict(&model, 2, Frequency::Hourly)
            .unwrap();

        let hours: Vec<NaiveDateTime> = predictions.iter().map(|p| p.timestamp).collect();
        assert_eq!(hours, vec![at(3), at(4)]);
        assert!(close(predictions[1].predicted, 5.0));
    }

    #[test]
    fn test_single_point_becomes_warning() {
        match forecast(&[reading(4, 5.0)], &LinearTrendForecaster) {
            ForecastOutcome::Warning(message) => {
                assert!(message.starts_with("Forecasting failed"));
                assert!(message.contains("got 1"));
            }
            other => panic!("expected warning, got {:?}", other),
        }
    }

    #[test]
    fn test_same_instant_is_degenerate() {
        let readings = vec![reading(4, 5.0), reading(4, 7.0)];
        assert_eq!(
            forecast(&readings, &LinearTrendForecaster),
            ForecastOutcome::Warning(
                "Forecasting failed: series has no spread over time".to_string()
            )
        );
    }

    #[test]
    fn test_capability_failure_is_caught() {
        let readings = vec![reading(1, 5.0), reading(2, 7.0)];
        assert_eq!(
            forecast(&readings, &FailingForecaster),
            ForecastOutcome::Warning("Forecasting failed: optimizer did not converge".to_string())
        );
    }
}
