use chrono::{NaiveDate, NaiveDateTime};
use sqlx::FromRow;
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Temperatures strictly above this are cold-chain excursions.
pub const EXCURSION_THRESHOLD_C: f64 = 8.0;

/// One sensor observation from a refrigerated vehicle.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Reading {
    pub vehicle_id: String,
    pub timestamp: NaiveDateTime,
    pub temperature: f64, // °C
    pub humidity: f64,    // %
    pub location: String,
}

impl Reading {
    pub fn is_excursion(&self) -> bool {
        self.temperature > EXCURSION_THRESHOLD_C
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VehicleSelector {
    #[default]
    All,
    Only(String),
}

impl FromStr for VehicleSelector {
    type Err = Infallible;

    /// Only the exact string `All` selects the whole fleet; anything else is
    /// taken as a vehicle id verbatim.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "All" {
            Ok(VehicleSelector::All)
        } else {
            Ok(VehicleSelector::Only(s.to_string()))
        }
    }
}

impl fmt::Display for VehicleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleSelector::All => f.write_str("All"),
            VehicleSelector::Only(id) => f.write_str(id),
        }
    }
}

/// Query parameters for the reporting and export paths.
///
/// The date range only takes effect when both `start` and `end` are set.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub vehicle: VehicleSelector,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl FilterCriteria {
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.start, self.end) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => None,
        }
    }
}
