pub mod reading;

pub use reading::{FilterCriteria, Reading, VehicleSelector};
