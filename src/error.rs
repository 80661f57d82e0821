use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("CSV must contain: vehicle_id, timestamp, temperature, humidity, location (missing: {})", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("row {row}: invalid {column} '{value}': {reason}")]
    Parse {
        row: usize,
        column: &'static str,
        value: String,
        reason: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DB error: {0}")]
    Db(#[from] sqlx::Error),
}

/// Failure reported by a forecasting capability.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("need at least {required} points to fit, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("series has no spread over time")]
    Degenerate,

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
