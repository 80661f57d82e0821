use crate::db::{self, ReadingStore};
use crate::error::Result;
use crate::models::FilterCriteria;
use crate::processor::forecast::Forecaster;
use crate::processor::report::{build_report, Report};
use crate::processor::{aggregator, export, validator};
use std::io::{Read, Write};
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct UploadSummary {
    pub batch_id: Uuid,
    pub stored: usize,
}

/// Everything one user interaction needs: the store handle and the
/// forecasting capability.
pub struct Session<F> {
    store: ReadingStore,
    forecaster: F,
}

impl<F: Forecaster> Session<F> {
    pub async fn open(database_url: &str, forecaster: F) -> Result<Self> {
        let pool = db::init_pool(database_url).await?;
        let store = ReadingStore::open(pool).await?;
        info!("Connected to database");
        Ok(Self::new(store, forecaster))
    }

    pub fn new(store: ReadingStore, forecaster: F) -> Self {
        Self { store, forecaster }
    }

    /// Validates the uploaded CSV and appends it. Nothing is stored unless
    /// the whole batch is valid.
    pub async fn upload<R: Read>(&self, reader: R) -> Result<UploadSummary> {
        let batch_id = Uuid::new_v4();

        let readings = validator::RawBatch::from_reader(reader)
            .and_then(|batch| validator::validate(&batch))
            .map_err(|e| {
                warn!("Rejected batch {}: {}", batch_id, e);
                e
            })?;

        let stored = self.store.append(&readings).await?;
        info!("Batch {} stored {} readings", batch_id, stored);

        Ok(UploadSummary { batch_id, stored })
    }

    pub async fn report(&self, criteria: &FilterCriteria) -> Result<Report> {
        let readings = self.store.query_all().await?;
        Ok(build_report(&readings, criteria, &self.forecaster))
    }

    /// Writes the filtered readings as CSV, returning how many were written.
    pub async fn export<W: Write>(&self, criteria: &FilterCriteria, writer: W) -> Result<usize> {
        let readings = self.store.query_all().await?;
        let filtered = aggregator::filter(&readings, criteria);
        export::write_csv(&filtered, writer)
    }

    pub async fn vehicles(&self) -> Result<Vec<String>> {
        let readings = self.store.query_all().await?;
        Ok(aggregator::vehicle_ids(&readings))
    }
}
