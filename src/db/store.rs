use crate::db::{queries, DbPool};
use crate::error::Result;
use crate::models::Reading;
use futures::TryStreamExt;
use tracing::{debug, info};

/// Append-only table of sensor readings.
#[derive(Debug, Clone)]
pub struct ReadingStore {
    pool: DbPool,
}

impl ReadingStore {
    /// Wraps the pool and creates `sensor_data` if it does not exist.
    pub async fn open(pool: DbPool) -> Result<Self> {
        sqlx::query(queries::CREATE_SENSOR_DATA)
            .execute(&pool)
            .await?;
        debug!("sensor_data table ready");
        Ok(Self { pool })
    }

    /// Persists the whole batch in one transaction. Either every row is
    /// stored or none is.
    pub async fn append(&self, batch: &[Reading]) -> Result<usize> {
        if batch.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;

        for reading in batch {
            sqlx::query(queries::INSERT_READING)
                .bind(&reading.vehicle_id)
                .bind(reading.timestamp)
                .bind(reading.temperature)
                .bind(reading.humidity)
                .bind(&reading.location)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        info!("Stored {} readings", batch.len());

        Ok(batch.len())
    }

    /// Every stored reading, in insertion order.
    pub async fn query_all(&self) -> Result<Vec<Reading>> {
        let readings: Vec<Reading> = sqlx::query_as::<_, Reading>(queries::SELECT_ALL_READINGS)
            .fetch(&self.pool)
            .try_collect()
            .await?;
        Ok(readings)
    }
}
