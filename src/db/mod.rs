use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

pub mod queries;
pub mod store;

pub use store::ReadingStore;

pub type DbPool = Pool<Sqlite>;

/// Opens the SQLite database, creating the file if it does not exist yet.
///
/// A single connection is enough for a single-user tool and keeps
/// `sqlite::memory:` databases alive for the lifetime of the pool.
pub async fn init_pool(database_url: &str) -> Result<DbPool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    Ok(pool)
}
