use anyhow::Result;
use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub log_level: String,
    pub export_path: String,
}

impl AppConfig {
    /// Loads `.env` and the process environment. `database_url_override`
    /// (the `--database-url` flag) wins over `DATABASE_URL`.
    pub fn load(database_url_override: Option<String>) -> Result<Self> {
        dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok(), database_url_override)
    }

    fn from_lookup<F>(lookup: F, database_url_override: Option<String>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = database_url_override
            .or_else(|| lookup("DATABASE_URL"))
            .unwrap_or_else(|| "sqlite://coldchain.db".to_string());
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        let export_path = lookup("EXPORT_PATH")
            .unwrap_or_else(|| "filtered_sensor_data.csv".to_string());

        if !database_url.starts_with("sqlite:") {
            anyhow::bail!("DATABASE_URL must be a sqlite URL, got '{}'", database_url);
        }

        Ok(Self {
            database_url,
            log_level,
            export_path,
        })
    }
}
