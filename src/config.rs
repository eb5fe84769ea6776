use std::{env, path::Path};

use anyhow::{Context, Result};

use crate::constants::{DATA_VOLUME_DATABASE_URL, DATA_VOLUME_DIR, LOCAL_DATABASE_URL};

pub const DEFAULT_SERVICE_NAME: &str = "quotebook";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub otlp_endpoint: Option<String>,
    pub service_name: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .context("APP_PORT must be a valid u16")?;

        let database_url = env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| default_database_url(Path::new(DATA_VOLUME_DIR)).to_string());

        let otlp_endpoint = env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .filter(|endpoint| !endpoint.trim().is_empty());

        let service_name =
            env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| DEFAULT_SERVICE_NAME.to_string());

        Ok(Self {
            host,
            port,
            database_url,
            otlp_endpoint,
            service_name,
        })
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Picks the database inside the data volume when it is mounted, and a file in
/// the working directory otherwise.
pub fn default_database_url(volume_dir: &Path) -> &'static str {
    if volume_dir.is_dir() {
        DATA_VOLUME_DATABASE_URL
    } else {
        LOCAL_DATABASE_URL
    }
}
