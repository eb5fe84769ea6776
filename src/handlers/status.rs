use std::time::SystemTime;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{
    constants::{version::get_version, STARTUP_TIME},
    error::AppResult,
    store::Stats,
    Data,
};

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Status {
    pub name: &'static str,
    pub version: String,
    pub rust: String,
    pub uptime_secs: u64,
    pub records: Stats,
}

pub async fn healthcheck() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// get the service's status.
#[tracing::instrument(skip_all)]
pub async fn status(State(data): State<Data>) -> AppResult<Json<Status>> {
    let records = data.store.stats().await?;

    let uptime_secs = SystemTime::now()
        .duration_since(*STARTUP_TIME)
        .map(|uptime| uptime.as_secs())
        .unwrap_or_default();

    Ok(Json(Status {
        name: env!("CARGO_PKG_NAME"),
        version: get_version(),
        rust: rustc_version_runtime::version().to_string(),
        uptime_secs,
        records,
    }))
}
