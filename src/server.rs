//! HTTP surface: the `/api/system/*` routes the dashboard polls.
//!
//! Source reads hit the OS, so every handler runs its engine call under
//! `spawn_blocking`. Dedicated disk/process endpoints answer 500 when their
//! provider fails; the combined endpoint degrades those fields instead.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::engine::{
    AllStats, CpuReport, DiskReport, Engine, HealthReport, HistoryReport, LoadReport,
    MemoryReport, NetworkReport, ProcessReport, SystemInfoReport, UptimeReport,
};
use crate::system::SourceError;

pub fn router(engine: Arc<Engine>) -> Router {
    Router::new()
        .route("/api/system/info", get(info))
        .route("/api/system/cpu", get(cpu))
        .route("/api/system/memory", get(memory))
        .route("/api/system/uptime", get(uptime))
        .route("/api/system/load", get(load))
        .route("/api/system/disk", get(disk))
        .route("/api/system/network", get(network))
        .route("/api/system/health", get(health))
        .route("/api/system/history", get(history))
        .route("/api/system/processes", get(processes))
        .route("/api/system/all", get(all))
        .layer(CorsLayer::permissive())
        .with_state(engine)
}

/// Run a blocking engine read off the async runtime, mapping any failure to
/// 500.
async fn blocking_read<T, F>(f: F) -> Result<Json<T>, StatusCode>
where
    T: Serialize + Send + 'static,
    F: FnOnce() -> Result<T, SourceError> + Send + 'static,
{
    match tokio::task::spawn_blocking(f).await {
        Ok(Ok(value)) => Ok(Json(value)),
        Ok(Err(e)) => {
            error!(reading = e.reading(), error = %e, "provider read failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
        Err(e) => {
            error!(error = %e, "blocking read panicked");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

async fn info(State(engine): State<Arc<Engine>>) -> Json<SystemInfoReport> {
    Json(engine.system_info())
}

async fn cpu(
    State(engine): State<Arc<Engine>>,
) -> Result<Json<CpuReport>, StatusCode> {
    blocking_read(move || engine.cpu()).await
}

async fn memory(
    State(engine): State<Arc<Engine>>,
) -> Result<Json<MemoryReport>, StatusCode> {
    blocking_read(move || engine.memory()).await
}

async fn uptime(
    State(engine): State<Arc<Engine>>,
) -> Result<Json<UptimeReport>, StatusCode> {
    blocking_read(move || engine.uptime()).await
}

async fn load(
    State(engine): State<Arc<Engine>>,
) -> Result<Json<LoadReport>, StatusCode> {
    blocking_read(move || engine.load()).await
}

async fn disk(
    State(engine): State<Arc<Engine>>,
) -> Result<Json<DiskReport>, StatusCode> {
    blocking_read(move || engine.disk()).await
}

async fn network(
    State(engine): State<Arc<Engine>>,
) -> Result<Json<NetworkReport>, StatusCode> {
    blocking_read(move || engine.network()).await
}

async fn health(
    State(engine): State<Arc<Engine>>,
) -> Result<Json<HealthReport>, StatusCode> {
    blocking_read(move || engine.health()).await
}

async fn history(State(engine): State<Arc<Engine>>) -> Json<HistoryReport> {
    // In-memory; nothing blocking to offload.
    Json(engine.history())
}

async fn processes(
    State(engine): State<Arc<Engine>>,
) -> Result<Json<Vec<ProcessReport>>, StatusCode> {
    blocking_read(move || engine.processes()).await
}

/// Combined snapshot; appends one point to the rolling history as a side
/// effect.
async fn all(
    State(engine): State<Arc<Engine>>,
) -> Result<Json<AllStats>, StatusCode> {
    blocking_read(move || engine.collect()).await
}
