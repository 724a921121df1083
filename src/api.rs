use axum::{
    body::Bytes,
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::engine::Monitor;
use crate::error::MonitorError;
use crate::models::{ProbeResult, Target, TargetState};

#[derive(Debug, Deserialize)]
struct AddTargetRequest {
    url: Option<String>,
    name: Option<String>,
}

async fn get_status(State(monitor): State<Arc<Monitor>>) -> Json<HashMap<String, TargetState>> {
    Json(monitor.get_all_states().await)
}

async fn list_urls(State(monitor): State<Arc<Monitor>>) -> Json<Vec<Target>> {
    Json(monitor.list_targets().await)
}

async fn add_url(
    State(monitor): State<Arc<Monitor>>,
    body: Bytes,
) -> Result<Json<Value>, MonitorError> {
    let request: AddTargetRequest = serde_json::from_slice(&body)?;
    let url = request
        .url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty())
        .ok_or(MonitorError::MissingUrl)?;

    let target = monitor.add_target(url, request.name).await;
    Ok(Json(json!({ "success": true, "target": target })))
}

async fn delete_url(
    State(monitor): State<Arc<Monitor>>,
    Path(id): Path<usize>,
) -> Result<Json<Value>, MonitorError> {
    monitor
        .remove_target(id)
        .await
        .ok_or(MonitorError::TargetNotFound(id))?;
    Ok(Json(json!({ "success": true })))
}

async fn get_history(
    State(monitor): State<Arc<Monitor>>,
    Path(id): Path<usize>,
) -> Result<Json<Vec<ProbeResult>>, MonitorError> {
    monitor
        .history(id)
        .await
        .map(Json)
        .ok_or(MonitorError::TargetNotFound(id))
}

async fn start(State(monitor): State<Arc<Monitor>>) -> Json<Value> {
    let started = monitor.start_monitoring().await;
    Json(json!({ "success": true, "started": started, "running": monitor.is_running().await }))
}

async fn stop(State(monitor): State<Arc<Monitor>>) -> Json<Value> {
    monitor.stop_monitoring().await;
    Json(json!({ "success": true, "running": monitor.is_running().await }))
}

async fn monitoring_status(State(monitor): State<Arc<Monitor>>) -> Json<Value> {
    Json(json!({ "running": monitor.is_running().await }))
}

pub fn create_router(monitor: Arc<Monitor>) -> Router {
    let api = Router::new()
        .route("/api/status", get(get_status))
        .route("/api/urls", get(list_urls).post(add_url))
        .route("/api/urls/{id}/delete", post(delete_url))
        .route("/api/history/{id}", get(get_history))
        .route("/api/start", post(start))
        .route("/api/stop", post(stop))
        .route("/api/monitoring", get(monitoring_status))
        .layer(CorsLayer::permissive());

    api.fallback_service(ServeDir::new("public"))
        .layer(TraceLayer::new_for_http())
        .with_state(monitor)
}

pub async fn start_server(port: u16, monitor: Arc<Monitor>) -> anyhow::Result<()> {
    let app = create_router(monitor);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Dashboard: http://localhost:{}", addr.port());
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
