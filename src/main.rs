// Main entry point - Dependency injection, poller start-up and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use axum::{routing::{get, post}, Router};
use chrono::Local;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::poller::Poller;
use crate::application::simulator::SimulatorService;
use crate::domain::event_log::{LogEntry, LogKind};
use crate::domain::view::{Patch, ViewState};
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_backend::HttpBackend;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{current_view, health_check, trigger_scenario};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Backend adapter (infrastructure layer)
    let backend = Arc::new(HttpBackend::new(
        &config.backend.base_url,
        &config.backend.status_path,
        &config.backend.ingest_path,
        config.request_timeout(),
    )?);

    // Shared view, written by the poller and the simulator log
    let mut view = ViewState::new(config.chart.capacity, config.log.capacity);
    view.apply(Patch::AppendLog(LogEntry::new(
        &Local::now(),
        LogKind::Init,
        "Flight dashboard online",
    )));
    let view = Arc::new(RwLock::new(view));

    // Services (application layer)
    Poller::new(backend.clone(), view.clone(), config.poll_interval()).spawn();
    let simulator = SimulatorService::new(backend.clone(), view.clone(), config.scan_revert());

    let state = Arc::new(AppState { view, simulator });

    // Router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/view", get(current_view))
        .route("/simulator/:scenario", post(trigger_scenario))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!(
        backend = %config.backend.base_url,
        bind = %config.server.bind,
        "Starting flight-dashboard"
    );

    axum::serve(tokio::net::TcpListener::bind(config.server.bind).await?, router).await?;

    Ok(())
}
