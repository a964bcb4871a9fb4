// HTTP request handlers
use crate::application::simulator::Scenario;
use crate::domain::view::ViewState;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current dashboard view, as last patched by the poller
pub async fn current_view(State(state): State<Arc<AppState>>) -> Json<ViewState> {
    Json(state.view.read().await.clone())
}

/// Fire a simulator scenario; the backend is contacted in the background
pub async fn trigger_scenario(
    Path(name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> (StatusCode, Json<Value>) {
    match name.parse::<Scenario>() {
        Ok(scenario) => {
            state.simulator.dispatch(scenario);
            (
                StatusCode::ACCEPTED,
                Json(json!({ "scenario": scenario.as_str() })),
            )
        }
        Err(e) => {
            tracing::warn!("Rejected simulator request: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": e.to_string() })),
            )
        }
    }
}
