// Application state for HTTP handlers
use crate::application::simulator::SimulatorService;
use crate::domain::view::ViewState;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub view: Arc<RwLock<ViewState>>,
    pub simulator: SimulatorService,
}
