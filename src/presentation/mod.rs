// Presentation layer - HTTP surface over the dashboard view
pub mod app_state;
pub mod handlers;
