// Domain layer - telemetry model, view state and bounded buffers
pub mod bounded;
pub mod event_log;
pub mod risk;
pub mod series;
pub mod telemetry;
pub mod view;
