// Application layer - rendering, polling and simulation use cases
pub mod change_detector;
pub mod poller;
pub mod renderer;
pub mod simulator;
pub mod telemetry_backend;
