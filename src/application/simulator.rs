// Simulator service - pushes canned scenario payloads through the backend
use crate::application::telemetry_backend::IngestSink;
use crate::domain::event_log::{LogEntry, LogKind};
use crate::domain::view::{Patch, ViewState};
use chrono::Local;
use serde_json::{json, Value};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Normal,
    Warning,
    Critical,
    Scan,
}

#[derive(Debug, thiserror::Error)]
#[error("unknown scenario: {0}")]
pub struct UnknownScenario(pub String);

impl FromStr for Scenario {
    type Err = UnknownScenario;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "NORMAL" => Ok(Scenario::Normal),
            "WARNING" => Ok(Scenario::Warning),
            "CRITICAL" => Ok(Scenario::Critical),
            "SCAN" => Ok(Scenario::Scan),
            _ => Err(UnknownScenario(s.to_string())),
        }
    }
}

impl Scenario {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scenario::Normal => "NORMAL",
            Scenario::Warning => "WARNING",
            Scenario::Critical => "CRITICAL",
            Scenario::Scan => "SCAN",
        }
    }

    /// Fixed payload for the scenario. HDOP is sent in the x100 encoding.
    pub fn payload(&self) -> Value {
        match self {
            Scenario::Normal => json!({
                "gps": { "latitude": 9.9312, "longitude": 76.2673, "satellites": 22, "hdop": 120, "raw_signal": 1050 },
                "mpu": { "vibration_rms": 0.05, "ax": 0.01, "ay": 0.01, "az": 1.0 },
                "motor": { "rpm": 1500, "hall_detected": true },
                "system": { "scan_triggered": false }
            }),
            Scenario::Warning => json!({
                "gps": { "latitude": 9.9410, "longitude": 76.2710, "satellites": 10, "hdop": 350, "raw_signal": 1350 },
                "mpu": { "vibration_rms": 0.45, "ax": 0.2, "ay": 0.1, "az": 0.9 },
                "motor": { "rpm": 3800 }
            }),
            Scenario::Critical => json!({
                "gps": { "latitude": 9.9401, "longitude": 76.2701, "satellites": 5, "hdop": 900, "raw_signal": 800 },
                "mpu": { "vibration_rms": 0.8, "ax": 0.5, "ay": -0.5, "az": 0.8 },
                "motor": { "rpm": 200 }
            }),
            Scenario::Scan => json!({ "system": { "scan_triggered": true } }),
        }
    }
}

#[derive(Clone)]
pub struct SimulatorService {
    sink: Arc<dyn IngestSink>,
    view: Arc<RwLock<ViewState>>,
    scan_revert: Duration,
}

impl SimulatorService {
    pub fn new(sink: Arc<dyn IngestSink>, view: Arc<RwLock<ViewState>>, scan_revert: Duration) -> Self {
        Self {
            sink,
            view,
            scan_revert,
        }
    }

    /// Send in the background; the caller does not wait for the backend.
    pub fn dispatch(&self, scenario: Scenario) {
        let service = self.clone();
        tokio::spawn(async move {
            let _ = service.send(scenario).await;
        });
    }

    /// Post one scenario. SCAN also schedules a NORMAL payload after the
    /// revert delay. Failures are logged and not retried.
    pub async fn send(&self, scenario: Scenario) -> anyhow::Result<()> {
        if scenario == Scenario::Scan {
            self.log(LogKind::Sys, "Hardware diagnostic scan triggered...").await;
            self.schedule_revert();
        }
        self.post(scenario).await
    }

    fn schedule_revert(&self) {
        let service = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(service.scan_revert).await;
            tracing::debug!("Reverting diagnostic scan");
            let _ = service.post(Scenario::Normal).await;
        });
    }

    async fn post(&self, scenario: Scenario) -> anyhow::Result<()> {
        match self.sink.ingest(&scenario.payload()).await {
            Ok(()) => {
                tracing::info!(scenario = scenario.as_str(), "Simulator payload sent");
                self.log(LogKind::Sys, format!("Scenario {} sent", scenario.as_str()))
                    .await;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(scenario = scenario.as_str(), "Simulator send failed: {:#}", e);
                self.log(LogKind::Err, "Simulator disconnected").await;
                Err(e)
            }
        }
    }

    async fn log(&self, kind: LogKind, message: impl Into<String>) {
        let entry = LogEntry::new(&Local::now(), kind, message);
        self.view.write().await.apply(Patch::AppendLog(entry));
    }
}
