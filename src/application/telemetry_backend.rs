// Backend traits for reading status and pushing simulated payloads
use crate::domain::telemetry::TelemetrySnapshot;
use async_trait::async_trait;
use serde_json::Value;

#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch the latest snapshot. Any transport, status or decode failure is
    /// an error; callers treat all of them as "offline".
    async fn fetch_status(&self) -> anyhow::Result<TelemetrySnapshot>;
}

#[async_trait]
pub trait IngestSink: Send + Sync {
    /// Post a (possibly partial) snapshot for the backend to merge.
    async fn ingest(&self, payload: &Value) -> anyhow::Result<()>;
}
