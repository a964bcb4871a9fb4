// HTTP backend adapter - status polling and simulator ingestion over reqwest
use crate::application::telemetry_backend::{IngestSink, StatusSource};
use crate::domain::telemetry::TelemetrySnapshot;
use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, PRAGMA};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request to backend failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("backend responded with status {0}")]
    Status(u16),
    #[error("backend sent an unreadable snapshot: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug)]
pub struct HttpBackend {
    client: reqwest::Client,
    status_url: String,
    ingest_url: String,
    request_counter: AtomicU64,
}

impl HttpBackend {
    pub fn new(
        base_url: &str,
        status_path: &str,
        ingest_path: &str,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let base = base_url.trim_end_matches('/');
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            status_url: format!("{}{}", base, status_path),
            ingest_url: format!("{}{}", base, ingest_path),
            request_counter: AtomicU64::new(0),
        })
    }

    /// Status URL with a token that is unique per request, so no cache
    /// between us and the backend can answer with an old snapshot.
    fn cache_busted_status_url(&self) -> String {
        let n = self.request_counter.fetch_add(1, Ordering::Relaxed);
        let token = format!("{}-{}", chrono::Utc::now().timestamp_millis(), n);
        let separator = if self.status_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}_ts={}",
            self.status_url,
            separator,
            urlencoding::encode(&token)
        )
    }

    pub async fn get_snapshot(&self) -> Result<TelemetrySnapshot, BackendError> {
        let url = self.cache_busted_status_url();
        let response = self
            .client
            .get(&url)
            .header(CACHE_CONTROL, "no-cache")
            .header(PRAGMA, "no-cache")
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    pub async fn post_payload(&self, payload: &Value) -> Result<(), BackendError> {
        let response = self.client.post(&self.ingest_url).json(payload).send().await?;

        if !response.status().is_success() {
            return Err(BackendError::Status(response.status().as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl StatusSource for HttpBackend {
    async fn fetch_status(&self) -> anyhow::Result<TelemetrySnapshot> {
        Ok(self.get_snapshot().await?)
    }
}

#[async_trait]
impl IngestSink for HttpBackend {
    async fn ingest(&self, payload: &Value) -> anyhow::Result<()> {
        Ok(self.post_payload(payload).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::{Query, State},
        http::{HeaderMap, StatusCode},
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct FakeBackend {
        tokens: Mutex<Vec<String>>,
        cache_headers: Mutex<Vec<String>>,
        ingested: Mutex<Vec<Value>>,
    }

    async fn current(
        State(state): State<Arc<FakeBackend>>,
        Query(params): Query<HashMap<String, String>>,
        headers: HeaderMap,
    ) -> Json<Value> {
        if let Some(token) = params.get("_ts") {
            state.tokens.lock().unwrap().push(token.clone());
        }
        if let Some(value) = headers.get("cache-control").and_then(|v| v.to_str().ok()) {
            state.cache_headers.lock().unwrap().push(value.to_string());
        }
        Json(json!({
            "gps": { "latitude": 9.9312, "longitude": 76.2673, "hdop": 120 },
            "system": { "timestamp": "2025-06-01T10:00:00", "risk_level": "SAFE" }
        }))
    }

    async fn ingest(State(state): State<Arc<FakeBackend>>, Json(body): Json<Value>) -> StatusCode {
        state.ingested.lock().unwrap().push(body);
        StatusCode::OK
    }

    async fn broken() -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    async fn garbage() -> &'static str {
        "<html>not json</html>"
    }

    async fn spawn_fake(state: Arc<FakeBackend>) -> String {
        let router = Router::new()
            .route("/api/current", get(current))
            .route("/data", post(ingest))
            .route("/broken", get(broken).post(broken))
            .route("/garbage", get(garbage))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn backend(base: &str, status_path: &str, ingest_path: &str) -> HttpBackend {
        HttpBackend::new(base, status_path, ingest_path, Duration::from_secs(2)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_sends_unique_token_and_no_cache() {
        let state = Arc::new(FakeBackend::default());
        let base = spawn_fake(state.clone()).await;
        let backend = backend(&base, "/api/current", "/data");

        let first = backend.fetch_status().await.unwrap();
        backend.fetch_status().await.unwrap();

        assert_eq!(first.gps.normalized_hdop(), Some(1.2));
        assert_eq!(first.system.timestamp.as_deref(), Some("2025-06-01T10:00:00"));

        let tokens = state.tokens.lock().unwrap().clone();
        assert_eq!(tokens.len(), 2);
        assert_ne!(tokens[0], tokens[1]);
        assert_eq!(*state.cache_headers.lock().unwrap(), vec!["no-cache", "no-cache"]);
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let base = spawn_fake(Arc::new(FakeBackend::default())).await;
        let backend = backend(&base, "/broken", "/broken");

        assert!(matches!(
            backend.get_snapshot().await,
            Err(BackendError::Status(500))
        ));
        assert!(matches!(
            backend.post_payload(&json!({})).await,
            Err(BackendError::Status(500))
        ));
    }

    #[tokio::test]
    async fn test_unparseable_body_is_a_decode_error() {
        let base = spawn_fake(Arc::new(FakeBackend::default())).await;
        let backend = backend(&base, "/garbage", "/data");

        assert!(matches!(
            backend.get_snapshot().await,
            Err(BackendError::Decode(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_a_request_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let backend = backend(&format!("http://{}", addr), "/api/current", "/data");
        assert!(matches!(
            backend.get_snapshot().await,
            Err(BackendError::Request(_))
        ));
    }

    #[tokio::test]
    async fn test_ingest_posts_json() {
        let state = Arc::new(FakeBackend::default());
        let base = spawn_fake(state.clone()).await;
        let backend = backend(&format!("{}/", base), "/api/current", "/data");

        let payload = json!({ "system": { "scan_triggered": true } });
        backend.ingest(&payload).await.unwrap();

        assert_eq!(*state.ingested.lock().unwrap(), vec![payload]);
    }
}
