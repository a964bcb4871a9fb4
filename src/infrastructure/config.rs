use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub backend: BackendSettings,
    pub poll: PollSettings,
    pub chart: ChartSettings,
    pub log: LogSettings,
    pub simulator: SimulatorSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendSettings {
    pub base_url: String,
    pub status_path: String,
    pub ingest_path: String,
    pub request_timeout_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PollSettings {
    pub interval_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartSettings {
    pub capacity: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LogSettings {
    pub capacity: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SimulatorSettings {
    pub scan_revert_ms: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: SocketAddr,
}

impl DashboardConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll.interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.backend.request_timeout_ms)
    }

    pub fn scan_revert(&self) -> Duration {
        Duration::from_millis(self.simulator.scan_revert_ms)
    }

    fn validate(self) -> anyhow::Result<Self> {
        if self.poll.interval_ms == 0 {
            anyhow::bail!("poll.interval_ms must be greater than zero");
        }
        if self.chart.capacity == 0 {
            anyhow::bail!("chart.capacity must be greater than zero");
        }
        reqwest::Url::parse(&self.backend.base_url)
            .map_err(|e| anyhow::anyhow!("backend.base_url is not a valid URL: {}", e))?;
        Ok(self)
    }
}

pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    load_dashboard_config_from("config/dashboard")
}

/// Built-in defaults, overlaid by the (optional) file at `path`.
pub fn load_dashboard_config_from(path: &str) -> anyhow::Result<DashboardConfig> {
    let settings = config::Config::builder()
        .set_default("backend.base_url", "http://127.0.0.1:5000")?
        .set_default("backend.status_path", "/api/current")?
        .set_default("backend.ingest_path", "/data")?
        .set_default("backend.request_timeout_ms", 5000_i64)?
        .set_default("poll.interval_ms", 1000_i64)?
        .set_default("chart.capacity", 40_i64)?
        .set_default("log.capacity", 50_i64)?
        .set_default("simulator.scan_revert_ms", 3000_i64)?
        .set_default("server.bind", "0.0.0.0:8080")?
        .add_source(config::File::with_name(path).required(false))
        .build()?;

    settings.try_deserialize::<DashboardConfig>()?.validate()
}
