// Telemetry poller - fixed-interval status polling
use crate::application::change_detector::ChangeDetector;
use crate::application::renderer::{render, render_offline};
use crate::application::telemetry_backend::StatusSource;
use crate::domain::event_log::{LogEntry, LogKind};
use crate::domain::risk::RiskLevel;
use crate::domain::telemetry::TelemetrySnapshot;
use crate::domain::view::{Connection, Patch, ViewState};
use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Result of one poll, tagged with the order it was sent in.
#[derive(Debug)]
pub struct PollOutcome {
    pub seq: u64,
    pub result: anyhow::Result<TelemetrySnapshot>,
}

pub struct Poller {
    source: Arc<dyn StatusSource>,
    view: Arc<RwLock<ViewState>>,
    interval: Duration,
}

impl Poller {
    pub fn new(source: Arc<dyn StatusSource>, view: Arc<RwLock<ViewState>>, interval: Duration) -> Self {
        Self {
            source,
            view,
            interval,
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Tick forever. Every tick starts its own request, so slow responses can
    /// overlap; results funnel back to this task, which is the only writer of
    /// telemetry into the view.
    pub async fn run(self) {
        let (tx, mut rx) = mpsc::channel::<PollOutcome>(32);
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut applier = Applier::new();
        let mut next_seq: u64 = 0;

        tracing::info!(interval_ms = self.interval.as_millis() as u64, "Telemetry poller started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    next_seq += 1;
                    let seq = next_seq;
                    let tx = tx.clone();
                    let source = self.source.clone();
                    tokio::spawn(async move {
                        let result = source.fetch_status().await;
                        let _ = tx.send(PollOutcome { seq, result }).await;
                    });
                }
                Some(outcome) = rx.recv() => {
                    applier.apply(&self.view, outcome, Local::now()).await;
                }
            }
        }
    }
}

/// Folds poll outcomes into the view in send order.
#[derive(Default)]
pub struct Applier {
    detector: ChangeDetector,
    last_applied: u64,
}

impl Applier {
    pub fn new() -> Self {
        Self {
            detector: ChangeDetector::new(),
            last_applied: 0,
        }
    }

    /// Returns false when the outcome was older than one already applied.
    pub async fn apply(
        &mut self,
        view: &RwLock<ViewState>,
        outcome: PollOutcome,
        now: DateTime<Local>,
    ) -> bool {
        if outcome.seq <= self.last_applied {
            tracing::debug!(
                seq = outcome.seq,
                last_applied = self.last_applied,
                "Discarding stale poll result"
            );
            return false;
        }
        self.last_applied = outcome.seq;

        let mut view = view.write().await;
        let mut patches = Vec::new();

        match outcome.result {
            Ok(snapshot) => {
                tracing::debug!(
                    seq = outcome.seq,
                    samples = view.sample_count(),
                    risk = RiskLevel::parse(snapshot.system.risk_level.as_deref()).as_str(),
                    "Poll succeeded"
                );
                if view.connection == Connection::Offline {
                    tracing::info!("Backend link restored");
                    patches.push(Patch::AppendLog(LogEntry::new(&now, LogKind::Net, "Link restored")));
                }
                let events = self.detector.observe(&snapshot, &now);
                tracing::debug!(
                    timestamp = ?self.detector.last_timestamp(),
                    events = events.len(),
                    "Snapshot observed"
                );
                patches.extend(events.into_iter().map(Patch::AppendLog));
                patches.extend(render(&view, &snapshot, &now));
            }
            Err(e) => {
                tracing::warn!(seq = outcome.seq, "Poll failed: {:#}", e);
                if view.connection == Connection::Online {
                    patches.push(Patch::AppendLog(LogEntry::new(&now, LogKind::Net, "Link lost")));
                }
                patches.extend(render_offline(&view));
            }
        }

        view.apply_all(patches);
        true
    }
}
