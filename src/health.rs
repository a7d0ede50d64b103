//! Backend readiness indicator and its polling task.

use crate::fetch::DataSource;
use crate::model::HealthReport;
use crate::task::TaskHandle;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Readiness {
    Pending,
    Online,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemStatus {
    pub engine: bool,
    pub models_loaded: bool,
    pub database_connected: bool,
    pub encryption_active: bool,
    pub latency_ms: Option<f64>,
    pub readiness: Readiness,
}

impl Default for SystemStatus {
    fn default() -> Self {
        Self {
            engine: false,
            models_loaded: false,
            database_connected: false,
            encryption_active: true,
            latency_ms: None,
            readiness: Readiness::Pending,
        }
    }
}

impl SystemStatus {
    /// Status after a successful `/health` answer. Absent flags count as up.
    pub fn from_report(report: &HealthReport) -> Self {
        let models_loaded = report.models_loaded.unwrap_or(true);
        let database_connected = report.database_connected.unwrap_or(true);
        Self {
            engine: true,
            models_loaded,
            database_connected,
            encryption_active: true,
            latency_ms: report.latency_ms,
            readiness: if models_loaded && database_connected {
                Readiness::Online
            } else {
                Readiness::Warning
            },
        }
    }

    /// Status after a failed poll. The last known latency is kept.
    pub fn degraded(&self) -> Self {
        Self {
            engine: false,
            models_loaded: false,
            database_connected: false,
            readiness: Readiness::Warning,
            ..self.clone()
        }
    }

    pub fn all_online(&self) -> bool {
        self.readiness == Readiness::Online
    }
}

/// Poll `/health` immediately and then every `interval`, publishing each
/// result on the returned watch channel. Dropping the handle stops polling.
pub fn spawn_monitor(
    source: Arc<dyn DataSource>,
    interval: Duration,
) -> (TaskHandle, watch::Receiver<SystemStatus>) {
    let (tx, rx) = watch::channel(SystemStatus::default());
    let handle = TaskHandle::spawn("health-poll", async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            let next = match source.health().await {
                Ok(report) => {
                    debug!(?report, "health ok");
                    SystemStatus::from_report(&report)
                }
                Err(err) => {
                    warn!(error = %err, "health check failed");
                    tx.borrow().degraded()
                }
            };
            if tx.send(next).is_err() {
                break;
            }
        }
    });
    (handle, rx)
}
