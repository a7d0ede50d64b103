use serde::{Deserialize, Serialize};

/// Body of `/health`. Every field is optional: the deployed backend only
/// answers `{status, timestamp}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthReport {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub models_loaded: Option<bool>,
    #[serde(default)]
    pub database_connected: Option<bool>,
    #[serde(default)]
    pub latency_ms: Option<f64>,
}
