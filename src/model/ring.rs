use super::de;
use serde::{Deserialize, Serialize};

/// A detected group of related entities sharing a suspicious pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ring {
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub ring_id: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub nodes: Vec<String>,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub risk_score: f64,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub pattern_type: String,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub total_volume: f64,
}

impl Ring {
    pub fn new(ring_id: impl Into<String>, risk_score: f64, total_volume: f64) -> Self {
        Self {
            ring_id: ring_id.into(),
            nodes: Vec::new(),
            risk_score,
            pattern_type: String::new(),
            total_volume,
        }
    }
}
