pub(crate) mod de;
mod entity;
mod health;
mod network;
mod ring;
mod suspect;

pub use entity::{Category, ClusterKey, ClusterSet, Entity, UnknownClusterKey};
pub use health::HealthReport;
pub use network::{NetworkGraph, NetworkGroup, NetworkLink, NetworkNode};
pub use ring::Ring;
pub use suspect::{PatternTag, Suspect};

use serde::{Deserialize, Serialize};

/// Body of `/data`: the latest analysis batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisPayload {
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub clusters: ClusterSet,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub rings: Vec<Ring>,
}
