//! Entity subset visible to the secondary widgets.

use crate::model::{ClusterKey, ClusterSet, Entity};
use crate::selection::ClusterSelection;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Three-step fan-in/fan-out ratio window.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum FanWindow {
    All,
    Medium,
    #[default]
    High,
}

impl FanWindow {
    pub const STEPS: [FanWindow; 3] = [FanWindow::All, FanWindow::Medium, FanWindow::High];

    /// Minimum `fan_in_out_ratio` an entity needs to stay visible.
    pub fn threshold(self) -> f64 {
        match self {
            FanWindow::All => 0.0,
            FanWindow::Medium => 2.0,
            FanWindow::High => 5.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FanWindow::All => "All",
            FanWindow::Medium => "Medium",
            FanWindow::High => "High",
        }
    }

    pub fn index(self) -> u8 {
        match self {
            FanWindow::All => 0,
            FanWindow::Medium => 1,
            FanWindow::High => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidFanWindow(pub u8);

impl fmt::Display for InvalidFanWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fan window must be 0, 1 or 2 (got {})", self.0)
    }
}

impl std::error::Error for InvalidFanWindow {}

impl TryFrom<u8> for FanWindow {
    type Error = InvalidFanWindow;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        FanWindow::STEPS
            .get(value as usize)
            .copied()
            .ok_or(InvalidFanWindow(value))
    }
}

impl From<FanWindow> for u8 {
    fn from(value: FanWindow) -> Self {
        value.index()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub fan_window: FanWindow,
    pub commission_retention: bool,
}

impl FilterState {
    /// Both conditions must hold.
    pub fn admits(&self, entity: &Entity) -> bool {
        if self.commission_retention && !entity.is_commission {
            return false;
        }
        entity.fan_in_out_ratio >= self.fan_window.threshold()
    }
}

/// Entities of the selected cluster, or all three buckets in hierarchy order.
pub fn base_entities(clusters: &ClusterSet, selection: ClusterSelection) -> Vec<&Entity> {
    match selection {
        ClusterSelection::All => ClusterKey::ALL
            .into_iter()
            .flat_map(|key| clusters.bucket(key))
            .collect(),
        ClusterSelection::Cluster(key) => clusters.bucket(key).iter().collect(),
    }
}

pub fn filter_entities<'a>(
    clusters: &'a ClusterSet,
    selection: ClusterSelection,
    filters: &FilterState,
) -> Vec<&'a Entity> {
    base_entities(clusters, selection)
        .into_iter()
        .filter(|e| filters.admits(e))
        .collect()
}
