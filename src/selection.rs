//! Process-wide selection state. Widgets read it; only explicit interaction
//! messages routed through the controller write it.

use crate::model::{Category, ClusterKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// `selectedCluster`: everything, or one of the three buckets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ClusterSelection {
    #[default]
    All,
    Cluster(ClusterKey),
}

impl ClusterSelection {
    pub fn as_str(self) -> &'static str {
        match self {
            ClusterSelection::All => "all",
            ClusterSelection::Cluster(key) => key.as_str(),
        }
    }

    /// Whether nodes of `category` count as selected.
    pub fn admits(self, category: Category) -> bool {
        match self {
            ClusterSelection::All => true,
            ClusterSelection::Cluster(key) => key.category() == category,
        }
    }

    pub fn cluster(self) -> Option<ClusterKey> {
        match self {
            ClusterSelection::All => None,
            ClusterSelection::Cluster(key) => Some(key),
        }
    }
}

impl fmt::Display for ClusterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClusterSelection {
    type Err = crate::model::UnknownClusterKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(ClusterSelection::All)
        } else {
            s.parse().map(ClusterSelection::Cluster)
        }
    }
}

impl TryFrom<String> for ClusterSelection {
    type Error = crate::model::UnknownClusterKey;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClusterSelection> for String {
    fn from(value: ClusterSelection) -> Self {
        value.as_str().to_string()
    }
}

impl From<ClusterKey> for ClusterSelection {
    fn from(key: ClusterKey) -> Self {
        ClusterSelection::Cluster(key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionState {
    pub selected_cluster: ClusterSelection,
    pub selected_suspect_id: Option<String>,
}

impl SelectionState {
    pub fn select_cluster(&mut self, selection: ClusterSelection) {
        self.selected_cluster = selection;
    }

    /// Returns true when the focal suspect actually changed.
    pub fn select_suspect(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.selected_suspect_id.as_deref() == Some(id.as_str()) {
            return false;
        }
        self.selected_suspect_id = Some(id);
        true
    }

    pub fn clear_suspect(&mut self) {
        self.selected_suspect_id = None;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = SelectionState::default();
        assert_eq!(state.selected_cluster, ClusterSelection::All);
        assert!(state.selected_suspect_id.is_none());
    }

    #[test]
    fn test_parse_and_serialize() {
        let sel: ClusterSelection = "mule_accounts".parse().unwrap();
        assert_eq!(sel, ClusterSelection::Cluster(ClusterKey::MuleAccounts));
        assert_eq!(serde_json::to_string(&sel).unwrap(), "\"mule_accounts\"");
        let all: ClusterSelection = serde_json::from_str("\"all\"").unwrap();
        assert_eq!(all, ClusterSelection::All);
        assert!(serde_json::from_str::<ClusterSelection>("\"bogus\"").is_err());
    }

    #[test]
    fn test_admits() {
        assert!(ClusterSelection::All.admits(Category::Website));
        let mules = ClusterSelection::Cluster(ClusterKey::MuleAccounts);
        assert!(mules.admits(Category::Mule));
        assert!(!mules.admits(Category::Suspected));
    }

    #[test]
    fn test_select_suspect_reports_change() {
        let mut state = SelectionState::default();
        assert!(state.select_suspect("0x1"));
        assert!(!state.select_suspect("0x1"));
        assert!(state.select_suspect("0x2"));
        state.clear_suspect();
        assert!(state.selected_suspect_id.is_none());
    }
}
