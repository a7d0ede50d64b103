use super::de;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Role of a node in a suspect's ego network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkGroup {
    Suspected,
    Related,
    #[default]
    #[serde(other)]
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkNode {
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "de::null_as_default")]
    pub group: NetworkGroup,
}

impl NetworkNode {
    pub fn new(id: impl Into<String>, group: NetworkGroup) -> Self {
        Self {
            id: id.into(),
            group,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkLink {
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub source: String,
    #[serde(default, deserialize_with = "de::string_or_number")]
    pub target: String,
    #[serde(default, deserialize_with = "de::bool_or_false")]
    pub dashed: bool,
}

impl NetworkLink {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            dashed: false,
        }
    }

    pub fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawNetworkGraph {
    #[serde(default, deserialize_with = "de::null_as_default")]
    nodes: Vec<Option<NetworkNode>>,
    #[serde(default, deserialize_with = "de::null_as_default")]
    links: Vec<Option<NetworkLink>>,
}

/// Body of `/investigation/network/{id}`. Null entries and nodes without an id
/// are dropped on decode; dangling links are dropped by [`NetworkGraph::to_graph`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawNetworkGraph")]
pub struct NetworkGraph {
    pub nodes: Vec<NetworkNode>,
    pub links: Vec<NetworkLink>,
}

impl From<RawNetworkGraph> for NetworkGraph {
    fn from(raw: RawNetworkGraph) -> Self {
        Self {
            nodes: raw
                .nodes
                .into_iter()
                .flatten()
                .filter(|n| !n.id.is_empty())
                .collect(),
            links: raw.links.into_iter().flatten().collect(),
        }
    }
}

impl NetworkGraph {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Build a directed graph whose weights index into `self.nodes` and whose
    /// edges carry the dashed flag. Duplicate node ids keep the first entry.
    pub fn to_graph(&self) -> (DiGraph<usize, bool>, HashMap<&str, NodeIndex>) {
        let mut graph = DiGraph::new();
        let mut indices: HashMap<&str, NodeIndex> = HashMap::new();

        for (i, node) in self.nodes.iter().enumerate() {
            if indices.contains_key(node.id.as_str()) {
                continue;
            }
            let idx = graph.add_node(i);
            indices.insert(node.id.as_str(), idx);
        }

        for link in &self.links {
            let (Some(&from), Some(&to)) = (
                indices.get(link.source.as_str()),
                indices.get(link.target.as_str()),
            ) else {
                continue;
            };
            graph.add_edge(from, to, link.dashed);
        }

        (graph, indices)
    }
}
