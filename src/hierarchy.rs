//! Root → category → entity tree used for area-proportional packing.

use crate::model::{Category, ClusterKey, ClusterSet, Entity};

#[derive(Debug, Clone, PartialEq)]
pub enum HierarchyKind {
    Root,
    Cluster(ClusterKey),
    Leaf(Entity),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HierarchyNode {
    pub name: String,
    pub kind: HierarchyKind,
    /// Own sizing weight. Leaves carry `txCount || 1`; inner nodes weigh 1 so
    /// an empty bucket still packs to a visible bubble.
    pub value: f64,
    pub children: Vec<HierarchyNode>,
}

impl HierarchyNode {
    pub fn category(&self) -> Option<Category> {
        match &self.kind {
            HierarchyKind::Root => None,
            HierarchyKind::Cluster(key) => Some(key.category()),
            HierarchyKind::Leaf(entity) => Some(entity.category),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, HierarchyKind::Leaf(_))
    }

    /// Own weight plus the weights of every descendant.
    pub fn aggregate_value(&self) -> f64 {
        self.value
            + self
                .children
                .iter()
                .map(HierarchyNode::aggregate_value)
                .sum::<f64>()
    }
}

/// Build the fixed three-level tree. The three category nodes are always
/// present, in `websites, mule_accounts, suspected_distribution` order.
pub fn build_hierarchy(clusters: &ClusterSet) -> HierarchyNode {
    let children = clusters
        .buckets()
        .map(|(key, entities)| HierarchyNode {
            name: key.as_str().to_string(),
            kind: HierarchyKind::Cluster(key),
            value: 1.0,
            children: entities.iter().map(leaf).collect(),
        })
        .collect();

    HierarchyNode {
        name: "root".to_string(),
        kind: HierarchyKind::Root,
        value: 1.0,
        children,
    }
}

fn leaf(entity: &Entity) -> HierarchyNode {
    HierarchyNode {
        name: entity.id.clone(),
        value: entity.pack_value(),
        kind: HierarchyKind::Leaf(entity.clone()),
        children: Vec::new(),
    }
}
