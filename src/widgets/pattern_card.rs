use super::format::short_id;
use crate::model::{ClusterKey, Entity};
use crate::selection::ClusterSelection;
use serde::Serialize;

pub const NO_ENTITIES: &str = "No entities selected.";
const KEY_ENTITIES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityBadge {
    Safe,
    Mule,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyEntity {
    pub id: String,
    pub short_id: String,
    pub badge: EntityBadge,
}

/// Summary of the entities currently passing the filters.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternCard {
    pub pattern_name: &'static str,
    pub entity_count: usize,
    pub average_transaction: f64,
    pub max_fan_out: u64,
    pub fan_out_bar_pct: f64,
    pub average_bar_pct: f64,
    pub key_entities: Vec<KeyEntity>,
}

pub fn pattern_name(selection: ClusterSelection) -> &'static str {
    match selection.cluster() {
        Some(ClusterKey::Websites) => "Whitelisted",
        Some(ClusterKey::SuspectedDistribution) => "Layering",
        _ => "Smurfing",
    }
}

pub fn pattern_card(entities: &[&Entity], selection: ClusterSelection) -> PatternCard {
    let total_amount: f64 = entities.iter().map(|e| e.total_amount).sum();
    let total_tx: u64 = entities.iter().map(|e| e.tx_count).sum();
    let average_transaction = if total_tx > 0 {
        total_amount / total_tx as f64
    } else {
        0.0
    };

    let max_fan_out = entities
        .iter()
        .map(|e| e.unique_senders.max(e.unique_receivers))
        .max()
        .unwrap_or(0);

    let badge = if selection.cluster() == Some(ClusterKey::Websites) {
        EntityBadge::Safe
    } else {
        EntityBadge::Mule
    };

    let mut by_volume = entities.to_vec();
    by_volume.sort_by(|a, b| b.total_amount.total_cmp(&a.total_amount));
    let key_entities = by_volume
        .into_iter()
        .take(KEY_ENTITIES)
        .map(|e| KeyEntity {
            id: e.id.clone(),
            short_id: short_id(&e.id),
            badge,
        })
        .collect();

    PatternCard {
        pattern_name: pattern_name(selection),
        entity_count: entities.len(),
        average_transaction,
        max_fan_out,
        fan_out_bar_pct: (max_fan_out as f64 * 2.0).min(100.0),
        average_bar_pct: (average_transaction / 10_000.0 * 100.0).min(100.0),
        key_entities,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    fn entity(id: &str, amount: f64, tx: u64, senders: u64, receivers: u64) -> Entity {
        let mut e = Entity::new(id, Category::Mule);
        e.total_amount = amount;
        e.tx_count = tx;
        e.unique_senders = senders;
        e.unique_receivers = receivers;
        e
    }

    #[test]
    fn test_metrics() {
        let a = entity("a", 1000.0, 10, 4, 2);
        let b = entity("b", 3000.0, 10, 1, 70);
        let card = pattern_card(&[&a, &b], ClusterSelection::All);
        assert_eq!(card.average_transaction, 200.0);
        assert_eq!(card.max_fan_out, 70);
        assert_eq!(card.fan_out_bar_pct, 100.0);
        assert!((card.average_bar_pct - 2.0).abs() < 1e-9);
        assert_eq!(card.pattern_name, "Smurfing");
    }

    #[test]
    fn test_no_transactions_means_zero_average() {
        let a = entity("a", 500.0, 0, 0, 0);
        let card = pattern_card(&[&a], ClusterSelection::All);
        assert_eq!(card.average_transaction, 0.0);
        assert!(pattern_card(&[], ClusterSelection::All).key_entities.is_empty());
    }

    #[test]
    fn test_top_three_stable() {
        let e: Vec<Entity> = [("a", 5.0), ("b", 9.0), ("c", 5.0), ("d", 1.0), ("e", 9.0)]
            .iter()
            .map(|&(id, amt)| entity(id, amt, 1, 0, 0))
            .collect();
        let refs: Vec<&Entity> = e.iter().collect();
        let card = pattern_card(&refs, ClusterSelection::Cluster(ClusterKey::Websites));
        let ids: Vec<_> = card.key_entities.iter().map(|k| k.id.as_str()).collect();
        assert_eq!(ids, ["b", "e", "a"]);
        assert!(card.key_entities.iter().all(|k| k.badge == EntityBadge::Safe));
        assert_eq!(card.pattern_name, "Whitelisted");
    }

    #[test]
    fn test_pattern_names() {
        let layering = ClusterSelection::Cluster(ClusterKey::SuspectedDistribution);
        assert_eq!(pattern_name(layering), "Layering");
        let mules = ClusterSelection::Cluster(ClusterKey::MuleAccounts);
        assert_eq!(pattern_name(mules), "Smurfing");
    }
}
