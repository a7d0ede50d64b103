use super::format::compact_currency;
use crate::model::{ClusterKey, Ring};
use crate::selection::ClusterSelection;
use serde::Serialize;

pub const NO_RINGS: &str = "No data for selected cluster.";
pub const MAX_ROWS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Critical,
    Elevated,
    Normal,
}

impl RiskBand {
    pub fn for_ring(score: f64) -> Self {
        Self::banded(score, 80.0)
    }

    /// Suspect badges use a lower elevated cut-off than rings.
    pub fn for_suspect(score: f64) -> Self {
        Self::banded(score, 70.0)
    }

    fn banded(score: f64, elevated: f64) -> Self {
        if score > 90.0 {
            RiskBand::Critical
        } else if score > elevated {
            RiskBand::Elevated
        } else {
            RiskBand::Normal
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RiskBand::Critical => "critical",
            RiskBand::Elevated => "elevated",
            RiskBand::Normal => "normal",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RingRow {
    pub id: String,
    pub pattern: String,
    pub volume: String,
    pub nodes: usize,
    pub risk: i64,
    pub band: RiskBand,
}

impl RingRow {
    pub fn from_ring(ring: &Ring, selection: ClusterSelection) -> Self {
        let pattern = if ring.pattern_type.trim().is_empty() {
            if selection.cluster() == Some(ClusterKey::Websites) {
                "Safelist"
            } else {
                "Smurfing"
            }
            .to_string()
        } else {
            ring.pattern_type.clone()
        };
        Self {
            id: format!("#{}", ring.ring_id),
            pattern,
            volume: compact_currency(ring.total_volume),
            nodes: ring.nodes.len(),
            risk: ring.risk_score.round() as i64,
            band: RiskBand::for_ring(ring.risk_score),
        }
    }
}

/// First rows in source order; the table never re-sorts.
pub fn rings_table(rings: &[Ring], selection: ClusterSelection) -> Vec<RingRow> {
    rings
        .iter()
        .take(MAX_ROWS)
        .map(|ring| RingRow::from_ring(ring, selection))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_critical_ring_row() {
        let ring = Ring::new("7", 95.0, 250_000.0);
        let row = RingRow::from_ring(&ring, ClusterSelection::All);
        assert_eq!(row.id, "#7");
        assert_eq!(row.band, RiskBand::Critical);
        assert_eq!(row.volume, "$250K");
        assert_eq!(row.risk, 95);
        assert_eq!(row.pattern, "Smurfing");
    }

    #[test]
    fn test_banding_thresholds() {
        assert_eq!(RiskBand::for_ring(90.0), RiskBand::Elevated);
        assert_eq!(RiskBand::for_ring(80.0), RiskBand::Normal);
        assert_eq!(RiskBand::for_ring(80.5), RiskBand::Elevated);
        assert_eq!(RiskBand::for_suspect(75.0), RiskBand::Elevated);
        assert_eq!(RiskBand::for_suspect(70.0), RiskBand::Normal);
        assert_eq!(RiskBand::for_suspect(91.0), RiskBand::Critical);
    }

    #[test]
    fn test_first_five_in_source_order() {
        let rings: Vec<Ring> = (0..8)
            .map(|i| Ring::new(i.to_string(), (i * 10) as f64, 0.0))
            .collect();
        let rows = rings_table(&rings, ClusterSelection::All);
        let ids: Vec<_> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["#0", "#1", "#2", "#3", "#4"]);
    }

    #[test]
    fn test_pattern_fallback_for_websites() {
        let ring = Ring::new("1", 10.0, 0.0);
        let row = RingRow::from_ring(&ring, ClusterSelection::Cluster(ClusterKey::Websites));
        assert_eq!(row.pattern, "Safelist");

        let mut circular = Ring::new("2", 10.0, 0.0);
        circular.pattern_type = "Circular".into();
        assert_eq!(RingRow::from_ring(&circular, ClusterSelection::All).pattern, "Circular");
    }
}
