//! Derived-metric widgets. Pure functions of the filtered entity set.

pub mod format;
mod histogram;
mod pattern_card;
mod rings_table;
mod suspects;

pub use histogram::{
    BUCKET_WIDTH, BUCKETS, BarTone, HistogramBar, RiskHistogram, bucket_index, risk_histogram,
    risk_score,
};
pub use pattern_card::{
    EntityBadge, KeyEntity, NO_ENTITIES, PatternCard, pattern_card, pattern_name,
};
pub use rings_table::{MAX_ROWS, NO_RINGS, RingRow, RiskBand, rings_table};
pub use suspects::{
    NO_SUSPECTS, SuspectFilter, SuspectRow, UNKNOWN_CLUSTER, filter_suspects, suspect_rows,
};

use crate::filter::{FanWindow, FilterState, filter_entities};
use crate::model::AnalysisPayload;
use crate::selection::ClusterSelection;
use serde::Serialize;

/// Everything the dashboard shows below the pack.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardWidgets {
    pub selection: ClusterSelection,
    pub filters: FilterState,
    pub fan_window_label: &'static str,
    pub histogram: RiskHistogram,
    pub pattern: PatternCard,
    pub rings: Vec<RingRow>,
}

pub fn dashboard_widgets(
    payload: &AnalysisPayload,
    selection: ClusterSelection,
    filters: &FilterState,
) -> DashboardWidgets {
    let visible = filter_entities(&payload.clusters, selection, filters);
    DashboardWidgets {
        selection,
        filters: *filters,
        fan_window_label: filters.fan_window.label(),
        histogram: risk_histogram(&visible),
        pattern: pattern_card(&visible, selection),
        rings: rings_table(&payload.rings, selection),
    }
}

/// Labels for the fan-window slider, in step order.
pub fn fan_window_labels() -> [&'static str; 3] {
    FanWindow::STEPS.map(FanWindow::label)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Category, Entity, Ring};

    #[test]
    fn test_single_mule_scenario() {
        let mut a = Entity::new("A", Category::Mule);
        a.tx_count = 10;
        a.unique_senders = 4;
        a.total_amount = 1000.0;
        a.fan_in_out_ratio = 6.0;

        let mut payload = AnalysisPayload::default();
        payload.clusters.push(a);
        payload.rings.push(Ring::new("7", 95.0, 250_000.0));

        let widgets = dashboard_widgets(&payload, ClusterSelection::All, &FilterState::default());
        assert_eq!(widgets.histogram.entity_count, 1);
        assert_eq!(widgets.histogram.counts()[6], 1);
        assert_eq!(widgets.pattern.average_transaction, 100.0);
        assert_eq!(widgets.pattern.key_entities[0].id, "A");
        assert_eq!(widgets.rings[0].band, RiskBand::Critical);
        assert_eq!(widgets.fan_window_label, "High");
    }

    #[test]
    fn test_ratio_below_window_empties_widgets() {
        let mut a = Entity::new("A", Category::Mule);
        a.fan_in_out_ratio = 4.9;
        let mut payload = AnalysisPayload::default();
        payload.clusters.push(a);

        let widgets = dashboard_widgets(&payload, ClusterSelection::All, &FilterState::default());
        assert_eq!(widgets.histogram.entity_count, 0);
        assert!(widgets.pattern.key_entities.is_empty());
        assert!(widgets.rings.is_empty());
    }

    #[test]
    fn test_fan_window_labels() {
        assert_eq!(fan_window_labels(), ["All", "Medium", "High"]);
    }
}
