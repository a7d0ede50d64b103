//! Integration tests for the ringlens library API: payload in, geometry and widgets out.

use ringlens::controller::{Effect, Page, ViewState};
use ringlens::filter::FanWindow;
use ringlens::layout::{ForceParams, NetworkView, PackedKind};
use ringlens::model::{ClusterKey, NetworkGraph};
use ringlens::render::Markdown;
use ringlens::render::svg::{network_scene, pack_scene};
use ringlens::widgets::RiskBand;
use ringlens::{AnalysisPayload, ClusterSelection, Controller, UiEvent, layout_network};

const PAYLOAD: &str = r#"{
    "clusters": {
        "websites": [
            {"id": "shop.example", "totalAmount": 12000, "txCount": 40, "uniqueSenders": 30,
             "fan_in_out_ratio": 1.5}
        ],
        "mule_accounts": [
            {"id": "0xMULE1", "totalAmount": 1000, "txCount": 10, "uniqueSenders": 4,
             "fan_in_out_ratio": 6.0, "is_commission": true},
            {"id": "", "txCount": 3},
            null,
            {"id": 4417, "txCount": "7", "fan_in_out_ratio": "9.5"}
        ]
    },
    "rings": [
        {"ring_id": 7, "risk_score": 95, "total_volume": 250000, "nodes": ["0xMULE1", "4417"],
         "pattern_type": "cycle"},
        {"ring_id": "8", "risk_score": 82.4, "total_volume": 1234567}
    ]
}"#;

fn payload() -> AnalysisPayload {
    serde_json::from_str(PAYLOAD).unwrap()
}

fn dashboard() -> Controller {
    let mut controller = Controller::default();
    let effects = controller.handle(UiEvent::AnalysisComplete);
    assert_eq!(controller.page(), Page::Dashboard);
    assert!(effects.contains(&Effect::LoadAnalysis));
    controller.apply_analysis(Ok::<_, String>(payload()));
    controller
}

#[test]
fn test_payload_drops_malformed_entities() {
    let payload = payload();
    assert_eq!(payload.clusters.websites.len(), 1);
    assert_eq!(payload.clusters.mule_accounts.len(), 2);
    assert!(payload.clusters.suspected_distribution.is_empty());
    assert_eq!(payload.clusters.mule_accounts[1].id, "4417");
    assert_eq!(payload.clusters.mule_accounts[1].tx_count, 7);
}

#[test]
fn test_dashboard_widgets_follow_selection_and_filters() {
    let mut controller = dashboard();
    let widgets = controller.widgets().unwrap();
    // High window: only the two mules clear a ratio of 5.
    assert_eq!(widgets.histogram.entity_count, 2);
    assert_eq!(widgets.rings.len(), 2);
    assert_eq!(widgets.rings[0].id, "#7");
    assert_eq!(widgets.rings[0].band, RiskBand::Critical);
    assert_eq!(widgets.rings[1].pattern, "Smurfing");
    assert_eq!(widgets.rings[1].volume, "$1.2M");

    controller.handle(UiEvent::SetFanWindow {
        window: FanWindow::All,
    });
    assert_eq!(controller.widgets().unwrap().histogram.entity_count, 3);

    controller.handle(UiEvent::SetCommissionRetention { enabled: true });
    let widgets = controller.widgets().unwrap();
    assert_eq!(widgets.histogram.entity_count, 1);
    assert_eq!(widgets.pattern.key_entities[0].id, "0xMULE1");

    controller.handle(UiEvent::SelectCluster {
        cluster: ClusterSelection::Cluster(ClusterKey::Websites),
    });
    let widgets = controller.widgets().unwrap();
    assert_eq!(widgets.pattern.pattern_name, "Whitelisted");
    assert_eq!(widgets.histogram.entity_count, 0);
    assert!(widgets.to_markdown().contains("No entities selected."));
}

#[test]
fn test_click_on_cluster_rim_selects_cluster() {
    let mut controller = dashboard();
    let (x, y, r) = {
        let pack = controller.pack().unwrap();
        let node = pack
            .layout()
            .nodes
            .iter()
            .find(|n| n.kind == PackedKind::Cluster(ClusterKey::MuleAccounts))
            .unwrap();
        (node.x, node.y, node.r)
    };

    // Just inside the bubble edge, outside any leaf.
    controller.handle(UiEvent::PackClick { x, y: y - r + 2.0 });
    assert_eq!(
        controller.selection().selected_cluster,
        ClusterSelection::Cluster(ClusterKey::MuleAccounts)
    );

    let svg = pack_scene(
        controller.pack().unwrap(),
        controller.selection().selected_cluster,
        None,
    );
    // The whitelist bubble and its leaf are dimmed, so only mules are hoverable.
    assert_eq!(svg.matches("data-hoverable").count(), 2);
}

#[test]
fn test_leaving_dashboard_resets_filters() {
    let mut controller = dashboard();
    controller.handle(UiEvent::SetFanWindow {
        window: FanWindow::Medium,
    });
    controller.handle(UiEvent::Navigate {
        page: Page::Investigation,
    });
    assert_eq!(controller.filters().fan_window, FanWindow::High);
    assert_eq!(controller.selection().selected_cluster, ClusterSelection::All);
}

#[test]
fn test_empty_analysis_is_empty_state() {
    let mut controller = Controller::default();
    controller.handle(UiEvent::AnalysisComplete);
    controller.apply_analysis(Ok::<_, String>(
        serde_json::from_str::<AnalysisPayload>(r#"{"clusters": {}}"#).unwrap(),
    ));
    assert!(matches!(controller.analysis(), ViewState::Empty));
}

const NETWORK: &str = r#"{
    "nodes": [
        {"id": "0xA", "group": "suspected"},
        {"id": "0xB", "group": "related"},
        {"id": "0xC"},
        {"id": "0xA", "group": "neutral"},
        {"group": "related"}
    ],
    "links": [
        {"source": "0xA", "target": "0xB"},
        {"source": "0xB", "target": "0xC", "dashed": true},
        {"source": "0xC", "target": "0xGHOST"}
    ]
}"#;

#[test]
fn test_network_layout_settles_around_center() {
    let graph: NetworkGraph = serde_json::from_str(NETWORK).unwrap();
    let layout = layout_network("0xA", &graph, ForceParams::centered(800.0, 600.0), 1000);

    assert!(!layout.needs_tick());
    assert_eq!(layout.links().len(), 2);

    let frame = layout.frame(1);
    let n = frame.nodes.len() as f64;
    let cx = frame.nodes.iter().map(|p| p.x).sum::<f64>() / n;
    let cy = frame.nodes.iter().map(|p| p.y).sum::<f64>() / n;
    assert!((cx - 400.0).abs() < 5.0, "centroid x {cx}");
    assert!((cy - 300.0).abs() < 5.0, "centroid y {cy}");

    // Same input, same picture.
    let again = layout_network("0xA", &graph, ForceParams::centered(800.0, 600.0), 1000);
    assert_eq!(again.frame(1), frame);
}

#[test]
fn test_superseded_network_response_is_dropped() {
    let graph: NetworkGraph = serde_json::from_str(NETWORK).unwrap();
    let mut view = NetworkView::default();
    let first = view.request("0xA");
    let second = view.request("0xB");

    assert!(!view.resolve(&first, Ok::<_, String>(graph.clone())));
    assert!(view.layout().is_none());
    assert!(view.resolve(&second, Ok::<_, String>(graph)));
    assert_eq!(view.layout().unwrap().focus(), "0xB");

    let svg = network_scene(&view, 800.0, 600.0);
    assert_eq!(svg.matches("focus-ring").count(), 1);
}
