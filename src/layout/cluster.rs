use super::pack::{PackLayout, PackedKind, pack};
use super::zoom::ZoomTransform;
use crate::hierarchy::build_hierarchy;
use crate::model::{Category, ClusterKey, ClusterSet};
use crate::selection::ClusterSelection;
use crate::widgets::format;
use serde::Serialize;

/// Gap between the canvas edge and the packed root circle.
const MARGIN: f64 = 20.0;

const ROOT_FILL: &str = "#f8fafc";
const ROOT_STROKE: &str = "#e2e8f0";
const DIMMED_FILL: &str = "#f1f5f9";
const DIMMED_STROKE: &str = "#e2e8f0";
const DIMMED_ICON: &str = "#94a3b8";
const LEAF_STROKE: &str = "#ffffff";
const HOVER_STROKE: &str = "#1e293b";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryStyle {
    pub fill: &'static str,
    pub stroke: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

static WEBSITE_STYLE: CategoryStyle = CategoryStyle {
    fill: "#3b82f6",
    stroke: "#2563eb",
    label: "Whitelist",
    icon: "\u{1F310}",
};

static MULE_STYLE: CategoryStyle = CategoryStyle {
    fill: "#ef4444",
    stroke: "#dc2626",
    label: "Mule Accounts",
    icon: "\u{26A0}\u{FE0F}",
};

static SUSPECTED_STYLE: CategoryStyle = CategoryStyle {
    fill: "#f59e0b",
    stroke: "#d97706",
    label: "Suspected Distribution",
    icon: "\u{1F441}\u{FE0F}",
};

/// The one place category colours and labels come from.
pub fn category_style(category: Category) -> &'static CategoryStyle {
    match category {
        Category::Website => &WEBSITE_STYLE,
        Category::Mule => &MULE_STYLE,
        Category::Suspected => &SUSPECTED_STYLE,
    }
}

/// Tab strip above the pack: label and the selection it writes.
pub fn cluster_tabs() -> [(&'static str, ClusterSelection); 4] {
    [
        ("All", ClusterSelection::All),
        ("Mules", ClusterSelection::Cluster(ClusterKey::MuleAccounts)),
        (
            "Suspected",
            ClusterSelection::Cluster(ClusterKey::SuspectedDistribution),
        ),
        ("Whitelist", ClusterSelection::Cluster(ClusterKey::Websites)),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodePaint {
    pub fill: String,
    pub stroke: String,
    pub stroke_width: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackTooltip {
    pub id: String,
    pub category_label: &'static str,
    pub volume: String,
    pub transactions: u64,
    pub is_risk: bool,
}

/// Packed cluster view: geometry plus the zoom transform applied over it.
#[derive(Debug, Clone)]
pub struct ClusterPackView {
    layout: PackLayout,
    zoom: ZoomTransform,
    width: f64,
    height: f64,
    scope: usize,
}

impl ClusterPackView {
    /// Default canvas height for a given width.
    pub fn default_height(width: f64) -> f64 {
        (width * 0.7).max(500.0)
    }

    pub fn new(clusters: &ClusterSet, width: f64, height: f64, padding: f64) -> Self {
        let hierarchy = build_hierarchy(clusters);
        let inner_w = (width - 2.0 * MARGIN).max(1.0);
        let inner_h = (height - 2.0 * MARGIN).max(1.0);
        let mut layout = pack(&hierarchy, inner_w, inner_h, padding);
        for node in &mut layout.nodes {
            node.x += MARGIN;
            node.y += MARGIN;
        }
        Self {
            layout,
            zoom: ZoomTransform::IDENTITY,
            width,
            height,
            scope: clusters.total_entities(),
        }
    }

    pub fn layout(&self) -> &PackLayout {
        &self.layout
    }

    pub fn zoom(&self) -> ZoomTransform {
        self.zoom
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// "Network Scope" legend count.
    pub fn scope(&self) -> usize {
        self.scope
    }

    /// Root is always active; other nodes follow their category.
    pub fn is_active(&self, index: usize, selection: ClusterSelection) -> bool {
        match self.layout.nodes.get(index).and_then(|n| n.category()) {
            Some(category) => selection.admits(category),
            None => true,
        }
    }

    /// Selection written by clicking `index`. Leaves select nothing.
    pub fn click(&self, index: usize) -> Option<ClusterSelection> {
        match &self.layout.nodes.get(index)?.kind {
            PackedKind::Root => Some(ClusterSelection::All),
            PackedKind::Cluster(key) => Some(ClusterSelection::Cluster(*key)),
            PackedKind::Leaf(_) => None,
        }
    }

    /// Node under a screen-space point, undoing the zoom transform first.
    pub fn node_at(&self, screen_x: f64, screen_y: f64) -> Option<usize> {
        let (x, y) = self.zoom.invert(screen_x, screen_y);
        self.layout.hit_test(x, y)
    }

    pub fn click_at(&self, screen_x: f64, screen_y: f64) -> Option<ClusterSelection> {
        self.node_at(screen_x, screen_y)
            .and_then(|index| self.click(index))
    }

    /// Tooltip for an active leaf; `None` everywhere else.
    pub fn hover(&self, index: usize, selection: ClusterSelection) -> Option<PackTooltip> {
        let node = self.layout.nodes.get(index)?;
        let PackedKind::Leaf(entity) = &node.kind else {
            return None;
        };
        if !selection.admits(entity.category) {
            return None;
        }
        Some(PackTooltip {
            id: entity.id.clone(),
            category_label: category_style(entity.category).label,
            volume: format::currency(entity.total_amount),
            transactions: entity.tx_count,
            is_risk: entity.category == Category::Mule,
        })
    }

    pub fn is_hoverable(&self, index: usize, selection: ClusterSelection) -> bool {
        self.hover(index, selection).is_some()
    }

    pub fn paint(
        &self,
        index: usize,
        selection: ClusterSelection,
        hovered: Option<usize>,
    ) -> Option<NodePaint> {
        let node = self.layout.nodes.get(index)?;
        let paint = match (&node.kind, node.category()) {
            (PackedKind::Root, _) | (_, None) => NodePaint {
                fill: ROOT_FILL.to_string(),
                stroke: ROOT_STROKE.to_string(),
                stroke_width: 1.0,
            },
            (kind, Some(category)) if !selection.admits(category) => NodePaint {
                fill: DIMMED_FILL.to_string(),
                stroke: DIMMED_STROKE.to_string(),
                stroke_width: if matches!(kind, PackedKind::Leaf(_)) { 2.0 } else { 1.0 },
            },
            (PackedKind::Cluster(_), Some(category)) => {
                let style = category_style(category);
                NodePaint {
                    fill: format!("{}15", style.fill),
                    stroke: format!("{}40", style.stroke),
                    stroke_width: 1.0,
                }
            }
            (PackedKind::Leaf(_), Some(category)) => {
                let highlighted = hovered == Some(index);
                NodePaint {
                    fill: category_style(category).fill.to_string(),
                    stroke: if highlighted { HOVER_STROKE } else { LEAF_STROKE }.to_string(),
                    stroke_width: if highlighted { 3.0 } else { 2.0 },
                }
            }
        };
        Some(paint)
    }

    /// Icon colour and opacity for a cluster bubble.
    pub fn icon_paint(category: Category, selection: ClusterSelection) -> (&'static str, f64) {
        if selection.admits(category) {
            (category_style(category).stroke, 0.5)
        } else {
            (DIMMED_ICON, 0.2)
        }
    }

    fn canvas_center(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    pub fn zoom_in(&mut self) {
        let focus = self.canvas_center();
        self.zoom.zoom_in(focus);
    }

    pub fn zoom_out(&mut self) {
        let focus = self.canvas_center();
        self.zoom.zoom_out(focus);
    }

    pub fn wheel(&mut self, factor: f64, focus: (f64, f64)) {
        self.zoom.scale_by(factor, focus);
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.zoom.pan(dx, dy);
    }

    pub fn reset_zoom(&mut self) {
        self.zoom = ZoomTransform::IDENTITY;
    }
}
