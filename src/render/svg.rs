use super::escape;
use crate::layout::{
    ARROW_REF_X, ClusterPackView, FOCUS_COLOR, FOCUS_DOT_RADIUS, FOCUS_RING_RADIUS, LABEL_GAP,
    LINK_DASH, NetworkLayout, NetworkPhase, NetworkView, PackedKind, category_style,
};
use crate::selection::ClusterSelection;
use std::fmt::Write;

pub const NO_NETWORK: &str = "No network data found for this entity";
pub const NETWORK_ERROR: &str = "Error loading graph data";

const LINK_COLOR: &str = "#cbd5e1";
const ARROW_COLOR: &str = "#94a3b8";
const GRID_DOT: &str = "#e2e8f0";
const MUTED_TEXT: &str = "#94a3b8";
const LABEL_COLOR: &str = "#64748b";
/// Seconds per full turn of the focal ring.
const FOCUS_SPIN_SECS: u32 = 8;

fn open_svg(out: &mut String, width: f64, height: f64) {
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
    );
}

/// Circle-pack scene. The zoom transform sits on one wrapping group; circle
/// geometry is written exactly as laid out.
pub fn pack_scene(
    view: &ClusterPackView,
    selection: ClusterSelection,
    hovered: Option<usize>,
) -> String {
    let (width, height) = view.size();
    let mut out = String::new();
    open_svg(&mut out, width, height);
    let _ = write!(out, r#"<g class="viewport" transform="{}">"#, view.zoom().to_svg());

    for (index, node) in view.layout().nodes.iter().enumerate() {
        let Some(paint) = view.paint(index, selection, hovered) else {
            continue;
        };
        let cursor = if node.depth > 0 { "pointer" } else { "default" };
        let _ = write!(
            out,
            r#"<circle cx="{:.2}" cy="{:.2}" r="{:.2}" fill="{}" stroke="{}" stroke-width="{}" data-index="{}" data-depth="{}" style="cursor:{}""#,
            node.x,
            node.y,
            node.r,
            paint.fill,
            paint.stroke,
            paint.stroke_width,
            index,
            node.depth,
            cursor
        );
        if view.is_hoverable(index, selection) {
            out.push_str(r#" data-hoverable="true""#);
        }
        out.push_str("/>");
    }

    for node in &view.layout().nodes {
        let PackedKind::Cluster(key) = node.kind else {
            continue;
        };
        let category = key.category();
        let (fill, opacity) = ClusterPackView::icon_paint(category, selection);
        let _ = write!(
            out,
            r#"<text class="cluster-icon" x="{:.2}" y="{:.2}" text-anchor="middle" dominant-baseline="central" font-size="24" fill="{}" opacity="{}" pointer-events="none">{}</text>"#,
            node.x,
            node.y,
            fill,
            opacity,
            category_style(category).icon
        );
    }

    out.push_str("</g></svg>");
    out
}

fn placeholder(out: &mut String, width: f64, height: f64, text: &str, color: &str) {
    let _ = write!(
        out,
        r#"<text x="{}" y="{}" text-anchor="middle" fill="{}">{}</text>"#,
        width / 2.0,
        height / 2.0,
        color,
        escape(text)
    );
}

fn network_defs(out: &mut String) {
    let _ = write!(
        out,
        concat!(
            r#"<defs><pattern id="grid" width="40" height="40" patternUnits="userSpaceOnUse">"#,
            r#"<circle cx="1" cy="1" r="1" fill="{grid}"/></pattern>"#,
            r#"<marker id="arrow" viewBox="0 -5 10 10" refX="{ref_x}" refY="0" markerWidth="6" markerHeight="6" orient="auto">"#,
            r#"<path d="M0,-5L10,0L0,5" fill="{arrow}"/></marker></defs>"#,
            r#"<rect width="100%" height="100%" fill="url(#grid)"/>"#
        ),
        grid = GRID_DOT,
        ref_x = ARROW_REF_X,
        arrow = ARROW_COLOR
    );
}

fn network_body(out: &mut String, layout: &NetworkLayout) {
    let _ = write!(out, r#"<g class="links" stroke="{LINK_COLOR}" stroke-width="1.5">"#);
    for link in layout.links() {
        let (Some((x1, y1)), Some((x2, y2))) =
            (layout.position(link.source), layout.position(link.target))
        else {
            continue;
        };
        let source = &layout.nodes()[link.source].id;
        let target = &layout.nodes()[link.target].id;
        let _ = write!(
            out,
            r#"<line x1="{x1:.2}" y1="{y1:.2}" x2="{x2:.2}" y2="{y2:.2}" data-source="{}" data-target="{}" marker-end="url(#arrow)""#,
            escape(source),
            escape(target)
        );
        if link.dashed {
            let _ = write!(out, r#" stroke-dasharray="{LINK_DASH}""#);
        }
        out.push_str("/>");
    }
    out.push_str("</g><g class=\"nodes\">");

    for (index, node) in layout.nodes().iter().enumerate() {
        let (Some((x, y)), Some(style)) = (layout.position(index), layout.style(index)) else {
            continue;
        };
        let id = escape(&node.id);
        let decorations = layout.decorations(index);
        let _ = write!(
            out,
            r#"<g class="node" data-id="{id}" transform="translate({x:.2},{y:.2})" style="cursor:grab">"#
        );
        if decorations.focus_ring {
            let _ = write!(
                out,
                concat!(
                    r#"<g class="focus-ring"><circle r="{FOCUS_RING_RADIUS}" fill="none" stroke="{FOCUS_COLOR}" stroke-width="1.5" stroke-dasharray="{LINK_DASH}"/>"#,
                    r#"<animateTransform attributeName="transform" type="rotate" from="0" to="360" dur="{FOCUS_SPIN_SECS}s" repeatCount="indefinite"/></g>"#
                ),
                FOCUS_RING_RADIUS = FOCUS_RING_RADIUS,
                FOCUS_COLOR = FOCUS_COLOR,
                LINK_DASH = LINK_DASH,
                FOCUS_SPIN_SECS = FOCUS_SPIN_SECS
            );
        }
        let _ = write!(
            out,
            r#"<circle r="{}" fill="{}" stroke="{}" stroke-width="2"/>"#,
            style.radius, style.fill, style.stroke
        );
        if decorations.center_dot {
            let _ = write!(
                out,
                r#"<circle r="{FOCUS_DOT_RADIUS}" fill="{FOCUS_COLOR}"/>"#
            );
        }
        let _ = write!(
            out,
            r#"<text dy="{}" text-anchor="middle" font-family="monospace" font-size="10" fill="{LABEL_COLOR}">{id}</text></g>"#,
            style.radius + LABEL_GAP
        );
    }
    out.push_str("</g>");
}

/// Ego-network scene in its current simulation state, or a placeholder.
pub fn network_scene(view: &NetworkView, width: f64, height: f64) -> String {
    let mut out = String::new();
    open_svg(&mut out, width, height);
    network_defs(&mut out);
    match view.phase() {
        NetworkPhase::Idle | NetworkPhase::Loading => {}
        NetworkPhase::Empty => placeholder(&mut out, width, height, NO_NETWORK, MUTED_TEXT),
        NetworkPhase::Failed(_) => placeholder(&mut out, width, height, NETWORK_ERROR, FOCUS_COLOR),
        NetworkPhase::Ready(layout) => network_body(&mut out, layout),
    }
    out.push_str("</svg>");
    out
}

/// Standalone scene for one laid-out network, as written by `ringlens network --format svg`.
pub fn network_svg(layout: &NetworkLayout, width: f64, height: f64) -> String {
    let mut out = String::new();
    open_svg(&mut out, width, height);
    network_defs(&mut out);
    network_body(&mut out, layout);
    out.push_str("</svg>");
    out
}
