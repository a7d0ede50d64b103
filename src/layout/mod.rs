//! Pure layout: hierarchy and physics in, geometry out. Nothing here draws.

mod cluster;
mod force;
mod network;
mod pack;
mod zoom;

pub use cluster::{
    CategoryStyle, ClusterPackView, NodePaint, PackTooltip, category_style, cluster_tabs,
};
pub use force::{ForceParams, SimNode, Simulation};
pub use network::{
    ARROW_REF_X, Decorations, DragPhase, FOCUS_COLOR, FOCUS_DOT_RADIUS, FOCUS_RING_RADIUS,
    LABEL_GAP, LINK_DASH, NetworkLayout, NetworkPhase, NetworkTicket, NetworkView, NodePosition,
    NodeStyle, PositionFrame, ResolvedLink, node_style,
};
pub use pack::{Circle, PackLayout, PackedKind, PackedNode, enclose, pack, pack_siblings};
pub use zoom::{MAX_SCALE, MIN_SCALE, ZOOM_STEP, ZoomTransform};

/// Linear congruential generator used wherever a layout needs "randomness"
/// (enclosure shuffles, jiggle for coincident nodes). Seeded identically on
/// every run so layouts are reproducible.
#[derive(Debug, Clone)]
pub struct Lcg {
    state: u64,
}

impl Lcg {
    const A: u64 = 1_664_525;
    const C: u64 = 1_013_904_223;
    const M: u64 = 1 << 32;

    pub fn new() -> Self {
        Self { state: 1 }
    }

    /// Next value in `[0, 1)`.
    pub fn next_f64(&mut self) -> f64 {
        self.state = (Self::A * self.state + Self::C) % Self::M;
        self.state as f64 / Self::M as f64
    }

    /// Fisher–Yates, consuming one draw per element.
    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        let mut m = items.len();
        while m > 0 {
            let i = (self.next_f64() * m as f64) as usize;
            m -= 1;
            items.swap(m, i);
        }
    }

    /// Tiny offset used to separate exactly coincident points.
    pub fn jiggle(&mut self) -> f64 {
        (self.next_f64() - 0.5) * 1e-6
    }
}

impl Default for Lcg {
    fn default() -> Self {
        Self::new()
    }
}
