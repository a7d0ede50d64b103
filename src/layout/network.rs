use super::force::{ForceParams, Simulation};
use crate::model::{NetworkGraph, NetworkGroup, NetworkNode};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

pub const FOCUS_RING_RADIUS: f64 = 50.0;
pub const FOCUS_DOT_RADIUS: f64 = 6.0;
pub const FOCUS_COLOR: &str = "#ef4444";
/// Distance from a node's rim to its label baseline.
pub const LABEL_GAP: f64 = 15.0;
pub const ARROW_REF_X: f64 = 25.0;
pub const LINK_DASH: &str = "4 4";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeStyle {
    pub radius: f64,
    pub fill: &'static str,
    pub stroke: &'static str,
}

static SUSPECTED_NODE: NodeStyle = NodeStyle {
    radius: 30.0,
    fill: "#fee2e2",
    stroke: "#ef4444",
};

static RELATED_NODE: NodeStyle = NodeStyle {
    radius: 20.0,
    fill: "#dbeafe",
    stroke: "#3b82f6",
};

static NEUTRAL_NODE: NodeStyle = NodeStyle {
    radius: 15.0,
    fill: "#f1f5f9",
    stroke: "#94a3b8",
};

pub fn node_style(group: NetworkGroup) -> &'static NodeStyle {
    match group {
        NetworkGroup::Suspected => &SUSPECTED_NODE,
        NetworkGroup::Related => &RELATED_NODE,
        NetworkGroup::Neutral => &NEUTRAL_NODE,
    }
}

/// Extra marks drawn on a node. Only the focal node carries any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Decorations {
    pub focus_ring: bool,
    pub center_dot: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DragPhase {
    Start,
    Move,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedLink {
    pub source: usize,
    pub target: usize,
    pub dashed: bool,
}

/// A loaded ego network and its running simulation.
#[derive(Debug, Clone)]
pub struct NetworkLayout {
    focus: String,
    nodes: Vec<NetworkNode>,
    links: Vec<ResolvedLink>,
    simulation: Simulation,
    active_drags: usize,
}

impl NetworkLayout {
    pub fn new(focus: impl Into<String>, graph: &NetworkGraph, params: ForceParams) -> Self {
        let (g, _) = graph.to_graph();
        let nodes: Vec<NetworkNode> = g
            .node_indices()
            .map(|ix| graph.nodes[g[ix]].clone())
            .collect();
        let links: Vec<ResolvedLink> = g
            .edge_references()
            .map(|e| ResolvedLink {
                source: e.source().index(),
                target: e.target().index(),
                dashed: *e.weight(),
            })
            .collect();

        let pairs: Vec<(usize, usize)> = links.iter().map(|l| (l.source, l.target)).collect();
        let simulation = Simulation::new(nodes.len(), &pairs, params);

        Self {
            focus: focus.into(),
            nodes,
            links,
            simulation,
            active_drags: 0,
        }
    }

    pub fn focus(&self) -> &str {
        &self.focus
    }

    pub fn nodes(&self) -> &[NetworkNode] {
        &self.nodes
    }

    pub fn links(&self) -> &[ResolvedLink] {
        &self.links
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn node_index(&self, id: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    pub fn position(&self, index: usize) -> Option<(f64, f64)> {
        self.simulation.node(index).map(|n| (n.x, n.y))
    }

    pub fn style(&self, index: usize) -> Option<&'static NodeStyle> {
        self.nodes.get(index).map(|n| node_style(n.group))
    }

    pub fn decorations(&self, index: usize) -> Decorations {
        let focal = self.nodes.get(index).is_some_and(|n| n.id == self.focus);
        Decorations {
            focus_ring: focal,
            center_dot: focal,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.active_drags > 0
    }

    /// Pin/unpin a node following the pointer. The first concurrent drag
    /// reheats the simulation, the last one lets it cool again.
    pub fn drag(&mut self, phase: DragPhase, index: usize, x: f64, y: f64) -> bool {
        let Some(node) = self.simulation.node(index).copied() else {
            return false;
        };
        match phase {
            DragPhase::Start => {
                if self.active_drags == 0 {
                    let target = self.simulation.params().drag_alpha_target;
                    self.simulation.set_alpha_target(target);
                }
                self.active_drags += 1;
                self.simulation.pin(index, node.x, node.y);
            }
            DragPhase::Move => self.simulation.pin(index, x, y),
            DragPhase::End => {
                self.active_drags = self.active_drags.saturating_sub(1);
                if self.active_drags == 0 {
                    self.simulation.set_alpha_target(0.0);
                }
                self.simulation.unpin(index);
            }
        }
        true
    }

    pub fn needs_tick(&self) -> bool {
        self.is_dragging() || self.simulation.alpha() >= self.simulation.params().alpha_min
    }

    pub fn tick(&mut self) {
        self.simulation.tick();
    }

    pub fn run_until_rest(&mut self, max_ticks: usize) -> usize {
        self.simulation.run_until_rest(max_ticks)
    }

    pub fn frame(&self, generation: u64) -> PositionFrame {
        let nodes = self
            .nodes
            .iter()
            .zip(self.simulation.nodes())
            .map(|(node, sim)| NodePosition {
                id: node.id.clone(),
                x: sim.x,
                y: sim.y,
            })
            .collect();
        PositionFrame {
            generation,
            nodes,
            alpha: self.simulation.alpha(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodePosition {
    pub id: String,
    pub x: f64,
    pub y: f64,
}

/// Positions after a tick, tagged with the request generation that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionFrame {
    pub generation: u64,
    pub alpha: f64,
    pub nodes: Vec<NodePosition>,
}

#[derive(Debug, Clone)]
pub enum NetworkPhase {
    Idle,
    Loading,
    Empty,
    Failed(String),
    Ready(Box<NetworkLayout>),
}

/// Identifies one network request; only the latest ticket may resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NetworkTicket {
    pub suspect: String,
    pub generation: u64,
}

#[derive(Debug, Clone)]
pub struct NetworkView {
    phase: NetworkPhase,
    current: Option<NetworkTicket>,
    generation: u64,
    params: ForceParams,
}

impl NetworkView {
    pub fn new(params: ForceParams) -> Self {
        Self {
            phase: NetworkPhase::Idle,
            current: None,
            generation: 0,
            params,
        }
    }

    pub fn phase(&self) -> &NetworkPhase {
        &self.phase
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn focus(&self) -> Option<&str> {
        self.current.as_ref().map(|t| t.suspect.as_str())
    }

    pub fn layout(&self) -> Option<&NetworkLayout> {
        match &self.phase {
            NetworkPhase::Ready(layout) => Some(layout.as_ref()),
            _ => None,
        }
    }

    /// Drop whatever was shown and start waiting for `suspect`.
    pub fn request(&mut self, suspect: impl Into<String>) -> NetworkTicket {
        self.generation += 1;
        let ticket = NetworkTicket {
            suspect: suspect.into(),
            generation: self.generation,
        };
        self.phase = NetworkPhase::Loading;
        self.current = Some(ticket.clone());
        ticket
    }

    pub fn is_current(&self, ticket: &NetworkTicket) -> bool {
        self.current.as_ref() == Some(ticket)
    }

    /// Apply a fetch result. Returns false, leaving the view untouched, when
    /// the ticket has been superseded.
    pub fn resolve<E: fmt::Display>(
        &mut self,
        ticket: &NetworkTicket,
        result: Result<NetworkGraph, E>,
    ) -> bool {
        if !self.is_current(ticket) {
            debug!(
                suspect = %ticket.suspect,
                generation = ticket.generation,
                current = self.generation,
                "dropping stale network response"
            );
            return false;
        }
        self.phase = match result {
            Ok(graph) if graph.is_empty() => NetworkPhase::Empty,
            Ok(graph) => NetworkPhase::Ready(Box::new(NetworkLayout::new(
                ticket.suspect.clone(),
                &graph,
                self.params,
            ))),
            Err(err) => NetworkPhase::Failed(err.to_string()),
        };
        true
    }

    /// Tear the session down; any in-flight ticket becomes stale.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.current = None;
        self.phase = NetworkPhase::Idle;
    }

    pub fn needs_tick(&self) -> bool {
        self.layout().is_some_and(NetworkLayout::needs_tick)
    }

    /// Step once if anything is still moving.
    pub fn tick(&mut self) -> Option<PositionFrame> {
        let generation = self.generation;
        match &mut self.phase {
            NetworkPhase::Ready(layout) if layout.needs_tick() => {
                layout.tick();
                Some(layout.frame(generation))
            }
            _ => None,
        }
    }

    pub fn drag(&mut self, phase: DragPhase, node_id: &str, x: f64, y: f64) -> bool {
        match &mut self.phase {
            NetworkPhase::Ready(layout) => match layout.node_index(node_id) {
                Some(index) => layout.drag(phase, index, x, y),
                None => false,
            },
            _ => false,
        }
    }
}

impl Default for NetworkView {
    fn default() -> Self {
        Self::new(ForceParams::default())
    }
}
