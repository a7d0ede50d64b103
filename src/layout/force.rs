//! Velocity-Verlet force simulation with link, many-body and centering forces.
//!
//! Stepped explicitly by the caller; nothing here owns a timer.

use super::Lcg;
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceParams {
    /// Many-body strength. Negative repels.
    pub charge: f64,
    pub link_distance: f64,
    pub center: (f64, f64),
    pub center_strength: f64,
    pub alpha_min: f64,
    pub alpha_decay: f64,
    /// Fraction of velocity removed every tick.
    pub velocity_decay: f64,
    /// Alpha target held while a node is being dragged.
    pub drag_alpha_target: f64,
}

impl ForceParams {
    pub fn centered(width: f64, height: f64) -> Self {
        Self {
            center: (width / 2.0, height / 2.0),
            ..Self::default()
        }
    }

    /// Ticks from alpha 1 to rest with no target.
    pub fn ticks_to_rest(&self) -> usize {
        let ticks = self.alpha_min.ln() / (1.0 - self.alpha_decay).ln();
        if ticks.is_finite() && ticks > 0.0 {
            ticks.ceil() as usize
        } else {
            0
        }
    }
}

impl Default for ForceParams {
    fn default() -> Self {
        let alpha_min = 0.001;
        Self {
            charge: -500.0,
            link_distance: 150.0,
            center: (0.0, 0.0),
            center_strength: 0.05,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            velocity_decay: 0.4,
            drag_alpha_target: 0.3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimNode {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub fx: Option<f64>,
    pub fy: Option<f64>,
}

impl SimNode {
    pub fn is_pinned(&self) -> bool {
        self.fx.is_some() || self.fy.is_some()
    }
}

#[derive(Debug, Clone, Copy)]
struct SimLink {
    source: usize,
    target: usize,
    /// Share of the correction applied to the target.
    bias: f64,
    strength: f64,
}

#[derive(Debug, Clone)]
pub struct Simulation {
    nodes: Vec<SimNode>,
    links: Vec<SimLink>,
    params: ForceParams,
    alpha: f64,
    alpha_target: f64,
    random: Lcg,
}

impl Simulation {
    const INITIAL_RADIUS: f64 = 10.0;

    /// `links` are `(source, target)` indices; out-of-range pairs are ignored.
    pub fn new(node_count: usize, links: &[(usize, usize)], params: ForceParams) -> Self {
        let initial_angle = PI * (3.0 - 5.0_f64.sqrt());
        let (cx, cy) = params.center;

        let nodes = (0..node_count)
            .map(|i| {
                let radius = Self::INITIAL_RADIUS * (0.5 + i as f64).sqrt();
                let angle = i as f64 * initial_angle;
                SimNode {
                    x: cx + radius * angle.cos(),
                    y: cy + radius * angle.sin(),
                    vx: 0.0,
                    vy: 0.0,
                    fx: None,
                    fy: None,
                }
            })
            .collect();

        let valid: Vec<(usize, usize)> = links
            .iter()
            .copied()
            .filter(|&(s, t)| s < node_count && t < node_count)
            .collect();

        let mut degree = vec![0usize; node_count];
        for &(s, t) in &valid {
            degree[s] += 1;
            degree[t] += 1;
        }

        let links = valid
            .into_iter()
            .map(|(source, target)| {
                let (ds, dt) = (degree[source] as f64, degree[target] as f64);
                SimLink {
                    source,
                    target,
                    bias: ds / (ds + dt),
                    strength: 1.0 / ds.min(dt),
                }
            })
            .collect();

        Self {
            nodes,
            links,
            params,
            alpha: 1.0,
            alpha_target: 0.0,
            random: Lcg::new(),
        }
    }

    pub fn nodes(&self) -> &[SimNode] {
        &self.nodes
    }

    pub fn node(&self, index: usize) -> Option<&SimNode> {
        self.nodes.get(index)
    }

    pub fn params(&self) -> &ForceParams {
        &self.params
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f64 {
        self.alpha_target
    }

    pub fn set_alpha_target(&mut self, target: f64) {
        self.alpha_target = target;
    }

    /// Fix a node at `(x, y)` until [`Simulation::unpin`].
    pub fn pin(&mut self, index: usize, x: f64, y: f64) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.fx = Some(x);
            node.fy = Some(y);
        }
    }

    pub fn unpin(&mut self, index: usize) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.fx = None;
            node.fy = None;
        }
    }

    /// The simulation has cooled and nothing is holding it warm.
    pub fn is_settled(&self) -> bool {
        self.alpha < self.params.alpha_min && self.alpha_target < self.params.alpha_min
    }

    pub fn tick(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.params.alpha_decay;

        self.apply_links();
        self.apply_many_body();
        self.apply_center();

        let keep = 1.0 - self.params.velocity_decay;
        for node in &mut self.nodes {
            match node.fx {
                Some(fx) => {
                    node.x = fx;
                    node.vx = 0.0;
                }
                None => {
                    node.vx *= keep;
                    node.x += node.vx;
                }
            }
            match node.fy {
                Some(fy) => {
                    node.y = fy;
                    node.vy = 0.0;
                }
                None => {
                    node.vy *= keep;
                    node.y += node.vy;
                }
            }
        }
    }

    /// Tick until alpha drops below its minimum or `max_ticks` is reached.
    /// Returns the number of ticks run.
    pub fn run_until_rest(&mut self, max_ticks: usize) -> usize {
        let mut ticks = 0;
        while ticks < max_ticks && self.alpha >= self.params.alpha_min {
            self.tick();
            ticks += 1;
        }
        ticks
    }

    fn apply_links(&mut self) {
        let alpha = self.alpha;
        let distance = self.params.link_distance;

        for i in 0..self.links.len() {
            let link = self.links[i];
            let (s, t) = (self.nodes[link.source], self.nodes[link.target]);

            let mut x = t.x + t.vx - s.x - s.vx;
            if x == 0.0 {
                x = self.random.jiggle();
            }
            let mut y = t.y + t.vy - s.y - s.vy;
            if y == 0.0 {
                y = self.random.jiggle();
            }
            let l = (x * x + y * y).sqrt();
            let l = (l - distance) / l * alpha * link.strength;
            x *= l;
            y *= l;

            let target = &mut self.nodes[link.target];
            target.vx -= x * link.bias;
            target.vy -= y * link.bias;
            let source = &mut self.nodes[link.source];
            source.vx += x * (1.0 - link.bias);
            source.vy += y * (1.0 - link.bias);
        }
    }

    /// Exact pairwise summation; ego networks are small.
    fn apply_many_body(&mut self) {
        const DISTANCE_MIN2: f64 = 1.0;
        let factor = self.params.charge * self.alpha;
        let n = self.nodes.len();

        for i in 0..n {
            let (xi, yi) = (self.nodes[i].x, self.nodes[i].y);
            let (mut dvx, mut dvy) = (0.0, 0.0);
            for j in 0..n {
                if i == j {
                    continue;
                }
                let mut x = self.nodes[j].x - xi;
                let mut y = self.nodes[j].y - yi;
                let mut l = x * x + y * y;
                if x == 0.0 {
                    x = self.random.jiggle();
                    l += x * x;
                }
                if y == 0.0 {
                    y = self.random.jiggle();
                    l += y * y;
                }
                if l < DISTANCE_MIN2 {
                    l = (DISTANCE_MIN2 * l).sqrt();
                }
                dvx += x * factor / l;
                dvy += y * factor / l;
            }
            self.nodes[i].vx += dvx;
            self.nodes[i].vy += dvy;
        }
    }

    /// Shift every node so the centroid moves toward the center.
    fn apply_center(&mut self) {
        if self.nodes.is_empty() {
            return;
        }
        let n = self.nodes.len() as f64;
        let (cx, cy) = self.params.center;
        let (sx, sy) = self
            .nodes
            .iter()
            .fold((0.0, 0.0), |(sx, sy), node| (sx + node.x, sy + node.y));
        let dx = (sx / n - cx) * self.params.center_strength;
        let dy = (sy / n - cy) * self.params.center_strength;
        for node in &mut self.nodes {
            node.x -= dx;
            node.y -= dy;
        }
    }
}
