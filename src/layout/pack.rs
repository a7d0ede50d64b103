//! Circle packing.
//!
//! Siblings are placed with the front-chain algorithm (each new circle is
//! tangent to two circles on the current front, chosen closest to the
//! weighted centroid) and each parent is the smallest circle enclosing its
//! children, found with Welzl's move-to-front search over a seeded shuffle.
//! Given the same tree the output is always identical.

use super::Lcg;
use crate::hierarchy::{HierarchyKind, HierarchyNode};
use crate::model::{Category, ClusterKey, Entity};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl Circle {
    pub fn new(x: f64, y: f64, r: f64) -> Self {
        Self { x, y, r }
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        let dx = x - self.x;
        let dy = y - self.y;
        dx * dx + dy * dy <= self.r * self.r
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PackedKind {
    Root,
    Cluster(ClusterKey),
    Leaf(Entity),
}

/// One node of a packed layout, in breadth-first order (parents before children).
#[derive(Debug, Clone, PartialEq)]
pub struct PackedNode {
    pub name: String,
    pub kind: PackedKind,
    pub depth: usize,
    pub parent: Option<usize>,
    /// Aggregated value (own weight plus descendants).
    pub value: f64,
    pub x: f64,
    pub y: f64,
    pub r: f64,
}

impl PackedNode {
    pub fn category(&self) -> Option<Category> {
        match &self.kind {
            PackedKind::Root => None,
            PackedKind::Cluster(key) => Some(key.category()),
            PackedKind::Leaf(entity) => Some(entity.category),
        }
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.x, self.y, self.r)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackLayout {
    pub nodes: Vec<PackedNode>,
}

impl PackLayout {
    pub fn root(&self) -> Option<&PackedNode> {
        self.nodes.first()
    }

    pub fn children_of(&self, index: usize) -> impl Iterator<Item = (usize, &PackedNode)> {
        self.nodes
            .iter()
            .enumerate()
            .filter(move |(_, n)| n.parent == Some(index))
    }

    /// Deepest node whose circle contains the point (layout coordinates).
    pub fn hit_test(&self, x: f64, y: f64) -> Option<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.circle().contains_point(x, y))
            .max_by_key(|(_, n)| n.depth)
            .map(|(i, _)| i)
    }
}

struct ArenaNode {
    name: String,
    kind: PackedKind,
    depth: usize,
    parent: Option<usize>,
    children: Vec<usize>,
    value: f64,
    x: f64,
    y: f64,
    r: f64,
}

/// Pack `root` into a `width × height` box with `padding` between siblings.
pub fn pack(root: &HierarchyNode, width: f64, height: f64, padding: f64) -> PackLayout {
    let mut arena = Vec::new();
    flatten(root, None, 0, &mut arena);

    // Aggregate values bottom-up (arena is pre-order, so reverse is post-order).
    for i in (0..arena.len()).rev() {
        let sum: f64 = arena[i].children.iter().map(|&c| arena[c].value).sum();
        arena[i].value += sum;
    }

    // Larger subtrees first; stable sort keeps source order for ties.
    for i in 0..arena.len() {
        let mut children = std::mem::take(&mut arena[i].children);
        children.sort_by(|&a, &b| arena[b].value.total_cmp(&arena[a].value));
        arena[i].children = children;
    }

    let mut random = Lcg::new();
    let extent = width.min(height);

    for node in arena.iter_mut() {
        if node.children.is_empty() {
            node.r = node.value.max(0.0).sqrt();
        }
    }
    for i in (0..arena.len()).rev() {
        pack_children(&mut arena, i, 0.0, &mut random);
    }
    let k = if arena[0].r > 0.0 { arena[0].r / extent } else { 1.0 };
    for i in (0..arena.len()).rev() {
        pack_children(&mut arena, i, padding * k, &mut random);
    }

    arena[0].x = width / 2.0;
    arena[0].y = height / 2.0;
    let scale = if arena[0].r > 0.0 {
        extent / (2.0 * arena[0].r)
    } else {
        1.0
    };
    for i in 0..arena.len() {
        arena[i].r *= scale;
        if let Some(p) = arena[i].parent {
            arena[i].x = arena[p].x + scale * arena[i].x;
            arena[i].y = arena[p].y + scale * arena[i].y;
        }
    }

    breadth_first(arena)
}

fn flatten(node: &HierarchyNode, parent: Option<usize>, depth: usize, arena: &mut Vec<ArenaNode>) {
    let index = arena.len();
    let kind = match &node.kind {
        HierarchyKind::Root => PackedKind::Root,
        HierarchyKind::Cluster(key) => PackedKind::Cluster(*key),
        HierarchyKind::Leaf(entity) => PackedKind::Leaf(entity.clone()),
    };
    arena.push(ArenaNode {
        name: node.name.clone(),
        kind,
        depth,
        parent,
        children: Vec::new(),
        value: node.value,
        x: 0.0,
        y: 0.0,
        r: 0.0,
    });
    if let Some(p) = parent {
        arena[p].children.push(index);
    }
    for child in &node.children {
        flatten(child, Some(index), depth + 1, arena);
    }
}

fn pack_children(arena: &mut [ArenaNode], index: usize, pad: f64, random: &mut Lcg) {
    if arena[index].children.is_empty() {
        return;
    }
    let children = arena[index].children.clone();
    let mut circles: Vec<Circle> = children
        .iter()
        .map(|&c| Circle::new(arena[c].x, arena[c].y, arena[c].r + pad))
        .collect();

    let enclosing = pack_siblings(&mut circles, random);

    for (&c, circle) in children.iter().zip(&circles) {
        arena[c].x = circle.x;
        arena[c].y = circle.y;
    }
    arena[index].r = enclosing + pad;
}

fn breadth_first(arena: Vec<ArenaNode>) -> PackLayout {
    let mut order = Vec::with_capacity(arena.len());
    let mut queue = std::collections::VecDeque::from([0usize]);
    while let Some(i) = queue.pop_front() {
        order.push(i);
        queue.extend(arena[i].children.iter().copied());
    }

    let mut position = vec![0usize; arena.len()];
    for (new, &old) in order.iter().enumerate() {
        position[old] = new;
    }

    let mut slots: Vec<Option<ArenaNode>> = arena.into_iter().map(Some).collect();
    let nodes = order
        .iter()
        .filter_map(|&old| slots[old].take())
        .map(|n| PackedNode {
            parent: n.parent.map(|p| position[p]),
            name: n.name,
            kind: n.kind,
            depth: n.depth,
            value: n.value,
            x: n.x,
            y: n.y,
            r: n.r,
        })
        .collect();

    PackLayout { nodes }
}

/// Place circles (given radii) so none overlap, centred on the origin.
/// Returns the radius of the enclosing circle.
pub fn pack_siblings(circles: &mut [Circle], random: &mut Lcg) -> f64 {
    let n = circles.len();
    if n == 0 {
        return 0.0;
    }

    circles[0].x = 0.0;
    circles[0].y = 0.0;
    if n == 1 {
        return circles[0].r;
    }

    circles[0].x = -circles[1].r;
    circles[1].x = circles[0].r;
    circles[1].y = 0.0;
    if n == 2 {
        return circles[0].r + circles[1].r;
    }

    let placed = place(circles[1], circles[0], circles[2]);
    circles[2] = placed;

    // Doubly-linked front chain over circle indices.
    let mut next = vec![0usize; n];
    let mut prev = vec![0usize; n];
    let (mut a, mut b) = (0usize, 1usize);
    let c = 2usize;
    next[a] = b;
    prev[c] = b;
    next[b] = c;
    prev[a] = c;
    next[c] = a;
    prev[b] = a;

    let mut i = 3;
    'pack: while i < n {
        circles[i] = place(circles[a], circles[b], circles[i]);
        let c = i;

        let mut j = next[b];
        let mut k = prev[a];
        let mut sj = circles[b].r;
        let mut sk = circles[a].r;
        loop {
            if sj <= sk {
                if intersects(&circles[j], &circles[c]) {
                    b = j;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sj += circles[j].r;
                j = next[j];
            } else {
                if intersects(&circles[k], &circles[c]) {
                    a = k;
                    next[a] = b;
                    prev[b] = a;
                    continue 'pack;
                }
                sk += circles[k].r;
                k = prev[k];
            }
            if j == next[k] {
                break;
            }
        }

        prev[c] = a;
        next[c] = b;
        next[a] = c;
        prev[b] = c;
        b = c;

        // New front pair: the one closest to the weighted centroid.
        let mut best = a;
        let mut best_score = score(circles, &next, a);
        let mut cursor = next[c];
        while cursor != b {
            let s = score(circles, &next, cursor);
            if s < best_score {
                best = cursor;
                best_score = s;
            }
            cursor = next[cursor];
        }
        a = best;
        b = next[a];
        i += 1;
    }

    let mut front = vec![circles[b]];
    let mut cursor = next[b];
    while cursor != b {
        front.push(circles[cursor]);
        cursor = next[cursor];
    }
    let enclosing = enclose(&front, random);

    for circle in circles.iter_mut() {
        circle.x -= enclosing.x;
        circle.y -= enclosing.y;
    }
    enclosing.r
}

/// Position `c` tangent to both `a` and `b`.
fn place(b: Circle, a: Circle, mut c: Circle) -> Circle {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let d2 = dx * dx + dy * dy;
    if d2 > 0.0 {
        let a2 = (a.r + c.r).powi(2);
        let b2 = (b.r + c.r).powi(2);
        if a2 > b2 {
            let x = (d2 + b2 - a2) / (2.0 * d2);
            let y = (b2 / d2 - x * x).max(0.0).sqrt();
            c.x = b.x - x * dx - y * dy;
            c.y = b.y - x * dy + y * dx;
        } else {
            let x = (d2 + a2 - b2) / (2.0 * d2);
            let y = (a2 / d2 - x * x).max(0.0).sqrt();
            c.x = a.x + x * dx - y * dy;
            c.y = a.y + x * dy + y * dx;
        }
    } else {
        c.x = a.x + c.r;
        c.y = a.y;
    }
    c
}

fn intersects(a: &Circle, b: &Circle) -> bool {
    let dr = a.r + b.r - 1e-6;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

fn score(circles: &[Circle], next: &[usize], node: usize) -> f64 {
    let a = circles[node];
    let b = circles[next[node]];
    let ab = a.r + b.r;
    let dx = (a.x * b.r + b.x * a.r) / ab;
    let dy = (a.y * b.r + b.y * a.r) / ab;
    dx * dx + dy * dy
}

/// Smallest circle enclosing every circle in `circles`.
pub fn enclose(circles: &[Circle], random: &mut Lcg) -> Circle {
    let mut shuffled = circles.to_vec();
    random.shuffle(&mut shuffled);

    let mut basis: Vec<Circle> = Vec::new();
    let mut e: Option<Circle> = None;
    let mut i = 0;
    let mut restarts = 0usize;
    let limit = shuffled.len() * shuffled.len() * 4 + 16;

    while i < shuffled.len() {
        let p = shuffled[i];
        if e.is_some_and(|e| encloses_weak(&e, &p)) {
            i += 1;
            continue;
        }
        restarts += 1;
        match extend_basis(&basis, p) {
            Some(b) if restarts <= limit => {
                e = Some(enclose_basis(&b));
                basis = b;
                i = 0;
            }
            // Numerical dead end: fall back to a loose but valid bound.
            _ => return bounding_circle(circles),
        }
    }

    e.unwrap_or_else(|| bounding_circle(circles))
}

fn bounding_circle(circles: &[Circle]) -> Circle {
    if circles.is_empty() {
        return Circle::new(0.0, 0.0, 0.0);
    }
    let n = circles.len() as f64;
    let cx = circles.iter().map(|c| c.x).sum::<f64>() / n;
    let cy = circles.iter().map(|c| c.y).sum::<f64>() / n;
    let r = circles
        .iter()
        .map(|c| ((c.x - cx).powi(2) + (c.y - cy).powi(2)).sqrt() + c.r)
        .fold(0.0, f64::max);
    Circle::new(cx, cy, r)
}

fn extend_basis(basis: &[Circle], p: Circle) -> Option<Vec<Circle>> {
    if encloses_weak_all(&p, basis) {
        return Some(vec![p]);
    }

    for &b in basis {
        if encloses_not(&p, &b) && encloses_weak_all(&enclose_basis2(&b, &p), basis) {
            return Some(vec![b, p]);
        }
    }

    for i in 0..basis.len().saturating_sub(1) {
        for j in (i + 1)..basis.len() {
            let (bi, bj) = (basis[i], basis[j]);
            if encloses_not(&enclose_basis2(&bi, &bj), &p)
                && encloses_not(&enclose_basis2(&bi, &p), &bj)
                && encloses_not(&enclose_basis2(&bj, &p), &bi)
                && encloses_weak_all(&enclose_basis3(&bi, &bj, &p), basis)
            {
                return Some(vec![bi, bj, p]);
            }
        }
    }

    None
}

fn encloses_not(a: &Circle, b: &Circle) -> bool {
    let dr = a.r - b.r;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr < 0.0 || dr * dr < dx * dx + dy * dy
}

fn encloses_weak(a: &Circle, b: &Circle) -> bool {
    let dr = a.r - b.r + a.r.max(b.r).max(1.0) * 1e-9;
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    dr > 0.0 && dr * dr > dx * dx + dy * dy
}

fn encloses_weak_all(a: &Circle, basis: &[Circle]) -> bool {
    basis.iter().all(|b| encloses_weak(a, b))
}

fn enclose_basis(basis: &[Circle]) -> Circle {
    match basis {
        [a] => *a,
        [a, b] => enclose_basis2(a, b),
        [a, b, c] => enclose_basis3(a, b, c),
        _ => bounding_circle(basis),
    }
}

fn enclose_basis2(a: &Circle, b: &Circle) -> Circle {
    let (x1, y1, r1) = (a.x, a.y, a.r);
    let (x2, y2, r2) = (b.x, b.y, b.r);
    let x21 = x2 - x1;
    let y21 = y2 - y1;
    let r21 = r2 - r1;
    let l = (x21 * x21 + y21 * y21).sqrt();
    if l == 0.0 {
        return if r1 >= r2 { *a } else { *b };
    }
    Circle::new(
        (x1 + x2 + x21 / l * r21) / 2.0,
        (y1 + y2 + y21 / l * r21) / 2.0,
        (l + r1 + r2) / 2.0,
    )
}

fn enclose_basis3(a: &Circle, b: &Circle, c: &Circle) -> Circle {
    let (x1, y1, r1) = (a.x, a.y, a.r);
    let (x2, y2, r2) = (b.x, b.y, b.r);
    let (x3, y3, r3) = (c.x, c.y, c.r);
    let a2 = x1 - x2;
    let a3 = x1 - x3;
    let b2 = y1 - y2;
    let b3 = y1 - y3;
    let c2 = r2 - r1;
    let c3 = r3 - r1;
    let d1 = x1 * x1 + y1 * y1 - r1 * r1;
    let d2 = d1 - x2 * x2 - y2 * y2 + r2 * r2;
    let d3 = d1 - x3 * x3 - y3 * y3 + r3 * r3;
    let ab = a3 * b2 - a2 * b3;
    let xa = (b2 * d3 - b3 * d2) / (ab * 2.0) - x1;
    let xb = (b3 * c2 - b2 * c3) / ab;
    let ya = (a3 * d2 - a2 * d3) / (ab * 2.0) - y1;
    let yb = (a2 * c3 - a3 * c2) / ab;
    let qa = xb * xb + yb * yb - 1.0;
    let qb = 2.0 * (r1 + xa * xb + ya * yb);
    let qc = xa * xa + ya * ya - r1 * r1;
    let r = -(if qa.abs() > 1e-6 {
        (qb + (qb * qb - 4.0 * qa * qc).sqrt()) / (2.0 * qa)
    } else {
        qc / qb
    });
    Circle::new(x1 + xa + xb * r, y1 + ya + yb * r, r)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::build_hierarchy;
    use crate::model::ClusterSet;

    fn overlaps(a: &Circle, b: &Circle) -> bool {
        let d = ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt();
        d + 1e-6 < a.r + b.r
    }

    fn inside(inner: &Circle, outer: &Circle) -> bool {
        let d = ((inner.x - outer.x).powi(2) + (inner.y - outer.y).powi(2)).sqrt();
        d + inner.r <= outer.r + 1e-6
    }

    fn sample_clusters() -> ClusterSet {
        let mut clusters = ClusterSet::default();
        for (i, tx) in [5u64, 0, 12, 3].iter().enumerate() {
            let mut e = Entity::new(format!("w{i}"), Category::Website);
            e.tx_count = *tx;
            clusters.push(e);
        }
        for (i, tx) in [40u64, 8, 8, 1, 22, 6].iter().enumerate() {
            let mut e = Entity::new(format!("m{i}"), Category::Mule);
            e.tx_count = *tx;
            clusters.push(e);
        }
        clusters
    }

    #[test]
    fn test_siblings_do_not_overlap() {
        let mut circles: Vec<Circle> = [10.0, 4.0, 7.0, 2.0, 9.0, 1.0, 3.0, 5.5]
            .iter()
            .map(|&r| Circle::new(0.0, 0.0, r))
            .collect();
        let r = pack_siblings(&mut circles, &mut Lcg::new());

        let outer = Circle::new(0.0, 0.0, r);
        for (i, a) in circles.iter().enumerate() {
            assert!(inside(a, &outer), "circle {i} escapes the enclosure");
            for b in &circles[i + 1..] {
                assert!(!overlaps(a, b));
            }
        }
    }

    #[test]
    fn test_two_siblings_are_tangent() {
        let mut circles = vec![Circle::new(0.0, 0.0, 3.0), Circle::new(0.0, 0.0, 2.0)];
        let r = pack_siblings(&mut circles, &mut Lcg::new());
        assert_eq!(r, 5.0);
        assert_eq!(circles[0].x, -2.0);
        assert_eq!(circles[1].x, 3.0);
    }

    #[test]
    fn test_enclose_single_and_pair() {
        let one = enclose(&[Circle::new(1.0, 2.0, 3.0)], &mut Lcg::new());
        assert_eq!(one, Circle::new(1.0, 2.0, 3.0));

        let pair = enclose(
            &[Circle::new(-5.0, 0.0, 1.0), Circle::new(5.0, 0.0, 1.0)],
            &mut Lcg::new(),
        );
        assert!((pair.x).abs() < 1e-9);
        assert!((pair.r - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_pack_fits_box_and_nests() {
        let root = build_hierarchy(&sample_clusters());
        let layout = pack(&root, 500.0, 400.0, 12.0);

        let r0 = layout.root().unwrap();
        assert!((r0.r - 200.0).abs() < 1e-6);
        assert_eq!((r0.x, r0.y), (250.0, 200.0));

        for node in &layout.nodes {
            if let Some(p) = node.parent {
                assert!(inside(&node.circle(), &layout.nodes[p].circle()));
            }
        }
    }

    #[test]
    fn test_pack_is_breadth_first_and_sorted() {
        let root = build_hierarchy(&sample_clusters());
        let layout = pack(&root, 500.0, 500.0, 12.0);

        let depths: Vec<_> = layout.nodes.iter().map(|n| n.depth).collect();
        let mut sorted = depths.clone();
        sorted.sort();
        assert_eq!(depths, sorted);

        // Mules (1 + 85) outweigh websites (1 + 21) outweigh the empty bucket (1).
        let clusters: Vec<_> = layout.children_of(0).map(|(_, n)| n.name.as_str()).collect();
        assert_eq!(clusters, ["mule_accounts", "websites", "suspected_distribution"]);

        // Leaves with equal value keep source order.
        let mule_index = layout
            .nodes
            .iter()
            .position(|n| n.name == "mule_accounts")
            .unwrap();
        let mules: Vec<_> = layout.children_of(mule_index).map(|(_, n)| n.name.as_str()).collect();
        assert_eq!(mules, ["m0", "m4", "m1", "m2", "m5", "m3"]);
    }

    #[test]
    fn test_pack_is_deterministic() {
        let root = build_hierarchy(&sample_clusters());
        let first = pack(&root, 600.0, 420.0, 12.0);
        let second = pack(&root, 600.0, 420.0, 12.0);
        assert_eq!(first, second);
    }

    #[test]
    fn test_leaf_area_tracks_value() {
        let root = build_hierarchy(&sample_clusters());
        let layout = pack(&root, 800.0, 800.0, 0.0);
        let m0 = layout.nodes.iter().find(|n| n.name == "m0").unwrap();
        let m3 = layout.nodes.iter().find(|n| n.name == "m3").unwrap();
        let ratio = (m0.r * m0.r) / (m3.r * m3.r);
        assert!((ratio - 40.0).abs() < 1e-6);
    }

    #[test]
    fn test_hit_test_prefers_deepest() {
        let root = build_hierarchy(&sample_clusters());
        let layout = pack(&root, 500.0, 500.0, 12.0);
        let leaf = layout.nodes.iter().position(|n| n.name == "m0").unwrap();
        let node = &layout.nodes[leaf];
        assert_eq!(layout.hit_test(node.x, node.y), Some(leaf));
        assert_eq!(layout.hit_test(1.0, 1.0), None);
    }
}
