// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared pieces for the Understory Traverse demos.
//!
//! - [`pack`] assembles a [`RectTree`] over points with an STR-like packing pass.
//! - [`KNearest`], [`RangeSearch`] and [`FirstWithin`] are rules built on the traverser.
//! - [`init_logging`] installs a `tracing` subscriber honoring `RUST_LOG`.

use kurbo::{Circle, Point};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use understory_traverse::{Aabb2D, NodeId, NodeRef, RectTree, Rule, Score, TreeError, TreeNode};

/// Install a human-readable subscriber; `RUST_LOG` overrides the `info` default.
///
/// Try `RUST_LOG=understory_traverse=trace` to watch individual prunes.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second call (e.g. from tests) keeps the first subscriber.
    let installed = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_file(false).with_line_number(false))
        .try_init()
        .is_ok();
    if installed {
        info!("logging initialized");
    }
}

/// Deterministic pseudo-random points in `[0, extent)²`.
pub fn scatter(n: usize, extent: f64, seed: u64) -> Vec<Point> {
    let mut state = seed.max(1);
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 11) as f64 / (1_u64 << 53) as f64
    };
    (0..n)
        .map(|_| Point::new(next() * extent, next() * extent))
        .collect()
}

fn point_box(p: Point) -> Aabb2D<f64> {
    Aabb2D::from_point(p.x, p.y)
}

/// Bound the tree already computed for `id`.
fn stored_box(tree: &RectTree<f64>, id: NodeId) -> Result<Aabb2D<f64>, TreeError> {
    tree.node(id)
        .map(|n| *n.aabb())
        .ok_or(TreeError::UnknownNode(id))
}

fn center(b: &Aabb2D<f64>) -> Point {
    Point::new(0.5 * (b.min_x + b.max_x), 0.5 * (b.min_y + b.max_y))
}

/// Side length, in slices, of a square-ish grid holding `groups` groups.
fn grid_side(groups: usize) -> usize {
    let mut gx = 1_usize;
    while gx * gx < groups {
        gx += 1;
    }
    gx
}

/// Pack `points` into a tree with at most `max_children` entries per node.
///
/// Sort-tile-recursive: sort by x, cut into vertical slices, sort each slice by y,
/// and chunk into nodes; repeat on node centers until one root remains. Point `i`
/// of the input becomes point index `i` in the leaves.
pub fn pack(points: &[Point], max_children: usize) -> Result<RectTree<f64>, TreeError> {
    let max_children = max_children.max(2);
    let mut tree = RectTree::with_capacity(2 * points.len().div_ceil(max_children) + 1);
    if points.is_empty() {
        let leaf = tree.push_leaf([]);
        tree.set_root(leaf)?;
        return Ok(tree);
    }

    let mut items: Vec<(usize, Point)> = points.iter().copied().enumerate().collect();
    let n = items.len();
    let gx = grid_side(n.div_ceil(max_children));
    items.sort_by(|a, b| a.1.x.total_cmp(&b.1.x));
    let mut level: Vec<(NodeId, Aabb2D<f64>)> = Vec::new();
    for slice in items.chunks_mut(n.div_ceil(gx)) {
        slice.sort_by(|a, b| a.1.y.total_cmp(&b.1.y));
        for chunk in slice.chunks(max_children) {
            let id = tree.push_leaf(chunk.iter().map(|&(i, p)| (i, point_box(p))));
            level.push((id, stored_box(&tree, id)?));
        }
    }

    while level.len() > 1 {
        let n = level.len();
        let gx = grid_side(n.div_ceil(max_children));
        level.sort_by(|a, b| center(&a.1).x.total_cmp(&center(&b.1).x));
        let mut next = Vec::with_capacity(n.div_ceil(max_children));
        for slice in level.chunks_mut(n.div_ceil(gx)) {
            slice.sort_by(|a, b| center(&a.1).y.total_cmp(&center(&b.1).y));
            for chunk in slice.chunks(max_children) {
                let ids: Vec<NodeId> = chunk.iter().map(|&(id, _)| id).collect();
                let id = tree.push_internal(&ids)?;
                next.push((id, stored_box(&tree, id)?));
            }
        }
        level = next;
    }

    tree.set_root(level[0].0)?;
    debug!(
        points = n,
        nodes = tree.len(),
        height = tree.height(),
        max_children,
        "packed tree"
    );
    Ok(tree)
}

/// Exact k-nearest-neighbour search, one result list per query point.
///
/// The k-th best distance found so far bounds the search: nodes farther than it are
/// pruned when scored, and rescored against the tightened bound before each visit.
#[derive(Debug)]
pub struct KNearest<'a> {
    points: &'a [Point],
    queries: &'a [Point],
    k: usize,
    neighbors: Vec<Vec<(f64, usize)>>,
}

impl<'a> KNearest<'a> {
    /// Search `points` for the `k` nearest to each of `queries`.
    pub fn new(points: &'a [Point], queries: &'a [Point], k: usize) -> Self {
        Self {
            points,
            queries,
            k,
            neighbors: vec![Vec::with_capacity(k + 1); queries.len()],
        }
    }

    /// `(squared distance, point index)` pairs for `query`, nearest first.
    pub fn neighbors(&self, query: usize) -> &[(f64, usize)] {
        &self.neighbors[query]
    }

    /// Squared distance a candidate must beat to enter the result list.
    fn bound(&self, query: usize) -> f64 {
        let found = &self.neighbors[query];
        if self.k == 0 {
            f64::NEG_INFINITY
        } else if found.len() < self.k {
            f64::INFINITY
        } else {
            found[self.k - 1].0
        }
    }
}

impl<'t> Rule<NodeRef<'t, f64>> for KNearest<'_> {
    fn score(&mut self, query: usize, node: NodeRef<'t, f64>) -> Score {
        let q = self.queries[query];
        let d2 = node.bound().min_distance_sq(q.x, q.y);
        if d2 > self.bound(query) {
            Score::PRUNE
        } else {
            Score::new(d2)
        }
    }

    fn rescore(&mut self, query: usize, _node: NodeRef<'t, f64>, old_score: Score) -> Score {
        if old_score.get() > self.bound(query) {
            Score::PRUNE
        } else {
            old_score
        }
    }

    fn base_case(&mut self, query: usize, point: usize) {
        let d2 = self.points[point].distance_squared(self.queries[query]);
        if d2 >= self.bound(query) {
            return;
        }
        let found = &mut self.neighbors[query];
        let at = found.partition_point(|&(d, _)| d <= d2);
        found.insert(at, (d2, point));
        found.truncate(self.k);
    }
}

/// All points within a circle, one hit list per query circle.
#[derive(Debug)]
pub struct RangeSearch<'a> {
    points: &'a [Point],
    queries: &'a [Circle],
    hits: Vec<Vec<usize>>,
}

impl<'a> RangeSearch<'a> {
    /// Search `points` for those inside each of `queries`.
    pub fn new(points: &'a [Point], queries: &'a [Circle]) -> Self {
        Self {
            points,
            queries,
            hits: vec![Vec::new(); queries.len()],
        }
    }

    /// Indices of points inside the `query`-th circle, in visitation order.
    pub fn hits(&self, query: usize) -> &[usize] {
        &self.hits[query]
    }
}

impl<'t> Rule<NodeRef<'t, f64>> for RangeSearch<'_> {
    fn score(&mut self, query: usize, node: NodeRef<'t, f64>) -> Score {
        let c = self.queries[query];
        let d2 = node.bound().min_distance_sq(c.center.x, c.center.y);
        if d2 > c.radius * c.radius {
            Score::PRUNE
        } else {
            Score::new(d2)
        }
    }

    fn base_case(&mut self, query: usize, point: usize) {
        let c = self.queries[query];
        if self.points[point].distance_squared(c.center) <= c.radius * c.radius {
            self.hits[query].push(point);
        }
    }
}

/// Stops at the first point found inside `area`, pruning everything after it.
#[derive(Debug)]
pub struct FirstWithin<'a> {
    points: &'a [Point],
    area: Circle,
    found: Option<usize>,
}

impl<'a> FirstWithin<'a> {
    /// Look for any point of `points` inside `area`.
    pub fn new(points: &'a [Point], area: Circle) -> Self {
        Self {
            points,
            area,
            found: None,
        }
    }

    /// The point that ended the search, if any.
    pub fn found(&self) -> Option<usize> {
        self.found
    }
}

impl<'t> Rule<NodeRef<'t, f64>> for FirstWithin<'_> {
    fn score(&mut self, _query: usize, node: NodeRef<'t, f64>) -> Score {
        let d2 = node
            .bound()
            .min_distance_sq(self.area.center.x, self.area.center.y);
        if self.found.is_some() || d2 > self.area.radius * self.area.radius {
            Score::PRUNE
        } else {
            Score::new(d2)
        }
    }

    fn rescore(&mut self, _query: usize, _node: NodeRef<'t, f64>, old_score: Score) -> Score {
        if self.found.is_some() {
            Score::PRUNE
        } else {
            old_score
        }
    }

    fn base_case(&mut self, _query: usize, point: usize) {
        if self.found.is_none()
            && self.points[point].distance_squared(self.area.center)
                <= self.area.radius * self.area.radius
        {
            self.found = Some(point);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_traverse::SingleTreeTraverser;

    fn brute_knn(points: &[Point], q: Point, k: usize) -> Vec<usize> {
        let mut all: Vec<(f64, usize)> = points
            .iter()
            .enumerate()
            .map(|(i, p)| (p.distance_squared(q), i))
            .collect();
        all.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        all.into_iter().take(k).map(|(_, i)| i).collect()
    }

    #[test]
    fn pack_keeps_every_point_once_and_bounds_cover_them() {
        let points = scatter(500, 1000.0, 3);
        let tree = pack(&points, 8).unwrap();
        let root = tree.root().unwrap();

        let mut seen = Vec::new();
        let mut stack = vec![root];
        while let Some(n) = stack.pop() {
            if n.is_leaf() {
                assert!(n.num_points() <= 8);
                for i in 0..n.num_points() {
                    let p = points[n.point(i)];
                    assert!(n.bound().contains_point(p.x, p.y));
                    seen.push(n.point(i));
                }
            } else {
                assert!(n.num_children() <= 8);
                stack.extend((0..n.num_children()).map(|i| n.child(i)));
            }
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..500).collect::<Vec<_>>());
        assert!(tree.height() >= 3);

        // The root's stored bound is exactly the points' extent.
        let extent = points
            .iter()
            .map(|&p| point_box(p))
            .reduce(|a, b| a.union(&b))
            .unwrap();
        assert_eq!(*root.aabb(), extent);
    }

    #[test]
    fn init_logging_can_run_more_than_once() {
        init_logging();
        init_logging();
        let tree = pack(&scatter(10, 1.0, 2), 4).unwrap();
        assert!(!tree.root().unwrap().bound().is_empty());
    }

    #[test]
    fn pack_of_nothing_is_an_empty_leaf() {
        let tree = pack(&[], 8).unwrap();
        let root = tree.root().unwrap();
        assert!(root.is_leaf());
        assert_eq!(root.num_points(), 0);
    }

    #[test]
    fn knn_matches_brute_force_and_prunes() {
        let points = scatter(2000, 1000.0, 11);
        let queries = scatter(25, 1000.0, 12);
        let tree = pack(&points, 8).unwrap();
        let mut rule = KNearest::new(&points, &queries, 5);
        let mut t = SingleTreeTraverser::new(&mut rule);
        for q in 0..queries.len() {
            t.traverse(q, tree.root().unwrap());
        }
        assert!(t.num_prunes() > 0);
        for (q, &qp) in queries.iter().enumerate() {
            let got: Vec<usize> = rule.neighbors(q).iter().map(|&(_, i)| i).collect();
            assert_eq!(got, brute_knn(&points, qp, 5), "query {q}");
        }
    }

    #[test]
    fn knn_with_k_zero_prunes_everything() {
        let points = scatter(100, 10.0, 1);
        let queries = [Point::new(5.0, 5.0)];
        let tree = pack(&points, 4).unwrap();
        let mut rule = KNearest::new(&points, &queries, 0);
        let mut t = SingleTreeTraverser::new(&mut rule);
        let root = tree.root().unwrap();
        t.traverse(0, root);
        assert_eq!(t.num_prunes(), root.num_children());
        assert!(rule.neighbors(0).is_empty());
    }

    #[test]
    fn range_search_matches_brute_force() {
        let points = scatter(1500, 500.0, 21);
        let queries = [
            Circle::new((250.0, 250.0), 40.0),
            Circle::new((0.0, 0.0), 75.0),
            Circle::new((-100.0, -100.0), 10.0),
        ];
        let tree = pack(&points, 6).unwrap();
        let mut rule = RangeSearch::new(&points, &queries);
        let mut t = SingleTreeTraverser::new(&mut rule);
        for q in 0..queries.len() {
            t.traverse(q, tree.root().unwrap());
        }
        for (q, c) in queries.iter().enumerate() {
            let mut got = rule.hits(q).to_vec();
            got.sort_unstable();
            let want: Vec<usize> = (0..points.len())
                .filter(|&i| points[i].distance_squared(c.center) <= c.radius * c.radius)
                .collect();
            assert_eq!(got, want, "query {q}");
        }
        assert!(rule.hits(2).is_empty());
    }

    #[test]
    fn first_within_stops_after_one_hit() {
        let points = scatter(1000, 100.0, 5);
        let area = Circle::new((50.0, 50.0), 30.0);
        let tree = pack(&points, 8).unwrap();
        let mut rule = FirstWithin::new(&points, area);
        SingleTreeTraverser::new(&mut rule).traverse(0, tree.root().unwrap());
        let hit = rule.found().unwrap();
        assert!(points[hit].distance(area.center) <= area.radius);
    }
}
