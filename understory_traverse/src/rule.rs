// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decision policies: scores and the [`Rule`] trait.

use core::cmp::Ordering;

use crate::node::TreeNode;

/// Priority of visiting a node. Lower scores are visited first.
///
/// [`Score::PRUNE`] is the distinguished "never visit" value. Scores are assumed to be
/// non-NaN; debug builds assert.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Score(f64);

impl Score {
    /// Sentinel meaning the subtree is irrelevant and must be skipped.
    pub const PRUNE: Self = Self(f64::MAX);

    /// Highest priority; visit before anything else.
    pub const ZERO: Self = Self(0.0);

    /// Wrap a raw score.
    #[inline]
    pub fn new(value: f64) -> Self {
        debug_assert!(!value.is_nan(), "scores must not be NaN");
        Self(value)
    }

    /// The raw score value.
    #[inline]
    pub const fn get(self) -> f64 {
        self.0
    }

    /// Whether this is the [`Score::PRUNE`] sentinel.
    #[inline]
    pub fn is_prune(self) -> bool {
        self.0 == f64::MAX
    }

    /// Total order used to sort siblings.
    #[inline]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f64> for Score {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

/// A pluggable decision policy for [`SingleTreeTraverser`](crate::SingleTreeTraverser).
///
/// The traverser decides in what order and whether to visit nodes; the rule decides
/// what is relevant. Rules may keep arbitrary mutable state (a running best distance,
/// a result set) and update it from any callback.
///
/// A traversal calls, for each internal node, [`score`](Rule::score) once per child
/// before any child is descended into, then [`rescore`](Rule::rescore) right before
/// each surviving child is visited. Leaves get one [`base_case`](Rule::base_case) per
/// point.
///
/// # Example
///
/// Count every point within distance 5 of a query location.
///
/// ```rust
/// use understory_traverse::{Aabb2D, NodeRef, RectTree, Rule, Score, SingleTreeTraverser, TreeNode};
///
/// struct WithinRadius<'a> {
///     points: &'a [(f64, f64)],
///     queries: &'a [(f64, f64)],
///     radius: f64,
///     found: usize,
/// }
///
/// impl<'t> Rule<NodeRef<'t, f64>> for WithinRadius<'_> {
///     fn score(&mut self, query: usize, node: NodeRef<'t, f64>) -> Score {
///         let (x, y) = self.queries[query];
///         let d2 = node.bound().min_distance_sq(x, y);
///         if d2 > self.radius * self.radius { Score::PRUNE } else { Score::new(d2) }
///     }
///
///     fn base_case(&mut self, query: usize, point: usize) {
///         let ((qx, qy), (px, py)) = (self.queries[query], self.points[point]);
///         if (qx - px).powi(2) + (qy - py).powi(2) <= self.radius * self.radius {
///             self.found += 1;
///         }
///     }
/// }
///
/// let points = [(0.0, 0.0), (1.0, 1.0), (50.0, 50.0), (51.0, 50.0)];
/// let mut tree = RectTree::new();
/// let near = tree.push_leaf([(0, Aabb2D::from_point(0.0, 0.0)), (1, Aabb2D::from_point(1.0, 1.0))]);
/// let far = tree.push_leaf([(2, Aabb2D::from_point(50.0, 50.0)), (3, Aabb2D::from_point(51.0, 50.0))]);
/// let root = tree.push_internal(&[near, far]).unwrap();
/// tree.set_root(root).unwrap();
///
/// let mut rule = WithinRadius { points: &points, queries: &[(0.5, 0.5)], radius: 5.0, found: 0 };
/// let mut traverser = SingleTreeTraverser::new(&mut rule);
/// traverser.traverse(0, tree.root().unwrap());
/// assert_eq!(traverser.num_prunes(), 1);
/// assert_eq!(rule.found, 2);
/// ```
pub trait Rule<N: TreeNode> {
    /// Judge whether `node` is worth visiting for `query`, before any sibling has been
    /// explored. Return [`Score::PRUNE`] to skip the subtree.
    fn score(&mut self, query: usize, node: N) -> Score;

    /// Re-judge `node` right before it is visited, given state possibly updated by
    /// earlier siblings. `old_score` is what [`score`](Rule::score) returned.
    ///
    /// Should only move `old_score` toward [`Score::PRUNE`], never revive a node that
    /// `score` pruned. The default keeps the original score.
    fn rescore(&mut self, query: usize, node: N, old_score: Score) -> Score {
        let _ = (query, node);
        old_score
    }

    /// Per-point work for a point of a leaf that was not pruned.
    fn base_case(&mut self, query: usize, point: usize);
}
