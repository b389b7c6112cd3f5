// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_traverse --heading-base-level=0

//! Understory Traverse: branch-and-bound single-query traversal of rectangle trees.
//!
//! Understory Traverse walks a bounding-rectangle tree (an R-tree-like hierarchy whose
//! children may overlap and whose fanout varies) on behalf of one query, asking a
//! pluggable [`Rule`] which subtrees are worth visiting.
//!
//! - [`SingleTreeTraverser`] scores every child of an internal node, visits children in
//!   ascending score order, rescores each one right before descending (so bounds
//!   tightened by earlier siblings can prune later ones), and counts skipped subtrees.
//! - [`Rule`] supplies `score`, `rescore` and `base_case`. Range search, nearest
//!   neighbour and similar searches are written as rules; the traversal never changes.
//! - [`TreeNode`] is the read-only node interface. [`RectTree`] is a small arena
//!   implementation with [`Aabb2D`] bounds that callers assemble bottom-up.
//!
//! The traverser does not decide what is relevant, only in what order and whether to
//! visit. [`Score::PRUNE`] is the "never visit" sentinel.
//!
//! # Example
//!
//! Find the nearest point to a query, letting a running best distance prune leaves.
//!
//! ```rust
//! use understory_traverse::{Aabb2D, NodeRef, RectTree, Rule, Score, SingleTreeTraverser, TreeNode};
//!
//! struct Nearest<'a> {
//!     points: &'a [(f64, f64)],
//!     query: (f64, f64),
//!     best: Option<(usize, f64)>,
//! }
//!
//! impl Nearest<'_> {
//!     fn bound(&self) -> f64 {
//!         self.best.map_or(f64::INFINITY, |(_, d)| d)
//!     }
//! }
//!
//! impl<'t> Rule<NodeRef<'t, f64>> for Nearest<'_> {
//!     fn score(&mut self, _query: usize, node: NodeRef<'t, f64>) -> Score {
//!         let d2 = node.bound().min_distance_sq(self.query.0, self.query.1);
//!         if d2 > self.bound() { Score::PRUNE } else { Score::new(d2) }
//!     }
//!
//!     fn rescore(&mut self, _query: usize, _node: NodeRef<'t, f64>, old: Score) -> Score {
//!         if old.get() > self.bound() { Score::PRUNE } else { old }
//!     }
//!
//!     fn base_case(&mut self, _query: usize, point: usize) {
//!         let (x, y) = self.points[point];
//!         let d2 = (x - self.query.0).powi(2) + (y - self.query.1).powi(2);
//!         if d2 < self.bound() {
//!             self.best = Some((point, d2));
//!         }
//!     }
//! }
//!
//! let points = [(0.0, 0.0), (1.0, 0.0), (10.0, 10.0), (11.0, 10.0)];
//! let mut tree = RectTree::new();
//! let leaves: Vec<_> = points
//!     .chunks(2)
//!     .enumerate()
//!     .map(|(c, pair)| {
//!         tree.push_leaf(pair.iter().enumerate().map(|(i, &(x, y))| (2 * c + i, Aabb2D::from_point(x, y))))
//!     })
//!     .collect();
//! let root = tree.push_internal(&leaves).unwrap();
//! tree.set_root(root).unwrap();
//!
//! let mut rule = Nearest { points: &points, query: (0.9, 0.2), best: None };
//! let mut traverser = SingleTreeTraverser::new(&mut rule);
//! traverser.traverse(0, tree.root().unwrap());
//! // The far leaf was rescored against the best distance found in the near one.
//! assert_eq!(traverser.num_prunes(), 1);
//! assert_eq!(rule.best.map(|(i, _)| i), Some(1));
//! ```
//!
//! ## Logging
//!
//! The traverser emits [`tracing`] events: `trace` for every pruned child and `debug`
//! once per traversal with the prune counts. No subscriber is installed by this crate.
//!
//! ## Float semantics
//!
//! Scores and float coordinates are assumed to be free of NaNs. Debug builds assert
//! when a NaN score is created.

#![no_std]

extern crate alloc;

pub mod error;
pub mod node;
pub mod rule;
pub mod traverser;
pub mod tree;
pub mod types;

pub use error::{TraverseError, TreeError};
pub use node::TreeNode;
pub use rule::{Rule, Score};
pub use traverser::SingleTreeTraverser;
pub use tree::{NodeId, NodeRef, RectTree};
pub use types::{Aabb2D, Scalar};
