// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Depth-first, best-first single-query traversal.

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::error::TraverseError;
use crate::node::{TreeNode, check_shape};
use crate::rule::{Rule, Score};

/// A child paired with the score it got when its parent was opened.
#[derive(Copy, Clone)]
struct Candidate<N> {
    node: N,
    score: Score,
}

/// An internal node whose children are being walked.
///
/// Its sorted candidates live in `scratch[start..end]`; `next` is the cursor.
#[derive(Copy, Clone, Debug)]
struct Frame {
    start: usize,
    next: usize,
    end: usize,
}

/// Traverses a tree for one query at a time, letting a [`Rule`] prune subtrees.
///
/// For an internal node, every child is scored, the children are sorted by ascending
/// score, and then walked in that order: a child whose score is [`Score::PRUNE`] is
/// skipped; otherwise it is rescored and, unless the rescore prunes it, its subtree is
/// fully traversed before the next sibling is rescored. For a leaf, the rule's base
/// case runs on every point in stored order.
///
/// Each skipped child adds one to [`num_prunes`](Self::num_prunes). The counter is never
/// reset by the traverser, so it accumulates across calls until the caller resets it.
///
/// The walk runs on an explicit stack of frames over a single candidate buffer, so deep
/// trees do not grow the native stack and buffer capacity is reused between calls.
pub struct SingleTreeTraverser<'r, N: TreeNode, R: Rule<N>> {
    rule: &'r mut R,
    num_prunes: usize,
    scratch: Vec<Candidate<N>>,
    frames: Vec<Frame>,
}

impl<'r, N: TreeNode, R: Rule<N>> SingleTreeTraverser<'r, N, R> {
    /// Instantiate the traverser with the given rule.
    pub fn new(rule: &'r mut R) -> Self {
        Self {
            rule,
            num_prunes: 0,
            scratch: Vec::new(),
            frames: Vec::new(),
        }
    }

    /// Instantiate the traverser with room for `candidates` pending children.
    ///
    /// A good hint is the tree height times its fanout.
    pub fn with_capacity(rule: &'r mut R, candidates: usize) -> Self {
        Self {
            rule,
            num_prunes: 0,
            scratch: Vec::with_capacity(candidates),
            frames: Vec::new(),
        }
    }

    /// Traverse the subtree at `node` for `query`.
    ///
    /// `node` may be a root or any descendant.
    ///
    /// # Panics
    ///
    /// Panics if a visited node breaks the leaf-xor-internal contract of [`TreeNode`].
    /// Use [`try_traverse`](Self::try_traverse) to get the error instead.
    pub fn traverse(&mut self, query: usize, node: N) {
        if let Err(err) = self.try_traverse(query, node) {
            panic!("malformed tree node: {err}");
        }
    }

    /// Traverse the subtree at `node` for `query`, stopping at the first malformed node.
    ///
    /// Base cases and prunes recorded before the malformed node was reached stand.
    pub fn try_traverse(&mut self, query: usize, node: N) -> Result<(), TraverseError> {
        self.scratch.clear();
        self.frames.clear();
        let prunes_before = self.num_prunes;

        self.visit(query, node, 0)?;
        while let Some(frame) = self.frames.last_mut() {
            if frame.next == frame.end {
                let start = frame.start;
                self.frames.pop();
                self.scratch.truncate(start);
                continue;
            }
            let Candidate { node: child, score } = self.scratch[frame.next];
            frame.next += 1;

            if score.is_prune() {
                self.num_prunes += 1;
                tracing::trace!(query, "child pruned by score");
                continue;
            }
            let rescored = self.rule.rescore(query, child, score);
            if rescored.is_prune() {
                self.num_prunes += 1;
                tracing::trace!(query, score = score.get(), "child pruned by rescore");
                continue;
            }
            let depth = self.frames.len();
            self.visit(query, child, depth)?;
        }

        tracing::debug!(
            query,
            prunes = self.num_prunes - prunes_before,
            total_prunes = self.num_prunes,
            "traversal finished"
        );
        Ok(())
    }

    /// Run the base cases of a leaf, or score and sort the children of an internal
    /// node and open a frame for them.
    fn visit(&mut self, query: usize, node: N, depth: usize) -> Result<(), TraverseError> {
        check_shape(&node, depth)?;
        if node.is_leaf() {
            for i in 0..node.num_points() {
                self.rule.base_case(query, node.point(i));
            }
            return Ok(());
        }

        let start = self.scratch.len();
        for i in 0..node.num_children() {
            let child = node.child(i);
            let score = self.rule.score(query, child);
            self.scratch.push(Candidate { node: child, score });
        }
        self.scratch[start..].sort_unstable_by(|a, b| a.score.total_cmp(&b.score));
        self.frames.push(Frame {
            start,
            next: start,
            end: self.scratch.len(),
        });
        Ok(())
    }

    /// The number of children skipped so far.
    pub fn num_prunes(&self) -> usize {
        self.num_prunes
    }

    /// Overwrite the prune counter.
    pub fn set_num_prunes(&mut self, num_prunes: usize) {
        self.num_prunes = num_prunes;
    }

    /// Reset the prune counter to zero, returning the previous count.
    pub fn reset_prunes(&mut self) -> usize {
        core::mem::take(&mut self.num_prunes)
    }

    /// The rule this traverser was built with.
    pub fn rule(&self) -> &R {
        &*self.rule
    }

    /// Mutable access to the rule, e.g. to clear per-query state between traversals.
    pub fn rule_mut(&mut self) -> &mut R {
        self.rule
    }
}

impl<N: TreeNode, R: Rule<N>> Debug for SingleTreeTraverser<'_, N, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SingleTreeTraverser")
            .field("num_prunes", &self.num_prunes)
            .field("scratch_capacity", &self.scratch.capacity())
            .finish_non_exhaustive()
    }
}
