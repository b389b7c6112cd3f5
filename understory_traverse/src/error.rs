// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for traversal and tree assembly.

use crate::tree::NodeId;

/// A node broke the leaf-xor-internal contract of [`TreeNode`](crate::TreeNode).
///
/// These are programmer errors in the tree implementation. Traversal stops at the
/// first malformed node; base cases already delivered are not undone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TraverseError {
    /// The node reports itself as a leaf but also has child nodes.
    #[error("leaf node at depth {depth} has {children} child nodes")]
    LeafWithChildren {
        /// Depth below the traversal root (the root is depth 0).
        depth: usize,
        /// Number of children the node reported.
        children: usize,
    },
    /// The node reports itself as internal but also holds points.
    #[error("internal node at depth {depth} holds {points} points")]
    InternalWithPoints {
        /// Depth below the traversal root (the root is depth 0).
        depth: usize,
        /// Number of points the node reported.
        points: usize,
    },
}

/// Errors raised while assembling a [`RectTree`](crate::RectTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The id does not belong to this tree.
    #[error("node {0:?} does not exist in this tree")]
    UnknownNode(NodeId),
    /// The node already has a parent; a node may only be attached once.
    #[error("node {0:?} is already attached to a parent")]
    AlreadyAttached(NodeId),
}
