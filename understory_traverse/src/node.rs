// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The read-only node interface consumed by the traverser.

use crate::error::TraverseError;

/// A node of a bounding-rectangle tree, as seen by a traversal.
///
/// Implementors are cheap `Copy` handles: an index paired with a reference to an arena
/// (see [`NodeRef`](crate::NodeRef)), or a plain `&Node` for pointer-based trees.
///
/// A node is either a leaf, holding point indices, or internal, holding child nodes;
/// never both. The traverser checks this before visiting a node.
///
/// The bound is opaque to the traverser and only ever handed to a [`Rule`](crate::Rule).
/// Every point reachable from a node is expected to lie within its bound.
pub trait TreeNode: Copy {
    /// The bounding volume type, typically an [`Aabb2D`](crate::Aabb2D).
    type Bound;

    /// The node's bounding volume.
    fn bound(&self) -> &Self::Bound;

    /// Whether this node holds points rather than children.
    fn is_leaf(&self) -> bool;

    /// Number of child nodes. Zero for leaves.
    fn num_children(&self) -> usize;

    /// The `index`-th child, in stored order.
    fn child(&self, index: usize) -> Self;

    /// Number of points. Zero for internal nodes.
    fn num_points(&self) -> usize;

    /// The `index`-th point index, in stored order.
    fn point(&self, index: usize) -> usize;
}

/// Leaf-xor-internal check performed before a node is visited.
pub(crate) fn check_shape<N: TreeNode>(node: &N, depth: usize) -> Result<(), TraverseError> {
    if node.is_leaf() {
        let children = node.num_children();
        if children != 0 {
            return Err(TraverseError::LeafWithChildren { depth, children });
        }
    } else {
        let points = node.num_points();
        if points != 0 {
            return Err(TraverseError::InternalWithPoints { depth, points });
        }
    }
    Ok(())
}
