// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena-backed rectangle tree assembled explicitly by the caller.
//!
//! [`RectTree`] has no insertion or split policy: callers push leaves and parents
//! bottom-up and decide the shape themselves. Parent bounds are the union of their
//! children's bounds. Leaves and internal nodes are distinct variants, so every node
//! satisfies the leaf-xor-internal contract of [`TreeNode`].

use alloc::vec::Vec;
use core::fmt::Debug;

use crate::error::TreeError;
use crate::node::TreeNode;
use crate::types::{Aabb2D, Scalar, union_aabb};

/// Handle to a node in a [`RectTree`]; ids order by creation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "Node ids are intentionally 32-bit; trees beyond u32::MAX nodes are unsupported."
    )]
    const fn new(idx: usize) -> Self {
        Self(idx as u32)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

enum Kind {
    Leaf(Vec<usize>),
    Internal(Vec<NodeId>),
}

struct RNode<T> {
    bbox: Aabb2D<T>,
    kind: Kind,
    attached: bool,
}

/// A bounding-rectangle tree stored in a flat arena.
pub struct RectTree<T: Scalar> {
    arena: Vec<RNode<T>>,
    root: Option<NodeId>,
}

impl<T: Scalar> Default for RectTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar> RectTree<T> {
    /// Create an empty tree.
    pub const fn new() -> Self {
        Self {
            arena: Vec::new(),
            root: None,
        }
    }

    /// Create an empty tree with room for `nodes` nodes.
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            arena: Vec::with_capacity(nodes),
            root: None,
        }
    }

    /// Add a leaf holding the given `(point index, point bounds)` items, in order.
    ///
    /// The leaf's bound is the union of the item bounds. An empty leaf gets a zero box.
    pub fn push_leaf<I>(&mut self, items: I) -> NodeId
    where
        I: IntoIterator<Item = (usize, Aabb2D<T>)>,
    {
        let mut bbox: Option<Aabb2D<T>> = None;
        let points = items
            .into_iter()
            .map(|(point, b)| {
                bbox = Some(match bbox {
                    Some(acc) => union_aabb(acc, b),
                    None => b,
                });
                point
            })
            .collect();
        self.push(bbox.unwrap_or_else(Self::zero_box), Kind::Leaf(points))
    }

    /// Add an internal node over `children`, in order.
    ///
    /// Each child must belong to this tree and must not already have a parent or be
    /// the root. On error nothing is modified.
    pub fn push_internal(&mut self, children: &[NodeId]) -> Result<NodeId, TreeError> {
        for (i, &c) in children.iter().enumerate() {
            let node = self.arena.get(c.idx()).ok_or(TreeError::UnknownNode(c))?;
            if node.attached || self.root == Some(c) || children[..i].contains(&c) {
                return Err(TreeError::AlreadyAttached(c));
            }
        }
        let bbox = children
            .iter()
            .map(|c| self.arena[c.idx()].bbox)
            .reduce(union_aabb)
            .unwrap_or_else(Self::zero_box);
        for c in children {
            self.arena[c.idx()].attached = true;
        }
        Ok(self.push(bbox, Kind::Internal(children.to_vec())))
    }

    /// Make `id` the root returned by [`RectTree::root`].
    ///
    /// The root must not be attached to a parent.
    pub fn set_root(&mut self, id: NodeId) -> Result<(), TreeError> {
        let node = self.arena.get(id.idx()).ok_or(TreeError::UnknownNode(id))?;
        if node.attached {
            return Err(TreeError::AlreadyAttached(id));
        }
        self.root = Some(id);
        Ok(())
    }

    /// The root node, if one was set.
    pub fn root(&self) -> Option<NodeRef<'_, T>> {
        self.root.map(|id| NodeRef { tree: self, id })
    }

    /// View of an arbitrary node, or `None` if `id` is not part of this tree.
    pub fn node(&self, id: NodeId) -> Option<NodeRef<'_, T>> {
        (id.idx() < self.arena.len()).then_some(NodeRef { tree: self, id })
    }

    /// Number of nodes in the arena.
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    /// Whether the arena holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Number of levels below and including the root; zero without a root.
    pub fn height(&self) -> usize {
        let Some(root) = self.root else {
            return 0;
        };
        let mut height = 0;
        let mut stack = Vec::from([(root, 1_usize)]);
        while let Some((id, depth)) = stack.pop() {
            height = height.max(depth);
            if let Kind::Internal(children) = &self.arena[id.idx()].kind {
                stack.extend(children.iter().map(|&c| (c, depth + 1)));
            }
        }
        height
    }

    /// Remove all nodes.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    fn push(&mut self, bbox: Aabb2D<T>, kind: Kind) -> NodeId {
        let id = NodeId::new(self.arena.len());
        self.arena.push(RNode {
            bbox,
            kind,
            attached: false,
        });
        id
    }

    fn zero_box() -> Aabb2D<T> {
        Aabb2D::new(T::zero(), T::zero(), T::zero(), T::zero())
    }
}

impl<T: Scalar> Debug for RectTree<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let leaves = self
            .arena
            .iter()
            .filter(|n| matches!(n.kind, Kind::Leaf(_)))
            .count();
        f.debug_struct("RectTree")
            .field("arena_nodes", &self.arena.len())
            .field("leaves", &leaves)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

/// A `Copy` view of one node of a [`RectTree`].
#[derive(Copy, Clone)]
pub struct NodeRef<'a, T: Scalar> {
    tree: &'a RectTree<T>,
    id: NodeId,
}

impl<'a, T: Scalar> NodeRef<'a, T> {
    /// The node's id within its tree.
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// The node's bounding box, borrowed from the tree.
    pub fn aabb(&self) -> &'a Aabb2D<T> {
        &self.node().bbox
    }

    fn node(&self) -> &'a RNode<T> {
        &self.tree.arena[self.id.idx()]
    }
}

impl<T: Scalar> Debug for NodeRef<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("bbox", self.aabb())
            .finish_non_exhaustive()
    }
}

impl<T: Scalar> TreeNode for NodeRef<'_, T> {
    type Bound = Aabb2D<T>;

    fn bound(&self) -> &Aabb2D<T> {
        self.aabb()
    }

    fn is_leaf(&self) -> bool {
        matches!(self.node().kind, Kind::Leaf(_))
    }

    fn num_children(&self) -> usize {
        match &self.node().kind {
            Kind::Internal(children) => children.len(),
            Kind::Leaf(_) => 0,
        }
    }

    fn child(&self, index: usize) -> Self {
        match &self.node().kind {
            Kind::Internal(children) => Self {
                tree: self.tree,
                id: children[index],
            },
            Kind::Leaf(_) => panic!("leaf nodes have no children"),
        }
    }

    fn num_points(&self) -> usize {
        match &self.node().kind {
            Kind::Leaf(points) => points.len(),
            Kind::Internal(_) => 0,
        }
    }

    fn point(&self, index: usize) -> usize {
        match &self.node().kind {
            Kind::Leaf(points) => points[index],
            Kind::Internal(_) => panic!("internal nodes hold no points"),
        }
    }
}
