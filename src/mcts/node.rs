//! MCTS node structure.
//!
//! Uses arena-based allocation with index references (NodeId) for efficiency
//! and serializability. Each node stores its parent's index, so
//! backpropagation walks upward without owning references.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Cell;

/// Index into the MCTSTree node arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value representing no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Create a new node ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Get the raw index value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_none() {
            write!(f, "NodeId(NONE)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// A node in the MCTS tree.
///
/// `mean_value` is from the point of view of the player who played the
/// move leading into this node, so a parent picks the child with the
/// highest mean directly.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSNode {
    /// Parent node (NONE for root).
    pub parent: NodeId,

    /// Depth in tree (root = 0).
    pub depth: u16,

    /// Oracle prior for the move into this node. Fixed at creation.
    pub prior: f64,

    /// Backpropagation passes through this node.
    pub visits: u32,

    /// Running mean of backed-up values.
    pub mean_value: f64,

    /// Children keyed by move, in ascending cell order.
    /// Empty until the node is expanded.
    pub children: SmallVec<[(Cell, NodeId); 8]>,
}

impl MCTSNode {
    /// Create a new node.
    pub fn new(parent: NodeId, depth: u16, prior: f64) -> Self {
        Self {
            parent,
            depth,
            prior,
            visits: 0,
            mean_value: 0.0,
            children: SmallVec::new(),
        }
    }

    /// Create a root node.
    pub fn root() -> Self {
        Self::new(NodeId::NONE, 0, 1.0)
    }

    /// Whether the node has been expanded.
    #[inline]
    #[must_use]
    pub fn is_expanded(&self) -> bool {
        !self.children.is_empty()
    }

    /// Whether this is a root (no parent).
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Child reached by `cell`, if expanded.
    #[must_use]
    pub fn child(&self, cell: Cell) -> Option<NodeId> {
        self.children
            .binary_search_by_key(&cell, |(c, _)| *c)
            .ok()
            .map(|i| self.children[i].1)
    }

    /// Record one backed-up value.
    pub fn update(&mut self, value: f64) {
        self.visits += 1;
        self.mean_value += (value - self.mean_value) / f64::from(self.visits);
    }
}
