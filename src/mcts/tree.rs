//! Arena-based MCTS tree.
//!
//! Uses a flat `Vec<MCTSNode>` with index-based references for efficiency,
//! cache-friendliness, and serializability. Re-rooting copies the surviving
//! subtree into a fresh arena and drops the rest.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::node::{MCTSNode, NodeId};
use crate::core::Cell;

/// Arena-based MCTS tree.
///
/// Nodes are stored in a flat vector and referenced by `NodeId` indices.
/// This avoids reference counting overhead and enables serialization.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSTree {
    /// All nodes in the tree.
    nodes: Vec<MCTSNode>,

    /// The root node ID (always 0).
    root: NodeId,
}

impl Default for MCTSTree {
    fn default() -> Self {
        Self::new()
    }
}

impl MCTSTree {
    /// Create a new tree with a root node.
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create a tree with custom initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(MCTSNode::root());
        Self {
            nodes,
            root: NodeId::new(0),
        }
    }

    /// Get the root node ID.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by ID.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> &MCTSNode {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MCTSNode {
        &mut self.nodes[id.0 as usize]
    }

    /// Allocate a new node, returning its ID.
    pub fn alloc(&mut self, node: MCTSNode) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the root node.
    #[must_use]
    pub fn root_node(&self) -> &MCTSNode {
        self.get(self.root)
    }

    /// Child of `parent` reached by `cell`.
    #[must_use]
    pub fn child(&self, parent: NodeId, cell: Cell) -> Option<NodeId> {
        self.get(parent).child(cell)
    }

    /// Expand `parent` with one child per `(cell, prior)`.
    ///
    /// Children are stored in ascending cell order. Does nothing if the node
    /// is already expanded, so a node is expanded at most once.
    pub fn expand(&mut self, parent: NodeId, priors: &[(Cell, f64)]) -> usize {
        if self.get(parent).is_expanded() {
            return 0;
        }

        let depth = self.get(parent).depth.saturating_add(1);
        let mut sorted = priors.to_vec();
        sorted.sort_by_key(|(cell, _)| *cell);

        let mut children: SmallVec<[(Cell, NodeId); 8]> = SmallVec::with_capacity(sorted.len());
        for (cell, prior) in sorted {
            let child = self.alloc(MCTSNode::new(parent, depth, prior));
            children.push((cell, child));
        }

        let added = children.len();
        self.get_mut(parent).children = children;
        added
    }

    /// Back up `value` from `leaf` to the root.
    ///
    /// `value` is from the point of view of the player to move at the leaf.
    /// The leaf records it negated and each ancestor flips the sign again.
    pub fn backpropagate(&mut self, leaf: NodeId, value: f64) {
        let mut current = leaf;
        let mut value = -value;
        while !current.is_none() {
            let node = self.get_mut(current);
            node.update(value);
            value = -value;
            current = node.parent;
        }
    }

    /// Make `new_root` the root, discarding everything outside its subtree.
    ///
    /// Surviving nodes are compacted into a fresh arena; depths are
    /// rebased so the new root sits at depth 0.
    pub fn rebase(&mut self, new_root: NodeId) {
        let base_depth = self.get(new_root).depth;

        let mut order = vec![new_root];
        let mut remap: FxHashMap<NodeId, NodeId> = FxHashMap::default();
        remap.insert(new_root, NodeId::new(0));

        let mut cursor = 0;
        while cursor < order.len() {
            let id = order[cursor];
            for &(_, child) in &self.get(id).children {
                remap.insert(child, NodeId::new(order.len() as u32));
                order.push(child);
            }
            cursor += 1;
        }

        let mut nodes = Vec::with_capacity(order.len().max(1024));
        for old in order {
            let mut node = self.get(old).clone();
            node.parent = if old == new_root {
                NodeId::NONE
            } else {
                remap.get(&node.parent).copied().unwrap_or(NodeId::NONE)
            };
            node.depth -= base_depth;
            for (_, child) in node.children.iter_mut() {
                *child = remap.get(child).copied().unwrap_or(NodeId::NONE);
            }
            nodes.push(node);
        }

        self.nodes = nodes;
        self.root = NodeId::new(0);
    }

    /// Clear the tree and reset with a new root.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.nodes.push(MCTSNode::root());
        self.root = NodeId::new(0);
    }

    /// Get statistics about the tree.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let max_depth = self.nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        let expanded_count = self.nodes.iter().filter(|n| n.is_expanded()).count();
        let visited_count = self.nodes.iter().filter(|n| n.visits > 0).count();

        TreeStats {
            node_count: self.nodes.len(),
            max_depth,
            expanded_count,
            visited_count,
        }
    }
}

/// Statistics about the MCTS tree.
#[derive(Clone, Debug, Default)]
pub struct TreeStats {
    /// Total number of nodes.
    pub node_count: usize,

    /// Maximum depth reached.
    pub max_depth: u16,

    /// Nodes with children.
    pub expanded_count: usize,

    /// Nodes visited at least once.
    pub visited_count: usize,
}

impl TreeStats {
    /// Average children per expanded node.
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        if self.expanded_count == 0 {
            0.0
        } else {
            (self.node_count - 1) as f64 / self.expanded_count as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priors(cells: &[u16]) -> Vec<(Cell, f64)> {
        let p = 1.0 / cells.len() as f64;
        cells.iter().map(|&c| (Cell(c), p)).collect()
    }

    #[test]
    fn test_tree_new() {
        let tree = MCTSTree::new();

        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert_eq!(tree.root(), NodeId::new(0));
        assert!(tree.root_node().is_root());
    }

    #[test]
    fn test_expand_sorts_children() {
        let mut tree = MCTSTree::new();
        let added = tree.expand(tree.root(), &priors(&[9, 3, 5]));

        assert_eq!(added, 3);
        let cells: Vec<_> = tree.root_node().children.iter().map(|(c, _)| c.0).collect();
        assert_eq!(cells, vec![3, 5, 9]);

        let child = tree.child(tree.root(), Cell(5)).unwrap();
        assert_eq!(tree.get(child).depth, 1);
        assert_eq!(tree.get(child).parent, tree.root());
    }

    #[test]
    fn test_expand_is_once_only() {
        let mut tree = MCTSTree::new();
        tree.expand(tree.root(), &priors(&[0, 1]));
        assert_eq!(tree.expand(tree.root(), &priors(&[2, 3, 4])), 0);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_backpropagate_alternates_sign() {
        let mut tree = MCTSTree::new();
        let root = tree.root();
        tree.expand(root, &priors(&[0]));
        let child = tree.child(root, Cell(0)).unwrap();
        tree.expand(child, &priors(&[1]));
        let leaf = tree.child(child, Cell(1)).unwrap();

        // Leaf position is good for the player to move there.
        tree.backpropagate(leaf, 1.0);

        assert_eq!(tree.get(leaf).mean_value, -1.0);
        assert_eq!(tree.get(child).mean_value, 1.0);
        assert_eq!(tree.get(root).mean_value, -1.0);
        assert_eq!(tree.get(root).visits, 1);
        assert_eq!(tree.get(leaf).visits, 1);
    }

    #[test]
    fn test_rebase_keeps_subtree_statistics() {
        let mut tree = MCTSTree::new();
        let root = tree.root();
        tree.expand(root, &priors(&[0, 1]));
        let kept = tree.child(root, Cell(1)).unwrap();
        let dropped = tree.child(root, Cell(0)).unwrap();
        tree.expand(kept, &priors(&[2, 3]));
        tree.expand(dropped, &priors(&[4]));

        let grandchild = tree.child(kept, Cell(3)).unwrap();
        tree.backpropagate(grandchild, 0.5);

        tree.rebase(kept);

        assert_eq!(tree.len(), 3);
        assert_eq!(tree.root(), NodeId::new(0));
        assert!(tree.root_node().is_root());
        assert_eq!(tree.root_node().depth, 0);
        assert_eq!(tree.root_node().visits, 1);

        let new_grandchild = tree.child(tree.root(), Cell(3)).unwrap();
        assert_eq!(tree.get(new_grandchild).depth, 1);
        assert_eq!(tree.get(new_grandchild).parent, tree.root());
        assert_eq!(tree.get(new_grandchild).visits, 1);
        assert_eq!(tree.get(new_grandchild).mean_value, -0.5);
    }

    #[test]
    fn test_tree_reset() {
        let mut tree = MCTSTree::new();
        tree.expand(tree.root(), &priors(&[0, 1, 2]));
        tree.reset();

        assert_eq!(tree.len(), 1);
        assert!(!tree.root_node().is_expanded());
    }

    #[test]
    fn test_tree_stats() {
        let mut tree = MCTSTree::new();
        let root = tree.root();
        tree.expand(root, &priors(&[0, 1]));
        let child = tree.child(root, Cell(0)).unwrap();
        tree.expand(child, &priors(&[2, 3]));
        tree.backpropagate(child, 0.0);

        let stats = tree.stats();
        assert_eq!(stats.node_count, 5);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(stats.expanded_count, 2);
        assert_eq!(stats.visited_count, 2);
        assert_eq!(stats.branching_factor(), 2.0);
    }

    #[test]
    fn test_tree_serialization() {
        let mut tree = MCTSTree::new();
        tree.expand(tree.root(), &priors(&[0, 1]));
        tree.backpropagate(tree.root(), 0.25);

        let json = serde_json::to_string(&tree).unwrap();
        let deserialized: MCTSTree = serde_json::from_str(&json).unwrap();

        assert_eq!(tree.len(), deserialized.len());
        assert_eq!(tree.root_node().visits, deserialized.root_node().visits);
    }
}
