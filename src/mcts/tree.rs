//! Arena-based MCTS tree.
//!
//! Uses a flat `Vec<MCTSNode>` with index-based references. Parents own
//! their children through the arena; the child-to-parent link is a plain
//! `NodeId`, so there are no ownership cycles.

use std::fmt::Debug;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::node::{MCTSNode, NodeId};
use crate::core::{Actor, TreeError};

/// Arena-based MCTS tree.
///
/// Nodes are created during expansion and never removed until the tree
/// is reset or dropped.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSTree<M> {
    /// All nodes in the tree.
    nodes: Vec<MCTSNode<M>>,

    /// The root node ID (always 0 after initialization).
    root: NodeId,
}

impl<M: Clone + PartialEq> MCTSTree<M> {
    /// Create a new tree with a root node.
    pub fn new(root_actor: Actor, root_moves: impl IntoIterator<Item = M>) -> Self {
        Self::with_capacity(root_actor, root_moves, 1024)
    }

    /// Create a tree with custom initial capacity.
    pub fn with_capacity(
        root_actor: Actor,
        root_moves: impl IntoIterator<Item = M>,
        capacity: usize,
    ) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(MCTSNode::root(root_actor, root_moves));
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
    pub fn get(&self, id: NodeId) -> &MCTSNode<M> {
        &self.nodes[id.0 as usize]
    }

    /// Get a mutable node by ID.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut MCTSNode<M> {
        &mut self.nodes[id.0 as usize]
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
    pub fn root_node(&self) -> &MCTSNode<M> {
        self.get(self.root)
    }

    /// Iterate over all nodes.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &MCTSNode<M>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId::new(i as u32), n))
    }

    /// Expand `mv` from `parent` into a new child and return its ID.
    ///
    /// # Panics
    ///
    /// Panics if `mv` is not among the parent's untried moves.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        mv: M,
        last_actor: Actor,
        child_moves: impl IntoIterator<Item = M>,
    ) -> NodeId
    where
        M: Debug,
    {
        let parent_node = self.get_mut(parent);
        assert!(
            parent_node.take_untried(&mv),
            "move {:?} is not untried at {}",
            mv,
            parent
        );
        let depth = parent_node.depth + 1;

        let id = NodeId::new(self.nodes.len() as u32);
        self.nodes
            .push(MCTSNode::new(parent, Some(mv), last_actor, depth, child_moves));
        self.get_mut(parent).children.push(id);
        id
    }

    /// Find the child of `node` reached by `mv`.
    #[must_use]
    pub fn child_for(&self, node: NodeId, mv: &M) -> Option<NodeId> {
        self.get(node)
            .children
            .iter()
            .copied()
            .find(|&c| self.get(c).mv.as_ref() == Some(mv))
    }

    /// Most visited child of `node`, first in discovery order on ties.
    #[must_use]
    pub fn most_visited_child(&self, node: NodeId) -> Option<NodeId> {
        let mut best: Option<(NodeId, u32)> = None;
        for &child in &self.get(node).children {
            let visits = self.get(child).visits;
            if best.map_or(true, |(_, v)| visits > v) {
                best = Some((child, visits));
            }
        }
        best.map(|(id, _)| id)
    }

    /// Node IDs from `node` up to and including the root.
    pub fn path_to_root(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(Some(node), move |&id| {
            let parent = self.get(id).parent;
            (!parent.is_none()).then_some(parent)
        })
    }

    /// Get statistics about the tree.
    #[must_use]
    pub fn stats(&self) -> TreeStats {
        let max_depth = self.nodes.iter().map(|n| n.depth).max().unwrap_or(0);
        let terminal_count = self.nodes.iter().filter(|n| n.is_terminal()).count();
        let leaf_count = self.nodes.iter().filter(|n| n.children.is_empty()).count();

        TreeStats {
            node_count: self.nodes.len(),
            max_depth,
            terminal_count,
            leaf_count,
        }
    }

    /// Check the structural invariants of the tree.
    ///
    /// Every non-root node has exactly one parent inside the tree which
    /// lists it, sibling moves are unique, `0 <= wins <= visits`, and no
    /// node has more visits below it than through it.
    pub fn check_well_formed(&self) -> Result<(), TreeError> {
        let len = self.nodes.len() as u32;
        let mut listed_under: FxHashMap<u32, u32> = FxHashMap::default();

        for (id, node) in self.iter() {
            if node.wins < 0.0 || node.wins > node.visits as f64 + 1e-9 {
                return Err(TreeError::WinsOutOfRange {
                    node: id.raw(),
                    wins: node.wins,
                    visits: node.visits,
                });
            }

            let mut child_visits = 0u32;
            for (i, &child) in node.children.iter().enumerate() {
                if let Some(first) = listed_under.insert(child.raw(), id.raw()) {
                    return Err(TreeError::SharedChild {
                        child: child.raw(),
                        first,
                        second: id.raw(),
                    });
                }
                let child_node = self.get(child);
                if child_node.parent != id {
                    return Err(TreeError::ParentMismatch {
                        child: child.raw(),
                        listed: id.raw(),
                        recorded: child_node.parent.raw(),
                    });
                }
                let duplicate = node.children[..i]
                    .iter()
                    .any(|&sibling| self.get(sibling).mv == child_node.mv);
                if duplicate {
                    return Err(TreeError::DuplicateMove { node: id.raw() });
                }
                child_visits += child_node.visits;
            }

            if child_visits > node.visits {
                return Err(TreeError::ChildVisitsExceedParent {
                    node: id.raw(),
                    children: child_visits,
                    visits: node.visits,
                });
            }
        }

        for (id, node) in self.iter() {
            if id == self.root {
                continue;
            }
            if node.parent.is_none() || node.parent.raw() >= len {
                return Err(TreeError::DanglingParent {
                    node: id.raw(),
                    parent: node.parent.raw(),
                });
            }
            if !listed_under.contains_key(&id.raw()) {
                return Err(TreeError::Unlisted { node: id.raw() });
            }
        }

        Ok(())
    }
}

impl<M: Clone + PartialEq + Debug> MCTSTree<M> {
    /// Render the whole tree, one node per line, indented by depth.
    #[must_use]
    pub fn render(&self) -> String {
        let mut lines = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];

        while let Some(id) = stack.pop() {
            let node = self.get(id);
            lines.push(format!("{}{}", "| ".repeat(node.depth as usize), node));
            stack.extend(node.children.iter().rev().copied());
        }

        lines.join("\n")
    }

    /// Render the root's children, one per line.
    #[must_use]
    pub fn children_summary(&self) -> String {
        self.root_node()
            .children
            .iter()
            .map(|&c| self.get(c).to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Statistics about the MCTS tree.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeStats {
    /// Total number of nodes.
    pub node_count: usize,

    /// Maximum depth reached.
    pub max_depth: u16,

    /// Nodes with nothing to expand and no children.
    pub terminal_count: usize,

    /// Nodes without children.
    pub leaf_count: usize,
}

impl TreeStats {
    /// Get the branching factor (average children per interior node).
    #[must_use]
    pub fn branching_factor(&self) -> f64 {
        let interior = self.node_count - self.leaf_count;
        if interior == 0 {
            0.0
        } else {
            (self.node_count - 1) as f64 / interior as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_tree() -> MCTSTree<u8> {
        let mut tree = MCTSTree::new(Actor::TWO, [0, 1]);
        let root = tree.root();
        let a = tree.add_child(root, 0, Actor::ONE, [5]);
        let b = tree.add_child(root, 1, Actor::ONE, []);
        tree.get_mut(a).update(1.0);
        tree.get_mut(b).update(0.0);
        tree.get_mut(b).update(1.0);
        tree.get_mut(root).update(1.0);
        tree.get_mut(root).update(0.0);
        tree.get_mut(root).update(1.0);
        tree
    }

    #[test]
    fn test_tree_new() {
        let tree: MCTSTree<u8> = MCTSTree::new(Actor::TWO, [0, 1]);

        assert_eq!(tree.len(), 1);
        assert!(!tree.is_empty());
        assert_eq!(tree.root(), NodeId::new(0));
        assert_eq!(tree.root_node().untried_moves.len(), 2);
    }

    #[test]
    fn test_add_child() {
        let mut tree = MCTSTree::new(Actor::TWO, [0u8, 1]);
        let root = tree.root();

        let child = tree.add_child(root, 1, Actor::ONE, [7, 8]);

        assert_eq!(child, NodeId::new(1));
        assert_eq!(tree.get(child).parent, root);
        assert_eq!(tree.get(child).depth, 1);
        assert_eq!(tree.get(child).mv, Some(1));
        assert_eq!(tree.root_node().untried_moves.as_slice(), &[0]);
        assert_eq!(tree.root_node().children.as_slice(), &[child]);
    }

    #[test]
    #[should_panic(expected = "is not untried")]
    fn test_add_child_twice_panics() {
        let mut tree = MCTSTree::new(Actor::TWO, [0u8]);
        let root = tree.root();
        tree.add_child(root, 0, Actor::ONE, []);
        tree.add_child(root, 0, Actor::ONE, []);
    }

    #[test]
    fn test_child_for_ignores_discovery_order() {
        let mut tree = MCTSTree::new(Actor::CHANCE, [0u8, 1]);
        let root = tree.root();
        let one = tree.add_child(root, 1, Actor::ONE, []);
        let zero = tree.add_child(root, 0, Actor::ONE, []);

        assert_eq!(tree.child_for(root, &0), Some(zero));
        assert_eq!(tree.child_for(root, &1), Some(one));
        assert_eq!(tree.child_for(root, &2), None);
    }

    #[test]
    fn test_most_visited_child_ties_go_first() {
        let mut tree = small_tree();
        let root = tree.root();
        assert_eq!(tree.most_visited_child(root), Some(NodeId::new(2)));

        let first = NodeId::new(1);
        tree.get_mut(first).update(0.0);
        assert_eq!(tree.most_visited_child(root), Some(first));

        let leaf = NodeId::new(2);
        assert_eq!(tree.most_visited_child(leaf), None);
    }

    #[test]
    fn test_path_to_root() {
        let mut tree = MCTSTree::new(Actor::TWO, [0u8]);
        let root = tree.root();
        let a = tree.add_child(root, 0, Actor::ONE, [3]);
        let b = tree.add_child(a, 3, Actor::TWO, []);

        let path: Vec<_> = tree.path_to_root(b).collect();
        assert_eq!(path, vec![b, a, root]);
    }

    #[test]
    fn test_tree_stats() {
        let tree = small_tree();
        let stats = tree.stats();

        assert_eq!(stats.node_count, 3);
        assert_eq!(stats.max_depth, 1);
        assert_eq!(stats.terminal_count, 1);
        assert_eq!(stats.leaf_count, 2);
        assert_eq!(stats.branching_factor(), 2.0);
    }

    #[test]
    fn test_well_formed() {
        let tree = small_tree();
        assert_eq!(tree.check_well_formed(), Ok(()));
    }

    #[test]
    fn test_well_formed_detects_bad_wins() {
        let mut tree = small_tree();
        tree.get_mut(NodeId::new(1)).wins = 3.0;

        assert_eq!(
            tree.check_well_formed(),
            Err(TreeError::WinsOutOfRange { node: 1, wins: 3.0, visits: 1 })
        );
    }

    #[test]
    fn test_well_formed_detects_parent_mismatch() {
        let mut tree = small_tree();
        tree.get_mut(NodeId::new(2)).parent = NodeId::new(1);

        assert_eq!(
            tree.check_well_formed(),
            Err(TreeError::ParentMismatch { child: 2, listed: 0, recorded: 1 })
        );
    }

    #[test]
    fn test_well_formed_detects_excess_child_visits() {
        let mut tree = small_tree();
        tree.get_mut(NodeId::new(1)).update(0.0);
        tree.get_mut(NodeId::new(1)).update(0.0);

        assert!(matches!(
            tree.check_well_formed(),
            Err(TreeError::ChildVisitsExceedParent { node: 0, .. })
        ));
    }

    #[test]
    fn test_render() {
        let tree = small_tree();
        let text = tree.render();

        assert_eq!(
            text,
            "[M:- W/V:2/3 U:[] score:0.6666666666666666]\n| [M:0 W/V:1/1 U:[5] score:1]\n| [M:1 W/V:1/2 U:[] score:0.5]"
        );
        assert_eq!(
            tree.children_summary(),
            "[M:0 W/V:1/1 U:[5] score:1]\n[M:1 W/V:1/2 U:[] score:0.5]"
        );
    }

    #[test]
    fn test_tree_serialization() {
        let tree = small_tree();

        let json = serde_json::to_string(&tree).unwrap();
        let deserialized: MCTSTree<u8> = serde_json::from_str(&json).unwrap();

        assert_eq!(tree.len(), deserialized.len());
        assert_eq!(tree.root_node().visits, deserialized.root_node().visits);
        assert_eq!(deserialized.check_well_formed(), Ok(()));
    }
}
