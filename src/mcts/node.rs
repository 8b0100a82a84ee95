//! MCTS node structures.
//!
//! Uses arena-based allocation with index references (NodeId) so that the
//! parent back-link is a plain index and the tree has no ownership cycles.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Actor;

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
/// Represents one state reached by one path from the root. `wins` is a
/// summed reward from the viewpoint of `last_actor`, not a win count.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MCTSNode<M> {
    /// Parent node (NONE for root).
    pub parent: NodeId,

    /// The move that produced this node (None for root).
    pub mv: Option<M>,

    /// Actor who made the move into this node. Fixed at creation.
    pub last_actor: Actor,

    /// Depth in tree (root = 0).
    pub depth: u16,

    /// Backpropagation passes through this node.
    pub visits: u32,

    /// Accumulated score.
    pub wins: f64,

    /// Legal moves not yet expanded into children.
    pub untried_moves: SmallVec<[M; 8]>,

    /// Children in discovery order.
    pub children: SmallVec<[NodeId; 8]>,
}

impl<M: Clone + PartialEq> MCTSNode<M> {
    /// Create a new node.
    pub fn new(
        parent: NodeId,
        mv: Option<M>,
        last_actor: Actor,
        depth: u16,
        untried_moves: impl IntoIterator<Item = M>,
    ) -> Self {
        Self {
            parent,
            mv,
            last_actor,
            depth,
            visits: 0,
            wins: 0.0,
            untried_moves: untried_moves.into_iter().collect(),
            children: SmallVec::new(),
        }
    }

    /// Create a root node.
    pub fn root(last_actor: Actor, untried_moves: impl IntoIterator<Item = M>) -> Self {
        Self::new(NodeId::NONE, None, last_actor, 0, untried_moves)
    }

    /// Record one backpropagation pass.
    pub fn update(&mut self, score: f64) {
        self.visits += 1;
        self.wins += score;
    }

    /// Average score per visit (0 if unvisited).
    #[must_use]
    pub fn mean_score(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.wins / self.visits as f64
        }
    }

    /// Check if `mv` has not been expanded yet.
    #[must_use]
    pub fn is_untried(&self, mv: &M) -> bool {
        self.untried_moves.contains(mv)
    }

    /// Remove `mv` from the untried moves. Returns false if it was absent.
    pub fn take_untried(&mut self, mv: &M) -> bool {
        match self.untried_moves.iter().position(|m| m == mv) {
            Some(idx) => {
                self.untried_moves.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Check if every legal move has been expanded.
    #[must_use]
    pub fn is_fully_expanded(&self) -> bool {
        self.untried_moves.is_empty()
    }

    /// A node with nothing left to expand and no children.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.untried_moves.is_empty() && self.children.is_empty()
    }
}

impl<M: std::fmt::Debug + Clone + PartialEq> std::fmt::Display for MCTSNode<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.mv {
            Some(mv) => write!(f, "[M:{:?}", mv)?,
            None => write!(f, "[M:-")?,
        }
        write!(
            f,
            " W/V:{}/{} U:{:?} score:{}]",
            self.wins,
            self.visits,
            self.untried_moves.as_slice(),
            self.mean_score()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id() {
        let id = NodeId::new(5);
        assert_eq!(id.raw(), 5);
        assert!(!id.is_none());
        assert_eq!(format!("{}", id), "NodeId(5)");

        assert!(NodeId::NONE.is_none());
        assert_eq!(format!("{}", NodeId::NONE), "NodeId(NONE)");
    }

    #[test]
    fn test_node_root() {
        let node: MCTSNode<u8> = MCTSNode::root(Actor::TWO, [1, 2, 3]);

        assert!(node.parent.is_none());
        assert_eq!(node.mv, None);
        assert_eq!(node.depth, 0);
        assert_eq!(node.last_actor, Actor::TWO);
        assert_eq!(node.visits, 0);
        assert_eq!(node.untried_moves.as_slice(), &[1, 2, 3]);
        assert!(!node.is_terminal());
    }

    #[test]
    fn test_update_and_mean() {
        let mut node: MCTSNode<u8> = MCTSNode::root(Actor::ONE, []);
        assert_eq!(node.mean_score(), 0.0);

        node.update(1.0);
        node.update(0.0);
        node.update(0.5);

        assert_eq!(node.visits, 3);
        assert_eq!(node.wins, 1.5);
        assert_eq!(node.mean_score(), 0.5);
    }

    #[test]
    fn test_take_untried() {
        let mut node: MCTSNode<u8> = MCTSNode::root(Actor::ONE, [0, 1]);

        assert!(node.is_untried(&1));
        assert!(node.take_untried(&1));
        assert!(!node.is_untried(&1));
        assert!(!node.take_untried(&1));
        assert!(!node.is_fully_expanded());

        assert!(node.take_untried(&0));
        assert!(node.is_fully_expanded());
        assert!(node.is_terminal());
    }

    #[test]
    fn test_display() {
        let mut node: MCTSNode<u8> = MCTSNode::new(NodeId::new(0), Some(1), Actor::ONE, 1, [2]);
        node.update(1.0);
        node.update(0.0);
        assert_eq!(format!("{}", node), "[M:1 W/V:1/2 U:[2] score:0.5]");

        let root: MCTSNode<u8> = MCTSNode::root(Actor::TWO, []);
        assert_eq!(format!("{}", root), "[M:- W/V:0/0 U:[] score:0]");
    }

    #[test]
    fn test_serialization() {
        let mut node: MCTSNode<u8> = MCTSNode::new(NodeId::new(0), Some(2), Actor::ONE, 1, [0]);
        node.update(1.0);

        let json = serde_json::to_string(&node).unwrap();
        let deserialized: MCTSNode<u8> = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.mv, Some(2));
        assert_eq!(deserialized.visits, 1);
        assert_eq!(deserialized.parent, NodeId::new(0));
    }
}
