//! MCTS policies for selection and simulation.
//!
//! Policies are trait-based to allow customization:
//! - `SelectionPolicy`: How to choose which child to descend into (UCB1)
//! - `SimulationPolicy`: How to run rollouts (uniform random)

use crate::core::{GameRng, GameState};

use super::config::MCTSConfig;
use super::node::NodeId;
use super::tree::MCTSTree;

// =============================================================================
// Selection Policy
// =============================================================================

/// Policy for selecting which child node to explore.
pub trait SelectionPolicy<M>: Send + Sync {
    /// Select the child of `node` to descend into.
    fn select(&self, tree: &MCTSTree<M>, node: NodeId, config: &MCTSConfig) -> NodeId;
}

/// UCB1 (Upper Confidence Bound) selection policy.
///
/// Formula: w/n + c * sqrt(2 * ln(N) / n), where `N` is the parent's visit
/// count and `w`, `n` are the child's wins and visits. Exact ties go to the
/// child discovered first.
#[derive(Clone, Debug, Default)]
pub struct UCB1;

impl UCB1 {
    /// UCB1 value of a child with `wins` over `visits`, under a parent with
    /// `parent_visits`.
    #[inline]
    #[must_use]
    pub fn score(wins: f64, visits: u32, parent_visits: u32, exploration: f64) -> f64 {
        let n = visits as f64;
        wins / n + exploration * (2.0 * (parent_visits as f64).ln() / n).sqrt()
    }
}

impl<M: Clone + PartialEq> SelectionPolicy<M> for UCB1 {
    /// # Panics
    ///
    /// Panics if `node` has no children or any child is unvisited.
    fn select(&self, tree: &MCTSTree<M>, node: NodeId, config: &MCTSConfig) -> NodeId {
        let parent = tree.get(node);
        assert!(!parent.children.is_empty(), "UCB1 selection at {} with no children", node);

        let mut best = NodeId::NONE;
        let mut best_score = f64::NEG_INFINITY;

        for &child in &parent.children {
            let child_node = tree.get(child);
            assert!(
                child_node.visits > 0,
                "UCB1 selection reached unvisited child {} of {}",
                child,
                node
            );

            let score = Self::score(
                child_node.wins,
                child_node.visits,
                parent.visits,
                config.exploration_constant,
            );
            if best.is_none() || score > best_score {
                best = child;
                best_score = score;
            }
        }

        best
    }
}

// =============================================================================
// Simulation Policy
// =============================================================================

/// Policy for running simulations (rollouts) from a leaf node.
pub trait SimulationPolicy<S: GameState>: Send + Sync {
    /// Play the state forward until it is terminal. No tree nodes are
    /// created during a rollout.
    fn simulate(&self, state: &mut S, rng: &mut GameRng);
}

/// Random simulation policy.
///
/// Plays uniformly random legal moves until the state is terminal.
#[derive(Clone, Debug, Default)]
pub struct RandomRollout;

impl<S: GameState> SimulationPolicy<S> for RandomRollout {
    fn simulate(&self, state: &mut S, rng: &mut GameRng) {
        loop {
            let moves = state.legal_moves();
            let Some(mv) = rng.choose(&moves) else {
                return;
            };
            state.apply_move(mv);
        }
    }
}
