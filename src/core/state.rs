//! State contract for scenarios searched by UCT.
//!
//! Scenarios implement `GameState` to define:
//! - Legal moves at each point of the decision process
//! - How moves modify the state
//! - Terminal results
//! - Whether a step is decided by chance, and how that chance is sampled
//!
//! The search engine calls into `GameState` but never interprets
//! scenario-specific concepts directly.

use std::fmt::Debug;

use super::actor::Actor;
use super::rng::GameRng;

/// A point in a sequential decision process.
///
/// ## Implementation Notes
///
/// - `fork`: Must return an independent copy. Scenarios with hidden state
///   re-sample it here, drawing from the supplied RNG.
/// - `apply_move`: Must update `player_just_moved`.
/// - `legal_moves`: Empty means the state is terminal.
/// - `result`: Only called on terminal states. Must lie in `[0, 1]`.
/// - `chance_move`: Must return `Some` whenever `is_chance` is true. Moves
///   of a chance step must be unique values, since chance children are
///   looked up by move.
pub trait GameState: Sized {
    /// A move (action) in this scenario.
    type Move: Clone + PartialEq + Debug;

    /// The actor whose decision produced this state.
    fn player_just_moved(&self) -> Actor;

    /// Create an independent copy of this state for one search iteration.
    fn fork(&self, rng: &mut GameRng) -> Self;

    /// Apply a move to the state.
    fn apply_move(&mut self, mv: &Self::Move);

    /// All legal moves from this state. Empty if terminal.
    fn legal_moves(&self) -> Vec<Self::Move>;

    /// Result of a terminal state from the viewpoint of `actor`, in `[0, 1]`.
    fn result(&self, actor: Actor, rng: &mut GameRng) -> f64;

    /// Whether the next step is decided by an exogenous random process.
    fn is_chance(&self) -> bool {
        false
    }

    /// Sample the move of a chance step from the scenario's distribution.
    ///
    /// Returns `None` for states that are not chance steps.
    fn chance_move(&self, _rng: &mut GameRng) -> Option<Self::Move> {
        None
    }

    // === Convenience Methods ===

    /// Check if the state is terminal.
    fn is_terminal(&self) -> bool {
        self.legal_moves().is_empty()
    }
}
