//! # chance-uct
//!
//! Upper-Confidence-bound Tree search (UCT) for sequential decision
//! processes with chance steps and hidden state.
//!
//! ## Design Principles
//!
//! 1. **Scenario-Agnostic**: The search only talks to the `GameState`
//!    trait. Rules, tables and scoring live in scenarios.
//!
//! 2. **Chance Steps Are Sampled**: When a state reports a chance step,
//!    its own distribution decides the outcome during both selection and
//!    expansion.
//!
//! 3. **Reproducible**: Every random draw, including hidden-state
//!    re-sampling when a state is forked, comes from one seeded RNG.
//!
//! ## Modules
//!
//! - `core`: Actors, RNG, the state contract, error types
//! - `mcts`: Tree, policies, configuration and the search loop
//! - `games`: Example scenarios (one-move, Nim, hidden actor)

pub mod core;
pub mod games;
pub mod mcts;

// Re-export commonly used types
pub use crate::core::{Actor, ConfigError, GameRng, GameState, TableError, TreeError};

pub use crate::mcts::{
    search, Backpropagation, MCTSConfig, MCTSNode, MCTSSearch, MCTSTree, NodeId,
    RandomRollout, SearchStats, SelectionPolicy, SimulationPolicy, TreeStats, UCB1,
};

pub use crate::games::hidden::{HiddenActorGame, ObservationTable};
