//! Core types: actors, RNG, the state contract, and errors.
//!
//! This module contains the building blocks that are scenario-agnostic.
//! Scenarios plug into the search by implementing `GameState`.

pub mod actor;
pub mod error;
pub mod rng;
pub mod state;

pub use actor::Actor;
pub use error::{ConfigError, TableError, TreeError};
pub use rng::GameRng;
pub use state::GameState;
