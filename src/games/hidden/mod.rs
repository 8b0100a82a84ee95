//! Hidden-actor scenario with a chance step.
//!
//! An unobserved actor with a hidden two-bit profile `(b, d)` acts first;
//! its move is observed as the outcome of a chance step. Actor 1 then
//! picks a move, and the reward depends on the hidden profile and actor
//! 1's move:
//!
//! - The profile is drawn uniformly from the table's profiles
//! - The hidden move is drawn from the profile's action probabilities
//! - Both are re-drawn every time the state is forked
//!
//! The observation table is passed in explicitly; see
//! `ObservationTable::reference` for the standard table.

mod game;
mod table;

pub use game::HiddenActorGame;
pub use table::{Observation, ObservationTable, Profile, TableEntry, ACTIONS};
