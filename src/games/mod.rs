//! Scenarios implementing `GameState`.
//!
//! Each scenario is a separate unit; the search never branches on which
//! one it is running.

pub mod hidden;
pub mod nim;
pub mod single;
