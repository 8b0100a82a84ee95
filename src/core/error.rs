//! Error types for recoverable configuration failures.
//!
//! Search preconditions (selecting among zero children, scores outside
//! `[0, 1]`) are defects and panic instead.

use thiserror::Error;

/// Search configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("exploration constant must be finite and non-negative, got {0}")]
    InvalidExploration(f64),

    #[error("failed to parse config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Observation table errors for the hidden-actor scenario.
#[derive(Error, Debug, PartialEq)]
pub enum TableError {
    #[error("observation table has no entries")]
    Empty,

    #[error("{field} for profile ({b}, {d}) action {action} must lie in [0, 1], got {value}")]
    ProbabilityOutOfRange {
        field: &'static str,
        b: u8,
        d: u8,
        action: u8,
        value: f64,
    },

    #[error("action {action} is outside the supported actions 1 and 2")]
    UnknownAction { action: u8 },

    #[error("profile ({b}, {d}) is missing action {action}")]
    MissingAction { b: u8, d: u8, action: u8 },

    #[error("action probabilities for profile ({b}, {d}) are both zero")]
    ZeroActionMass { b: u8, d: u8 },
}

/// Structural defects found by `MCTSTree::check_well_formed`.
#[derive(Error, Debug, PartialEq)]
pub enum TreeError {
    #[error("node {node} points at parent {parent} which is outside the tree")]
    DanglingParent { node: u32, parent: u32 },

    #[error("node {child} is listed as a child of both {first} and {second}")]
    SharedChild { child: u32, first: u32, second: u32 },

    #[error("node {child} is listed under {listed} but records parent {recorded}")]
    ParentMismatch { child: u32, listed: u32, recorded: u32 },

    #[error("node {node} is not reachable from its parent's child list")]
    Unlisted { node: u32 },

    #[error("node {node} has two children for the same move")]
    DuplicateMove { node: u32 },

    #[error("node {node} has wins {wins} outside [0, {visits}]")]
    WinsOutOfRange { node: u32, wins: f64, visits: u32 },

    #[error("children of node {node} have {children} visits but the node has {visits}")]
    ChildVisitsExceedParent { node: u32, children: u32, visits: u32 },
}
