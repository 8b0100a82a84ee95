//! Monte Carlo Tree Search (UCT) with chance nodes.
//!
//! ## Overview
//!
//! - **UCT**: Children are chosen with UCB1 at decision steps
//! - **Chance Nodes**: At chance steps the state's own distribution picks
//!   the outcome, and children are looked up by move value
//! - **Arena Tree**: Nodes live in a flat vector with index back-links
//! - **Deterministic**: One seeded RNG drives the whole search
//!
//! ## Usage
//!
//! ```rust
//! use chance_uct::games::nim::NimState;
//! use chance_uct::mcts::{Backpropagation, MCTSConfig, MCTSSearch};
//!
//! let config = MCTSConfig::default().with_backpropagation(Backpropagation::PerActor);
//! let mut search = MCTSSearch::new(config);
//!
//! let best = search.search(&NimState::new(5), 2_000);
//! assert!(best.is_some());
//!
//! for (mv, share) in search.action_probabilities() {
//!     println!("take {}: {:.1}%", mv, share * 100.0);
//! }
//! ```
//!
//! The free function `search` runs a one-off search with default settings:
//!
//! ```rust
//! use chance_uct::games::single::OneMoveGame;
//! use chance_uct::mcts::search;
//!
//! assert_eq!(search(&OneMoveGame::new(), 10, std::f64::consts::SQRT_2), Some(0));
//! ```

pub mod config;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;

// Re-export main types
pub use config::{Backpropagation, MCTSConfig};
pub use node::{MCTSNode, NodeId};
pub use policy::{RandomRollout, SelectionPolicy, SimulationPolicy, UCB1};
pub use search::{search, MCTSSearch};
pub use stats::SearchStats;
pub use tree::{MCTSTree, TreeStats};
