//! Core UCT search algorithm.
//!
//! Each iteration forks the root state and runs four phases:
//! select (UCB1, or the state's own distribution at chance steps),
//! expand one untried move, roll out to a terminal state, and
//! backpropagate the terminal score to the root.

use std::time::Instant;

use smallvec::SmallVec;

use crate::core::{Actor, GameRng, GameState};

use super::config::{Backpropagation, MCTSConfig};
use super::node::NodeId;
use super::policy::{RandomRollout, SelectionPolicy, SimulationPolicy, UCB1};
use super::stats::SearchStats;
use super::tree::MCTSTree;

/// Main MCTS search context.
///
/// Generic over the state type. Owns the search tree, configuration and
/// RNG, and provides methods to run searches.
pub struct MCTSSearch<S: GameState> {
    /// Search configuration.
    config: MCTSConfig,

    /// The search tree of the most recent search.
    tree: MCTSTree<S::Move>,

    /// RNG for every random decision of the search.
    rng: GameRng,

    /// Selection policy.
    selection: Box<dyn SelectionPolicy<S::Move>>,

    /// Simulation policy.
    simulation: Box<dyn SimulationPolicy<S>>,

    /// Search statistics.
    stats: SearchStats,
}

impl<S: GameState> MCTSSearch<S> {
    /// Create a new MCTS search context.
    ///
    /// # Panics
    ///
    /// Panics if the configuration fails `MCTSConfig::validate`.
    pub fn new(config: MCTSConfig) -> Self {
        if let Err(err) = config.validate() {
            panic!("invalid search config: {}", err);
        }
        let rng = GameRng::new(config.seed);

        Self {
            config,
            tree: MCTSTree::with_capacity(Actor::CHANCE, [], 1),
            rng,
            selection: Box::new(UCB1),
            simulation: Box::new(RandomRollout),
            stats: SearchStats::default(),
        }
    }

    /// Set a custom selection policy.
    pub fn with_selection<P: SelectionPolicy<S::Move> + 'static>(mut self, selection: P) -> Self {
        self.selection = Box::new(selection);
        self
    }

    /// Set a custom simulation policy.
    pub fn with_simulation<P: SimulationPolicy<S> + 'static>(mut self, simulation: P) -> Self {
        self.simulation = Box::new(simulation);
        self
    }

    /// Run UCT search for exactly `iterations` iterations.
    ///
    /// Returns the move leading to the most visited root child, or `None`
    /// if the root has no children (terminal root or zero iterations).
    pub fn search(&mut self, root: &S, iterations: u32) -> Option<S::Move> {
        let start = Instant::now();
        self.stats.reset();

        let capacity = self.config.max_nodes.min(iterations as usize + 1);
        self.tree = MCTSTree::with_capacity(root.player_just_moved(), root.legal_moves(), capacity);

        for _ in 0..iterations {
            self.iteration(root);
            self.stats.iterations += 1;
        }

        self.stats.time_us = start.elapsed().as_micros() as u64;

        log::debug!(
            "search finished: {} iterations, {} nodes, {} chance repeats in {}us",
            self.stats.iterations,
            self.tree.len(),
            self.stats.chance_repeats,
            self.stats.time_us
        );
        log::debug!("root children:\n{}", self.tree.children_summary());
        if log::log_enabled!(log::Level::Trace) {
            log::trace!("search tree:\n{}", self.tree.render());
        }

        self.best_move()
    }

    /// Single iteration: select, expand, simulate, backpropagate.
    fn iteration(&mut self, root: &S) {
        let mut state = root.fork(&mut self.rng);
        let mut current = self.tree.root();

        // === SELECTION ===
        loop {
            let node = self.tree.get(current);
            if !node.is_fully_expanded() || node.children.is_empty() {
                break;
            }

            if state.is_chance() {
                let mv = self.sample_chance_move(&state);
                state.apply_move(&mv);
                current = match self.tree.child_for(current, &mv) {
                    Some(child) => child,
                    None => panic!("chance move {:?} has no child at {}", mv, current),
                };
            } else {
                current = self.selection.select(&self.tree, current, &self.config);
                state.apply_move(self.move_into(current));
            }
        }

        // === EXPANSION ===
        if !self.tree.get(current).is_fully_expanded() {
            let mv = if state.is_chance() {
                self.sample_chance_move(&state)
            } else {
                let untried = &self.tree.get(current).untried_moves;
                untried[self.rng.gen_range_usize(0..untried.len())].clone()
            };
            state.apply_move(&mv);

            // A sampled chance move may already have its child. The
            // iteration then rolls out from the chance node itself.
            if self.tree.get(current).is_untried(&mv) {
                current = self.expand(current, mv, &state);
            } else {
                self.stats.chance_repeats += 1;
            }
        }

        // === SIMULATION ===
        if !state.is_terminal() {
            self.stats.simulations += 1;
            let mut sim_rng = self.rng.fork();
            self.simulation.simulate(&mut state, &mut sim_rng);
        }

        // === BACKPROPAGATION ===
        self.backpropagate(current, &state);
    }

    /// Materialize the child for `mv`, returning its ID.
    fn expand(&mut self, parent: NodeId, mv: S::Move, state: &S) -> NodeId {
        let child = self
            .tree
            .add_child(parent, mv, state.player_just_moved(), state.legal_moves());

        self.stats.nodes_expanded += 1;
        let depth = self.tree.get(child).depth;
        if depth > self.stats.max_depth {
            self.stats.max_depth = depth;
        }

        child
    }

    /// The move that produced a non-root node.
    fn move_into(&self, node: NodeId) -> &S::Move {
        match &self.tree.get(node).mv {
            Some(mv) => mv,
            None => panic!("{} has no move; only the root may", node),
        }
    }

    /// Draw the outcome of a chance step from the state's distribution.
    fn sample_chance_move(&mut self, state: &S) -> S::Move {
        match state.chance_move(&mut self.rng) {
            Some(mv) => mv,
            None => panic!("chance state did not supply a chance move"),
        }
    }

    /// Terminal score for `actor`, checked to lie in [0, 1].
    fn score(&mut self, state: &S, actor: Actor) -> f64 {
        let score = state.result(actor, &mut self.rng);
        assert!(
            (0.0..=1.0).contains(&score),
            "result for {} must lie in [0, 1], got {}",
            actor,
            score
        );
        score
    }

    /// Update every node from `leaf` up to and including the root.
    fn backpropagate(&mut self, leaf: NodeId, state: &S) {
        let path: SmallVec<[NodeId; 16]> = self.tree.path_to_root(leaf).collect();

        match self.config.backpropagation {
            Backpropagation::Shared => {
                let actor = self.tree.get(leaf).last_actor;
                let score = self.score(state, actor);
                for id in path {
                    self.tree.get_mut(id).update(score);
                }
            }
            Backpropagation::PerActor => {
                // One draw per actor, so every node credited to the same
                // actor sees the same outcome.
                let mut scores: Vec<(Actor, f64)> = Vec::with_capacity(3);
                for id in path {
                    let actor = self.tree.get(id).last_actor;
                    let score = match scores.iter().find(|(a, _)| *a == actor) {
                        Some(&(_, s)) => s,
                        None => {
                            let s = self.score(state, actor);
                            scores.push((actor, s));
                            s
                        }
                    };
                    self.tree.get_mut(id).update(score);
                }
            }
        }
    }

    /// Move leading to the most visited root child.
    fn best_move(&self) -> Option<S::Move> {
        let root = self.tree.root();
        self.tree
            .most_visited_child(root)
            .and_then(|child| self.tree.get(child).mv.clone())
    }

    /// Get search statistics.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Get the search tree of the most recent search.
    #[must_use]
    pub fn tree(&self) -> &MCTSTree<S::Move> {
        &self.tree
    }

    /// Get root child visit counts in discovery order.
    ///
    /// Returns (move, visit_count) pairs.
    pub fn action_visits(&self) -> Vec<(S::Move, u32)> {
        self.root_children()
            .map(|(mv, visits)| (mv.clone(), visits))
            .collect()
    }

    /// Get root child visit shares.
    ///
    /// Returns (move, probability) pairs that sum to ~1.0.
    pub fn action_probabilities(&self) -> Vec<(S::Move, f64)> {
        let total: u32 = self.root_children().map(|(_, v)| v).sum();
        if total == 0 {
            return Vec::new();
        }

        self.root_children()
            .map(|(mv, visits)| (mv.clone(), visits as f64 / total as f64))
            .collect()
    }

    fn root_children(&self) -> impl Iterator<Item = (&S::Move, u32)> + '_ {
        self.tree.root_node().children.iter().filter_map(move |&c| {
            let child = self.tree.get(c);
            child.mv.as_ref().map(|mv| (mv, child.visits))
        })
    }

    /// Get the configuration.
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }
}

/// Run a UCT search from `root` with default settings and the given
/// exploration constant, returning the most visited root move.
pub fn search<S: GameState>(root: &S, iterations: u32, exploration_constant: f64) -> Option<S::Move> {
    let config = MCTSConfig::default().with_exploration(exploration_constant);
    MCTSSearch::new(config).search(root, iterations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::nim::NimState;
    use crate::games::single::OneMoveGame;

    #[test]
    fn test_search_returns_only_move() {
        let mut search = MCTSSearch::new(MCTSConfig::default());
        let best = search.search(&OneMoveGame::new(), 1);

        assert_eq!(best, Some(0));
        let root = search.tree().root();
        let child = search.tree().most_visited_child(root).unwrap();
        assert_eq!(search.tree().get(child).mean_score(), 1.0);
    }

    #[test]
    fn test_zero_iterations() {
        let mut search = MCTSSearch::new(MCTSConfig::default());
        assert_eq!(search.search(&NimState::new(5), 0), None);
        assert_eq!(search.stats().iterations, 0);
        assert_eq!(search.tree().len(), 1);
    }

    #[test]
    fn test_terminal_root() {
        let mut search = MCTSSearch::new(MCTSConfig::default());
        let best = search.search(&NimState::new(0), 10);

        assert_eq!(best, None);
        assert_eq!(search.tree().root_node().visits, 10);
        assert_eq!(search.stats().simulations, 0);
    }

    #[test]
    fn test_search_stats() {
        let mut search = MCTSSearch::new(MCTSConfig::default());
        search.search(&NimState::new(7), 50);

        let stats = search.stats();
        assert_eq!(stats.iterations, 50);
        assert!(stats.simulations > 0);
        assert!(stats.nodes_expanded > 0);
        assert_eq!(stats.nodes_expanded as usize + 1, search.tree().len());
        assert_eq!(stats.chance_repeats, 0);
    }

    #[test]
    fn test_root_visits_equal_iterations() {
        for mode in [Backpropagation::Shared, Backpropagation::PerActor] {
            let config = MCTSConfig::default().with_backpropagation(mode);
            let mut search = MCTSSearch::new(config);
            search.search(&NimState::new(9), 300);

            assert_eq!(search.tree().root_node().visits, 300);
            assert_eq!(search.tree().check_well_formed(), Ok(()));
        }
    }

    #[test]
    fn test_search_deterministic() {
        let config = MCTSConfig::default().with_seed(12345);

        let mut search1 = MCTSSearch::new(config.clone());
        let mut search2 = MCTSSearch::new(config);

        let best1 = search1.search(&NimState::new(10), 200);
        let best2 = search2.search(&NimState::new(10), 200);

        assert_eq!(best1, best2);
        assert_eq!(search1.action_visits(), search2.action_visits());
    }

    #[test]
    fn test_action_probabilities() {
        let mut search = MCTSSearch::new(MCTSConfig::default());
        search.search(&NimState::new(6), 100);

        let probs = search.action_probabilities();
        assert_eq!(probs.len(), 3);

        let sum: f64 = probs.iter().map(|(_, p)| p).sum();
        assert!((sum - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_free_function() {
        assert_eq!(search(&OneMoveGame::new(), 5, std::f64::consts::SQRT_2), Some(0));
    }

    #[test]
    #[should_panic(expected = "invalid search config")]
    fn test_free_function_rejects_nan_exploration() {
        search(&NimState::new(9), 500, f64::NAN);
    }

    #[test]
    #[should_panic(expected = "must be finite and non-negative, got -3")]
    fn test_free_function_rejects_negative_exploration() {
        search(&NimState::new(9), 500, -3.0);
    }

    #[test]
    #[should_panic(expected = "invalid search config")]
    fn test_new_rejects_infinite_exploration() {
        let config = MCTSConfig::default().with_exploration(f64::INFINITY);
        let _search: MCTSSearch<NimState> = MCTSSearch::new(config);
    }

    #[test]
    fn test_zero_exploration_accepted() {
        let mut search = MCTSSearch::new(MCTSConfig::default().with_exploration(0.0));
        assert!(search.search(&NimState::new(4), 20).is_some());
    }

    #[test]
    fn test_backpropagation_updates_whole_path() {
        let mut search = MCTSSearch::new(MCTSConfig::default());
        search.search(&NimState::new(6), 1);

        // One iteration expands a single child and credits it and the root.
        let tree = search.tree();
        assert_eq!(tree.len(), 2);
        for (_, node) in tree.iter() {
            assert_eq!(node.visits, 1);
        }
    }
}
