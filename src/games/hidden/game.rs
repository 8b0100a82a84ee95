//! Hidden-actor game implementation.

use crate::core::{Actor, GameRng, GameState};

use super::table::{ObservationTable, Profile};

/// State of the hidden-actor game.
///
/// Steps: the chance actor reveals the hidden actor's move, actor 1
/// responds with a move of its own, and the game ends. Forking draws a
/// fresh hidden profile and hidden move, so every search iteration
/// simulates a different unobserved actor.
#[derive(Clone, Debug)]
pub struct HiddenActorGame {
    table: ObservationTable,
    just_moved: Actor,
    profile: Option<Profile>,
    action: Option<usize>,
}

impl HiddenActorGame {
    /// Moves available at the chance step and to actor 1.
    pub const MOVES: [usize; 2] = [0, 1];

    /// Create a root state. The hidden profile is drawn when it is forked.
    pub fn new(table: ObservationTable) -> Self {
        Self {
            table,
            just_moved: Actor::CHANCE,
            profile: None,
            action: None,
        }
    }

    /// The observation table this game samples from.
    #[must_use]
    pub fn table(&self) -> &ObservationTable {
        &self.table
    }

    /// The hidden profile, once drawn.
    #[must_use]
    pub fn profile(&self) -> Option<Profile> {
        self.profile
    }

    /// The currently recorded move: the hidden actor's until actor 1
    /// responds, then actor 1's.
    #[must_use]
    pub fn action(&self) -> Option<usize> {
        self.action
    }
}

impl GameState for HiddenActorGame {
    type Move = usize;

    fn player_just_moved(&self) -> Actor {
        self.just_moved
    }

    fn fork(&self, rng: &mut GameRng) -> Self {
        let profiles = self.table.profiles();
        let profile = profiles[rng.gen_range_usize(0..profiles.len())];
        let action = rng.choose_weighted(&self.table.action_distribution(profile));
        assert!(action.is_some(), "profile {:?} has no action mass", profile);

        Self {
            table: self.table.clone(),
            just_moved: self.just_moved,
            profile: Some(profile),
            action,
        }
    }

    fn apply_move(&mut self, mv: &usize) {
        match self.just_moved {
            Actor::CHANCE => self.just_moved = Actor::ONE,
            Actor::ONE => {
                self.just_moved = Actor::TWO;
                self.action = Some(*mv);
            }
            other => panic!("no moves after {} in the hidden-actor game", other),
        }
    }

    fn legal_moves(&self) -> Vec<usize> {
        match self.just_moved {
            Actor::CHANCE | Actor::ONE => Self::MOVES.to_vec(),
            _ => vec![],
        }
    }

    fn result(&self, _actor: Actor, rng: &mut GameRng) -> f64 {
        let (Some(profile), Some(action)) = (self.profile, self.action) else {
            panic!("result on a hidden-actor game that was never forked");
        };

        if rng.gen_f64() < self.table.reward_probability(profile, action) {
            1.0
        } else {
            0.0
        }
    }

    fn is_chance(&self) -> bool {
        self.just_moved.is_chance()
    }

    fn chance_move(&self, _rng: &mut GameRng) -> Option<usize> {
        if self.is_chance() {
            self.action
        } else {
            None
        }
    }
}
