//! Nim: a deterministic two-actor game for exercising the search.
//!
//! Chips sit in a single pile. Actors 1 and 2 alternate (actor 1 first),
//! each taking 1, 2 or 3 chips. Whoever takes the last chip wins.

use crate::core::{Actor, GameRng, GameState};

/// Maximum chips removed in one move.
pub const MAX_TAKE: u32 = 3;

/// Nim game state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NimState {
    chips: u32,
    just_moved: Actor,
}

impl NimState {
    /// Create a pile of `chips` with actor 1 to move.
    pub fn new(chips: u32) -> Self {
        Self {
            chips,
            just_moved: Actor::TWO,
        }
    }

    /// Chips left on the pile.
    #[must_use]
    pub fn chips(&self) -> u32 {
        self.chips
    }
}

impl GameState for NimState {
    type Move = u32;

    fn player_just_moved(&self) -> Actor {
        self.just_moved
    }

    fn fork(&self, _rng: &mut GameRng) -> Self {
        self.clone()
    }

    fn apply_move(&mut self, mv: &u32) {
        assert!(
            (1..=MAX_TAKE).contains(mv) && *mv <= self.chips,
            "cannot take {} chips from {}",
            mv,
            self.chips
        );
        self.chips -= mv;
        self.just_moved = self.just_moved.opponent();
    }

    fn legal_moves(&self) -> Vec<u32> {
        (1..=self.chips.min(MAX_TAKE)).collect()
    }

    fn result(&self, actor: Actor, _rng: &mut GameRng) -> f64 {
        assert_eq!(self.chips, 0, "result on an unfinished Nim game");
        if actor == self.just_moved {
            1.0
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legal_moves() {
        assert_eq!(NimState::new(10).legal_moves(), vec![1, 2, 3]);
        assert_eq!(NimState::new(2).legal_moves(), vec![1, 2]);
        assert!(NimState::new(0).legal_moves().is_empty());
    }

    #[test]
    fn test_alternation_and_result() {
        let mut rng = GameRng::new(0);
        let mut state = NimState::new(4);

        state.apply_move(&3);
        assert_eq!(state.player_just_moved(), Actor::ONE);
        state.apply_move(&1);
        assert_eq!(state.player_just_moved(), Actor::TWO);

        assert!(state.is_terminal());
        assert_eq!(state.result(Actor::TWO, &mut rng), 1.0);
        assert_eq!(state.result(Actor::ONE, &mut rng), 0.0);
    }

    #[test]
    #[should_panic(expected = "cannot take")]
    fn test_overdraw_panics() {
        NimState::new(2).apply_move(&3);
    }

    #[test]
    fn test_fork_is_independent() {
        let mut rng = GameRng::new(0);
        let original = NimState::new(5);
        let mut copy = original.fork(&mut rng);

        copy.apply_move(&2);

        assert_eq!(original.chips(), 5);
        assert_eq!(original.legal_moves(), vec![1, 2, 3]);
        assert_eq!(copy.chips(), 3);
    }
}
