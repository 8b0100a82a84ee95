//! A one-move, two-actor scenario.
//!
//! Actor 1 has a single move; once it is made the game is over and
//! actor 1 has won.

use crate::core::{Actor, GameRng, GameState};

/// One-move scenario. Actor 1 always wins after its move.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OneMoveGame {
    moved: bool,
}

impl OneMoveGame {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameState for OneMoveGame {
    type Move = usize;

    fn player_just_moved(&self) -> Actor {
        if self.moved {
            Actor::ONE
        } else {
            Actor::TWO
        }
    }

    fn fork(&self, _rng: &mut GameRng) -> Self {
        self.clone()
    }

    fn apply_move(&mut self, mv: &usize) {
        assert!(!self.moved && *mv == 0, "illegal move {} in one-move game", mv);
        self.moved = true;
    }

    fn legal_moves(&self) -> Vec<usize> {
        if self.moved {
            vec![]
        } else {
            vec![0]
        }
    }

    fn result(&self, actor: Actor, _rng: &mut GameRng) -> f64 {
        if actor == Actor::ONE {
            1.0
        } else {
            0.0
        }
    }
}
