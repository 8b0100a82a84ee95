//! Actor identification.
//!
//! ## Actor
//!
//! The party whose decision produced a state. Actor `0` is reserved for the
//! neutral chance process that "moves" at a synthetic root; strategic actors
//! are numbered from `1`.

use serde::{Deserialize, Serialize};

/// Identity of the actor who last acted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Actor(pub u8);

impl Actor {
    /// The neutral actor used for chance steps and synthetic roots.
    pub const CHANCE: Actor = Actor(0);

    /// First strategic actor.
    pub const ONE: Actor = Actor(1);

    /// Second strategic actor.
    pub const TWO: Actor = Actor(2);

    /// Create a new actor.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Check if this is the neutral chance actor.
    #[inline]
    #[must_use]
    pub const fn is_chance(self) -> bool {
        self.0 == 0
    }

    /// The other actor of a two-actor game.
    ///
    /// ```
    /// use chance_uct::core::Actor;
    ///
    /// assert_eq!(Actor::ONE.opponent(), Actor::TWO);
    /// assert_eq!(Actor::TWO.opponent(), Actor::ONE);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if called on an actor other than `ONE` or `TWO`.
    #[must_use]
    pub fn opponent(self) -> Self {
        assert!(
            self == Self::ONE || self == Self::TWO,
            "opponent is only defined for actors 1 and 2, got {}",
            self
        );
        Self(3 - self.0)
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_chance() {
            write!(f, "Chance")
        } else {
            write!(f, "Actor {}", self.0)
        }
    }
}
