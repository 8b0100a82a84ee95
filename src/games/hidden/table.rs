//! Observation table for the hidden-actor scenario.
//!
//! Maps a hidden profile and an action to the probability that an actor
//! with that profile plays the action, and the reward probability when it
//! is played. The table is an immutable value; states share it through a
//! persistent map, so forking a state does not copy it.

use im::{OrdMap, Vector};
use serde::{Deserialize, Serialize};

use crate::core::TableError;

/// Hidden internal variables of the unobserved actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Profile {
    pub b: u8,
    pub d: u8,
}

impl Profile {
    pub const fn new(b: u8, d: u8) -> Self {
        Self { b, d }
    }
}

/// Table entry for one (profile, action) pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Probability the hidden actor plays this action.
    pub action_prob: f64,
    /// Probability of a reward of 1 when this action is played.
    pub reward_prob: f64,
}

impl Observation {
    pub const fn new(action_prob: f64, reward_prob: f64) -> Self {
        Self {
            action_prob,
            reward_prob,
        }
    }
}

/// Actions are numbered 1 and 2 in the table; moves 0 and 1 in the game.
pub const ACTIONS: [u8; 2] = [1, 2];

/// (b, d, action) -> (action probability, reward probability).
const REFERENCE: [((u8, u8, u8), (f64, f64)); 8] = [
    ((0, 0, 1), (1.0, 0.1)),
    ((0, 0, 2), (0.0, 0.5)),
    ((0, 1, 1), (0.0, 0.5)),
    ((0, 1, 2), (1.0, 0.1)),
    ((1, 0, 1), (0.0, 0.4)),
    ((1, 0, 2), (1.0, 0.2)),
    ((1, 1, 1), (1.0, 0.2)),
    ((1, 1, 2), (0.0, 0.4)),
];

/// Flat serialized form of one table row.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    pub b: u8,
    pub d: u8,
    pub action: u8,
    pub action_prob: f64,
    pub reward_prob: f64,
}

/// Immutable observation policy of the hidden actor.
///
/// Serializes as a list of `TableEntry` rows; deserializing validates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TableEntry>", into = "Vec<TableEntry>")]
pub struct ObservationTable {
    entries: OrdMap<(Profile, u8), Observation>,
    profiles: Vector<Profile>,
}

impl ObservationTable {
    /// Build and validate a table from `((b, d, action), observation)` entries.
    pub fn new(
        entries: impl IntoIterator<Item = ((u8, u8, u8), Observation)>,
    ) -> Result<Self, TableError> {
        let table = Self::build(entries);
        table.validate()?;
        Ok(table)
    }

    /// The reference two-bit profile table.
    pub fn reference() -> Self {
        Self::build(
            REFERENCE
                .iter()
                .map(|&(key, (p, r))| (key, Observation::new(p, r))),
        )
    }

    fn build(entries: impl IntoIterator<Item = ((u8, u8, u8), Observation)>) -> Self {
        let entries: OrdMap<(Profile, u8), Observation> = entries
            .into_iter()
            .map(|((b, d, action), obs)| ((Profile::new(b, d), action), obs))
            .collect();

        let mut profiles: Vector<Profile> = Vector::new();
        for (profile, _) in entries.keys() {
            if profiles.last() != Some(profile) {
                profiles.push_back(*profile);
            }
        }

        Self { entries, profiles }
    }

    /// Check probabilities and completeness.
    pub fn validate(&self) -> Result<(), TableError> {
        if self.entries.is_empty() {
            return Err(TableError::Empty);
        }

        for (&(profile, action), obs) in self.entries.iter() {
            if !ACTIONS.contains(&action) {
                return Err(TableError::UnknownAction { action });
            }
            let checks = [
                ("action probability", obs.action_prob),
                ("reward probability", obs.reward_prob),
            ];
            for (field, value) in checks {
                if !(0.0..=1.0).contains(&value) {
                    return Err(TableError::ProbabilityOutOfRange {
                        field,
                        b: profile.b,
                        d: profile.d,
                        action,
                        value,
                    });
                }
            }
        }

        for profile in self.profiles.iter() {
            for action in ACTIONS {
                if !self.entries.contains_key(&(*profile, action)) {
                    return Err(TableError::MissingAction {
                        b: profile.b,
                        d: profile.d,
                        action,
                    });
                }
            }
            if self.action_distribution(*profile).iter().sum::<f64>() <= 0.0 {
                return Err(TableError::ZeroActionMass {
                    b: profile.b,
                    d: profile.d,
                });
            }
        }

        Ok(())
    }

    /// Distinct hidden profiles, in ascending order.
    pub fn profiles(&self) -> &Vector<Profile> {
        &self.profiles
    }

    /// Look up one entry.
    #[must_use]
    pub fn get(&self, profile: Profile, action: u8) -> Option<&Observation> {
        self.entries.get(&(profile, action))
    }

    /// Weights of moves 0 and 1 for an actor with `profile`.
    #[must_use]
    pub fn action_distribution(&self, profile: Profile) -> [f64; 2] {
        ACTIONS.map(|action| self.get(profile, action).map_or(0.0, |o| o.action_prob))
    }

    /// Reward probability when move `mv` (0 or 1) meets `profile`.
    #[must_use]
    pub fn reward_probability(&self, profile: Profile, mv: usize) -> f64 {
        ACTIONS
            .get(mv)
            .and_then(|&action| self.get(profile, action))
            .map_or(0.0, |o| o.reward_prob)
    }
}

impl TryFrom<Vec<TableEntry>> for ObservationTable {
    type Error = TableError;

    fn try_from(rows: Vec<TableEntry>) -> Result<Self, Self::Error> {
        Self::new(
            rows.into_iter()
                .map(|r| ((r.b, r.d, r.action), Observation::new(r.action_prob, r.reward_prob))),
        )
    }
}

impl From<ObservationTable> for Vec<TableEntry> {
    fn from(table: ObservationTable) -> Self {
        table
            .entries
            .iter()
            .map(|(&(profile, action), obs)| TableEntry {
                b: profile.b,
                d: profile.d,
                action,
                action_prob: obs.action_prob,
                reward_prob: obs.reward_prob,
            })
            .collect()
    }
}
