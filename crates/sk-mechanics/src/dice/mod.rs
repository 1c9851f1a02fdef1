//! Dice types, random sources, and rolling.
//!
//! Supports standard polyhedral dice (d4 through d100) and custom dice.
//! All randomness flows through a [`DiceSource`], so every roll can be
//! made reproducible by injecting a seeded or scripted source.

pub mod engine;
pub mod roll;
pub mod source;

pub use engine::DiceEngine;
pub use roll::CheckRoll;
pub use source::{DiceSource, ScriptedDice, SeededDice};

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CombatError;

/// Largest side count any die may have, so every face fits in an `i32`.
pub const MAX_SIDES: u32 = i32::MAX.unsigned_abs();

/// Most dice a single damage expression may roll.
pub const MAX_DICE: u32 = 100;

/// A polyhedral die type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Die {
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Eight-sided die.
    D8,
    /// Ten-sided die.
    D10,
    /// Twelve-sided die.
    D12,
    /// Twenty-sided die.
    D20,
    /// Percentile die (1-100).
    D100,
    /// A die with a custom number of sides.
    Custom(u32),
}

impl Die {
    /// Returns the number of sides on this die.
    pub fn sides(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
            Self::D100 => 100,
            Self::Custom(n) => n,
        }
    }

    /// Map a side count onto a die, preferring the standard variants.
    ///
    /// Returns `None` for fewer than two sides or more than [`MAX_SIDES`].
    pub fn from_sides(sides: u32) -> Option<Self> {
        match sides {
            0 | 1 => None,
            n if n > MAX_SIDES => None,
            4 => Some(Self::D4),
            6 => Some(Self::D6),
            8 => Some(Self::D8),
            10 => Some(Self::D10),
            12 => Some(Self::D12),
            20 => Some(Self::D20),
            100 => Some(Self::D100),
            n => Some(Self::Custom(n)),
        }
    }

    /// Parse a die from a string like "d20", "d6", "d100".
    pub fn from_str_tag(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        let num = s.strip_prefix('d')?.parse::<u32>().ok()?;
        Self::from_sides(num)
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// A count of identical dice, written as `XdY` (e.g. `2d6`).
///
/// Used by the armament table for damage expressions. Flat modifiers are
/// not part of the notation; ability bonuses are added by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DamageDice {
    /// How many dice to roll (at least one).
    pub count: u32,
    /// Which die to roll.
    pub die: Die,
}

impl DamageDice {
    /// Create a damage expression of `count` dice of type `die`.
    pub const fn new(count: u32, die: Die) -> Self {
        Self { count, die }
    }

    /// The same die type with twice as many dice, as rolled on a critical hit.
    pub fn doubled(self) -> Self {
        Self {
            count: self.count.saturating_mul(2),
            die: self.die,
        }
    }

    /// Smallest possible sum.
    pub fn min(self) -> u32 {
        self.count
    }

    /// Largest possible sum.
    pub fn max(self) -> u32 {
        self.count.saturating_mul(self.die.sides())
    }
}

impl FromStr for DamageDice {
    type Err = CombatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        let (count_str, sides_str) = s
            .split_once('d')
            .ok_or_else(|| CombatError::InvalidDice(s.clone()))?;

        let count = if count_str.is_empty() {
            1
        } else {
            count_str
                .parse::<u32>()
                .map_err(|_| CombatError::InvalidDice(s.clone()))?
        };
        if count == 0 || count > MAX_DICE {
            return Err(CombatError::InvalidDice(s));
        }

        let die = sides_str
            .parse::<u32>()
            .ok()
            .and_then(Die::from_sides)
            .ok_or_else(|| CombatError::InvalidDice(s.clone()))?;

        Ok(Self { count, die })
    }
}

impl std::fmt::Display for DamageDice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.count, self.die)
    }
}
