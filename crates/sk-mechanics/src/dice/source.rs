//! Random sources for die rolls.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Something that can produce die faces.
///
/// Implementations must return a value in `1..=sides` for any `sides >= 1`.
pub trait DiceSource {
    /// Roll one die with the given number of sides.
    fn roll(&mut self, sides: u32) -> u32;
}

/// A seeded pseudo-random source. Two sources built from the same seed
/// produce the same sequence of rolls.
pub struct SeededDice {
    rng: StdRng,
}

impl SeededDice {
    /// Create a source seeded from a `u64`.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Wrap an existing RNG.
    pub fn from_rng(rng: StdRng) -> Self {
        Self { rng }
    }
}

impl DiceSource for SeededDice {
    fn roll(&mut self, sides: u32) -> u32 {
        self.rng.random_range(1..=sides.max(1))
    }
}

impl fmt::Debug for SeededDice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeededDice").finish_non_exhaustive()
    }
}

/// A source that replays a fixed sequence of faces, cycling when it
/// runs out. Each value is clamped to the die being rolled.
///
/// Useful for forcing specific outcomes, e.g. a natural 20.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    faces: Vec<u32>,
    cursor: usize,
}

impl ScriptedDice {
    /// Create a source that yields `faces` in order. An empty sequence
    /// always rolls 1.
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
            cursor: 0,
        }
    }

    /// How many faces have been consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl DiceSource for ScriptedDice {
    fn roll(&mut self, sides: u32) -> u32 {
        let sides = sides.max(1);
        if self.faces.is_empty() {
            return 1;
        }
        let face = self.faces[self.cursor % self.faces.len()];
        self.cursor += 1;
        face.clamp(1, sides)
    }
}
