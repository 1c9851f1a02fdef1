//! The dice engine: single dice, checks, and damage pools.

use std::fmt;

use super::roll::CheckRoll;
use super::source::{DiceSource, SeededDice};
use super::{DamageDice, Die, MAX_SIDES};
use crate::error::{CombatError, CombatResult};

/// Rolls dice through an injectable [`DiceSource`].
pub struct DiceEngine {
    source: Box<dyn DiceSource>,
}

impl DiceEngine {
    /// Create an engine over any dice source.
    pub fn new(source: impl DiceSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Create an engine backed by a seeded RNG.
    pub fn seeded(seed: u64) -> Self {
        Self::new(SeededDice::new(seed))
    }

    /// Roll a die with `sides` faces, uniform over `1..=sides`.
    ///
    /// Side counts from 1 up to [`MAX_SIDES`] are accepted.
    pub fn roll_die(&mut self, sides: u32) -> CombatResult<u32> {
        if sides == 0 {
            return Err(CombatError::InvalidDice("a die needs at least one side".to_string()));
        }
        if sides > MAX_SIDES {
            return Err(CombatError::InvalidDice(format!(
                "a die has at most {MAX_SIDES} sides, got {sides}"
            )));
        }
        Ok(self.source.roll(sides))
    }

    /// Roll a known die type.
    pub fn roll(&mut self, die: Die) -> u32 {
        self.source.roll(die.sides().max(1))
    }

    /// Roll one die and add a modifier and proficiency bonus.
    pub fn roll_check(
        &mut self,
        sides: u32,
        modifier: i32,
        proficiency: i32,
    ) -> CombatResult<CheckRoll> {
        let raw = self.roll_die(sides)?;
        tracing::debug!(sides, raw, modifier, proficiency, "check rolled");
        CheckRoll::new(sides, raw, modifier, proficiency)
    }

    /// Roll every die in a damage expression, returning the individual faces.
    pub fn roll_pool(&mut self, dice: DamageDice) -> Vec<u32> {
        (0..dice.count).map(|_| self.roll(dice.die)).collect()
    }
}

impl fmt::Debug for DiceEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiceEngine").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;

    #[test]
    fn roll_die_in_range() {
        let mut engine = DiceEngine::seeded(42);
        for _ in 0..200 {
            let v = engine.roll_die(8).unwrap();
            assert!((1..=8).contains(&v));
        }
    }

    #[test]
    fn roll_die_zero_sides() {
        let mut engine = DiceEngine::seeded(42);
        assert!(matches!(
            engine.roll_die(0),
            Err(CombatError::InvalidDice(_))
        ));
    }

    #[test]
    fn roll_check_totals() {
        let mut engine = DiceEngine::new(ScriptedDice::new([15]));
        let r = engine.roll_check(20, 3, 2).unwrap();
        assert_eq!(r.raw, 15);
        assert_eq!(r.modifier, 3);
        assert_eq!(r.proficiency, 2);
        assert_eq!(r.total, 20);
    }

    #[test]
    fn roll_check_reproducible() {
        let mut a = DiceEngine::seeded(7);
        let mut b = DiceEngine::seeded(7);
        for _ in 0..10 {
            assert_eq!(a.roll_check(20, 1, 0).unwrap(), b.roll_check(20, 1, 0).unwrap());
        }
    }

    #[test]
    fn roll_pool_rolls_each_die() {
        let mut engine = DiceEngine::new(ScriptedDice::new([2, 5, 6]));
        let faces = engine.roll_pool(DamageDice::new(3, Die::D6));
        assert_eq!(faces, vec![2, 5, 6]);
    }

    #[test]
    fn roll_die_too_many_sides() {
        let mut engine = DiceEngine::new(ScriptedDice::new([3_000_000_000]));
        assert!(matches!(
            engine.roll_die(u32::MAX),
            Err(CombatError::InvalidDice(_))
        ));
        assert!(engine.roll_check(u32::MAX, 0, 0).is_err());
    }

    #[test]
    fn roll_check_overflow_is_an_error() {
        let mut engine = DiceEngine::new(ScriptedDice::new([20]));
        assert!(matches!(
            engine.roll_check(20, i32::MAX, 0),
            Err(CombatError::InvalidDice(_))
        ));
        assert!(engine.roll_check(20, 3, i32::MAX).is_err());
    }
}
