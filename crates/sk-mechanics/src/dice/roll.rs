//! Check roll results.

use serde::{Deserialize, Serialize};

use crate::error::{CombatError, CombatResult};

/// The result of a single-die check: one die plus flat bonuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRoll {
    /// Sides on the die that was rolled.
    pub sides: u32,
    /// The face that came up.
    pub raw: u32,
    /// Ability (or other) modifier added to the face.
    pub modifier: i32,
    /// Proficiency bonus added to the face.
    pub proficiency: i32,
    /// `raw + modifier + proficiency`.
    pub total: i32,
}

impl CheckRoll {
    /// Build a check result, computing the total.
    ///
    /// Fails if the total does not fit in an `i32`.
    pub fn new(sides: u32, raw: u32, modifier: i32, proficiency: i32) -> CombatResult<Self> {
        let total = i32::try_from(raw)
            .ok()
            .and_then(|face| face.checked_add(modifier))
            .and_then(|sum| sum.checked_add(proficiency))
            .ok_or_else(|| {
                CombatError::InvalidDice(format!(
                    "d{sides} [{raw}] {modifier:+} {proficiency:+} overflows the total"
                ))
            })?;
        Ok(Self {
            sides,
            raw,
            modifier,
            proficiency,
            total,
        })
    }

    /// True when the die showed its highest face.
    pub fn is_natural_max(&self) -> bool {
        self.raw == self.sides
    }

    /// True when the die showed a 1.
    pub fn is_natural_one(&self) -> bool {
        self.raw == 1
    }

    /// Combined flat bonus (modifier plus proficiency).
    pub fn bonus(&self) -> i32 {
        self.modifier + self.proficiency
    }

    /// True if the total meets or beats a target number.
    pub fn meets(&self, target: i32) -> bool {
        self.total >= target
    }
}

impl std::fmt::Display for CheckRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bonus = self.bonus();
        if bonus >= 0 {
            write!(f, "d{} [{}] + {} = {}", self.sides, self.raw, bonus, self.total)
        } else {
            write!(f, "d{} [{}] - {} = {}", self.sides, self.raw, -bonus, self.total)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_includes_everything() {
        let r = CheckRoll::new(20, 15, 3, 2).unwrap();
        assert_eq!(r.total, 20);
        assert_eq!(r.bonus(), 5);
        assert!(r.meets(20));
        assert!(!r.meets(21));
    }

    #[test]
    fn negative_modifier() {
        let r = CheckRoll::new(20, 4, -1, 0).unwrap();
        assert_eq!(r.total, 3);
    }

    #[test]
    fn naturals() {
        assert!(CheckRoll::new(20, 20, 0, 0).unwrap().is_natural_max());
        assert!(CheckRoll::new(20, 1, 5, 0).unwrap().is_natural_one());
        assert!(!CheckRoll::new(20, 19, 1, 0).unwrap().is_natural_max());
    }

    #[test]
    fn display() {
        assert_eq!(CheckRoll::new(20, 12, 3, 2).unwrap().to_string(), "d20 [12] + 5 = 17");
        assert_eq!(CheckRoll::new(20, 12, -2, 0).unwrap().to_string(), "d20 [12] - 2 = 10");
    }

    #[test]
    fn overflowing_total_is_rejected() {
        assert!(matches!(
            CheckRoll::new(20, 5, i32::MAX, 0),
            Err(CombatError::InvalidDice(_))
        ));
        assert!(matches!(
            CheckRoll::new(20, 5, 0, i32::MIN).map(|r| r.total),
            Ok(total) if total == i32::MIN + 5
        ));
        assert!(CheckRoll::new(u32::MAX, 3_000_000_000, 0, 0).is_err());
    }
}
