//! Attack and damage resolution.
//!
//! Everything here is computation only: rolling to hit, rolling damage,
//! and deciding hit or miss. Applying the damage to a target is a separate
//! step owned by [`CombatController`](crate::combat::CombatController), so
//! callers are free to animate or confirm a hit before hit points change.

pub mod table;

pub use table::{Armament, ArmamentKind, AttackAbility, DamageType};

use serde::{Deserialize, Serialize};

use crate::abilities::{Ability, proficiency_bonus};
use crate::combat::{CombatParticipant, ParticipantId};
use crate::config::AbilitySelection;
use crate::dice::{CheckRoll, DamageDice, DiceEngine, Die};
use crate::error::{CombatError, CombatResult};

/// An attack roll with its natural-20 and natural-1 flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackRoll {
    /// The underlying d20 check.
    pub check: CheckRoll,
    /// Natural 20: hits regardless of armor class and doubles damage dice.
    pub critical: bool,
    /// Natural 1: misses regardless of armor class.
    pub fumble: bool,
}

impl AttackRoll {
    /// Decide whether this roll hits the given armor class.
    pub fn hits(&self, armor_class: i32) -> bool {
        if self.critical {
            true
        } else if self.fumble {
            false
        } else {
            self.check.meets(armor_class)
        }
    }
}

/// A rolled damage result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageRoll {
    /// Id of the weapon or spell that dealt the damage.
    pub armament: String,
    /// The dice actually rolled (already doubled on a critical hit).
    pub dice: DamageDice,
    /// Every face rolled.
    pub dice_results: Vec<u32>,
    /// Flat ability bonus, added once.
    pub bonus: i32,
    /// Kind of damage.
    pub damage_type: DamageType,
    /// `sum(dice_results) + bonus`, never below zero.
    pub total: i32,
    /// Whether the dice were doubled for a critical hit.
    pub is_critical: bool,
}

impl DamageRoll {
    /// Sum of the dice, without the bonus.
    pub fn dice_sum(&self) -> i32 {
        sum_faces(&self.dice_results)
    }
}

fn sum_faces(faces: &[u32]) -> i32 {
    faces.iter().fold(0i32, |acc, &face| {
        acc.saturating_add(i32::try_from(face).unwrap_or(i32::MAX))
    })
}

impl std::fmt::Display for DamageRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let faces: Vec<String> = self.dice_results.iter().map(u32::to_string).collect();
        write!(f, "{} [{}]", self.dice, faces.join(", "))?;
        if self.bonus > 0 {
            write!(f, " + {}", self.bonus)?;
        } else if self.bonus < 0 {
            write!(f, " - {}", -self.bonus)?;
        }
        write!(f, " = {} {}", self.total, self.damage_type)?;
        if self.is_critical {
            write!(f, " (critical)")?;
        }
        Ok(())
    }
}

/// The full outcome of one attacker swinging at one target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackResolution {
    /// Who attacked.
    pub attacker: ParticipantId,
    /// Who was attacked.
    pub target: ParticipantId,
    /// Weapon or spell used.
    pub armament: String,
    /// The to-hit roll.
    pub attack: AttackRoll,
    /// Armor class the roll was compared against.
    pub target_ac: i32,
    /// Whether the attack landed.
    pub hit: bool,
    /// Damage rolled on a hit; `None` on a miss.
    pub damage: Option<DamageRoll>,
}

/// The ability modifier an attacker adds to attack and damage rolls.
///
/// Participants without ability scores roll unmodified dice.
pub fn attack_modifier(
    attacker: &CombatParticipant,
    armament: &Armament,
    selection: AbilitySelection,
) -> i32 {
    let Some(scores) = attacker.ability_scores.as_ref() else {
        return 0;
    };
    match selection {
        AbilitySelection::BestOfStrDex => scores.best_physical_modifier(),
        AbilitySelection::PerArmament => match armament.attack_ability {
            AttackAbility::Strength => scores.modifier(Ability::Strength),
            AttackAbility::Dexterity => scores.modifier(Ability::Dexterity),
            AttackAbility::Finesse => scores.best_physical_modifier(),
            AttackAbility::Spellcasting(ability) => scores.modifier(ability),
        },
    }
}

/// Proficiency added to an attacker's to-hit roll. Enemies get none.
pub fn attack_proficiency(attacker: &CombatParticipant) -> i32 {
    if attacker.is_enemy {
        0
    } else {
        proficiency_bonus(attacker.level.unwrap_or(1))
    }
}

/// Roll a d20 to hit with the given armament.
pub fn compute_attack_roll(
    dice: &mut DiceEngine,
    attacker: &CombatParticipant,
    armament: &Armament,
    selection: AbilitySelection,
) -> CombatResult<AttackRoll> {
    let modifier = attack_modifier(attacker, armament, selection);
    let proficiency = attack_proficiency(attacker);
    let raw = dice.roll(Die::D20);
    let check = CheckRoll::new(Die::D20.sides(), raw, modifier, proficiency)?;

    tracing::debug!(
        attacker = %attacker.id,
        armament = armament.id,
        raw,
        modifier,
        proficiency,
        total = check.total,
        "attack rolled"
    );

    Ok(AttackRoll {
        check,
        critical: check.is_natural_max(),
        fumble: check.is_natural_one(),
    })
}

/// Roll damage for the given armament.
///
/// A critical hit doubles the number of dice rolled; the ability bonus is
/// added once either way.
pub fn compute_damage_roll(
    dice: &mut DiceEngine,
    attacker: &CombatParticipant,
    armament: &Armament,
    selection: AbilitySelection,
    is_critical: bool,
) -> DamageRoll {
    let rolled = if is_critical {
        armament.dice.doubled()
    } else {
        armament.dice
    };
    let dice_results = dice.roll_pool(rolled);
    let bonus = attack_modifier(attacker, armament, selection);
    let sum = sum_faces(&dice_results);
    let total = sum.saturating_add(bonus).max(0);

    tracing::debug!(
        attacker = %attacker.id,
        armament = armament.id,
        dice = %rolled,
        sum,
        bonus,
        total,
        is_critical,
        "damage rolled"
    );

    DamageRoll {
        armament: armament.id.to_string(),
        dice: rolled,
        dice_results,
        bonus,
        damage_type: armament.damage_type,
        total,
        is_critical,
    }
}

/// Roll to hit `target` and, on a hit, roll damage. Nothing is mutated.
///
/// Fails with [`CombatError::InvalidTarget`] before any dice are rolled if
/// the target has no armor class.
pub fn resolve_attack(
    dice: &mut DiceEngine,
    attacker: &CombatParticipant,
    target: &CombatParticipant,
    armament: &Armament,
    selection: AbilitySelection,
) -> CombatResult<AttackResolution> {
    let target_ac = target.ac.ok_or(CombatError::InvalidTarget(target.id))?;

    let attack = compute_attack_roll(dice, attacker, armament, selection)?;
    let hit = attack.hits(target_ac);
    let damage =
        hit.then(|| compute_damage_roll(dice, attacker, armament, selection, attack.critical));

    tracing::debug!(
        attacker = %attacker.id,
        target = %target.id,
        total = attack.check.total,
        target_ac,
        hit,
        critical = attack.critical,
        "attack resolved"
    );

    Ok(AttackResolution {
        attacker: attacker.id,
        target: target.id,
        armament: armament.id.to_string(),
        attack,
        target_ac,
        hit,
        damage,
    })
}
