//! Combat participants and the stat blocks they are built from.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::abilities::{Ability, AbilityScores, LEVEL_RANGE, SCORE_RANGE};
use crate::attack::{DamageRoll, table};
use crate::dice::CheckRoll;
use crate::error::{CombatError, CombatResult};

/// Identifier of a participant, unique within one combat session.
///
/// Ids are handed out in increasing order as participants join, so
/// ordering by id is ordering by arrival.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ParticipantId(pub u32);

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A stat block supplied by whoever is running the fight.
///
/// Collaborators build one of these from a character sheet or a monster
/// entry and hand it to the controller, which assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantSpec {
    /// Display name.
    pub name: String,
    /// True for the enemy team.
    #[serde(default)]
    pub is_enemy: bool,
    /// Fixed initiative. When absent the controller rolls d20 + DEX.
    #[serde(default)]
    pub initiative: Option<i32>,
    /// Maximum hit points (at least 1).
    pub max_hp: i32,
    /// Starting hit points; defaults to `max_hp`.
    #[serde(default)]
    pub hp: Option<i32>,
    /// Armor class, if the participant can be targeted by attack rolls.
    #[serde(default)]
    pub ac: Option<i32>,
    /// Ability scores; without them every roll is unmodified.
    #[serde(default)]
    pub ability_scores: Option<AbilityScores>,
    /// Character level, used for proficiency on the player team.
    #[serde(default)]
    pub level: Option<u32>,
    /// Id of the equipped weapon or spell in the armament table.
    #[serde(default)]
    pub equipped_weapon: Option<String>,
    /// Conditions already in effect when the participant joins.
    #[serde(default)]
    pub conditions: Vec<String>,
}

impl ParticipantSpec {
    /// Start a stat block with a name and maximum hit points.
    pub fn new(name: impl Into<String>, max_hp: i32) -> Self {
        Self {
            name: name.into(),
            is_enemy: false,
            initiative: None,
            max_hp,
            hp: None,
            ac: None,
            ability_scores: None,
            level: None,
            equipped_weapon: None,
            conditions: Vec::new(),
        }
    }

    /// Put the participant on the enemy team.
    pub fn enemy(mut self) -> Self {
        self.is_enemy = true;
        self
    }

    /// Fix the initiative instead of rolling it.
    pub fn with_initiative(mut self, initiative: i32) -> Self {
        self.initiative = Some(initiative);
        self
    }

    /// Start below full health.
    pub fn with_hp(mut self, hp: i32) -> Self {
        self.hp = Some(hp);
        self
    }

    /// Set the armor class.
    pub fn with_ac(mut self, ac: i32) -> Self {
        self.ac = Some(ac);
        self
    }

    /// Set the ability scores.
    pub fn with_abilities(mut self, scores: AbilityScores) -> Self {
        self.ability_scores = Some(scores);
        self
    }

    /// Set the character level.
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    /// Equip a weapon or spell by armament id.
    pub fn with_weapon(mut self, id: impl Into<String>) -> Self {
        self.equipped_weapon = Some(id.into());
        self
    }

    /// Start with a condition already applied.
    pub fn with_condition(mut self, name: impl Into<String>) -> Self {
        self.conditions.push(name.into());
        self
    }

    /// Check the stat block for values the engine cannot work with.
    pub fn validate(&self) -> CombatResult<()> {
        if self.name.trim().is_empty() {
            return Err(CombatError::InvalidParticipant("name is empty".to_string()));
        }
        if self.max_hp < 1 {
            return Err(CombatError::InvalidParticipant(format!(
                "{}: max hp must be at least 1, got {}",
                self.name, self.max_hp
            )));
        }
        if let Some(hp) = self.hp.filter(|hp| !(0..=self.max_hp).contains(hp)) {
            return Err(CombatError::InvalidParticipant(format!(
                "{}: hp {hp} outside 0..={}",
                self.name, self.max_hp
            )));
        }
        if let Some(level) = self.level.filter(|level| !LEVEL_RANGE.contains(level)) {
            return Err(CombatError::InvalidParticipant(format!(
                "{}: level {level} outside {}..={}",
                self.name,
                LEVEL_RANGE.start(),
                LEVEL_RANGE.end()
            )));
        }
        if let Some(scores) = &self.ability_scores {
            for ability in Ability::ALL {
                let score = scores.get(ability);
                if !SCORE_RANGE.contains(&score) {
                    return Err(CombatError::InvalidParticipant(format!(
                        "{}: {ability} score {score} outside {}..={}",
                        self.name,
                        SCORE_RANGE.start(),
                        SCORE_RANGE.end()
                    )));
                }
            }
        }
        if let Some(weapon) = &self.equipped_weapon {
            table::lookup(weapon)?;
        }
        Ok(())
    }

    /// Build the participant record under the given id.
    ///
    /// A missing initiative becomes 0; the controller rolls one before
    /// calling this.
    pub fn into_participant(self, id: ParticipantId) -> CombatParticipant {
        CombatParticipant {
            id,
            hp: self.hp.unwrap_or(self.max_hp),
            name: self.name,
            is_enemy: self.is_enemy,
            initiative: self.initiative.unwrap_or(0),
            max_hp: self.max_hp,
            ac: self.ac,
            conditions: self.conditions.into_iter().collect(),
            ability_scores: self.ability_scores,
            level: self.level,
            equipped_weapon: self.equipped_weapon,
            last_roll: None,
        }
    }
}

/// What a roll was made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RollPurpose {
    /// A to-hit roll with the equipped weapon.
    Attack,
    /// A saving throw with the given ability.
    Save {
        /// Ability the save is made with.
        ability: Ability,
    },
    /// A damage roll with the equipped weapon.
    Damage {
        /// Whether to double the damage dice.
        critical: bool,
    },
    /// An initiative roll (d20 + DEX).
    Initiative,
}

impl fmt::Display for RollPurpose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attack => write!(f, "attack"),
            Self::Save { ability } => write!(f, "{ability} save"),
            Self::Damage { critical: false } => write!(f, "damage"),
            Self::Damage { critical: true } => write!(f, "critical damage"),
            Self::Initiative => write!(f, "initiative"),
        }
    }
}

/// The most recent roll a participant made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastRoll {
    /// What the roll was for.
    pub purpose: RollPurpose,
    /// Raw die face. For damage rolls this is the dice sum.
    pub raw: i32,
    /// Flat modifier (ability modifier plus any proficiency).
    pub modifier: i32,
    /// Final result.
    pub total: i32,
    /// Natural 20 on an attack.
    pub critical: bool,
    /// Damage derived from an attack, or the damage of a damage roll.
    pub damage: Option<DamageRoll>,
}

impl LastRoll {
    /// Record a d20-style check.
    pub fn from_check(purpose: RollPurpose, check: &CheckRoll) -> Self {
        Self {
            purpose,
            raw: check.raw as i32,
            modifier: check.bonus(),
            total: check.total,
            critical: false,
            damage: None,
        }
    }

    /// Record a damage roll.
    pub fn from_damage(damage: DamageRoll) -> Self {
        Self {
            purpose: RollPurpose::Damage {
                critical: damage.is_critical,
            },
            raw: damage.dice_sum(),
            modifier: damage.bonus,
            total: damage.total,
            critical: damage.is_critical,
            damage: Some(damage),
        }
    }
}

/// A participant inside a running combat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatParticipant {
    /// Session-unique id.
    pub id: ParticipantId,
    /// Display name.
    pub name: String,
    /// True for the enemy team.
    pub is_enemy: bool,
    /// Initiative score (higher acts first).
    pub initiative: i32,
    /// Current hit points, always within `0..=max_hp`.
    pub hp: i32,
    /// Maximum hit points.
    pub max_hp: i32,
    /// Armor class, if attack rolls can target this participant.
    pub ac: Option<i32>,
    /// Status labels.
    pub conditions: BTreeSet<String>,
    /// Ability scores, if known.
    pub ability_scores: Option<AbilityScores>,
    /// Character level, if known.
    pub level: Option<u32>,
    /// Equipped weapon or spell id.
    pub equipped_weapon: Option<String>,
    /// The latest roll made through the controller.
    pub last_roll: Option<LastRoll>,
}

impl CombatParticipant {
    /// True at zero hit points.
    pub fn is_down(&self) -> bool {
        self.hp == 0
    }

    /// Fraction of hit points remaining (0.0 to 1.0).
    pub fn hp_fraction(&self) -> f64 {
        if self.max_hp <= 0 {
            return 0.0;
        }
        f64::from(self.hp) / f64::from(self.max_hp)
    }

    /// Modifier for an ability, or 0 without ability scores.
    pub fn modifier(&self, ability: Ability) -> i32 {
        self.ability_scores
            .as_ref()
            .map_or(0, |scores| scores.modifier(ability))
    }

    /// Adjust hit points by a delta, clamping to `0..=max_hp`. Returns the
    /// new value.
    pub(crate) fn adjust_hp(&mut self, delta: i32) -> i32 {
        self.hp = self.hp.saturating_add(delta).clamp(0, self.max_hp);
        self.hp
    }
}

impl fmt::Display for CombatParticipant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({}/{} HP)", self.id, self.name, self.hp, self.max_hp)
    }
}
