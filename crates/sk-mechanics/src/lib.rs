//! Turn-based combat engine for d20 tabletop encounters.
//!
//! Provides dice rolling with injectable randomness, attack and damage
//! resolution against a table of weapons and spells, status conditions,
//! initiative ordering, and a [`CombatController`] that owns one combat
//! session at a time.

pub mod abilities;
pub mod attack;
pub mod combat;
pub mod conditions;
pub mod config;
pub mod dice;
pub mod error;

pub use abilities::{Ability, AbilityScores};
pub use attack::table::{Armament, ArmamentKind, DamageType};
pub use attack::{AttackResolution, AttackRoll, DamageRoll};
pub use combat::{
    CombatController, CombatEvent, CombatEventKind, CombatParticipant, CombatState, CombatStatus,
    LastRoll, ParticipantId, ParticipantSpec, RollPurpose, TurnChange,
};
pub use config::{AbilitySelection, CombatConfig};
pub use dice::{CheckRoll, DamageDice, DiceEngine, DiceSource, Die, ScriptedDice, SeededDice};
pub use error::{CombatError, CombatResult};
