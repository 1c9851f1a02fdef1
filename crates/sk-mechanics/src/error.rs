//! Error types for the combat engine.

use crate::combat::ParticipantId;

/// Errors that can occur during combat operations.
///
/// Every operation validates before it mutates, so an `Err` always leaves
/// the combat session exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CombatError {
    /// No participant with this id exists in the current session.
    #[error("participant {0} not found")]
    NotFound(ParticipantId),

    /// The operation is not valid in the controller's current state.
    #[error("cannot {operation} while {state}")]
    InvalidState {
        /// The operation that was attempted.
        operation: &'static str,
        /// The state the controller was in.
        state: &'static str,
    },

    /// Damage and healing amounts must be strictly positive.
    #[error("amount must be positive, got {0}")]
    InvalidAmount(i32),

    /// The attack target has no armor class to roll against.
    #[error("participant {0} has no armor class")]
    InvalidTarget(ParticipantId),

    /// Combat is running but nobody is left to take a turn.
    #[error("no active participant")]
    NoActiveParticipant,

    /// A weapon or spell id is missing from the armament table.
    #[error("unknown weapon or spell: {0}")]
    UnknownArmament(String),

    /// A participant stat block failed validation.
    #[error("invalid participant: {0}")]
    InvalidParticipant(String),

    /// A die size or dice notation could not be used.
    #[error("invalid dice: {0}")]
    InvalidDice(String),
}

/// Convenience result type for combat operations.
pub type CombatResult<T> = Result<T, CombatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            CombatError::NotFound(ParticipantId(7)).to_string(),
            "participant #7 not found"
        );
        assert_eq!(
            CombatError::InvalidState {
                operation: "start combat",
                state: "in combat",
            }
            .to_string(),
            "cannot start combat while in combat"
        );
        assert_eq!(
            CombatError::InvalidAmount(-5).to_string(),
            "amount must be positive, got -5"
        );
        assert_eq!(
            CombatError::UnknownArmament("spork".to_string()).to_string(),
            "unknown weapon or spell: spork"
        );
    }
}
