//! Status conditions attached to participants.
//!
//! Conditions are opaque labels ("poisoned", "prone", ...). The engine
//! stores them and reports them; it never derives any rule effect from
//! their names.

use crate::combat::CombatParticipant;

/// Add a condition. Returns true if it was not already present.
pub fn add_condition(participant: &mut CombatParticipant, name: &str) -> bool {
    if participant.conditions.contains(name) {
        return false;
    }
    participant.conditions.insert(name.to_string())
}

/// Remove a condition. Returns true if it was present.
pub fn remove_condition(participant: &mut CombatParticipant, name: &str) -> bool {
    participant.conditions.remove(name)
}
