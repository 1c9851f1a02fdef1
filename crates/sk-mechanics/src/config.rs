//! Configuration for a combat controller.

use serde::{Deserialize, Serialize};

/// How the attack ability is chosen for weapon and spell attacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbilitySelection {
    /// Always use the better of Strength and Dexterity.
    #[default]
    BestOfStrDex,
    /// Use each armament's own ability rule.
    PerArmament,
}

/// Configuration for a combat controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// RNG seed for the default dice source.
    pub seed: u64,
    /// Attack ability selection rule.
    pub ability_selection: AbilitySelection,
    /// Maximum combat log size (oldest events dropped when exceeded). 0 = unlimited.
    pub max_log_events: usize,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            ability_selection: AbilitySelection::BestOfStrDex,
            max_log_events: 0,
        }
    }
}

impl CombatConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the attack ability selection rule.
    pub fn with_ability_selection(mut self, selection: AbilitySelection) -> Self {
        self.ability_selection = selection;
        self
    }

    /// Set the maximum combat log size (0 = unlimited).
    pub fn with_max_log_events(mut self, max: usize) -> Self {
        self.max_log_events = max;
        self
    }
}
