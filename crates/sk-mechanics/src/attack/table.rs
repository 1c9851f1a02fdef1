//! The armament table: every weapon and attack spell the resolver knows.
//!
//! This is the single source of damage dice and damage types. Ids are
//! matched case-insensitively.

use serde::{Deserialize, Serialize};

use crate::abilities::Ability;
use crate::dice::{DamageDice, Die};
use crate::error::{CombatError, CombatResult};

use self::AttackAbility::{Dexterity, Finesse, Strength};
use self::DamageType::{
    Bludgeoning, Cold, Fire, Force, Lightning, Necrotic, Piercing, Radiant, Slashing,
};

/// Id of the entry used when a participant has nothing equipped.
pub const UNARMED: &str = "unarmed";

/// Kind of damage dealt by an armament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageType {
    /// Corrosive liquids.
    Acid,
    /// Blunt force: clubs, falls, fists.
    Bludgeoning,
    /// Freezing cold.
    Cold,
    /// Flames and heat.
    Fire,
    /// Pure magical energy.
    Force,
    /// Electricity.
    Lightning,
    /// Life-draining energy.
    Necrotic,
    /// Puncturing attacks: arrows, spears, bites.
    Piercing,
    /// Venom and toxic gas.
    Poison,
    /// Mental assault.
    Psychic,
    /// Searing holy light.
    Radiant,
    /// Cuts from blades and claws.
    Slashing,
    /// Concussive sound.
    Thunder,
}

impl std::fmt::Display for DamageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Acid => "acid",
            Self::Bludgeoning => "bludgeoning",
            Self::Cold => "cold",
            Self::Fire => "fire",
            Self::Force => "force",
            Self::Lightning => "lightning",
            Self::Necrotic => "necrotic",
            Self::Piercing => "piercing",
            Self::Poison => "poison",
            Self::Psychic => "psychic",
            Self::Radiant => "radiant",
            Self::Slashing => "slashing",
            Self::Thunder => "thunder",
        };
        write!(f, "{name}")
    }
}

/// Whether an armament is a weapon or a spell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmamentKind {
    /// A melee or ranged weapon.
    Weapon,
    /// An attack spell or cantrip.
    Spell,
}

/// Which ability an armament attacks with when per-armament selection is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackAbility {
    /// Always Strength.
    Strength,
    /// Always Dexterity.
    Dexterity,
    /// The better of Strength and Dexterity.
    Finesse,
    /// A fixed casting ability.
    Spellcasting(Ability),
}

impl std::fmt::Display for AttackAbility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Strength => write!(f, "STR"),
            Self::Dexterity => write!(f, "DEX"),
            Self::Finesse => write!(f, "STR/DEX"),
            Self::Spellcasting(ability) => write!(f, "{ability}"),
        }
    }
}

/// A weapon or spell entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Armament {
    /// Lookup key (lowercase, underscores).
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Weapon or spell.
    pub kind: ArmamentKind,
    /// Damage dice rolled on a hit.
    pub dice: DamageDice,
    /// Damage type dealt.
    pub damage_type: DamageType,
    /// Ability rule used under per-armament selection.
    pub attack_ability: AttackAbility,
}

const fn weapon(
    id: &'static str,
    name: &'static str,
    count: u32,
    die: Die,
    damage_type: DamageType,
    attack_ability: AttackAbility,
) -> Armament {
    Armament {
        id,
        name,
        kind: ArmamentKind::Weapon,
        dice: DamageDice::new(count, die),
        damage_type,
        attack_ability,
    }
}

const fn spell(
    id: &'static str,
    name: &'static str,
    count: u32,
    die: Die,
    damage_type: DamageType,
    casting: Ability,
) -> Armament {
    Armament {
        id,
        name,
        kind: ArmamentKind::Spell,
        dice: DamageDice::new(count, die),
        damage_type,
        attack_ability: AttackAbility::Spellcasting(casting),
    }
}

static ARMAMENTS: &[Armament] = &[
    weapon(UNARMED, "Unarmed Strike", 1, Die::D4, Bludgeoning, Strength),
    // Simple melee
    weapon("club", "Club", 1, Die::D4, Bludgeoning, Strength),
    weapon("dagger", "Dagger", 1, Die::D4, Piercing, Finesse),
    weapon("greatclub", "Greatclub", 1, Die::D8, Bludgeoning, Strength),
    weapon("handaxe", "Handaxe", 1, Die::D6, Slashing, Strength),
    weapon("javelin", "Javelin", 1, Die::D6, Piercing, Strength),
    weapon("mace", "Mace", 1, Die::D6, Bludgeoning, Strength),
    weapon("quarterstaff", "Quarterstaff", 1, Die::D6, Bludgeoning, Strength),
    weapon("spear", "Spear", 1, Die::D6, Piercing, Strength),
    // Simple ranged
    weapon("light_crossbow", "Light Crossbow", 1, Die::D8, Piercing, Dexterity),
    weapon("shortbow", "Shortbow", 1, Die::D6, Piercing, Dexterity),
    weapon("sling", "Sling", 1, Die::D4, Bludgeoning, Dexterity),
    // Martial melee
    weapon("battleaxe", "Battleaxe", 1, Die::D8, Slashing, Strength),
    weapon("greataxe", "Greataxe", 1, Die::D12, Slashing, Strength),
    weapon("greatsword", "Greatsword", 2, Die::D6, Slashing, Strength),
    weapon("longsword", "Longsword", 1, Die::D8, Slashing, Strength),
    weapon("maul", "Maul", 2, Die::D6, Bludgeoning, Strength),
    weapon("morningstar", "Morningstar", 1, Die::D8, Piercing, Strength),
    weapon("rapier", "Rapier", 1, Die::D8, Piercing, Finesse),
    weapon("scimitar", "Scimitar", 1, Die::D6, Slashing, Finesse),
    weapon("shortsword", "Shortsword", 1, Die::D6, Piercing, Finesse),
    weapon("warhammer", "Warhammer", 1, Die::D8, Bludgeoning, Strength),
    // Martial ranged
    weapon("hand_crossbow", "Hand Crossbow", 1, Die::D6, Piercing, Dexterity),
    weapon("heavy_crossbow", "Heavy Crossbow", 1, Die::D10, Piercing, Dexterity),
    weapon("longbow", "Longbow", 1, Die::D8, Piercing, Dexterity),
    // Spells
    spell("chill_touch", "Chill Touch", 1, Die::D8, Necrotic, Ability::Intelligence),
    spell("eldritch_blast", "Eldritch Blast", 1, Die::D10, Force, Ability::Charisma),
    spell("fire_bolt", "Fire Bolt", 1, Die::D10, Fire, Ability::Intelligence),
    spell("guiding_bolt", "Guiding Bolt", 4, Die::D6, Radiant, Ability::Wisdom),
    spell("inflict_wounds", "Inflict Wounds", 3, Die::D10, Necrotic, Ability::Wisdom),
    spell("ray_of_frost", "Ray of Frost", 1, Die::D8, Cold, Ability::Intelligence),
    spell("scorching_ray", "Scorching Ray", 2, Die::D6, Fire, Ability::Intelligence),
    spell("shocking_grasp", "Shocking Grasp", 1, Die::D8, Lightning, Ability::Intelligence),
];

/// Every entry in the table, in display order.
pub fn all() -> &'static [Armament] {
    ARMAMENTS
}

/// Look up an armament by id, ignoring case and surrounding whitespace.
/// Spaces and hyphens are treated as underscores.
pub fn lookup(id: &str) -> CombatResult<&'static Armament> {
    let key = normalize(id);
    ARMAMENTS
        .iter()
        .find(|a| a.id == key)
        .ok_or_else(|| CombatError::UnknownArmament(id.to_string()))
}

fn normalize(id: &str) -> String {
    id.trim()
        .to_lowercase()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}
