use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::passives::PassiveSpec;

/// Ability id reserved for the synthetic pass action.
pub const PASS_ABILITY_ID: &str = "pass";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AbilityKind {
    Attack,
    Defense,
    Control,
    Switch,
}

impl AbilityKind {
    /// Defense and switch actions never contest on the shared clash scale.
    pub fn contests(self) -> bool {
        matches!(self, AbilityKind::Attack | AbilityKind::Control)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DamageType {
    Force,
    Physical,
    Psychic,
    Necrotic,
    #[default]
    None,
}

/// Stance of a rotating main attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WeaponState {
    #[default]
    Scythe,
    Trident,
    Hammer,
}

impl WeaponState {
    pub fn next(self) -> WeaponState {
        match self {
            WeaponState::Scythe => WeaponState::Trident,
            WeaponState::Trident => WeaponState::Hammer,
            WeaponState::Hammer => WeaponState::Scythe,
        }
    }
}

/// Static description of one action a character can take.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Ability {
    pub id: String,
    pub name: String,
    pub kind: AbilityKind,
    #[serde(default)]
    pub damage_type: DamageType,
    /// Flat damage added to the coin count when the attack lands.
    #[serde(default)]
    pub base_attack: u32,
    /// Clash die size; 0 means no die.
    #[serde(default)]
    pub dice: u32,
    #[serde(default)]
    pub coins: u32,
    #[serde(default)]
    pub effect: Option<String>,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub weapon_state: Option<WeaponState>,
    /// One of the variants of a rotating main attack; only the variant matching the
    /// owner's weapon state is selectable.
    #[serde(default)]
    pub main_attack: bool,
    /// Combo finisher: selectable only while the opponent is grappled.
    #[serde(default)]
    pub requires_grappled_target: bool,
    #[serde(default)]
    pub releases_grapple: bool,
}

impl Ability {
    /// The "Pass/Defend" action submitted when a player passes the turn.
    pub fn pass() -> Self {
        Self {
            id: PASS_ABILITY_ID.to_string(),
            name: "Pass/Defend".to_string(),
            kind: AbilityKind::Defense,
            damage_type: DamageType::None,
            base_attack: 0,
            dice: 0,
            coins: 0,
            effect: None,
            hidden: false,
            weapon_state: None,
            main_attack: false,
            requires_grappled_target: false,
            releases_grapple: false,
        }
    }
}

fn default_level() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BaseStats {
    pub max_hp: i32,
    pub defense: i32,
    #[serde(default = "default_level")]
    pub level: u32,
    /// Free-form traits other characters' passives can test (e.g. `gender`).
    #[serde(default)]
    pub attributes: IndexMap<String, String>,
    /// Starting stance for characters with a rotating main attack.
    #[serde(default)]
    pub weapon_state: Option<WeaponState>,
}

/// One roster entry. Read-only once loaded; battles clone what they need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CharacterSpec {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub base_stats: BaseStats,
    pub passive: PassiveSpec,
    pub abilities: Vec<Ability>,
}
