#![allow(dead_code)]

use clash_engine::character::{Ability, AbilityKind, BaseStats, CharacterSpec, DamageType};
use clash_engine::content::{builtin_roster, find_character};
use clash_engine::passives::{PassiveKind, PassiveSpec};
use clash_engine::Combatant;

pub fn ability(id: &str, kind: AbilityKind, base_attack: u32, dice: u32, coins: u32) -> Ability {
    Ability {
        id: id.to_string(),
        name: id.to_string(),
        kind,
        damage_type: DamageType::Physical,
        base_attack,
        dice,
        coins,
        effect: None,
        hidden: false,
        weapon_state: None,
        main_attack: false,
        requires_grappled_target: false,
        releases_grapple: false,
    }
}

/// A passive that never fires unless the opponent picks a CONTROL action.
pub fn inert_passive() -> PassiveKind {
    PassiveKind::DefenseConditional { defense_bonus: 0 }
}

pub fn character(
    id: &str,
    max_hp: i32,
    defense: i32,
    passive: PassiveKind,
    abilities: Vec<Ability>,
) -> CharacterSpec {
    CharacterSpec {
        id: id.to_string(),
        name: id.to_string(),
        description: String::new(),
        base_stats: BaseStats {
            max_hp,
            defense,
            level: 1,
            attributes: Default::default(),
            weapon_state: None,
        },
        passive: PassiveSpec {
            name: format!("{id} passive"),
            effect: String::new(),
            kind: passive,
        },
        abilities,
    }
}

pub fn fighter(id: &str, max_hp: i32, defense: i32, abilities: Vec<Ability>) -> Combatant {
    Combatant::from_spec(&character(id, max_hp, defense, inert_passive(), abilities))
}

pub fn builtin(id: &str) -> CharacterSpec {
    let roster = builtin_roster().expect("built-in roster");
    find_character(&roster, id).expect("built-in character").clone()
}

pub fn builtin_combatant(id: &str) -> Combatant {
    Combatant::from_spec(&builtin(id))
}
