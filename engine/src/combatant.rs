use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::character::{Ability, CharacterSpec, WeaponState};
use crate::log::LogEvent;
use crate::passives::PassiveSpec;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusEffect {
    /// The next ATTACK against this combatant deals 0 damage.
    NegateNextHit,
    /// Opponent landed a grapple; coin count is penalized until released.
    Grappled,
}

/// Runtime record of one side of a battle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combatant {
    pub id: String,
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub defense: i32,
    /// Defense granted for the current round only; cleared at round start.
    pub round_defense_bonus: i32,
    pub statuses: Vec<StatusEffect>,
    pub consecutive_rounds: u32,
    pub last_damage_taken: i32,
    pub weapon_state: Option<WeaponState>,
    /// This combatant currently holds the opponent in a grapple.
    pub grapple_applied: bool,
    pub attributes: IndexMap<String, String>,
    pub passive: PassiveSpec,
    pub abilities: Vec<Ability>,
}

impl Combatant {
    /// Fresh combatant at full HP. Everything is cloned out of the character so two
    /// combatants built from the same character never share state.
    pub fn from_spec(spec: &CharacterSpec) -> Self {
        let stats = &spec.base_stats;
        let max_hp = stats.max_hp.max(1);
        let weapon_state = stats.weapon_state.or_else(|| {
            spec.abilities
                .iter()
                .find(|a| a.main_attack)
                .and_then(|a| a.weapon_state)
        });
        Self {
            id: spec.id.clone(),
            name: spec.name.clone(),
            hp: max_hp,
            max_hp,
            defense: stats.defense.max(0),
            round_defense_bonus: 0,
            statuses: Vec::new(),
            consecutive_rounds: 0,
            last_damage_taken: 0,
            weapon_state,
            grapple_applied: false,
            attributes: stats.attributes.clone(),
            passive: spec.passive.clone(),
            abilities: spec.abilities.clone(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn has(&self, status: StatusEffect) -> bool {
        self.statuses.contains(&status)
    }

    /// Idempotent; returns true only when the status was not already present.
    pub fn add_status(&mut self, status: StatusEffect) -> bool {
        if self.has(status) {
            return false;
        }
        self.statuses.push(status);
        true
    }

    /// Returns true if the status was present.
    pub fn remove_status(&mut self, status: StatusEffect) -> bool {
        let before = self.statuses.len();
        self.statuses.retain(|s| *s != status);
        self.statuses.len() != before
    }

    pub fn effective_defense(&self) -> i32 {
        self.defense.saturating_add(self.round_defense_bonus).max(0)
    }

    pub fn ability(&self, id: &str) -> Option<&Ability> {
        self.abilities.iter().find(|a| a.id == id)
    }

    pub fn snapshot(&self) -> CombatantSnapshot {
        CombatantSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            hp: self.hp,
            max_hp: self.max_hp,
            defense: self.effective_defense(),
            statuses: self.statuses.clone(),
            weapon_state: self.weapon_state,
            consecutive_rounds: self.consecutive_rounds,
        }
    }
}

/// What a renderer needs to draw one combatant's status panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatantSnapshot {
    pub id: String,
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub defense: i32,
    pub statuses: Vec<StatusEffect>,
    pub weapon_state: Option<WeaponState>,
    pub consecutive_rounds: u32,
}

impl CombatantSnapshot {
    pub fn hp_percent(&self) -> u32 {
        if self.max_hp <= 0 {
            return 0;
        }
        (self.hp.clamp(0, self.max_hp) * 100 / self.max_hp) as u32
    }
}

/// Subtract `dmg` from HP, clamped to 0. Returns the HP actually lost.
pub fn apply_damage(target: &mut Combatant, dmg: i32, mut log: impl FnMut(LogEvent)) -> i32 {
    let dmg = dmg.max(0);
    let before = target.hp;
    target.hp = target.hp.saturating_sub(dmg).clamp(0, target.max_hp);
    if before > 0 && target.hp == 0 {
        log(LogEvent::loss(format!("[STATE][{}] drops to 0 HP", target.name)));
    }
    before - target.hp
}

/// Restore HP, clamped to max. Returns the HP actually gained.
pub fn heal(target: &mut Combatant, amount: i32, mut log: impl FnMut(LogEvent)) -> i32 {
    if amount <= 0 {
        return 0;
    }
    let before = target.hp;
    target.hp = target.hp.saturating_add(amount).clamp(0, target.max_hp);
    log(LogEvent::win(format!(
        "[HEAL][{}] +{} HP ({} → {})",
        target.name,
        amount,
        before,
        target.hp
    )));
    target.hp - before
}
