use serde::{Deserialize, Serialize};

use crate::character::AbilityKind;
use crate::combatant::{Combatant, StatusEffect};

/// One entry of the control surface a UI builds for a combatant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegalAction {
    pub ability_id: String,
    pub name: String,
    pub kind: AbilityKind,
    pub enabled: bool,
    /// Combo finisher whose precondition currently holds.
    pub combo_ready: bool,
    /// The currently active variant of a rotating main attack.
    pub active_stance: bool,
}

/// Abilities `actor` may pick this round, in catalog order.
///
/// Hidden abilities are left out unless they are the active main-attack variant, and
/// inactive main-attack variants are always left out. Combo finishers stay listed but
/// disabled while the opponent is not grappled.
pub fn legal_actions(actor: &Combatant, opponent: &Combatant) -> Vec<LegalAction> {
    let target_grappled = opponent.has(StatusEffect::Grappled);
    actor
        .abilities
        .iter()
        .filter_map(|ability| {
            let active_stance = ability.main_attack && ability.weapon_state == actor.weapon_state;
            if ability.main_attack && !active_stance {
                return None;
            }
            if ability.hidden && !active_stance {
                return None;
            }
            let combo = ability.requires_grappled_target;
            Some(LegalAction {
                ability_id: ability.id.clone(),
                name: ability.name.clone(),
                kind: ability.kind,
                enabled: !combo || target_grappled,
                combo_ready: combo && target_grappled,
                active_stance,
            })
        })
        .collect()
}

/// Whether `ability_id` is listed and enabled for `actor` right now.
pub fn is_selectable(actor: &Combatant, opponent: &Combatant, ability_id: &str) -> bool {
    legal_actions(actor, opponent)
        .iter()
        .any(|a| a.ability_id == ability_id && a.enabled)
}
