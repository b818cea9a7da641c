use crate::combat::legal::legal_actions;
use crate::combatant::Combatant;
use crate::Dice;

/// Opponent policy: take a ready combo finisher if there is one, otherwise pick
/// uniformly among the enabled legal actions. `None` when nothing is enabled.
pub fn choose_action(actor: &Combatant, opponent: &Combatant, dice: &mut Dice) -> Option<String> {
    let options: Vec<_> = legal_actions(actor, opponent)
        .into_iter()
        .filter(|a| a.enabled)
        .collect();
    if let Some(combo) = options.iter().find(|a| a.combo_ready) {
        return Some(combo.ability_id.clone());
    }
    if options.is_empty() {
        return None;
    }
    let pick = dice.index(options.len());
    Some(options[pick].ability_id.clone())
}
