use crate::character::{Ability, AbilityKind};
use crate::combatant::{apply_damage, Combatant, StatusEffect};
use crate::log::LogEvent;
use crate::passives::run_post_damage;
use crate::Dice;

/// Damage an ATTACK deals before any negation: base attack plus base coins minus the
/// target's defense, never below 0.
pub fn attack_damage(ability: &Ability, target: &Combatant) -> i32 {
    let raw = i64::from(ability.base_attack) + i64::from(ability.coins);
    let dmg = (raw - i64::from(target.effective_defense())).max(0);
    i32::try_from(dmg).unwrap_or(i32::MAX)
}

/// Effect of an action that won its clash.
pub fn apply_winning_effect(
    attacker: &mut Combatant,
    ability: &Ability,
    target: &mut Combatant,
    dice: &mut Dice,
    mut log: impl FnMut(LogEvent),
) {
    match ability.kind {
        AbilityKind::Attack => {
            resolve_attack(attacker, ability, target, dice, &mut log);
        }
        AbilityKind::Control => apply_grapple(attacker, target, &mut log),
        AbilityKind::Switch => cycle_stance(attacker, ability, target, &mut log),
        AbilityKind::Defense => apply_utility_effect(attacker, ability, target, &mut log),
    }
}

/// Effect that resolves whether or not the action won: only DEFENSE has one.
pub fn apply_utility_effect(
    owner: &mut Combatant,
    ability: &Ability,
    _opponent: &Combatant,
    mut log: impl FnMut(LogEvent),
) {
    if ability.kind != AbilityKind::Defense {
        return;
    }
    if owner.add_status(StatusEffect::NegateNextHit) {
        log(LogEvent::win(format!(
            "[COND][{}] is preparing to negate the next hit ({})",
            owner.name, ability.name
        )));
    }
}

pub fn resolve_attack(
    attacker: &mut Combatant,
    ability: &Ability,
    target: &mut Combatant,
    dice: &mut Dice,
    mut log: impl FnMut(LogEvent),
) -> i32 {
    let mut dmg = attack_damage(ability, target);
    if target.remove_status(StatusEffect::NegateNextHit) {
        log(LogEvent::win(format!(
            "[COND][{}] phases/braces! The attack is negated",
            target.name
        )));
        dmg = 0;
    }

    let before = target.hp;
    apply_damage(target, dmg, &mut log);
    log(LogEvent::damage(format!(
        "[DMG][{}] {} hits {} for {} ({:?}) [HP {} → {}]",
        attacker.name, ability.name, target.name, dmg, ability.damage_type, before, target.hp
    )));
    target.last_damage_taken = dmg;

    if ability.releases_grapple {
        attacker.grapple_applied = false;
        if target.remove_status(StatusEffect::Grappled) {
            log(LogEvent::special(format!(
                "[COND][{}] is released from the grapple",
                target.name
            )));
        }
    }

    run_post_damage(attacker, target, dice, &mut log);
    dmg
}

/// CONTROL: lock the target in a grapple until a release attack lands.
pub fn apply_grapple(attacker: &mut Combatant, target: &mut Combatant, mut log: impl FnMut(LogEvent)) {
    target.add_status(StatusEffect::Grappled);
    attacker.grapple_applied = true;
    log(LogEvent::special(format!(
        "[COND][{}] is Grappled by {}! Coin clash value reduced",
        target.name, attacker.name
    )));
}

/// SWITCH: fixed activation damage that ignores defense and negation, then advance
/// the actor's weapon state one step through the cycle.
pub fn cycle_stance(
    actor: &mut Combatant,
    ability: &Ability,
    opponent: &mut Combatant,
    mut log: impl FnMut(LogEvent),
) {
    let dmg = ability.base_attack as i32;
    let before = opponent.hp;
    apply_damage(opponent, dmg, &mut log);
    log(LogEvent::damage(format!(
        "[DMG][{}] {} deals {} activation damage to {} [HP {} → {}]",
        actor.name, ability.name, dmg, opponent.name, before, opponent.hp
    )));

    let next = actor.weapon_state.unwrap_or_default().next();
    actor.weapon_state = Some(next);
    log(LogEvent::special(format!(
        "[STANCE][{}] cycles to {:?}",
        actor.name, next
    )));
}
