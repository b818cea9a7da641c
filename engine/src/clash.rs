use serde::{Deserialize, Serialize};

use crate::character::Ability;
use crate::combatant::{Combatant, StatusEffect};
use crate::log::LogEvent;
use crate::passives::apply_clash_coins;
use crate::Dice;

/// Flat amount every contested clash starts from.
pub const CLASH_BASE: i32 = 5;
/// Coins lost while grappled.
pub const GRAPPLE_COIN_PENALTY: u32 = 2;

/// How one side's clash value was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClashRoll {
    pub value: i32,
    /// False for DEFENSE/SWITCH actions, whose value is a plain d100.
    pub contested: bool,
    pub die_roll: u32,
    pub coins: u32,
    pub heads: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClashOutcome {
    FirstWins,
    SecondWins,
    Tie,
}

/// Higher value wins; equal values tie.
pub fn arbitrate(first: i32, second: i32) -> ClashOutcome {
    if first > second {
        ClashOutcome::FirstWins
    } else if second > first {
        ClashOutcome::SecondWins
    } else {
        ClashOutcome::Tie
    }
}

/// Coins the actor flips for `ability`: base coins, then the actor's passive, then the
/// grapple penalty (floored at 0).
pub fn effective_coins(
    actor: &Combatant,
    ability: &Ability,
    opponent: &Combatant,
    mut log: impl FnMut(LogEvent),
) -> u32 {
    let mut coins = apply_clash_coins(actor, opponent, ability.coins, &mut log);
    if actor.has(StatusEffect::Grappled) {
        coins = coins.saturating_sub(GRAPPLE_COIN_PENALTY);
        log(LogEvent::loss(format!(
            "[CLASH][{}] is Grappled! -{} coins",
            actor.name, GRAPPLE_COIN_PENALTY
        )));
    }
    coins
}

pub fn flip_coins(dice: &mut Dice, coins: u32) -> u32 {
    (0..coins).map(|_| dice.coin()).sum()
}

pub fn compute_clash(
    actor: &Combatant,
    ability: &Ability,
    opponent: &Combatant,
    dice: &mut Dice,
    mut log: impl FnMut(LogEvent),
) -> ClashRoll {
    if !ability.kind.contests() {
        let value = dice.d100() as i32;
        log(LogEvent::plain(format!(
            "[CLASH][{}] {} does not contest: d100={}",
            actor.name, ability.name, value
        )));
        return ClashRoll { value, contested: false, die_roll: 0, coins: 0, heads: 0 };
    }

    let die_roll = dice.die(ability.dice);
    let coins = effective_coins(actor, ability, opponent, &mut log);
    let heads = flip_coins(dice, coins);
    let value = CLASH_BASE
        .saturating_add(i32::try_from(die_roll).unwrap_or(i32::MAX))
        .saturating_add(i32::try_from(heads).unwrap_or(i32::MAX));
    log(LogEvent::plain(format!(
        "[CLASH][{}] rolls d{} ({}) and flips {} coins ({} wins) → {}",
        actor.name, ability.dice, die_roll, coins, heads, value
    )));
    tracing::debug!(actor = %actor.name, ability = %ability.id, die_roll, coins, heads, value, "clash");
    ClashRoll { value, contested: true, die_roll, coins, heads }
}
