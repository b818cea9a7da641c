//! Per-character passive rules.
//!
//! Each passive kind maps to a [`PassiveHooks`] entry. The battle pipeline calls the
//! hooks at fixed points: round start, once both actions are declared, while counting
//! clash coins, and after an attack's damage lands. Kinds that do not care about a hook
//! point use the no-op handler.

use serde::{Deserialize, Serialize};

use crate::character::{Ability, AbilityKind};
use crate::combatant::{heal, Combatant};
use crate::log::LogEvent;
use crate::Dice;

fn default_defense_bonus() -> i32 {
    2
}

fn default_trigger_die() -> u32 {
    6
}

/// Match on one of the opponent's free-form attributes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeCondition {
    pub attribute: String,
    pub equals: String,
}

impl AttributeCondition {
    pub fn matches(&self, target: &Combatant) -> bool {
        target
            .attributes
            .get(&self.attribute)
            .is_some_and(|v| v.eq_ignore_ascii_case(&self.equals))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PassiveKind {
    /// +1 coin per consecutive round fought.
    CoinScaler,
    /// Extra defense for the round whenever the opponent tries a CONTROL action.
    ///
    /// CONTROL deals no damage and the bonus is cleared at the next round start, so the
    /// only visible effect is the raised defense in that round's snapshot.
    DefenseConditional {
        #[serde(default = "default_defense_bonus")]
        defense_bonus: i32,
    },
    /// After landing an attack, roll a fresh die; on `trigger_value` heal by the
    /// damage the target just took.
    RollTrigger {
        trigger_value: u32,
        #[serde(default = "default_trigger_die")]
        die: u32,
    },
    /// Extra coins when the opponent matches `condition`.
    ConditionalCoin {
        condition: AttributeCondition,
        coin_bonus: u32,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassiveSpec {
    pub name: String,
    #[serde(default)]
    pub effect: String,
    #[serde(flatten)]
    pub kind: PassiveKind,
}

pub type LogSink<'a> = &'a mut dyn FnMut(LogEvent);

pub struct PassiveHooks {
    pub round_start: fn(&mut Combatant, LogSink<'_>),
    pub actions_declared: fn(&mut Combatant, &Ability, LogSink<'_>),
    pub clash_coins: fn(&Combatant, &Combatant, u32, LogSink<'_>) -> u32,
    pub post_damage: fn(&mut Combatant, &Combatant, &mut Dice, LogSink<'_>),
}

fn no_round_start(_: &mut Combatant, _: LogSink<'_>) {}

fn no_actions_declared(_: &mut Combatant, _: &Ability, _: LogSink<'_>) {}

fn no_clash_coins(_: &Combatant, _: &Combatant, coins: u32, _: LogSink<'_>) -> u32 {
    coins
}

fn no_post_damage(_: &mut Combatant, _: &Combatant, _: &mut Dice, _: LogSink<'_>) {}

const NO_HOOKS: PassiveHooks = PassiveHooks {
    round_start: no_round_start,
    actions_declared: no_actions_declared,
    clash_coins: no_clash_coins,
    post_damage: no_post_damage,
};

static COIN_SCALER: PassiveHooks = PassiveHooks {
    round_start: coin_scaler_round_start,
    clash_coins: coin_scaler_coins,
    ..NO_HOOKS
};

static DEFENSE_CONDITIONAL: PassiveHooks = PassiveHooks {
    actions_declared: defense_conditional_declared,
    ..NO_HOOKS
};

static ROLL_TRIGGER: PassiveHooks = PassiveHooks {
    post_damage: roll_trigger_post_damage,
    ..NO_HOOKS
};

static CONDITIONAL_COIN: PassiveHooks = PassiveHooks {
    clash_coins: conditional_coin_coins,
    ..NO_HOOKS
};

pub fn hooks_for(kind: &PassiveKind) -> &'static PassiveHooks {
    match kind {
        PassiveKind::CoinScaler => &COIN_SCALER,
        PassiveKind::DefenseConditional { .. } => &DEFENSE_CONDITIONAL,
        PassiveKind::RollTrigger { .. } => &ROLL_TRIGGER,
        PassiveKind::ConditionalCoin { .. } => &CONDITIONAL_COIN,
    }
}

pub fn run_round_start(owner: &mut Combatant, mut log: impl FnMut(LogEvent)) {
    let hooks = hooks_for(&owner.passive.kind);
    (hooks.round_start)(owner, &mut log);
}

pub fn run_actions_declared(
    owner: &mut Combatant,
    opponent_action: &Ability,
    mut log: impl FnMut(LogEvent),
) {
    let hooks = hooks_for(&owner.passive.kind);
    (hooks.actions_declared)(owner, opponent_action, &mut log);
}

/// Coin count after the owner's passive, before any debuff.
pub fn apply_clash_coins(
    actor: &Combatant,
    opponent: &Combatant,
    coins: u32,
    mut log: impl FnMut(LogEvent),
) -> u32 {
    let hooks = hooks_for(&actor.passive.kind);
    (hooks.clash_coins)(actor, opponent, coins, &mut log)
}

pub fn run_post_damage(
    attacker: &mut Combatant,
    target: &Combatant,
    dice: &mut Dice,
    mut log: impl FnMut(LogEvent),
) {
    let hooks = hooks_for(&attacker.passive.kind);
    (hooks.post_damage)(attacker, target, dice, &mut log);
}

fn coin_scaler_round_start(owner: &mut Combatant, log: LogSink<'_>) {
    owner.consecutive_rounds += 1;
    log(LogEvent::plain(format!(
        "[PASSIVE][{}] {}: coin bonus increases to +{}",
        owner.name, owner.passive.name, owner.consecutive_rounds
    )));
}

fn coin_scaler_coins(actor: &Combatant, _: &Combatant, coins: u32, _: LogSink<'_>) -> u32 {
    coins.saturating_add(actor.consecutive_rounds)
}

fn defense_conditional_declared(owner: &mut Combatant, opponent_action: &Ability, log: LogSink<'_>) {
    let PassiveKind::DefenseConditional { defense_bonus } = owner.passive.kind else {
        return;
    };
    if opponent_action.kind != AbilityKind::Control {
        return;
    }
    owner.round_defense_bonus = owner.round_defense_bonus.saturating_add(defense_bonus);
    log(LogEvent::special(format!(
        "[PASSIVE][{}] {}: defense +{} against {}",
        owner.name, owner.passive.name, defense_bonus, opponent_action.name
    )));
}

fn roll_trigger_post_damage(
    attacker: &mut Combatant,
    target: &Combatant,
    dice: &mut Dice,
    log: LogSink<'_>,
) {
    let PassiveKind::RollTrigger { trigger_value, die } = attacker.passive.kind else {
        return;
    };
    let roll = dice.die(die);
    tracing::debug!(attacker = %attacker.name, roll, trigger_value, "roll trigger check");
    if roll != trigger_value {
        return;
    }
    let amount = target.last_damage_taken;
    log(LogEvent::win(format!(
        "[PASSIVE][{}] {} (d{}:{}) heals {} HP!",
        attacker.name, attacker.passive.name, die, roll, amount
    )));
    heal(attacker, amount, &mut *log);
}

fn conditional_coin_coins(
    actor: &Combatant,
    opponent: &Combatant,
    coins: u32,
    log: LogSink<'_>,
) -> u32 {
    let PassiveKind::ConditionalCoin { condition, coin_bonus } = &actor.passive.kind else {
        return coins;
    };
    if !condition.matches(opponent) {
        return coins;
    }
    log(LogEvent::special(format!(
        "[PASSIVE][{}] activates {}! (+{} coins)",
        actor.name, actor.passive.name, coin_bonus
    )));
    coins.saturating_add(*coin_bonus)
}
