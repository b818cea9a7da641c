//! Battle session: owns both combatants and the dice, and sequences rounds.
//!
//! A round starts in [`BattlePhase::AwaitingActions`] with the round-start passives
//! already applied. Once both sides have declared, [`Battle::resolve_round`] computes
//! both clash values, applies the winner's effect and any utility effects, then either
//! ends the battle or opens the next round.

use serde::{Deserialize, Serialize};

use crate::character::{Ability, AbilityKind, CharacterSpec};
use crate::clash::{arbitrate, compute_clash, ClashOutcome, ClashRoll};
use crate::combat::actions::{apply_utility_effect, apply_winning_effect};
use crate::combat::ai::choose_action;
use crate::combat::legal::{legal_actions, LegalAction};
use crate::combatant::{Combatant, CombatantSnapshot};
use crate::log::LogEvent;
use crate::passives::{run_actions_declared, run_round_start};
use crate::Dice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BattlePhase {
    AwaitingActions,
    Resolving,
    Ended,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleEnd {
    pub winner: Side,
    pub winner_name: String,
    pub rounds: u32,
}

/// Why a submitted action was not accepted. The battle state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionRejected {
    #[error("the battle is over")]
    BattleOver,
    #[error("an action is already pending for this round")]
    ActionPending,
    #[error("unknown ability '{0}'")]
    UnknownAbility(String),
    #[error("ability '{0}' is not available right now")]
    Unavailable(String),
    #[error("{0} has no legal action")]
    NoLegalAction(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoundError {
    #[error("round {round} cannot resolve: missing action for {missing:?}")]
    MissingActions { round: u32, missing: Vec<Side> },
    #[error("the battle is over")]
    BattleOver,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error(transparent)]
    Rejected(#[from] ActionRejected),
    #[error(transparent)]
    Round(#[from] RoundError),
}

/// Everything a renderer needs after one resolved round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundReport {
    pub round: u32,
    pub player_action: String,
    pub enemy_action: String,
    pub player_clash: ClashRoll,
    pub enemy_clash: ClashRoll,
    pub outcome: ClashOutcome,
    pub player: CombatantSnapshot,
    pub enemy: CombatantSnapshot,
    /// Log lines for this round, from its start passives through resolution.
    pub events: Vec<LogEvent>,
    pub end: Option<BattleEnd>,
}

pub struct Battle {
    player: Combatant,
    enemy: Combatant,
    dice: Dice,
    round: u32,
    phase: BattlePhase,
    player_action: Option<Ability>,
    enemy_action: Option<Ability>,
    events: Vec<LogEvent>,
    round_log_start: usize,
    end: Option<BattleEnd>,
}

impl Battle {
    pub fn new(player: &CharacterSpec, enemy: &CharacterSpec, dice: Dice) -> Self {
        Self::from_combatants(Combatant::from_spec(player), Combatant::from_spec(enemy), dice)
    }

    /// Start a battle from prepared combatants and open round 1.
    pub fn from_combatants(player: Combatant, enemy: Combatant, dice: Dice) -> Self {
        let mut battle = Self {
            player,
            enemy,
            dice,
            round: 1,
            phase: BattlePhase::AwaitingActions,
            player_action: None,
            enemy_action: None,
            events: Vec::new(),
            round_log_start: 0,
            end: None,
        };
        battle.events.push(LogEvent::special("--- COMBAT START ---"));
        battle.events.push(LogEvent::plain(format!(
            "{} enters combat with {}!",
            battle.player.name, battle.enemy.name
        )));
        tracing::debug!(player = %battle.player.id, enemy = %battle.enemy.id, "battle started");
        battle.start_round();
        battle
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn end(&self) -> Option<&BattleEnd> {
        self.end.as_ref()
    }

    pub fn is_over(&self) -> bool {
        self.phase == BattlePhase::Ended
    }

    /// The full chronological log since the battle began.
    pub fn events(&self) -> &[LogEvent] {
        &self.events
    }

    pub fn combatant(&self, side: Side) -> &Combatant {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    /// Direct access for scenario setup and tooling; the engine re-checks state on
    /// every submission and resolution.
    pub fn combatant_mut(&mut self, side: Side) -> &mut Combatant {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    pub fn snapshot(&self, side: Side) -> CombatantSnapshot {
        self.combatant(side).snapshot()
    }

    pub fn pending_action(&self, side: Side) -> Option<&Ability> {
        match side {
            Side::Player => self.player_action.as_ref(),
            Side::Enemy => self.enemy_action.as_ref(),
        }
    }

    /// Legal actions for `side`. Everything is disabled once that side has declared
    /// for the round or the battle is over.
    pub fn legal_actions(&self, side: Side) -> Vec<LegalAction> {
        let actor = self.combatant(side);
        let opponent = self.combatant(side.opponent());
        let locked = self.pending_action(side).is_some() || !self.accepts_input();
        let mut actions = legal_actions(actor, opponent);
        if locked {
            for action in &mut actions {
                action.enabled = false;
            }
        }
        actions
    }

    /// Let the built-in opponent policy pick an action for `side`.
    pub fn auto_action(&mut self, side: Side) -> Option<String> {
        let (actor, opponent) = match side {
            Side::Player => (&self.player, &self.enemy),
            Side::Enemy => (&self.enemy, &self.player),
        };
        choose_action(actor, opponent, &mut self.dice)
    }

    /// Declare the opponent's action for this round ahead of the player's.
    pub fn submit_opponent_action(&mut self, ability_id: &str) -> Result<(), ActionRejected> {
        let ability = self.validate(Side::Enemy, ability_id)?;
        self.declare(Side::Enemy, ability);
        Ok(())
    }

    /// Declare the player's action. If the opponent has not declared yet, the
    /// built-in policy picks for it.
    pub fn submit_player_action(&mut self, ability_id: &str) -> Result<(), ActionRejected> {
        let ability = self.validate(Side::Player, ability_id)?;
        self.declare_player(ability)
    }

    /// Pass the turn: the player braces with the synthetic "Pass/Defend" action.
    pub fn pass_turn(&mut self) -> Result<(), ActionRejected> {
        self.check_open(Side::Player)?;
        self.declare_player(Ability::pass())
    }

    /// Submit the player's action and resolve the round in one call.
    pub fn play_round(&mut self, ability_id: &str) -> Result<RoundReport, BattleError> {
        self.submit_player_action(ability_id)?;
        Ok(self.resolve_round()?)
    }

    pub fn resolve_round(&mut self) -> Result<RoundReport, RoundError> {
        if self.is_over() {
            return Err(RoundError::BattleOver);
        }
        let (Some(player_action), Some(enemy_action)) =
            (self.player_action.clone(), self.enemy_action.clone())
        else {
            let mut missing = Vec::new();
            if self.player_action.is_none() {
                missing.push(Side::Player);
            }
            if self.enemy_action.is_none() {
                missing.push(Side::Enemy);
            }
            tracing::error!(round = self.round, ?missing, "resolution requested with missing actions");
            self.events.push(LogEvent::loss(format!(
                "Error: actions missing for round {}",
                self.round
            )));
            return Err(RoundError::MissingActions { round: self.round, missing });
        };

        self.phase = BattlePhase::Resolving;
        let round = self.round;
        let Battle { player, enemy, dice, events, .. } = self;
        let mut log = |e: LogEvent| events.push(e);

        log(LogEvent::special(format!("--- Round {} Clash ---", round)));
        run_actions_declared(player, &enemy_action, &mut log);
        run_actions_declared(enemy, &player_action, &mut log);

        let player_clash = compute_clash(player, &player_action, enemy, dice, &mut log);
        let enemy_clash = compute_clash(enemy, &enemy_action, player, dice, &mut log);
        log(LogEvent::plain(format!("{} Clash Value: {}", player.name, player_clash.value)));
        log(LogEvent::plain(format!("{} Clash Value: {}", enemy.name, enemy_clash.value)));

        let outcome = arbitrate(player_clash.value, enemy_clash.value);
        match outcome {
            ClashOutcome::FirstWins => {
                resolve_decided(player, &player_action, enemy, &enemy_action, dice, &mut log)
            }
            ClashOutcome::SecondWins => {
                resolve_decided(enemy, &enemy_action, player, &player_action, dice, &mut log)
            }
            ClashOutcome::Tie => {
                log(LogEvent::plain("Clash Tie! No damage dealt."));
                apply_utility_effect(player, &player_action, enemy, &mut log);
                apply_utility_effect(enemy, &enemy_action, player, &mut log);
            }
        }

        // Player is checked first: a simultaneous KO goes to the enemy.
        let winner = if !self.player.is_alive() {
            Some(Side::Enemy)
        } else if !self.enemy.is_alive() {
            Some(Side::Player)
        } else {
            None
        };
        if let Some(winner) = winner {
            self.finish(winner);
        }

        let report = RoundReport {
            round,
            player_action: player_action.id.clone(),
            enemy_action: enemy_action.id.clone(),
            player_clash,
            enemy_clash,
            outcome,
            player: self.player.snapshot(),
            enemy: self.enemy.snapshot(),
            events: self.events[self.round_log_start..].to_vec(),
            end: self.end.clone(),
        };

        if !self.is_over() {
            self.round += 1;
            self.start_round();
        }
        Ok(report)
    }

    fn start_round(&mut self) {
        self.phase = BattlePhase::AwaitingActions;
        self.player_action = None;
        self.enemy_action = None;
        self.round_log_start = self.events.len();
        self.player.round_defense_bonus = 0;
        self.enemy.round_defense_bonus = 0;

        let Battle { player, enemy, events, .. } = self;
        run_round_start(player, |e| events.push(e));
        run_round_start(enemy, |e| events.push(e));
    }

    fn finish(&mut self, winner: Side) {
        let winner_name = self.combatant(winner).name.clone();
        self.phase = BattlePhase::Ended;
        self.player_action = None;
        self.enemy_action = None;
        self.events.push(LogEvent::special("--- GAME OVER ---"));
        match winner {
            Side::Player => self
                .events
                .push(LogEvent::win(format!("{} is victorious!", winner_name))),
            Side::Enemy => self
                .events
                .push(LogEvent::loss(format!("{} has defeated you.", winner_name))),
        }
        tracing::info!(winner = %winner_name, rounds = self.round, "battle ended");
        self.end = Some(BattleEnd { winner, winner_name, rounds: self.round });
    }

    fn accepts_input(&self) -> bool {
        !self.is_over() && self.player.is_alive() && self.enemy.is_alive()
    }

    fn check_open(&self, side: Side) -> Result<(), ActionRejected> {
        if !self.accepts_input() {
            return Err(ActionRejected::BattleOver);
        }
        if self.pending_action(side).is_some() {
            return Err(ActionRejected::ActionPending);
        }
        Ok(())
    }

    fn validate(&self, side: Side, ability_id: &str) -> Result<Ability, ActionRejected> {
        let result = self.check_open(side).and_then(|()| {
            let actor = self.combatant(side);
            let ability = actor
                .ability(ability_id)
                .ok_or_else(|| ActionRejected::UnknownAbility(ability_id.to_string()))?;
            let listed = self
                .legal_actions(side)
                .iter()
                .any(|a| a.ability_id == ability_id && a.enabled);
            if !listed {
                return Err(ActionRejected::Unavailable(ability_id.to_string()));
            }
            Ok(ability.clone())
        });
        if let Err(e) = &result {
            tracing::debug!(?side, ability_id, error = %e, "action rejected");
        }
        result
    }

    fn declare(&mut self, side: Side, ability: Ability) {
        let name = self.combatant(side).name.clone();
        self.events
            .push(LogEvent::plain(format!("{} chooses {}.", name, ability.name)));
        tracing::debug!(?side, ability = %ability.id, round = self.round, "action declared");
        match side {
            Side::Player => self.player_action = Some(ability),
            Side::Enemy => self.enemy_action = Some(ability),
        }
    }

    fn declare_player(&mut self, ability: Ability) -> Result<(), ActionRejected> {
        if self.enemy_action.is_none() {
            let pick = choose_action(&self.enemy, &self.player, &mut self.dice)
                .ok_or_else(|| ActionRejected::NoLegalAction(self.enemy.name.clone()))?;
            let enemy_ability = self
                .enemy
                .ability(&pick)
                .cloned()
                .ok_or_else(|| ActionRejected::UnknownAbility(pick.clone()))?;
            self.declare(Side::Player, ability);
            self.declare(Side::Enemy, enemy_ability);
        } else {
            self.declare(Side::Player, ability);
        }
        Ok(())
    }
}

/// Winner's effect first, then the loser's action if both are still standing: a
/// SWITCH resolves in full, a DEFENSE still primes its negation.
fn resolve_decided(
    winner: &mut Combatant,
    winner_action: &Ability,
    loser: &mut Combatant,
    loser_action: &Ability,
    dice: &mut Dice,
    log: &mut impl FnMut(LogEvent),
) {
    apply_winning_effect(winner, winner_action, loser, dice, &mut *log);
    if !winner.is_alive() || !loser.is_alive() {
        return;
    }
    match loser_action.kind {
        AbilityKind::Switch => apply_winning_effect(loser, loser_action, winner, dice, &mut *log),
        _ => apply_utility_effect(loser, loser_action, winner, &mut *log),
    }
}
