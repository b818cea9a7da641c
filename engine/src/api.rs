//! Headless duels: both sides driven by the built-in action policy.

use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::battle::{Battle, Side};
use crate::character::CharacterSpec;
use crate::content::{find_character, pick_opponent, roster_or_builtin};
use crate::log::LogEvent;
use crate::Dice;

/// Safety cap; a duel still running after this many rounds is a draw.
pub const MAX_ROUNDS: u32 = 100;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DuelConfig {
    pub player: String,
    /// Random different character when omitted.
    #[serde(default)]
    pub enemy: Option<String>,
    /// Built-in roster when omitted.
    #[serde(default)]
    pub roster_path: Option<String>,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub max_rounds: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DuelResult {
    /// "player", "enemy" or "draw".
    pub winner: String,
    pub player: String,
    pub enemy: String,
    pub rounds: u32,
    pub player_hp_end: i32,
    pub enemy_hp_end: i32,
    pub log: Vec<LogEvent>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DuelStats {
    pub samples: u32,
    pub player_wins: u32,
    pub enemy_wins: u32,
    pub draws: u32,
    pub avg_rounds: f64,
    pub median_rounds: u32,
    /// Mean player HP left over the duels the player won.
    pub avg_player_hp_on_wins: f64,
}

fn config_roster(cfg: &DuelConfig) -> Result<Vec<CharacterSpec>> {
    roster_or_builtin(cfg.roster_path.as_deref().map(Path::new))
}

/// Load the roster named by `cfg` and run one duel.
pub fn simulate_duel(cfg: DuelConfig) -> Result<DuelResult> {
    let roster = config_roster(&cfg)?;
    simulate_duel_with(&roster, &cfg)
}

/// One duel against an already loaded roster; `cfg.roster_path` is ignored.
pub fn simulate_duel_with(roster: &[CharacterSpec], cfg: &DuelConfig) -> Result<DuelResult> {
    let mut dice = Dice::from_seed(cfg.seed);

    let player = find_character(roster, &cfg.player)
        .ok_or_else(|| anyhow!("character '{}' not found", cfg.player))?;
    let enemy = match cfg.enemy.as_deref() {
        Some(id) => {
            find_character(roster, id).ok_or_else(|| anyhow!("character '{}' not found", id))?
        }
        None => pick_opponent(roster, &player.id, &mut dice)
            .ok_or_else(|| anyhow!("roster has no opponent for '{}'", player.id))?,
    };

    let max_rounds = cfg.max_rounds.unwrap_or(MAX_ROUNDS);
    let mut battle = Battle::new(player, enemy, dice);
    while !battle.is_over() && battle.round() <= max_rounds {
        let pick = battle
            .auto_action(Side::Player)
            .ok_or_else(|| anyhow!("{} has no legal action", player.name))?;
        battle
            .play_round(&pick)
            .with_context(|| format!("round {} failed", battle.round()))?;
    }

    let winner = match battle.end() {
        Some(end) => match end.winner {
            Side::Player => "player",
            Side::Enemy => "enemy",
        },
        None => "draw",
    };
    let rounds = battle.end().map_or(max_rounds, |e| e.rounds);

    Ok(DuelResult {
        winner: winner.to_string(),
        player: player.name.clone(),
        enemy: enemy.name.clone(),
        rounds,
        player_hp_end: battle.combatant(Side::Player).hp,
        enemy_hp_end: battle.combatant(Side::Enemy).hp,
        log: battle.events().to_vec(),
    })
}

/// Run `samples` duels, trial `i` seeded with `seed + i`. The roster is loaded once.
pub fn simulate_duel_many(cfg: DuelConfig, samples: u32) -> Result<DuelStats> {
    let roster = config_roster(&cfg)?;
    simulate_duel_many_with(&roster, &cfg, samples)
}

pub fn simulate_duel_many_with(
    roster: &[CharacterSpec],
    cfg: &DuelConfig,
    samples: u32,
) -> Result<DuelStats> {
    let mut stats = DuelStats {
        samples,
        player_wins: 0,
        enemy_wins: 0,
        draws: 0,
        avg_rounds: 0.0,
        median_rounds: 0,
        avg_player_hp_on_wins: 0.0,
    };
    let mut rounds = Vec::with_capacity(samples as usize);
    let mut hp_left_on_wins = 0i64;
    for i in 0..samples {
        let mut trial = cfg.clone();
        trial.seed = cfg.seed.wrapping_add(i as u64);
        let res = simulate_duel_with(roster, &trial)?;
        rounds.push(res.rounds);
        match res.winner.as_str() {
            "player" => {
                stats.player_wins += 1;
                hp_left_on_wins += i64::from(res.player_hp_end);
            }
            "enemy" => stats.enemy_wins += 1,
            _ => stats.draws += 1,
        }
    }
    if samples == 0 {
        return Ok(stats);
    }

    rounds.sort_unstable();
    let total: u64 = rounds.iter().map(|&r| u64::from(r)).sum();
    stats.avg_rounds = total as f64 / samples as f64;
    let m = rounds.len() / 2;
    stats.median_rounds = if rounds.len() % 2 == 1 {
        rounds[m]
    } else {
        (rounds[m - 1] + rounds[m]) / 2
    };
    if stats.player_wins > 0 {
        stats.avg_player_hp_on_wins = hp_left_on_wins as f64 / stats.player_wins as f64;
    }
    Ok(stats)
}
