use anyhow::anyhow;
use clap::Parser;
use clash_engine::api::{simulate_duel_many_with, DuelConfig, DuelStats, MAX_ROUNDS};
use clash_engine::content::{find_character, roster_or_builtin};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "simulate-vs")]
#[command(about = "Monte Carlo sim: many AI-vs-AI duels between two characters")]
struct Args {
    /// Player character id
    #[arg(long)]
    player: String,

    /// Opponent character id
    #[arg(long)]
    enemy: String,

    /// Number of trials
    #[arg(long, default_value_t = 1000)]
    trials: u32,

    /// Safety cap on rounds per trial
    #[arg(long, default_value_t = MAX_ROUNDS)]
    max_rounds: u32,

    /// Optional roster file (JSON or YAML); built-in roster otherwise
    #[arg(long)]
    roster: Option<PathBuf>,

    /// RNG base seed (trial i uses seed+i)
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Print the summary as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Serialize)]
struct Summary<'a> {
    player: &'a str,
    enemy: &'a str,
    player_win_rate: f64,
    enemy_win_rate: f64,
    draw_rate: f64,
    #[serde(flatten)]
    stats: &'a DuelStats,
}

fn rate(count: u32, trials: u32) -> f64 {
    count as f64 / trials as f64 * 100.0
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    if args.trials == 0 {
        anyhow::bail!("--trials must be at least 1");
    }
    let roster = roster_or_builtin(args.roster.as_deref())?;
    let player = find_character(&roster, &args.player)
        .ok_or_else(|| anyhow!("character '{}' not found", args.player))?;
    let enemy = find_character(&roster, &args.enemy)
        .ok_or_else(|| anyhow!("character '{}' not found", args.enemy))?;

    let cfg = DuelConfig {
        player: player.id.clone(),
        enemy: Some(enemy.id.clone()),
        roster_path: None,
        seed: args.seed,
        max_rounds: Some(args.max_rounds),
    };
    let stats = simulate_duel_many_with(&roster, &cfg, args.trials)?;
    let summary = Summary {
        player: &player.name,
        enemy: &enemy.name,
        player_win_rate: rate(stats.player_wins, args.trials),
        enemy_win_rate: rate(stats.enemy_wins, args.trials),
        draw_rate: rate(stats.draws, args.trials),
        stats: &stats,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("simulate-vs results");
    println!("-------------------");
    println!("trials:             {}", stats.samples);
    println!("matchup:            {} vs {}", summary.player, summary.enemy);
    println!();
    println!("player win rate:    {:.1}%", summary.player_win_rate);
    println!("enemy win rate:     {:.1}%", summary.enemy_win_rate);
    println!("draw rate:          {:.1}%", summary.draw_rate);
    println!("avg hp left (wins): {:.2}", stats.avg_player_hp_on_wins);
    println!("avg rounds:         {:.2}", stats.avg_rounds);
    println!("median rounds:      {}", stats.median_rounds);

    Ok(())
}
