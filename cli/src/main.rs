use clap::{Parser, Subcommand};
use clash_engine::api::{simulate_duel_with, DuelConfig};
use clash_engine::content::{find_character, pick_opponent, roster_or_builtin};
use clash_engine::{Battle, CharacterSpec, Dice, LogCategory, LogEvent, Side};
use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    thread,
    time::Duration,
};
use tracing_subscriber::EnvFilter;

#[derive(Subcommand)]
enum Cmd {
    /// Roll a die multiple times
    Roll {
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Faces on the die
        #[arg(long, default_value_t = 6)]
        sides: u32,
        /// Number of rolls
        #[arg(long, default_value_t = 5)]
        rolls: u32,
    },
    /// List the characters in the roster
    Roster {
        /// Roster file (JSON or YAML); defaults to the built-in roster
        #[arg(long)]
        roster: Option<PathBuf>,
        /// Print the roster as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Run one AI-vs-AI duel and print the combat log
    Duel {
        /// Player character id
        #[arg(long)]
        player: String,
        /// Opponent character id (random when omitted)
        #[arg(long)]
        enemy: Option<String>,
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Roster file (JSON or YAML)
        #[arg(long)]
        roster: Option<PathBuf>,
        /// Round cap before the duel is called a draw
        #[arg(long)]
        max_rounds: Option<u32>,
        /// Print the full result as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Fight interactively: pick an action by number each round
    Play {
        /// Player character id
        #[arg(long)]
        player: String,
        /// Opponent character id (random when omitted)
        #[arg(long)]
        enemy: Option<String>,
        /// RNG seed for determinism
        #[arg(long, default_value_t = 42)]
        seed: u64,
        /// Roster file (JSON or YAML)
        #[arg(long)]
        roster: Option<PathBuf>,
        /// Pause between choosing and resolving, in milliseconds
        #[arg(long, default_value_t = 0)]
        delay_ms: u64,
    },
}

#[derive(Parser)]
#[command(name = "clash-cli")]
#[command(about = "Coin & dice clash battle harness")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn tag(category: LogCategory) -> &'static str {
    match category {
        LogCategory::Default => "   ",
        LogCategory::Damage => "[!]",
        LogCategory::Win => "[+]",
        LogCategory::Loss => "[-]",
        LogCategory::Special => "[*]",
    }
}

fn print_events(events: &[LogEvent]) {
    for e in events {
        println!("{} {}", tag(e.category), e.message);
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Roll { seed, sides, rolls } => {
            let mut dice = Dice::from_seed(seed);
            for _ in 0..rolls {
                println!("{}", dice.die(sides));
            }
        }
        Cmd::Roster { roster, json } => {
            let roster = roster_or_builtin(roster.as_deref())?;
            if json {
                println!("{}", serde_json::to_string_pretty(&roster)?);
            } else {
                for c in &roster {
                    println!(
                        "{:<12} {:<12} HP {:>3}  DEF {}  {}: {}",
                        c.id,
                        c.name,
                        c.base_stats.max_hp,
                        c.base_stats.defense,
                        c.passive.name,
                        c.passive.effect
                    );
                }
            }
        }
        Cmd::Duel {
            player,
            enemy,
            seed,
            roster,
            max_rounds,
            json,
        } => {
            let characters = roster_or_builtin(roster.as_deref())?;
            let cfg = DuelConfig {
                player,
                enemy,
                roster_path: None,
                seed,
                max_rounds,
            };
            tracing::debug!(player = %cfg.player, enemy = ?cfg.enemy, seed, "running duel");
            let res = simulate_duel_with(&characters, &cfg)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&res)?);
            } else {
                print_events(&res.log);
                println!(
                    "winner={} rounds={} {}={} {}={}",
                    res.winner, res.rounds, res.player, res.player_hp_end, res.enemy, res.enemy_hp_end
                );
            }
        }
        Cmd::Play {
            player,
            enemy,
            seed,
            roster,
            delay_ms,
        } => {
            let roster = roster_or_builtin(roster.as_deref())?;
            play(&roster, &player, enemy.as_deref(), seed, delay_ms)?;
        }
    }
    Ok(())
}

fn play(
    roster: &[CharacterSpec],
    player_id: &str,
    enemy_id: Option<&str>,
    seed: u64,
    delay_ms: u64,
) -> anyhow::Result<()> {
    let mut dice = Dice::from_seed(seed);
    let player = find_character(roster, player_id)
        .ok_or_else(|| anyhow::anyhow!("character '{}' not found", player_id))?;
    let enemy = match enemy_id {
        Some(id) => find_character(roster, id)
            .ok_or_else(|| anyhow::anyhow!("character '{}' not found", id))?,
        None => pick_opponent(roster, &player.id, &mut dice)
            .ok_or_else(|| anyhow::anyhow!("no opponent available"))?,
    };

    tracing::debug!(player = %player.id, enemy = %enemy.id, seed, "interactive battle");
    let mut battle = Battle::new(player, enemy, dice);
    print_events(battle.events());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while !battle.is_over() {
        let me = battle.snapshot(Side::Player);
        let foe = battle.snapshot(Side::Enemy);
        println!();
        println!(
            "Round {}  {} {}/{} ({}%)  vs  {} {}/{} ({}%)",
            battle.round(),
            me.name,
            me.hp,
            me.max_hp,
            me.hp_percent(),
            foe.name,
            foe.hp,
            foe.max_hp,
            foe.hp_percent()
        );
        let actions = battle.legal_actions(Side::Player);
        for (i, a) in actions.iter().enumerate() {
            let note = if a.combo_ready {
                " (combo ready)"
            } else if !a.enabled {
                " (unavailable)"
            } else {
                ""
            };
            println!("  {}) {}{}", i + 1, a.name, note);
        }
        println!("  p) Pass/Defend");
        print!("> ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            println!();
            return Ok(());
        };
        let line = line?;
        let choice = line.trim();
        let submitted = if choice.eq_ignore_ascii_case("p") {
            battle.pass_turn()
        } else {
            match choice.parse::<usize>().ok().and_then(|n| actions.get(n.wrapping_sub(1))) {
                Some(a) => battle.submit_player_action(&a.ability_id),
                None => {
                    println!("Pick a number from the list or 'p'.");
                    continue;
                }
            }
        };
        if let Err(e) = submitted {
            tracing::debug!(error = %e, "choice rejected");
            println!("{}", e);
            continue;
        }
        if delay_ms > 0 {
            thread::sleep(Duration::from_millis(delay_ms));
        }
        let report = battle.resolve_round()?;
        print_events(&report.events);
    }
    if let Some(end) = battle.end() {
        println!(
            "The battle is over. {} won in Round {}.",
            end.winner_name, end.rounds
        );
    }
    Ok(())
}
