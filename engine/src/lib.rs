use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub mod api;
pub mod battle;
pub mod character;
pub mod clash;
pub mod combat;
pub mod combatant;
pub mod content;
pub mod log;
pub mod passives;

pub use battle::{Battle, BattleEnd, BattlePhase, RoundReport, Side};
pub use character::{Ability, AbilityKind, CharacterSpec, DamageType, WeaponState};
pub use combatant::{Combatant, CombatantSnapshot, StatusEffect};
pub use log::{LogCategory, LogEvent};

enum Source {
    Seeded(ChaCha8Rng),
    Scripted { values: Vec<u32>, cursor: usize },
}

/// Uniform integer draws for every roll the engine makes.
///
/// A seeded source is reproducible across runs; a scripted source replays a fixed
/// sequence (cycling when exhausted) so tests can pin exact outcomes.
pub struct Dice {
    source: Source,
}

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self { source: Source::Seeded(ChaCha8Rng::seed_from_u64(seed)) }
    }

    /// Replay `values` in order. Each value is clamped into the range of the draw it
    /// answers, so a scripted `6` for a coin flip reads as `1`.
    pub fn from_scripted(values: Vec<u32>) -> Self {
        Self { source: Source::Scripted { values, cursor: 0 } }
    }

    /// Uniform draw in `min..=max`.
    pub fn range(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        match &mut self.source {
            Source::Seeded(rng) => rng.gen_range(min..=max),
            Source::Scripted { values, cursor } => {
                if values.is_empty() {
                    return min;
                }
                let v = values[*cursor % values.len()];
                *cursor += 1;
                v.clamp(min, max)
            }
        }
    }

    /// Roll a die with `sides` faces; a zero-sided die always reads 0.
    pub fn die(&mut self, sides: u32) -> u32 {
        if sides == 0 { 0 } else { self.range(1, sides) }
    }

    pub fn d100(&mut self) -> u32 {
        self.range(1, 100)
    }

    /// A single fair flip: 1 for heads, 0 for tails.
    pub fn coin(&mut self) -> u32 {
        self.range(0, 1)
    }

    /// Pick an index into a slice of `len` items. `len` must be non-zero.
    pub fn index(&mut self, len: usize) -> usize {
        debug_assert!(len > 0, "index() on an empty slice");
        self.range(0, len.saturating_sub(1) as u32) as usize
    }
}
