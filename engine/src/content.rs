use std::{collections::HashSet, fs, path::Path};

use anyhow::{bail, ensure, Context, Result};
use encoding_rs::Encoding;

use crate::character::{CharacterSpec, PASS_ABILITY_ID};
use crate::passives::PassiveKind;
use crate::Dice;

const BUILTIN_ROSTER: &str = include_str!("../content/characters.json");

/// Upper bound for per-ability numbers (attack, die faces, coins) and passive bonuses.
pub const MAX_ABILITY_STAT: u32 = 1000;
/// Upper bound for a character's max HP.
pub const MAX_HP_LIMIT: i32 = 1_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterFormat {
    Json,
    Yaml,
}

impl RosterFormat {
    /// `.yaml`/`.yml` files are YAML; anything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("yaml" | "yml") => RosterFormat::Yaml,
            _ => RosterFormat::Json,
        }
    }
}

/// The four stock characters shipped with the engine.
pub fn builtin_roster() -> Result<Vec<CharacterSpec>> {
    parse_roster(BUILTIN_ROSTER, RosterFormat::Json).context("built-in roster is invalid")
}

pub fn parse_roster(text: &str, format: RosterFormat) -> Result<Vec<CharacterSpec>> {
    let roster: Vec<CharacterSpec> = match format {
        RosterFormat::Json => serde_json::from_str(text).context("failed to parse roster JSON")?,
        RosterFormat::Yaml => serde_yaml::from_str(text).context("failed to parse roster YAML")?,
    };
    validate_roster(&roster)?;
    Ok(roster)
}

/// Read a text file, honouring a UTF-8/UTF-16 byte-order mark when present.
pub fn read_text_auto(path: &Path) -> Result<String> {
    let bytes = fs::read(path)?;
    if let Some((enc, bom_len)) = Encoding::for_bom(&bytes) {
        let (cow, _, _) = enc.decode(&bytes[bom_len..]);
        Ok(cow.into_owned())
    } else {
        Ok(String::from_utf8(bytes)?)
    }
}

pub fn load_roster(path: impl AsRef<Path>) -> Result<Vec<CharacterSpec>> {
    let path = path.as_ref();
    let text = read_text_auto(path)
        .with_context(|| format!("failed to read roster: {}", path.display()))?;
    parse_roster(&text, RosterFormat::from_path(path))
        .with_context(|| format!("invalid roster: {}", path.display()))
}

/// Roster from `path`, or the built-in one when no path is given.
pub fn roster_or_builtin(path: Option<&Path>) -> Result<Vec<CharacterSpec>> {
    match path {
        Some(p) => load_roster(p),
        None => builtin_roster(),
    }
}

pub fn find_character<'a>(roster: &'a [CharacterSpec], id: &str) -> Option<&'a CharacterSpec> {
    roster.iter().find(|c| c.id.eq_ignore_ascii_case(id))
}

/// Random opponent for `player_id`, never the same character.
pub fn pick_opponent<'a>(
    roster: &'a [CharacterSpec],
    player_id: &str,
    dice: &mut Dice,
) -> Option<&'a CharacterSpec> {
    let candidates: Vec<_> = roster
        .iter()
        .filter(|c| !c.id.eq_ignore_ascii_case(player_id))
        .collect();
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[dice.index(candidates.len())])
}

pub fn validate_roster(roster: &[CharacterSpec]) -> Result<()> {
    ensure!(!roster.is_empty(), "roster has no characters");
    let mut ids = HashSet::new();
    for character in roster {
        if !ids.insert(character.id.to_ascii_lowercase()) {
            bail!("duplicate character id '{}'", character.id);
        }
        validate_character(character)
            .with_context(|| format!("character '{}' is invalid", character.id))?;
    }
    Ok(())
}

fn validate_character(character: &CharacterSpec) -> Result<()> {
    let stats = &character.base_stats;
    ensure!(
        (1..=MAX_HP_LIMIT).contains(&stats.max_hp),
        "max_hp must be within 1..={}, got {}",
        MAX_HP_LIMIT,
        stats.max_hp
    );
    ensure!(
        (0..=MAX_ABILITY_STAT as i32).contains(&stats.defense),
        "defense must be within 0..={}, got {}",
        MAX_ABILITY_STAT,
        stats.defense
    );
    ensure!(!character.abilities.is_empty(), "no abilities");

    let mut ids = HashSet::new();
    for ability in &character.abilities {
        ensure!(
            ability.id != PASS_ABILITY_ID,
            "ability id '{}' is reserved",
            PASS_ABILITY_ID
        );
        if !ids.insert(ability.id.as_str()) {
            bail!("duplicate ability id '{}'", ability.id);
        }
        for (field, value) in [
            ("base_attack", ability.base_attack),
            ("dice", ability.dice),
            ("coins", ability.coins),
        ] {
            ensure!(
                value <= MAX_ABILITY_STAT,
                "ability '{}' {} {} exceeds {}",
                ability.id,
                field,
                value,
                MAX_ABILITY_STAT
            );
        }
        if ability.main_attack && ability.weapon_state.is_none() {
            bail!("main attack '{}' has no weapon_state", ability.id);
        }
    }

    let starting_state = stats.weapon_state.or_else(|| {
        character
            .abilities
            .iter()
            .find(|a| a.main_attack)
            .and_then(|a| a.weapon_state)
    });
    let selectable = character.abilities.iter().any(|a| {
        if a.main_attack {
            a.weapon_state == starting_state
        } else {
            !a.hidden
        }
    });
    ensure!(selectable, "no ability is selectable at battle start");

    match &character.passive.kind {
        PassiveKind::RollTrigger { trigger_value, die } => {
            ensure!(
                (1..=MAX_ABILITY_STAT).contains(die),
                "roll trigger die must have 1..={} faces, got {}",
                MAX_ABILITY_STAT,
                die
            );
            ensure!(
                (1..=*die).contains(trigger_value),
                "trigger value {} cannot come up on a d{}",
                trigger_value,
                die
            );
        }
        PassiveKind::DefenseConditional { defense_bonus } => {
            ensure!(
                (0..=MAX_ABILITY_STAT as i32).contains(defense_bonus),
                "defense bonus must be within 0..={}, got {}",
                MAX_ABILITY_STAT,
                defense_bonus
            );
        }
        PassiveKind::ConditionalCoin { coin_bonus, .. } => {
            ensure!(
                *coin_bonus <= MAX_ABILITY_STAT,
                "coin bonus {} exceeds {}",
                coin_bonus,
                MAX_ABILITY_STAT
            );
        }
        PassiveKind::CoinScaler => {}
    }
    Ok(())
}
