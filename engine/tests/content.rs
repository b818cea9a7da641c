use clash_engine::content::{
    builtin_roster, find_character, load_roster, parse_roster, pick_opponent, RosterFormat,
    MAX_ABILITY_STAT,
};
use clash_engine::passives::PassiveKind;
use clash_engine::Dice;
use std::fs;
use std::path::Path;

const DUEL_YAML: &str = r#"
- id: brawler
  name: Brawler
  base_stats: { max_hp: 40, defense: 1 }
  passive:
    name: Second Wind
    type: RollTrigger
    trigger_value: 4
    die: 4
  abilities:
    - { id: jab, name: Jab, kind: ATTACK, base_attack: 2, dice: 4, coins: 1 }
    - { id: cover, name: Cover, kind: DEFENSE }
- id: wrestler
  name: Wrestler
  base_stats: { max_hp: 50, defense: 2 }
  passive: { name: Stonewall, type: DefenseConditional }
  abilities:
    - { id: clinch, name: Clinch, kind: CONTROL, dice: 6, coins: 1 }
"#;

#[test]
fn builtin_roster_has_the_four_stock_characters() {
    let roster = builtin_roster().unwrap();
    let ids: Vec<&str> = roster.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, ["striker", "juggernaut", "shutenmaru", "zectus"]);

    let zectus = find_character(&roster, "ZECTUS").unwrap();
    assert_eq!(zectus.base_stats.max_hp, 120);
    assert_eq!(zectus.base_stats.attributes.get("gender").map(String::as_str), Some("Non-Binary"));
    assert!(matches!(
        zectus.passive.kind,
        PassiveKind::ConditionalCoin { coin_bonus: 2, .. }
    ));
}

#[test]
fn yaml_roster_fills_defaults() {
    let roster = parse_roster(DUEL_YAML, RosterFormat::Yaml).unwrap();
    assert_eq!(roster.len(), 2);
    assert_eq!(roster[0].base_stats.level, 1);
    assert_eq!(roster[0].abilities[1].coins, 0);
    assert_eq!(
        roster[1].passive.kind,
        PassiveKind::DefenseConditional { defense_bonus: 2 }
    );
}

#[test]
fn format_follows_the_file_extension() {
    assert_eq!(RosterFormat::from_path(Path::new("r.yaml")), RosterFormat::Yaml);
    assert_eq!(RosterFormat::from_path(Path::new("r.YML")), RosterFormat::Yaml);
    assert_eq!(RosterFormat::from_path(Path::new("r.json")), RosterFormat::Json);
    assert_eq!(RosterFormat::from_path(Path::new("roster")), RosterFormat::Json);
}

#[test]
fn duplicate_character_ids_are_rejected() {
    let text = DUEL_YAML.replace("id: wrestler", "id: Brawler");
    let err = parse_roster(&text, RosterFormat::Yaml).unwrap_err();
    assert!(format!("{err:#}").contains("duplicate character id"));
}

#[test]
fn impossible_trigger_value_is_rejected() {
    let text = DUEL_YAML.replace("trigger_value: 4", "trigger_value: 7");
    let err = parse_roster(&text, RosterFormat::Yaml).unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("brawler"), "{msg}");
    assert!(msg.contains("cannot come up on a d4"), "{msg}");
}

#[test]
fn reserved_pass_id_is_rejected() {
    let text = DUEL_YAML.replace("id: cover", "id: pass");
    let err = parse_roster(&text, RosterFormat::Yaml).unwrap_err();
    assert!(format!("{err:#}").contains("reserved"));
}

#[test]
fn character_with_only_hidden_abilities_is_rejected() {
    let text = DUEL_YAML.replace(
        "{ id: clinch, name: Clinch, kind: CONTROL, dice: 6, coins: 1 }",
        "{ id: clinch, name: Clinch, kind: CONTROL, dice: 6, coins: 1, hidden: true }",
    );
    let err = parse_roster(&text, RosterFormat::Yaml).unwrap_err();
    assert!(format!("{err:#}").contains("no ability is selectable"));
}

#[test]
fn missing_roster_file_names_the_path() {
    let err = load_roster("does/not/exist.json").unwrap_err();
    assert!(err.to_string().contains("does/not/exist.json"));
}

#[test]
fn random_opponent_is_never_the_player() {
    let roster = builtin_roster().unwrap();
    let mut dice = Dice::from_seed(99);
    for _ in 0..40 {
        let foe = pick_opponent(&roster, "striker", &mut dice).unwrap();
        assert_ne!(foe.id, "striker");
    }
    let solo = &roster[..1];
    assert!(pick_opponent(solo, "striker", &mut dice).is_none());
}

#[test]
fn oversized_ability_numbers_are_rejected() {
    for (from, to) in [
        ("base_attack: 2, dice: 4", "base_attack: 3000000000, dice: 4"),
        ("base_attack: 2, dice: 4, coins: 1", "base_attack: 4294967295, dice: 4, coins: 1"),
        ("dice: 4, coins: 1", "dice: 4, coins: 4000000"),
        ("dice: 4, coins: 1", "dice: 2000000000, coins: 1"),
    ] {
        let text = DUEL_YAML.replacen(from, to, 1);
        assert_ne!(text, DUEL_YAML);
        let err = parse_roster(&text, RosterFormat::Yaml).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains(&format!("exceeds {MAX_ABILITY_STAT}")), "{msg}");
    }
}

#[test]
fn oversized_stats_are_rejected() {
    let text = DUEL_YAML.replace("max_hp: 40", "max_hp: 2147483647");
    assert!(parse_roster(&text, RosterFormat::Yaml).is_err());
    let text = DUEL_YAML.replace("defense: 1 }", "defense: 5000 }");
    assert!(parse_roster(&text, RosterFormat::Yaml).is_err());
}

#[test]
fn roster_file_with_byte_order_mark_loads() {
    let dir = std::env::temp_dir().join(format!("clash-roster-bom-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("duel.yaml");
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(DUEL_YAML.as_bytes());
    fs::write(&path, bytes).unwrap();

    let roster = load_roster(&path).unwrap();
    assert_eq!(roster[0].id, "brawler");
    fs::remove_dir_all(&dir).ok();
}
