use clash_engine::clash::{compute_clash, CLASH_BASE};
use clash_engine::content::builtin_roster;
use clash_engine::{Battle, Combatant, Dice, Side};
use proptest::prelude::*;

const IDS: [&str; 4] = ["striker", "juggernaut", "shutenmaru", "zectus"];

proptest! {
    #[test]
    fn hp_stays_in_bounds(seed in any::<u64>(), p in 0usize..4, e in 0usize..4) {
        let roster = builtin_roster().unwrap();
        let player = roster.iter().find(|c| c.id == IDS[p]).unwrap();
        let enemy = roster.iter().find(|c| c.id == IDS[e]).unwrap();
        let mut battle = Battle::new(player, enemy, Dice::from_seed(seed));

        while !battle.is_over() && battle.round() <= 60 {
            let pick = battle.auto_action(Side::Player).unwrap();
            let report = battle.play_round(&pick).unwrap();
            for snap in [&report.player, &report.enemy] {
                prop_assert!(snap.hp >= 0 && snap.hp <= snap.max_hp);
            }
            prop_assert!(report.player.statuses.len() <= 2);
            if report.end.is_some() {
                prop_assert!(report.player.hp == 0 || report.enemy.hp == 0);
            }
        }
    }

    #[test]
    fn clash_value_is_bounded_by_die_and_coins(seed in any::<u64>(), who in 0usize..4) {
        let roster = builtin_roster().unwrap();
        let actor = Combatant::from_spec(roster.iter().find(|c| c.id == IDS[who]).unwrap());
        let foe = Combatant::from_spec(&roster[(who + 1) % 4]);
        let mut dice = Dice::from_seed(seed);
        for ability in actor.abilities.iter().filter(|a| a.kind.contests()) {
            let roll = compute_clash(&actor, ability, &foe, &mut dice, |_| {});
            prop_assert!(roll.heads <= roll.coins);
            prop_assert!(roll.die_roll >= 1 && roll.die_roll <= ability.dice);
            prop_assert_eq!(roll.value, CLASH_BASE + roll.die_roll as i32 + roll.heads as i32);
        }
    }
}
