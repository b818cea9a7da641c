use clash_engine::Dice;

#[test]
fn seeded_dice_are_deterministic() {
    let mut a = Dice::from_seed(2025);
    let mut b = Dice::from_seed(2025);
    let left: Vec<u32> = (0..20).map(|_| a.die(12)).collect();
    let right: Vec<u32> = (0..20).map(|_| b.die(12)).collect();
    assert_eq!(left, right);
    assert!(left.iter().all(|r| (1..=12).contains(r)));
}

#[test]
fn scripted_values_are_clamped_to_the_draw() {
    let mut dice = Dice::from_scripted(vec![6, 0, 250]);
    assert_eq!(dice.coin(), 1);
    assert_eq!(dice.die(4), 1);
    assert_eq!(dice.d100(), 100);
}

#[test]
fn scripted_values_cycle_when_exhausted() {
    let mut dice = Dice::from_scripted(vec![3, 5]);
    let rolls: Vec<u32> = (0..5).map(|_| dice.die(6)).collect();
    assert_eq!(rolls, vec![3, 5, 3, 5, 3]);
}

#[test]
fn zero_sided_die_reads_zero_without_drawing() {
    let mut dice = Dice::from_scripted(vec![4]);
    assert_eq!(dice.die(0), 0);
    assert_eq!(dice.die(6), 4);
}
