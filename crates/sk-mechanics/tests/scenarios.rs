//! End-to-end combat scenarios driven through the public controller API.

use sk_mechanics::{
    AbilityScores, CombatConfig, CombatController, CombatError, CombatStatus, ParticipantId,
    ParticipantSpec, RollPurpose, ScriptedDice,
};

const A: ParticipantId = ParticipantId(1);
const B: ParticipantId = ParticipantId(2);

fn raider() -> ParticipantSpec {
    ParticipantSpec::new("A", 20)
        .enemy()
        .with_initiative(18)
        .with_ac(14)
        .with_abilities(AbilityScores::new(16, 10, 12, 10, 10, 10))
        .with_weapon("longsword")
}

fn defender() -> ParticipantSpec {
    ParticipantSpec::new("B", 10).with_initiative(12).with_ac(12)
}

fn controller(faces: Vec<u32>) -> CombatController {
    CombatController::with_source(CombatConfig::default(), ScriptedDice::new(faces))
}

#[test]
fn attack_then_apply_damage() {
    let mut combat = controller(vec![15, 5]);
    combat.start_combat(vec![raider(), defender()]).unwrap();

    let result = combat.resolve_attack(A, B, None).unwrap();
    assert_eq!(result.attack.check.total, 18);
    assert!(result.hit);
    let damage = result.damage.unwrap();
    assert_eq!(damage.total, 8);
    assert_eq!(combat.participant(B).unwrap().hp, 10);

    assert_eq!(combat.apply_damage(B, damage.total), Ok(2));
    assert_eq!(combat.apply_damage(B, 5), Ok(0));
    assert!(combat.participant(B).unwrap().is_down());
}

#[test]
fn low_roll_misses() {
    let mut combat = controller(vec![8]);
    combat.start_combat(vec![raider(), defender()]).unwrap();
    let result = combat.resolve_attack(A, B, None).unwrap();
    assert_eq!(result.attack.check.total, 11);
    assert!(!result.hit);
    assert!(result.damage.is_none());
}

#[test]
fn turns_cycle_through_rounds() {
    let mut combat = controller(vec![10]);
    let first = combat.start_combat(vec![raider(), defender()]).unwrap();
    assert_eq!(first, Some(A));

    let mut seen = Vec::new();
    for _ in 0..4 {
        let change = combat.next_turn().unwrap();
        seen.push((change.active, change.round));
    }
    assert_eq!(seen, vec![(B, 1), (A, 2), (B, 2), (A, 3)]);
}

#[test]
fn removing_the_active_participant() {
    let mut combat = controller(vec![10]);
    combat.start_combat(vec![raider(), defender()]).unwrap();
    combat.remove_participant(A).unwrap();

    let state = combat.get_state();
    assert_eq!(state.active, Some(B));
    assert_eq!(state.round, 1);
    assert_eq!(combat.participant(A), Err(CombatError::NotFound(A)));
}

#[test]
fn non_positive_amounts_are_rejected() {
    let mut combat = controller(vec![10]);
    combat.start_combat(vec![raider(), defender()]).unwrap();
    assert_eq!(combat.apply_damage(A, -5), Err(CombatError::InvalidAmount(-5)));
    assert_eq!(combat.apply_healing(A, 0), Err(CombatError::InvalidAmount(0)));
    assert_eq!(combat.participant(A).unwrap().hp, 20);
}

#[test]
fn seeded_runs_are_reproducible() {
    let run = || {
        let mut combat = CombatController::new(CombatConfig::default().with_seed(7));
        combat
            .start_combat(vec![
                ParticipantSpec::new("Rogue", 9),
                ParticipantSpec::new("Bandit", 11).enemy().with_ac(12),
            ])
            .unwrap();
        let mut totals = Vec::new();
        for _ in 0..10 {
            let roll = combat
                .roll_for_participant(ParticipantId(1), RollPurpose::Attack)
                .unwrap();
            totals.push(roll.total);
        }
        let order = combat.turn_order().to_vec();
        (order, totals)
    };
    assert_eq!(run(), run());
}

#[test]
fn full_session_lifecycle() {
    let mut combat = controller(vec![10]);
    assert_eq!(combat.status(), CombatStatus::Idle);
    combat.start_combat(vec![raider(), defender()]).unwrap();
    combat.add_condition(B, "poisoned").unwrap();
    combat.next_turn().unwrap();

    let last = combat.end_combat().unwrap();
    assert_eq!(last.status, CombatStatus::InCombat);
    assert!(last.participant(B).unwrap().conditions.contains("poisoned"));
    assert!(!last.log.is_empty());
    assert_eq!(combat.get_state().status, CombatStatus::Idle);
}
