use crate::battle::side::StatusCondition;
use crate::battle::state::{BattleEvent, TurnRng};
use crate::battle::test_support::*;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn caster(moves: &[&str]) -> crate::pokemon::Individual {
    individual_with_moves(species(920, "Castermon", 100), 20, moves)
}

fn target() -> crate::pokemon::Individual {
    individual_with_moves(species(921, "Targetmon", 10), 20, &["tackle"])
}

#[test]
fn sleep_skips_turns_and_waking_spends_the_turn() {
    // Turn 1: sleep applied for two turns. Target never gets to act.
    let mut battle = trainer_battle(
        vec![caster(&["sleep_powder", "tackle"])],
        vec![target()],
        TurnRng::scripted(vec![50, 50, 100, 2, 50, 50, 100, 50, 50, 100, 100]),
        Arc::new(RecordingLedger::new()),
    );

    let log = resolve_turn(
        &mut battle,
        &[(0, attack("sleep_powder")), (1, attack("tackle"))],
    );
    assert!(log
        .events
        .iter()
        .any(|event| matches!(event, BattleEvent::StatusApplied { status, .. } if status == "SLP")));
    assert!(log
        .events
        .iter()
        .any(|event| matches!(event, BattleEvent::FastAsleep { .. })));
    assert_eq!(
        battle.side(1).active().status,
        Some(StatusCondition::Sleep { turns: 1 })
    );

    // Turn 2: the target wakes but its attack is spent waking.
    let log = resolve_turn(&mut battle, &[(0, attack("tackle")), (1, attack("tackle"))]);
    assert!(log
        .events
        .iter()
        .any(|event| matches!(event, BattleEvent::WokeUp { .. })));
    let target_moves = log
        .events
        .iter()
        .filter(|event| {
            matches!(event, BattleEvent::MoveUsed { attacker, .. } if attacker == "Targetmon")
        })
        .count();
    assert_eq!(target_moves, 0);
    assert_eq!(battle.side(1).active().status, None);

    // Turn 3: awake and attacking again.
    let log = resolve_turn(&mut battle, &[(0, attack("tackle")), (1, attack("tackle"))]);
    let target_moves = log
        .events
        .iter()
        .filter(|event| {
            matches!(event, BattleEvent::MoveUsed { attacker, .. } if attacker == "Targetmon")
        })
        .count();
    assert_eq!(target_moves, 1);
}

#[test]
fn paralysis_cancels_on_a_low_roll_only() {
    let mut battle = trainer_battle(
        vec![caster(&["thunder_wave", "tackle"])],
        vec![target()],
        // Turn 1 applies paralysis, then the target's own action rolls the
        // cancel check. Turn 2's roll of 25 cancels; turn 3's 26 does not.
        TurnRng::scripted(vec![
            50, 50, 100, 50, 100, 50, 50, 100, 25, 50, 50, 100, 26, 100,
        ]),
        Arc::new(RecordingLedger::new()),
    );

    resolve_turn(
        &mut battle,
        &[(0, attack("thunder_wave")), (1, attack("tackle"))],
    );
    assert_eq!(
        battle.side(1).active().status,
        Some(StatusCondition::Paralysis)
    );

    let log = resolve_turn(&mut battle, &[(0, attack("tackle")), (1, attack("tackle"))]);
    assert!(log
        .events
        .iter()
        .any(|event| matches!(event, BattleEvent::FullyParalyzed { .. })));

    let log = resolve_turn(&mut battle, &[(0, attack("tackle")), (1, attack("tackle"))]);
    assert!(!log
        .events
        .iter()
        .any(|event| matches!(event, BattleEvent::FullyParalyzed { .. })));
    // Paralysis persists even when the member acts.
    assert_eq!(
        battle.side(1).active().status,
        Some(StatusCondition::Paralysis)
    );
}

#[test]
fn an_existing_status_is_never_overwritten() {
    let mut battle = trainer_battle(
        vec![caster(&["will_o_wisp", "thunder_wave"])],
        vec![target()],
        // Turn 1 applies burn; turn 2's thunder_wave makes no status roll at
        // all because the target is already statused.
        TurnRng::scripted(vec![50, 50, 100, 100, 50, 50, 100]),
        Arc::new(RecordingLedger::new()),
    );

    resolve_turn(
        &mut battle,
        &[(0, attack("will_o_wisp")), (1, attack("tackle"))],
    );
    assert_eq!(battle.side(1).active().status, Some(StatusCondition::Burn));

    let log = resolve_turn(
        &mut battle,
        &[(0, attack("thunder_wave")), (1, attack("tackle"))],
    );
    assert!(!log
        .events
        .iter()
        .any(|event| matches!(event, BattleEvent::StatusApplied { .. })));
    assert_eq!(battle.side(1).active().status, Some(StatusCondition::Burn));
}

#[test]
fn status_chance_above_the_roll_fails_quietly() {
    // Ember has a 10 percent burn chance; a roll of 11 misses it.
    let mut battle = trainer_battle(
        vec![caster(&["ember"])],
        vec![target()],
        TurnRng::scripted(vec![50, 50, 100, 11, 100]),
        Arc::new(RecordingLedger::new()),
    );

    let log = resolve_turn(&mut battle, &[(0, attack("ember")), (1, attack("tackle"))]);
    assert!(!log
        .events
        .iter()
        .any(|event| matches!(event, BattleEvent::StatusApplied { .. })));
    assert_eq!(battle.side(1).active().status, None);
}
