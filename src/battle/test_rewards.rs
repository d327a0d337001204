use crate::battle::state::{BattleEvent, QueuedAction, TurnRng};
use crate::battle::test_support::*;
use crate::external::Outcome;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn strong() -> crate::pokemon::Individual {
    individual_with_moves(species(960, "Strongmon", 55), 50, &["tackle"])
}

fn weak(pokedex_number: u16, name: &str) -> crate::pokemon::Individual {
    individual_with_moves(species(pokedex_number, name, 10), 10, &["tackle"])
}

#[test]
fn trainer_victory_pays_winner_and_loser() {
    let ledger = Arc::new(RecordingLedger::new());
    let mut battle = trainer_battle(
        vec![strong()],
        vec![weak(961, "Weakmon")],
        TurnRng::scripted(vec![50, 50, 100]),
        Arc::clone(&ledger),
    );

    let log = resolve_turn(&mut battle, &[(0, attack("tackle")), (1, attack("tackle"))]);
    assert!(log.concluded);
    assert_eq!(ledger.credited(RED), 5);
    assert_eq!(ledger.credited(BLUE), 1);

    let summary = battle.result().unwrap();
    assert_eq!(summary.winner, Some(0));
    assert_eq!(summary.rewards.get(&RED), Some(&5));
    assert_eq!(summary.rewards.get(&BLUE), Some(&1));

    let outcomes = ledger.outcomes.lock().unwrap();
    let red = outcomes.iter().find(|(who, _, _)| *who == RED).unwrap();
    assert_eq!(red.1, Outcome::Win);
    assert_eq!(red.2.opponent, Some(BLUE));
    let blue = outcomes.iter().find(|(who, _, _)| *who == BLUE).unwrap();
    assert_eq!(blue.1, Outcome::Loss);
    assert_eq!(blue.2.opponent, Some(RED));
}

#[test]
fn wild_victory_pays_the_player_and_awards_experience() {
    let ledger = Arc::new(RecordingLedger::new());
    let mut battle = wild_battle(
        vec![strong()],
        weak(961, "Wildmon"),
        TurnRng::scripted(vec![50, 50, 100]),
        Arc::clone(&ledger),
    );

    let log = match battle.submit_action(0, attack("tackle")).unwrap() {
        crate::battle::engine::SubmitOutcome::Resolved(log) => log,
        _ => panic!("turn did not resolve"),
    };
    assert!(log.concluded);
    assert_eq!(ledger.credited(RED), 3);

    // Average defeated level 10 gives 50 experience to the participant.
    let summary = battle.result().unwrap();
    let lines = summary.experience_events.get(&RED).unwrap();
    assert!(lines
        .iter()
        .any(|line| line.contains("gained 50 experience")));

    let persisted = ledger.persisted.lock().unwrap();
    assert_eq!(persisted.len(), 1);
    assert_eq!(persisted[0].0, RED);
    assert_eq!(persisted[0].1.species, 960);

    let outcomes = ledger.outcomes.lock().unwrap();
    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].1, Outcome::Win);
    assert_eq!(outcomes[0].2.wild_species, Some((961, "Wildmon".to_string())));
}

#[test]
fn experience_goes_only_to_participants() {
    let ledger = Arc::new(RecordingLedger::new());
    let bench = weak(962, "Benchmon");
    let mut battle = trainer_battle(
        vec![strong(), bench],
        vec![weak(961, "Weakmon")],
        TurnRng::scripted(vec![50, 50, 100]),
        Arc::clone(&ledger),
    );

    resolve_turn(&mut battle, &[(0, attack("tackle")), (1, attack("tackle"))]);
    assert!(battle.is_concluded());

    let persisted = ledger.persisted.lock().unwrap();
    let red_records: Vec<_> = persisted
        .iter()
        .filter(|(who, _)| *who == RED)
        .map(|(_, record)| record.species)
        .collect();
    assert_eq!(red_records, vec![960]);
}

#[test]
fn fleeing_a_wild_battle_concludes_it_without_rewards() {
    let ledger = Arc::new(RecordingLedger::new());
    let mut battle = wild_battle(
        vec![strong()],
        weak(961, "Wildmon"),
        TurnRng::scripted(vec![50, 50]),
        Arc::clone(&ledger),
    );

    let log = match battle.submit_action(0, QueuedAction::Flee).unwrap() {
        crate::battle::engine::SubmitOutcome::Resolved(log) => log,
        _ => panic!("flee should resolve the turn"),
    };
    assert!(log.concluded);
    assert!(log
        .events
        .iter()
        .any(|event| matches!(event, BattleEvent::Fled { side } if side == "Red")));
    assert!(battle.is_concluded());
    assert_eq!(battle.winner(), Some(1));
    assert_eq!(ledger.credited(RED), 0);

    // No opposing member was defeated, so no experience was earned.
    let summary = battle.result().unwrap();
    assert!(summary.experience_events.get(&RED).is_none());

    let outcomes = ledger.outcomes.lock().unwrap();
    assert_eq!(outcomes[0].1, Outcome::Loss);
}

#[test]
fn fleeing_a_trainer_battle_is_rejected() {
    let ledger = Arc::new(RecordingLedger::new());
    let mut battle = trainer_battle(
        vec![strong()],
        vec![weak(961, "Weakmon")],
        TurnRng::scripted(vec![50, 50, 100]),
        Arc::clone(&ledger),
    );
    assert_eq!(
        battle.submit_action(0, QueuedAction::Flee).unwrap_err(),
        crate::errors::ActionError::CannotFleeTrainerBattle
    );
}
