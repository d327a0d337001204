use crate::battle::state::{BattleEvent, QueuedAction, TurnRng};
use crate::battle::test_support::*;
use crate::external::ItemEffect;
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn potion() -> ItemEffect {
    ItemEffect {
        name: "Potion".to_string(),
        battle_heal: 20,
    }
}

fn use_item(key: &str) -> QueuedAction {
    QueuedAction::Item {
        key: key.to_string(),
    }
}

fn setup(ledger: Arc<RecordingLedger>) -> crate::battle::engine::Battle {
    let user = individual_with_moves(species(940, "Usermon", 100), 20, &["tackle"]);
    let other = individual_with_moves(species(941, "Othermon", 10), 20, &["tackle"]);
    trainer_battle(
        vec![user],
        vec![other],
        TurnRng::scripted(vec![50, 50, 100]),
        ledger,
    )
}

#[test]
fn item_use_heals_the_active_member_and_spends_inventory() {
    let ledger = Arc::new(RecordingLedger::new());
    ledger.stock(RED, "potion", 2, potion());
    let mut battle = setup(Arc::clone(&ledger));
    battle.sides[0].team[0].current_hp = 30;

    let log = resolve_turn(
        &mut battle,
        &[(0, use_item("potion")), (1, attack("tackle"))],
    );

    assert!(log.events.iter().any(|event| matches!(
        event,
        BattleEvent::ItemUsed { item, restored, .. } if item == "Potion" && *restored == 20
    )));
    assert_eq!(
        ledger
            .inventory
            .lock()
            .unwrap()
            .get(&(RED, "potion".to_string())),
        Some(&1)
    );

    // The item resolves before the opposing move, so the heal lands first.
    let item_at = log
        .events
        .iter()
        .position(|event| matches!(event, BattleEvent::ItemUsed { .. }))
        .unwrap();
    let move_at = log
        .events
        .iter()
        .position(|event| matches!(event, BattleEvent::MoveUsed { .. }))
        .unwrap();
    assert!(item_at < move_at);
}

#[test]
fn healing_is_clamped_to_max_hp() {
    let ledger = Arc::new(RecordingLedger::new());
    ledger.stock(RED, "potion", 1, potion());
    let mut battle = setup(Arc::clone(&ledger));
    let max_hp = battle.side(0).active().max_hp();
    battle.sides[0].team[0].current_hp = max_hp - 5;

    let log = resolve_turn(
        &mut battle,
        &[(0, use_item("potion")), (1, attack("tackle"))],
    );
    assert!(log.events.iter().any(|event| matches!(
        event,
        BattleEvent::ItemUsed { restored, .. } if *restored == 5
    )));
}

#[test]
fn missing_inventory_wastes_the_turn_but_spends_nothing() {
    let ledger = Arc::new(RecordingLedger::new());
    ledger.define_item("potion", potion());
    let mut battle = setup(Arc::clone(&ledger));
    battle.sides[0].team[0].current_hp = 30;

    let log = resolve_turn(
        &mut battle,
        &[(0, use_item("potion")), (1, attack("tackle"))],
    );
    assert!(log
        .events
        .iter()
        .any(|event| matches!(event, BattleEvent::ItemMissing { item, .. } if item == "Potion")));
    assert!(!log
        .events
        .iter()
        .any(|event| matches!(event, BattleEvent::ItemUsed { .. })));
}

#[test]
fn unknown_item_keys_are_reported() {
    let ledger = Arc::new(RecordingLedger::new());
    let mut battle = setup(Arc::clone(&ledger));

    let log = resolve_turn(
        &mut battle,
        &[(0, use_item("mystery_orb")), (1, attack("tackle"))],
    );
    assert!(log.events.iter().any(|event| matches!(
        event,
        BattleEvent::UnknownItem { item, .. } if item == "mystery_orb"
    )));
}
