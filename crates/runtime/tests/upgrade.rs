mod common;

use arena_core::{AccountId, Archetype, CardId, EngineError, Rarity};
use arena_runtime::{InMemoryEconomyStore, RuntimeError};
use common::{account, balances, card, service};

fn workshop() -> InMemoryEconomyStore {
    InMemoryEconomyStore::new()
        .with_account(account(1, 1_000))
        .with_account(account(2, 1_000))
        .with_card(card(1, 1, Archetype::Warrior, Rarity::Common))
        .with_card(card(2, 1, Archetype::Warrior, Rarity::Common))
        .with_card(card(3, 1, Archetype::Mage, Rarity::Common))
        .with_card(card(4, 2, Archetype::Warrior, Rarity::Common))
}

#[test]
fn mismatched_archetypes_fail_before_any_debit() {
    let service = service(workshop());
    let err = service
        .upgrade_card(AccountId(1), CardId(1), CardId(3))
        .unwrap_err();

    assert_eq!(
        err,
        RuntimeError::Engine(EngineError::invalid("cards are not identical"))
    );
    assert_eq!(balances(&service, 1).gold, 1_000);
    assert_eq!(service.store().cards_of(AccountId(1)).expect("read").len(), 3);
}

#[test]
fn foreign_card_is_unauthorized() {
    let service = service(workshop());
    let err = service
        .upgrade_card(AccountId(1), CardId(1), CardId(4))
        .unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Engine(EngineError::Unauthorized { .. })
    ));
    assert_eq!(balances(&service, 1).gold, 1_000);
}

#[test]
fn cost_is_spent_whatever_the_roll() {
    let service = service(workshop());
    let outcome = service
        .upgrade_card(AccountId(1), CardId(1), CardId(2))
        .expect("upgrade")
        .value;

    let cost = service.engine().upgrade.cost(Rarity::Common, 1);
    assert_eq!(outcome.cost, cost);
    assert_eq!(balances(&service, 1).gold, 1_000 - cost);

    let owned = service.store().cards_of(AccountId(1)).expect("read");
    if outcome.success {
        assert_eq!(outcome.card.level, 2);
        assert_eq!(outcome.consumed, Some(CardId(2)));
        assert_eq!(owned.len(), 2);
    } else {
        assert_eq!(outcome.card.level, 1);
        assert_eq!(outcome.consumed, None);
        assert_eq!(owned.len(), 3);
    }
}

#[test]
fn listed_cards_cannot_be_merged() {
    let service = service(workshop());
    service.list_card(AccountId(1), CardId(2), 100).expect("list");
    let err = service
        .upgrade_card(AccountId(1), CardId(1), CardId(2))
        .unwrap_err();
    assert_eq!(
        err,
        RuntimeError::Engine(EngineError::invalid("listed cards cannot be upgraded"))
    );
    assert_eq!(balances(&service, 1).gold, 1_000);
}

#[test]
fn copies_at_different_levels_can_be_merged() {
    let store = InMemoryEconomyStore::new()
        .with_account(account(1, 1_000))
        .with_card(card(1, 1, Archetype::Tank, Rarity::Rare).with_level(2))
        .with_card(card(2, 1, Archetype::Tank, Rarity::Rare));
    let service = service(store);

    let outcome = service
        .upgrade_card(AccountId(1), CardId(1), CardId(2))
        .expect("identical copies merge whatever their levels")
        .value;

    let cost = service.engine().upgrade.cost(Rarity::Rare, 2);
    assert_eq!(outcome.cost, cost);
    assert_eq!(balances(&service, 1).gold, 1_000 - cost);
    assert_eq!(outcome.card.level, if outcome.success { 3 } else { 2 });
}
