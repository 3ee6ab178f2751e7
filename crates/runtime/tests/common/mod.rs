#![allow(dead_code)]

use arena_core::economy::Balances;
use arena_core::{Account, AccountId, Archetype, Card, CardId, CardStats, Rarity};
use arena_runtime::{ArenaService, FixedClock, InMemoryEconomyStore, RuntimeConfig};

/// 2024-03-01T12:00:00Z
pub const NOW: i64 = 1_709_294_400;

pub type Service = ArenaService<InMemoryEconomyStore, FixedClock>;

pub fn service(store: InMemoryEconomyStore) -> Service {
    ArenaService::with_clock(
        store,
        RuntimeConfig::default().with_seed(7),
        FixedClock::new(NOW),
    )
}

pub fn account(id: u64, gold: u64) -> Account {
    Account::new(AccountId(id), 1_000)
        .with_balances(Balances::new(gold, 0, 0))
        .with_energy(50, 2)
}

pub fn card(id: u64, owner: u64, archetype: Archetype, rarity: Rarity) -> Card {
    Card::new(
        CardId(id),
        1,
        archetype,
        rarity,
        CardStats::new(40, 20, 100),
        AccountId(owner),
    )
}

pub fn balances(service: &Service, id: u64) -> Balances {
    service
        .account(AccountId(id))
        .expect("read")
        .expect("account exists")
        .balances
}
