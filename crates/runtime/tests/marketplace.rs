mod common;

use std::sync::Barrier;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use arena_core::economy::{
    Balances, ChangeSet, EconomyStore, Listing, PackKind, PackSales, TransactionStatus,
};
use arena_core::error::Missing;
use arena_core::{
    Account, AccountId, Archetype, Card, CardId, EngineError, Rarity, StoreError, Transaction,
    TransactionId, TransactionKind,
};
use arena_runtime::{ArenaService, FixedClock, InMemoryEconomyStore, RuntimeConfig, RuntimeError};
use common::{NOW, account, balances, card, service};

fn market(buyer_gold: u64) -> InMemoryEconomyStore {
    InMemoryEconomyStore::new()
        .with_account(account(1, 0))
        .with_account(account(2, buyer_gold))
        .with_account(account(3, buyer_gold))
        .with_card(card(7, 1, Archetype::Mage, Rarity::Epic))
}

#[test]
fn sale_moves_card_and_charges_fee() {
    let service = service(market(5_000));
    service.list_card(AccountId(1), CardId(7), 1_000).expect("list");
    let receipt = service.buy_card(AccountId(2), CardId(7)).expect("buy");

    assert_eq!(receipt.value.charges.fee, 50);
    assert_eq!(receipt.value.charges.net, 950);
    assert_eq!(balances(&service, 1).gold, 950);
    assert_eq!(balances(&service, 2).gold, 4_000);

    let stored = service.store().card(CardId(7)).expect("read").expect("card");
    assert_eq!(stored.owner, AccountId(2));
    assert!(service.store().listings().expect("read").is_empty());

    let [sale] = receipt.transactions.as_slice() else {
        panic!("expected one sale transaction");
    };
    assert_eq!(sale.kind, TransactionKind::Sale);
    assert_eq!(sale.status, TransactionStatus::Completed);
}

#[test]
fn concurrent_buyers_exactly_one_wins() {
    let service = service(market(5_000));
    service.list_card(AccountId(1), CardId(7), 1_000).expect("list");

    let barrier = Barrier::new(2);
    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = [AccountId(2), AccountId(3)]
            .into_iter()
            .map(|buyer| {
                let service = &service;
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    service.buy_card(buyer, CardId(7))
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("buyer thread"))
            .collect()
    });

    let wins = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(wins, 1);
    let loss = results
        .iter()
        .find_map(|result| result.as_ref().err())
        .expect("one buyer lost");
    assert_eq!(
        loss,
        &RuntimeError::Engine(EngineError::NotFound(Missing::Listing(CardId(7))))
    );

    // Exactly one buyer paid; the seller was paid once.
    let spent = [2, 3]
        .iter()
        .filter(|&&id| balances(&service, id).gold == 4_000)
        .count();
    assert_eq!(spent, 1);
    assert_eq!(balances(&service, 1).gold, 950);
}

#[test]
fn insufficient_funds_leaves_everything_untouched() {
    let service = service(market(100));
    service.list_card(AccountId(1), CardId(7), 150).expect("list");

    let err = service.buy_card(AccountId(2), CardId(7)).unwrap_err();
    assert_eq!(
        err,
        RuntimeError::Engine(EngineError::InsufficientFunds {
            account: AccountId(2),
            currency: arena_core::Currency::Gold,
            required: 150,
            available: 100,
        })
    );
    assert_eq!(balances(&service, 2), Balances::new(100, 0, 0));
    assert_eq!(balances(&service, 1), Balances::new(0, 0, 0));
    let stored = service.store().card(CardId(7)).expect("read").expect("card");
    assert_eq!(stored.owner, AccountId(1));
    assert_eq!(service.store().listings().expect("read").len(), 1);
    assert!(service.store().transactions().expect("read").is_empty());
}

#[test]
fn only_the_seller_cancels() {
    let service = service(market(0));
    service.list_card(AccountId(1), CardId(7), 500).expect("list");

    let err = service.cancel_listing(AccountId(2), CardId(7)).unwrap_err();
    assert!(matches!(
        err,
        RuntimeError::Engine(EngineError::Unauthorized { .. })
    ));
    service.cancel_listing(AccountId(1), CardId(7)).expect("cancel");
    assert!(service.store().listings().expect("read").is_empty());
}

#[test]
fn refunded_dispute_returns_seller_net() {
    let service = service(market(1_000));
    service.list_card(AccountId(1), CardId(7), 1_000).expect("list");
    let sale = service.buy_card(AccountId(2), CardId(7)).expect("buy").value;

    service.open_dispute(AccountId(2), sale.transaction).expect("open");
    let refund = service
        .resolve_dispute(sale.transaction, arena_core::economy::DisputeVerdict::Refund)
        .expect("resolve")
        .value
        .expect("refund");

    assert_eq!(balances(&service, 1).gold, 0);
    assert_eq!(balances(&service, 2).gold, 950);
    let refund = service.store().transaction(refund).expect("read").expect("refund");
    assert_eq!(refund.related, Some(sale.transaction));
}

/// Store that lets another writer bump an account right before commits.
struct Interfering {
    inner: InMemoryEconomyStore,
    remaining: std::sync::atomic::AtomicU32,
    interfered: AtomicBool,
}

impl Interfering {
    fn new(inner: InMemoryEconomyStore, conflicts: u32) -> Self {
        Self {
            inner,
            remaining: std::sync::atomic::AtomicU32::new(conflicts),
            interfered: AtomicBool::new(false),
        }
    }

    fn bump(&self, id: AccountId) {
        let current = self.inner.account(id).expect("read").expect("account");
        let mut bumped = current.clone();
        bumped.balances.gems += 1;
        let changes = ChangeSet {
            accounts: vec![arena_core::economy::Staged {
                key: id,
                expected: Some(current.version),
                change: arena_core::economy::Change::Put(bumped),
            }],
            ..ChangeSet::default()
        };
        self.inner.commit(changes).expect("interfering commit");
    }
}

impl EconomyStore for Interfering {
    fn account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        self.inner.account(id)
    }

    fn card(&self, id: CardId) -> Result<Option<Card>, StoreError> {
        self.inner.card(id)
    }

    fn listing(&self, card: CardId) -> Result<Option<Listing>, StoreError> {
        self.inner.listing(card)
    }

    fn transaction(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError> {
        self.inner.transaction(id)
    }

    fn pack_sales(&self, kind: PackKind) -> Result<Option<PackSales>, StoreError> {
        self.inner.pack_sales(kind)
    }

    fn next_card_id(&self) -> Result<CardId, StoreError> {
        self.inner.next_card_id()
    }

    fn next_transaction_id(&self) -> Result<TransactionId, StoreError> {
        self.inner.next_transaction_id()
    }

    fn commit(&self, changes: ChangeSet) -> Result<(), StoreError> {
        let left = self.remaining.load(Ordering::SeqCst);
        if left > 0 {
            self.remaining.store(left - 1, Ordering::SeqCst);
            self.interfered.store(true, Ordering::SeqCst);
            self.bump(AccountId(2));
        }
        self.inner.commit(changes)
    }
}

fn interfering_service(conflicts: u32) -> ArenaService<Interfering, FixedClock> {
    ArenaService::with_clock(
        Interfering::new(
            InMemoryEconomyStore::new()
                .with_account(account(1, 0))
                .with_account(account(2, 1_000)),
            conflicts,
        ),
        RuntimeConfig::default().with_max_commit_attempts(3),
        FixedClock::new(NOW),
    )
}

#[test]
fn conflicting_commit_is_retried_with_fresh_reads() {
    let service = interfering_service(1);
    service
        .transfer(AccountId(2), AccountId(1), arena_core::Currency::Gold, 300, 0)
        .expect("transfer after retry");

    assert!(service.store().interfered.load(Ordering::SeqCst));
    let payer = service.account(AccountId(2)).expect("read").expect("account");
    // Both the concurrent write and the transfer landed.
    assert_eq!(payer.balances.gems, 1);
    assert_eq!(payer.balances.gold, 700);
}

#[test]
fn persistent_conflicts_give_up_contended() {
    let service = interfering_service(10);
    let err = service
        .transfer(AccountId(2), AccountId(1), arena_core::Currency::Gold, 300, 0)
        .unwrap_err();

    assert_eq!(err, RuntimeError::Engine(EngineError::Contended { attempts: 3 }));
    let payer = service.account(AccountId(2)).expect("read").expect("account");
    assert_eq!(payer.balances.gold, 1_000);
    assert_eq!(payer.balances.gems, 3);
}
