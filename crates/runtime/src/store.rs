//! In-memory economy store with optimistic concurrency.
//!
//! All tables sit behind one lock so a change set is checked and applied as a
//! single step. Reads hand out clones; identifiers come from atomic counters.

use std::collections::BTreeMap;
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use arena_core::economy::{
    Change, ChangeSet, EconomyStore, Listing, PackKind, PackSales, Staged, Versioned,
};
use arena_core::{Account, AccountId, Card, CardId, StoreError, Transaction, TransactionId, Version};

#[derive(Debug, Default)]
struct Tables {
    accounts: BTreeMap<AccountId, Account>,
    cards: BTreeMap<CardId, Card>,
    listings: BTreeMap<CardId, Listing>,
    transactions: BTreeMap<TransactionId, Transaction>,
    pack_sales: BTreeMap<PackKind, PackSales>,
}

/// Thread-safe [`EconomyStore`] for tests, simulations and single-node use.
///
/// Not persistent across process restarts.
#[derive(Debug)]
pub struct InMemoryEconomyStore {
    tables: RwLock<Tables>,
    card_seq: AtomicU64,
    transaction_seq: AtomicU64,
}

impl Default for InMemoryEconomyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryEconomyStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            card_seq: AtomicU64::new(1),
            transaction_seq: AtomicU64::new(1),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.tables
            .read()
            .map_err(|_| StoreError::Backend("economy store lock was poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.tables
            .write()
            .map_err(|_| StoreError::Backend("economy store lock was poisoned".into()))
    }

    /// Seed an account, replacing any existing record.
    pub fn insert_account(&self, account: Account) -> Result<(), StoreError> {
        self.write()?.seed_account(account);
        Ok(())
    }

    /// Seed a card. Later minted ids never collide with seeded ones.
    pub fn insert_card(&self, card: Card) -> Result<(), StoreError> {
        self.reserve_card_id(card.id);
        self.write()?.seed_card(card);
        Ok(())
    }

    /// Builder form of [`Self::insert_account`]. The store is owned here, so
    /// a poisoned lock still yields its tables.
    #[must_use]
    pub fn with_account(mut self, account: Account) -> Self {
        self.tables
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .seed_account(account);
        self
    }

    #[must_use]
    pub fn with_card(mut self, card: Card) -> Self {
        self.reserve_card_id(card.id);
        self.tables
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .seed_card(card);
        self
    }

    fn reserve_card_id(&self, id: CardId) {
        self.card_seq.fetch_max(id.0.saturating_add(1), Ordering::SeqCst);
    }

    /// Cards currently owned by `owner`, ordered by id.
    pub fn cards_of(&self, owner: AccountId) -> Result<Vec<Card>, StoreError> {
        Ok(self
            .read()?
            .cards
            .values()
            .filter(|card| card.owner == owner)
            .cloned()
            .collect())
    }

    pub fn listings(&self) -> Result<Vec<Listing>, StoreError> {
        Ok(self.read()?.listings.values().cloned().collect())
    }

    /// Every recorded transaction, ordered by id.
    pub fn transactions(&self) -> Result<Vec<Transaction>, StoreError> {
        Ok(self.read()?.transactions.values().cloned().collect())
    }
}

impl Tables {
    fn seed_account(&mut self, mut account: Account) {
        seeded(&mut account);
        self.accounts.insert(account.id, account);
    }

    fn seed_card(&mut self, mut card: Card) {
        seeded(&mut card);
        self.cards.insert(card.id, card);
    }
}

/// Hand out the counter's value and advance it. A counter at `u64::MAX` is
/// exhausted: that id is either seeded or would never be followed by another.
fn next_id(seq: &AtomicU64, what: &str) -> Result<u64, StoreError> {
    seq.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |next| next.checked_add(1))
        .map_err(|_| StoreError::Backend(format!("{what} id space exhausted")))
}

fn seeded<T: Versioned>(record: &mut T) {
    if record.version() == Version::NEW {
        record.set_version(Version::NEW.next());
    }
}

fn check<K, T>(table: &BTreeMap<K, T>, staged: &[Staged<K, T>], label: &str) -> Result<(), StoreError>
where
    K: Ord + Display,
    T: Versioned,
{
    for entry in staged {
        let current = table.get(&entry.key).map(Versioned::version);
        if current != entry.expected {
            return Err(StoreError::Conflict(format!("{label} {}", entry.key)));
        }
    }
    Ok(())
}

fn apply<K: Ord, T: Versioned>(table: &mut BTreeMap<K, T>, staged: Vec<Staged<K, T>>) {
    for entry in staged {
        match entry.change {
            Change::Keep => {}
            Change::Put(mut record) => {
                record.set_version(entry.expected.unwrap_or(Version::NEW).next());
                table.insert(entry.key, record);
            }
            Change::Delete => {
                table.remove(&entry.key);
            }
        }
    }
}

impl EconomyStore for InMemoryEconomyStore {
    fn account(&self, id: AccountId) -> Result<Option<Account>, StoreError> {
        Ok(self.read()?.accounts.get(&id).cloned())
    }

    fn card(&self, id: CardId) -> Result<Option<Card>, StoreError> {
        Ok(self.read()?.cards.get(&id).cloned())
    }

    fn listing(&self, card: CardId) -> Result<Option<Listing>, StoreError> {
        Ok(self.read()?.listings.get(&card).cloned())
    }

    fn transaction(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError> {
        Ok(self.read()?.transactions.get(&id).cloned())
    }

    fn pack_sales(&self, kind: PackKind) -> Result<Option<PackSales>, StoreError> {
        Ok(self.read()?.pack_sales.get(&kind).copied())
    }

    fn next_card_id(&self) -> Result<CardId, StoreError> {
        next_id(&self.card_seq, "card").map(CardId)
    }

    fn next_transaction_id(&self) -> Result<TransactionId, StoreError> {
        next_id(&self.transaction_seq, "transaction").map(TransactionId)
    }

    fn commit(&self, changes: ChangeSet) -> Result<(), StoreError> {
        let mut tables = self.write()?;

        check(&tables.accounts, &changes.accounts, "account")?;
        check(&tables.cards, &changes.cards, "card")?;
        check(&tables.listings, &changes.listings, "listing for")?;
        check(&tables.transactions, &changes.transactions, "transaction")?;
        check(&tables.pack_sales, &changes.pack_sales, "pack sales")?;

        apply(&mut tables.accounts, changes.accounts);
        apply(&mut tables.cards, changes.cards);
        apply(&mut tables.listings, changes.listings);
        apply(&mut tables.transactions, changes.transactions);
        apply(&mut tables.pack_sales, changes.pack_sales);
        Ok(())
    }
}
