//! Storage contract for economy records.
//!
//! The engine reads records through [`EconomyStore`] and hands back one
//! [`ChangeSet`] per unit of work. The store applies it atomically and only
//! if every record the unit of work read still carries the version it was
//! read at; otherwise it reports [`StoreError::Conflict`] and applies
//! nothing.

use crate::card::Card;
use crate::error::StoreError;
use crate::ids::{AccountId, CardId, TransactionId, Version};

use super::account::Account;
use super::market::Listing;
use super::packs::{PackKind, PackSales};
use super::transaction::Transaction;

/// Records that carry an optimistic-concurrency version.
pub trait Versioned {
    fn version(&self) -> Version;

    fn set_version(&mut self, version: Version);
}

macro_rules! impl_versioned {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Versioned for $ty {
                fn version(&self) -> Version {
                    self.version
                }

                fn set_version(&mut self, version: Version) {
                    self.version = version;
                }
            }
        )*
    };
}

impl_versioned!(Account, Card, Listing, Transaction, PackSales);

/// What a unit of work does to one record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Change<T> {
    /// Read only; the version must still match.
    Keep,
    Put(T),
    Delete,
}

/// One record touched by a unit of work.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Staged<K, T> {
    pub key: K,
    /// Version observed when read; `None` means the record did not exist.
    pub expected: Option<Version>,
    pub change: Change<T>,
}

impl<K, T> Staged<K, T> {
    pub fn is_write(&self) -> bool {
        !matches!(self.change, Change::Keep)
    }
}

/// Every record read or written by one unit of work.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChangeSet {
    pub accounts: Vec<Staged<AccountId, Account>>,
    pub cards: Vec<Staged<CardId, Card>>,
    pub listings: Vec<Staged<CardId, Listing>>,
    pub transactions: Vec<Staged<TransactionId, Transaction>>,
    pub pack_sales: Vec<Staged<PackKind, PackSales>>,
}

impl ChangeSet {
    /// Number of records this change set writes.
    pub fn writes(&self) -> usize {
        self.accounts.iter().filter(|s| s.is_write()).count()
            + self.cards.iter().filter(|s| s.is_write()).count()
            + self.listings.iter().filter(|s| s.is_write()).count()
            + self.transactions.iter().filter(|s| s.is_write()).count()
            + self.pack_sales.iter().filter(|s| s.is_write()).count()
    }
}

/// Backing store for accounts, cards, listings, transactions and pack sales.
///
/// Reads return owned snapshots. Identifier allocation is monotonic and may
/// leave gaps when a unit of work is abandoned.
pub trait EconomyStore {
    fn account(&self, id: AccountId) -> Result<Option<Account>, StoreError>;

    fn card(&self, id: CardId) -> Result<Option<Card>, StoreError>;

    /// Active listing for a card, if any.
    fn listing(&self, card: CardId) -> Result<Option<Listing>, StoreError>;

    fn transaction(&self, id: TransactionId) -> Result<Option<Transaction>, StoreError>;

    /// Sales counter for a pack type; `None` before the first sale.
    fn pack_sales(&self, kind: PackKind) -> Result<Option<PackSales>, StoreError>;

    fn next_card_id(&self) -> Result<CardId, StoreError>;

    fn next_transaction_id(&self) -> Result<TransactionId, StoreError>;

    /// Apply a change set atomically, checking every expected version.
    ///
    /// Written records are stored with their version advanced by one
    /// (a new record starts at `Version(1)`).
    fn commit(&self, changes: ChangeSet) -> Result<(), StoreError>;
}
