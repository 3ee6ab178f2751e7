//! Units of work over an [`EconomyStore`].
//!
//! A [`LedgerTx`] reads records lazily, caches them with the version they
//! were read at, and stages every mutation in memory. Nothing reaches the
//! store until [`LedgerTx::commit`], which hands the whole [`ChangeSet`] to
//! the store in one call. An error anywhere before that point discards the
//! unit of work, so validation failures can never leave partial writes.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::card::Card;
use crate::config::EngineConfig;
use crate::error::{EngineError, Missing, Result, StoreError};
use crate::ids::{AccountId, CardId, Timestamp, TransactionId, Version};
use crate::reward::RewardBundle;

use super::account::{Account, Currency, Resource};
use super::market::Listing;
use super::packs::{PackKind, PackSales};
use super::store::{Change, ChangeSet, EconomyStore, Staged, Versioned};
use super::transaction::{Charges, Transaction, TransactionKind, TransactionStatus};

struct Slot<T> {
    expected: Option<Version>,
    value: Option<T>,
    dirty: bool,
}

/// Read-through cache of one record type.
struct Records<K, T> {
    slots: BTreeMap<K, Slot<T>>,
}

impl<K, T> Default for Records<K, T> {
    fn default() -> Self {
        Self {
            slots: BTreeMap::new(),
        }
    }
}

impl<K: Ord + Copy, T: Versioned> Records<K, T> {
    fn load(
        &mut self,
        key: K,
        fetch: impl FnOnce(K) -> std::result::Result<Option<T>, StoreError>,
    ) -> std::result::Result<&mut Slot<T>, StoreError> {
        match self.slots.entry(key) {
            Entry::Occupied(slot) => Ok(slot.into_mut()),
            Entry::Vacant(slot) => {
                let value = fetch(key)?;
                Ok(slot.insert(Slot {
                    expected: value.as_ref().map(Versioned::version),
                    value,
                    dirty: false,
                }))
            }
        }
    }

    /// Stage a brand-new record, or overwrite one already loaded.
    fn put(&mut self, key: K, value: T) {
        let slot = self.slots.entry(key).or_insert(Slot {
            expected: None,
            value: None,
            dirty: false,
        });
        slot.value = Some(value);
        slot.dirty = true;
    }

    fn into_staged(self) -> Vec<Staged<K, T>> {
        self.slots
            .into_iter()
            .filter_map(|(key, slot)| {
                let change = match (slot.dirty, slot.value) {
                    (false, _) => Change::Keep,
                    (true, Some(value)) => Change::Put(value),
                    (true, None) if slot.expected.is_some() => Change::Delete,
                    // created and removed again inside the unit of work
                    (true, None) => return None,
                };
                Some(Staged {
                    key,
                    expected: slot.expected,
                    change,
                })
            })
            .collect()
    }
}

/// A money movement to apply and record as one completed transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Payment {
    pub kind: TransactionKind,
    /// Debited `charges.price`; `None` when the platform pays.
    pub from: Option<AccountId>,
    /// Credited `charges.net`; `None` when the platform receives.
    pub to: Option<AccountId>,
    pub card: Option<CardId>,
    pub currency: Currency,
    pub charges: Charges,
}

impl Payment {
    /// Platform-funded credit.
    pub const fn reward(to: AccountId, currency: Currency, amount: u64) -> Self {
        Self {
            kind: TransactionKind::Reward,
            from: None,
            to: Some(to),
            card: None,
            currency,
            charges: Charges::flat(amount),
        }
    }

    /// Debit paid to the platform.
    pub const fn spend(
        kind: TransactionKind,
        from: AccountId,
        currency: Currency,
        amount: u64,
    ) -> Self {
        Self {
            kind,
            from: Some(from),
            to: None,
            card: None,
            currency,
            charges: Charges::flat(amount),
        }
    }

    #[must_use]
    pub const fn for_card(mut self, card: CardId) -> Self {
        self.card = Some(card);
        self
    }
}

/// A staged unit of work.
pub struct LedgerTx<'s, S: EconomyStore + ?Sized> {
    store: &'s S,
    now: Timestamp,
    accounts: Records<AccountId, Account>,
    cards: Records<CardId, Card>,
    listings: Records<CardId, Listing>,
    transactions: Records<TransactionId, Transaction>,
    pack_sales: Records<PackKind, PackSales>,
    recorded: Vec<TransactionId>,
}

impl<'s, S: EconomyStore + ?Sized> LedgerTx<'s, S> {
    pub fn new(store: &'s S, now: Timestamp) -> Self {
        Self {
            store,
            now,
            accounts: Records::default(),
            cards: Records::default(),
            listings: Records::default(),
            transactions: Records::default(),
            pack_sales: Records::default(),
            recorded: Vec::new(),
        }
    }

    pub fn now(&self) -> Timestamp {
        self.now
    }

    // ---- accounts -------------------------------------------------------

    pub fn account(&mut self, id: AccountId) -> Result<&Account> {
        self.account_slot(id).map(|account| &*account)
    }

    pub fn account_mut(&mut self, id: AccountId) -> Result<&mut Account> {
        let store = self.store;
        let slot = self.accounts.load(id, |id| store.account(id))?;
        slot.dirty = true;
        slot.value
            .as_mut()
            .ok_or(EngineError::NotFound(Missing::Account(id)))
    }

    fn account_slot(&mut self, id: AccountId) -> Result<&mut Account> {
        let store = self.store;
        self.accounts
            .load(id, |id| store.account(id))?
            .value
            .as_mut()
            .ok_or(EngineError::NotFound(Missing::Account(id)))
    }

    /// Remove `amount` of `currency`, failing before any change when the
    /// balance is short.
    pub fn debit(&mut self, account: AccountId, currency: Currency, amount: u64) -> Result<()> {
        let available = self.account(account)?.balance(currency);
        if available < amount {
            return Err(EngineError::InsufficientFunds {
                account,
                currency,
                required: amount,
                available,
            });
        }
        *self.account_mut(account)?.balances.get_mut(currency) = available - amount;
        Ok(())
    }

    pub fn credit(&mut self, account: AccountId, currency: Currency, amount: u64) -> Result<()> {
        let balance = self.account_mut(account)?.balances.get_mut(currency);
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| EngineError::Corrupted(format!("{currency} balance of {account} overflows")))?;
        Ok(())
    }

    /// Spend energy or tickets.
    pub fn consume(&mut self, account: AccountId, resource: Resource, amount: u32) -> Result<()> {
        if amount == 0 {
            return Ok(());
        }
        let available = self.account(account)?.resource(resource);
        if available < amount {
            return Err(EngineError::InsufficientResource {
                account,
                resource,
                required: amount,
                available,
            });
        }
        *self.account_mut(account)?.resource_mut(resource) = available - amount;
        Ok(())
    }

    // ---- cards ----------------------------------------------------------

    pub fn card(&mut self, id: CardId) -> Result<&Card> {
        let store = self.store;
        self.cards
            .load(id, |id| store.card(id))?
            .value
            .as_ref()
            .ok_or(EngineError::NotFound(Missing::Card(id)))
    }

    pub fn card_mut(&mut self, id: CardId) -> Result<&mut Card> {
        let store = self.store;
        let slot = self.cards.load(id, |id| store.card(id))?;
        slot.dirty = true;
        slot.value
            .as_mut()
            .ok_or(EngineError::NotFound(Missing::Card(id)))
    }

    /// Load a card and check that `account` owns it.
    pub fn owned_card(&mut self, account: AccountId, id: CardId) -> Result<&Card> {
        let card = self.card(id)?;
        if card.owner != account {
            return Err(EngineError::Unauthorized { account, card: id });
        }
        Ok(card)
    }

    /// Stage a freshly minted card.
    pub fn insert_card(&mut self, card: Card) {
        self.cards.put(card.id, card);
    }

    pub fn remove_card(&mut self, id: CardId) -> Result<Card> {
        let store = self.store;
        let slot = self.cards.load(id, |id| store.card(id))?;
        let card = slot
            .value
            .take()
            .ok_or(EngineError::NotFound(Missing::Card(id)))?;
        slot.dirty = true;
        Ok(card)
    }

    pub fn next_card_id(&mut self) -> Result<CardId> {
        Ok(self.store.next_card_id()?)
    }

    // ---- listings -------------------------------------------------------

    pub fn listing(&mut self, card: CardId) -> Result<Option<&Listing>> {
        let store = self.store;
        Ok(self
            .listings
            .load(card, |card| store.listing(card))?
            .value
            .as_ref())
    }

    /// Stage a listing. The slot must have been read through
    /// [`listing`](Self::listing) first so its absence is version-checked.
    pub fn put_listing(&mut self, listing: Listing) {
        self.listings.put(listing.card, listing);
    }

    pub fn remove_listing(&mut self, card: CardId) -> Result<Listing> {
        let store = self.store;
        let slot = self.listings.load(card, |card| store.listing(card))?;
        let listing = slot
            .value
            .take()
            .ok_or(EngineError::NotFound(Missing::Listing(card)))?;
        slot.dirty = true;
        Ok(listing)
    }

    // ---- pack sales -----------------------------------------------------

    pub fn pack_sales(&mut self, kind: PackKind) -> Result<PackSales> {
        let store = self.store;
        let slot = self.pack_sales.load(kind, |kind| store.pack_sales(kind))?;
        Ok(slot.value.unwrap_or_else(|| PackSales::new(kind)))
    }

    pub fn put_pack_sales(&mut self, sales: PackSales) {
        self.pack_sales.put(sales.kind, sales);
    }

    // ---- transactions ---------------------------------------------------

    pub fn transaction(&mut self, id: TransactionId) -> Result<&Transaction> {
        let store = self.store;
        self.transactions
            .load(id, |id| store.transaction(id))?
            .value
            .as_ref()
            .ok_or(EngineError::NotFound(Missing::Transaction(id)))
    }

    pub fn transaction_mut(&mut self, id: TransactionId) -> Result<&mut Transaction> {
        let store = self.store;
        let slot = self.transactions.load(id, |id| store.transaction(id))?;
        slot.dirty = true;
        slot.value
            .as_mut()
            .ok_or(EngineError::NotFound(Missing::Transaction(id)))
    }

    /// Move funds and record exactly one completed transaction.
    ///
    /// The payer is checked before anything is staged, so a short balance
    /// reports [`EngineError::InsufficientFunds`] with no change.
    pub fn pay(&mut self, payment: Payment) -> Result<TransactionId> {
        self.pay_related(payment, None)
    }

    /// [`pay`](Self::pay), linking the record to an earlier transaction.
    pub(crate) fn pay_related(
        &mut self,
        payment: Payment,
        related: Option<TransactionId>,
    ) -> Result<TransactionId> {
        if let Some(from) = payment.from {
            self.debit(from, payment.currency, payment.charges.price)?;
        }
        if let Some(to) = payment.to {
            self.credit(to, payment.currency, payment.charges.net)?;
        }
        self.record(payment, related)
    }

    /// Peer-to-peer transfer with a platform fee in basis points.
    ///
    /// `fee = floor(amount × fee_bps / 10000)` stays with the platform and
    /// the receiver gets `amount - fee`.
    pub fn transfer(
        &mut self,
        from: AccountId,
        to: AccountId,
        currency: Currency,
        amount: u64,
        fee_bps: u32,
    ) -> Result<TransactionId> {
        if from == to {
            return Err(EngineError::invalid("cannot transfer to the same account"));
        }
        self.pay(Payment {
            kind: TransactionKind::Trade,
            from: Some(from),
            to: Some(to),
            card: None,
            currency,
            charges: Charges::assess(amount, fee_bps, 0)?,
        })
    }

    /// Credit every non-zero currency of `bundle`, one transaction each.
    pub fn grant(&mut self, account: AccountId, bundle: RewardBundle) -> Result<Vec<TransactionId>> {
        // fail on a missing account even for an empty bundle
        self.account(account)?;
        [
            (Currency::Gold, bundle.gold),
            (Currency::Gems, bundle.gems),
            (Currency::Tokens, bundle.tokens),
        ]
        .into_iter()
        .filter(|(_, amount)| *amount > 0)
        .map(|(currency, amount)| self.pay(Payment::reward(account, currency, amount)))
        .collect()
    }

    fn record(
        &mut self,
        payment: Payment,
        related: Option<TransactionId>,
    ) -> Result<TransactionId> {
        let id = self.store.next_transaction_id()?;
        self.transactions.put(
            id,
            Transaction {
                id,
                kind: payment.kind,
                from: payment.from,
                to: payment.to,
                card: payment.card,
                currency: payment.currency,
                charges: payment.charges,
                status: TransactionStatus::Completed,
                created_at: self.now,
                related,
                disputed_at: None,
                version: Version::NEW,
            },
        );
        self.recorded.push(id);
        Ok(id)
    }

    /// Split into the change set and the transactions it records.
    pub fn into_changes(self) -> (ChangeSet, Vec<Transaction>) {
        let mut recorded: Vec<Transaction> = self
            .recorded
            .iter()
            .filter_map(|id| {
                self.transactions
                    .slots
                    .get(id)
                    .and_then(|slot| slot.value.clone())
            })
            .collect();
        for tx in &mut recorded {
            tx.set_version(Version::NEW.next());
        }

        let changes = ChangeSet {
            accounts: self.accounts.into_staged(),
            cards: self.cards.into_staged(),
            listings: self.listings.into_staged(),
            transactions: self.transactions.into_staged(),
            pack_sales: self.pack_sales.into_staged(),
        };
        (changes, recorded)
    }

    /// Apply the unit of work. On a version conflict nothing is written.
    pub fn commit(self) -> Result<Vec<Transaction>> {
        let store = self.store;
        let (changes, recorded) = self.into_changes();
        store.commit(changes)?;
        Ok(recorded)
    }
}

/// Result of a committed unit of work.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt<T> {
    pub value: T,
    pub transactions: Vec<Transaction>,
}

/// Entry point for economy operations against one store.
///
/// Each call is a single attempt: it stages a unit of work and commits it
/// once. Retrying on [`StoreError::Conflict`] is the caller's decision.
pub struct EconomyLedger<'a, S: EconomyStore + ?Sized> {
    store: &'a S,
    config: &'a EngineConfig,
}

impl<'a, S: EconomyStore + ?Sized> EconomyLedger<'a, S> {
    pub fn new(store: &'a S, config: &'a EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &'a EngineConfig {
        self.config
    }

    pub fn begin(&self, now: Timestamp) -> LedgerTx<'a, S> {
        LedgerTx::new(self.store, now)
    }

    /// Stage with `work` and commit the result.
    pub fn run<T>(
        &self,
        now: Timestamp,
        work: impl FnOnce(&mut LedgerTx<'a, S>, &EngineConfig) -> Result<T>,
    ) -> Result<Receipt<T>> {
        let mut tx = self.begin(now);
        let value = work(&mut tx, self.config)?;
        let transactions = tx.commit()?;
        Ok(Receipt {
            value,
            transactions,
        })
    }

    pub fn debit(
        &self,
        account: AccountId,
        currency: Currency,
        amount: u64,
        now: Timestamp,
    ) -> Result<Receipt<TransactionId>> {
        self.run(now, |tx, _| {
            tx.pay(Payment::spend(TransactionKind::Penalty, account, currency, amount))
        })
    }

    pub fn credit(
        &self,
        account: AccountId,
        currency: Currency,
        amount: u64,
        now: Timestamp,
    ) -> Result<Receipt<TransactionId>> {
        self.run(now, |tx, _| tx.pay(Payment::reward(account, currency, amount)))
    }

    pub fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        currency: Currency,
        amount: u64,
        fee_bps: u32,
        now: Timestamp,
    ) -> Result<Receipt<TransactionId>> {
        self.run(now, |tx, _| tx.transfer(from, to, currency, amount, fee_bps))
    }
}
