//! Balances, transactions and the flows that move them.
//!
//! Every flow is a method on [`LedgerTx`]: it validates, stages changes and
//! returns a value, but writes nothing. [`LedgerTx::commit`] publishes the
//! whole unit of work through [`EconomyStore::commit`] or nothing at all.

pub mod account;
pub mod claims;
pub mod disputes;
pub mod ledger;
pub mod market;
pub mod packs;
pub mod settlement;
pub mod store;
pub mod transaction;
pub mod upgrade;

pub use account::{Account, Balances, Currency, DailyPurchases, Resource, VipStatus};
pub use claims::{Placement, RewardGrant};
pub use disputes::DisputeVerdict;
pub use ledger::{EconomyLedger, LedgerTx, Payment, Receipt};
pub use market::{Listing, MARKET_CURRENCY, Sale};
pub use packs::{PackKind, PackOpening, PackSales, discounted_price};
pub use settlement::{BattleRequest, Opponent};
pub use store::{Change, ChangeSet, EconomyStore, Staged, Versioned};
pub use transaction::{
    Charges, Transaction, TransactionKind, TransactionStatus, basis_points,
};
pub use upgrade::{UPGRADE_CURRENCY, UpgradeOutcome, UpgradeResolver};
