//! Transaction records and their status lifecycle.
//!
//! ```text
//! Pending ──▶ Completed ──▶ Disputed ──▶ Completed
//!    │                          │
//!    ├──▶ Failed                └──▶ Refunded
//!    └──▶ Disputed
//! ```

use crate::error::{EngineError, Result};
use crate::ids::{AccountId, CardId, Timestamp, TransactionId, Version};

use super::account::Currency;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum TransactionKind {
    Purchase,
    Sale,
    Upgrade,
    Trade,
    Reward,
    Penalty,
    Refund,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    Disputed,
    Refunded,
}

impl TransactionStatus {
    pub const fn can_become(self, next: TransactionStatus) -> bool {
        use TransactionStatus::*;
        matches!(
            (self, next),
            (Pending, Completed | Failed | Disputed)
                | (Completed, Disputed)
                | (Disputed, Completed | Refunded)
        )
    }

    pub const fn is_final(self) -> bool {
        matches!(self, Self::Failed | Self::Refunded)
    }
}

/// Price breakdown of a money movement.
///
/// `net = price - fee - tax + bonus`; it is fixed when the charges are
/// assessed and never recomputed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Charges {
    pub price: u64,
    pub fee: u64,
    pub tax: u64,
    pub bonus: u64,
    pub net: u64,
}

impl Charges {
    /// Charges with no deductions: `net == price`.
    pub const fn flat(price: u64) -> Self {
        Self {
            price,
            fee: 0,
            tax: 0,
            bonus: 0,
            net: price,
        }
    }

    /// Assess fee and tax as basis points of `price`, rounding down.
    pub fn assess(price: u64, fee_bps: u32, tax_bps: u32) -> Result<Self> {
        let fee = basis_points(price, fee_bps);
        let tax = basis_points(price, tax_bps);
        let net = price
            .checked_sub(fee)
            .and_then(|rest| rest.checked_sub(tax))
            .ok_or(EngineError::invalid("fee and tax exceed the price"))?;
        Ok(Self {
            price,
            fee,
            tax,
            bonus: 0,
            net,
        })
    }

    #[must_use]
    pub fn with_bonus(mut self, bonus: u64) -> Self {
        self.bonus = bonus;
        self.net = self.net.saturating_add(bonus);
        self
    }
}

/// `floor(amount * bps / 10_000)`.
pub fn basis_points(amount: u64, bps: u32) -> u64 {
    (u128::from(amount) * u128::from(bps) / 10_000) as u64
}

/// A single recorded money movement.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transaction {
    pub id: TransactionId,
    pub kind: TransactionKind,
    /// Paying account; `None` when the platform pays (rewards).
    pub from: Option<AccountId>,
    /// Receiving account; `None` when the platform receives (shop, upgrades).
    pub to: Option<AccountId>,
    pub card: Option<CardId>,
    pub currency: Currency,
    pub charges: Charges,
    pub status: TransactionStatus,
    pub created_at: Timestamp,
    /// Transaction this one reverses or refers to.
    #[cfg_attr(feature = "serde", serde(default))]
    pub related: Option<TransactionId>,
    /// When a dispute was opened. A sale can be disputed once.
    #[cfg_attr(feature = "serde", serde(default))]
    pub disputed_at: Option<Timestamp>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub version: Version,
}

impl Transaction {
    pub fn net(&self) -> u64 {
        self.charges.net
    }

    pub fn transition(&mut self, next: TransactionStatus) -> Result<()> {
        if !self.status.can_become(next) {
            return Err(EngineError::invalid("transaction status change not allowed"));
        }
        self.status = next;
        Ok(())
    }
}
