//! Disputes over completed marketplace sales.

use crate::error::{EngineError, Result};
use crate::ids::{AccountId, TransactionId};

use super::ledger::{LedgerTx, Payment};
use super::store::EconomyStore;
use super::transaction::{Charges, Transaction, TransactionKind, TransactionStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DisputeVerdict {
    /// The sale stands.
    Uphold,
    /// The seller's net proceeds go back to the buyer.
    Refund,
}

impl<S: EconomyStore + ?Sized> LedgerTx<'_, S> {
    /// Flag a completed sale as disputed. Only the buyer may do this, and
    /// only once per sale.
    pub fn open_dispute(&mut self, buyer: AccountId, id: TransactionId) -> Result<Transaction> {
        let now = self.now();
        let tx = self.transaction(id)?;
        if tx.kind != TransactionKind::Sale {
            return Err(EngineError::invalid("only sales can be disputed"));
        }
        if tx.from != Some(buyer) {
            return Err(EngineError::invalid("only the buyer can dispute a sale"));
        }
        if tx.disputed_at.is_some() {
            return Err(EngineError::invalid("sale was already disputed"));
        }

        let tx = self.transaction_mut(id)?;
        tx.transition(TransactionStatus::Disputed)?;
        tx.disputed_at = Some(now);
        Ok(tx.clone())
    }

    /// Close a dispute.
    ///
    /// A refund takes the seller's net proceeds back as a new refund
    /// transaction. The buyer receives what they paid the seller; any
    /// platform seller bonus returns to the platform as the refund's fee.
    /// The card stays with the buyer; ownership disputes are settled
    /// outside the engine.
    pub fn resolve_dispute(
        &mut self,
        id: TransactionId,
        verdict: DisputeVerdict,
    ) -> Result<Option<TransactionId>> {
        let disputed = self.transaction(id)?.clone();
        if disputed.status != TransactionStatus::Disputed {
            return Err(EngineError::invalid("transaction is not disputed"));
        }

        let refund = match verdict {
            DisputeVerdict::Uphold => {
                self.transaction_mut(id)?
                    .transition(TransactionStatus::Completed)?;
                None
            }
            DisputeVerdict::Refund => {
                let refund = self.pay_related(
                    Payment {
                        kind: TransactionKind::Refund,
                        from: disputed.to,
                        to: disputed.from,
                        card: disputed.card,
                        currency: disputed.currency,
                        charges: Charges {
                            price: disputed.net(),
                            fee: disputed.charges.bonus,
                            tax: 0,
                            bonus: 0,
                            net: disputed.net() - disputed.charges.bonus,
                        },
                    },
                    Some(id),
                )?;
                self.transaction_mut(id)?
                    .transition(TransactionStatus::Refunded)?;
                Some(refund)
            }
        };
        Ok(refund)
    }
}
