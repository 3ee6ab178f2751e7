//! Card upgrades: merge two identical cards for a chance at one level.

use crate::card::{Card, CardStats};
use crate::config::UpgradeParams;
use crate::error::{EngineError, Limit, Result};
use crate::ids::{AccountId, CardId, TransactionId};
use crate::rng::RandomSource;

use super::account::Currency;
use super::ledger::{LedgerTx, Payment};
use super::store::EconomyStore;
use super::transaction::TransactionKind;

/// Upgrades are paid in gold.
pub const UPGRADE_CURRENCY: Currency = Currency::Gold;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpgradeOutcome {
    pub success: bool,
    /// The surviving card as stored after the upgrade.
    pub card: Card,
    /// Card merged away; `None` when the roll failed.
    pub consumed: Option<CardId>,
    pub cost: u64,
    pub transaction: TransactionId,
}

/// Pure upgrade rules.
#[derive(Clone, Copy, Debug)]
pub struct UpgradeResolver<'a> {
    params: &'a UpgradeParams,
}

impl<'a> UpgradeResolver<'a> {
    pub fn new(params: &'a UpgradeParams) -> Self {
        Self { params }
    }

    /// Validate a pair and return the gold cost.
    pub fn check(&self, keep: &Card, consume: &Card) -> Result<u64> {
        if keep.id == consume.id {
            return Err(EngineError::invalid("a card cannot be merged with itself"));
        }
        if !keep.is_identical_to(consume) {
            return Err(EngineError::invalid("cards are not identical"));
        }
        if keep.level >= self.params.max_level {
            return Err(EngineError::LimitExceeded(Limit::CardLevel));
        }
        Ok(self.params.cost(keep.rarity, keep.level))
    }

    /// Roll against the success chance.
    pub fn roll(&self, rng: &mut dyn RandomSource) -> bool {
        rng.chance(self.params.success_chance)
    }

    /// Stats after a successful upgrade: each grows by the configured
    /// percentage, at least by one.
    pub fn grow(&self, stats: CardStats) -> CardStats {
        let grow = |value: u32| {
            let step = (u64::from(value) * u64::from(self.params.stat_growth_percent) / 100).max(1);
            (u64::from(value) + step).min(u64::from(u32::MAX)) as u32
        };
        CardStats::new(grow(stats.attack), grow(stats.defense), grow(stats.health))
    }
}

impl<S: EconomyStore + ?Sized> LedgerTx<'_, S> {
    /// Merge `consume` into `keep`.
    ///
    /// Every validation runs before gold is debited. The cost is spent
    /// whether or not the roll succeeds.
    pub fn upgrade_card(
        &mut self,
        params: &UpgradeParams,
        rng: &mut dyn RandomSource,
        requester: AccountId,
        keep: CardId,
        consume: CardId,
    ) -> Result<UpgradeOutcome> {
        let resolver = UpgradeResolver::new(params);

        self.account(requester)?;
        let kept = self.owned_card(requester, keep)?.clone();
        let merged = self.owned_card(requester, consume)?.clone();
        let cost = resolver.check(&kept, &merged)?;
        for id in [keep, consume] {
            if self.listing(id)?.is_some() {
                return Err(EngineError::invalid("listed cards cannot be upgraded"));
            }
        }

        let transaction = self.pay(
            Payment::spend(TransactionKind::Upgrade, requester, UPGRADE_CURRENCY, cost).for_card(keep),
        )?;

        if !resolver.roll(rng) {
            return Ok(UpgradeOutcome {
                success: false,
                card: kept,
                consumed: None,
                cost,
                transaction,
            });
        }

        self.remove_card(consume)?;
        let card = self.card_mut(keep)?;
        card.level += 1;
        card.stats = resolver.grow(card.stats);
        Ok(UpgradeOutcome {
            success: true,
            card: card.clone(),
            consumed: Some(consume),
            cost,
            transaction,
        })
    }
}
