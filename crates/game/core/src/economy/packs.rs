//! Card pack shop.

use crate::card::{Card, mint_card};
use crate::config::EngineConfig;
use crate::error::{EngineError, Limit, Result};
use crate::ids::{AccountId, TransactionId, Version};
use crate::rng::RandomSource;

use super::account::{Currency, DailyPurchases};
use super::ledger::{LedgerTx, Payment};
use super::store::EconomyStore;
use super::transaction::TransactionKind;

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PackKind {
    Basic,
    Premium,
    Legendary,
}

/// Global sales counter for a supply-capped pack.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackSales {
    pub kind: PackKind,
    pub sold: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub version: Version,
}

impl PackSales {
    pub const fn new(kind: PackKind) -> Self {
        Self {
            kind,
            sold: 0,
            version: Version::NEW,
        }
    }
}

/// An opened pack.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PackOpening {
    pub kind: PackKind,
    pub currency: Currency,
    /// Price after VIP discount.
    pub paid: u64,
    pub cards: Vec<Card>,
    pub transaction: TransactionId,
}

/// `price` reduced by `discount` percent, rounding down.
pub fn discounted_price(price: u64, discount: u32) -> u64 {
    let keep = 100 - u128::from(discount.min(100));
    (u128::from(price) * keep / 100) as u64
}

impl<S: EconomyStore + ?Sized> LedgerTx<'_, S> {
    /// Buy and open one pack.
    ///
    /// Checks run in order: daily purchase cap, supply cap, funds. Card
    /// rolls happen only after every check passed.
    pub fn purchase_pack(
        &mut self,
        config: &EngineConfig,
        rng: &mut dyn RandomSource,
        buyer: AccountId,
        kind: PackKind,
    ) -> Result<PackOpening> {
        let now = self.now();
        let rules = *config.shop.packs.get(kind);

        let account = self.account(buyer)?;
        let vip = account.active_vip(now).copied();
        let purchases = account.daily_purchases.current(now);
        let limit = match vip {
            Some(_) => config.shop.vip_daily_purchase_limit,
            None => config.shop.daily_purchase_limit,
        };
        if purchases.count >= limit {
            return Err(EngineError::LimitExceeded(Limit::DailyPurchases));
        }

        let sales = match rules.supply {
            Some(cap) => {
                let sales = self.pack_sales(kind)?;
                if sales.sold >= cap {
                    return Err(EngineError::LimitExceeded(Limit::PackSupply));
                }
                Some(sales)
            }
            None => None,
        };

        let paid = discounted_price(rules.price, vip.map_or(0, |vip| vip.shop_discount));
        let transaction = self.pay(Payment::spend(
            TransactionKind::Purchase,
            buyer,
            rules.currency,
            paid,
        ))?;

        self.account_mut(buyer)?.daily_purchases = DailyPurchases {
            count: purchases.count + 1,
            reset_at: purchases.reset_at,
        };
        if let Some(sales) = sales {
            self.put_pack_sales(PackSales {
                sold: sales.sold + 1,
                ..sales
            });
        }

        let mut cards = Vec::with_capacity(rules.cards as usize);
        for _ in 0..rules.cards {
            let rarity = rules.roll_rarity(rng.next_u32());
            let id = self.next_card_id()?;
            let card = mint_card(&config.minting, &config.rarities, rng, id, rarity, buyer);
            self.insert_card(card.clone());
            cards.push(card);
        }

        Ok(PackOpening {
            kind,
            currency: rules.currency,
            paid,
            cards,
            transaction,
        })
    }
}
