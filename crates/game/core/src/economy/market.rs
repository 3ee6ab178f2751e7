//! Player-to-player marketplace.

use crate::config::MarketParams;
use crate::error::{EngineError, Missing, Result};
use crate::ids::{AccountId, CardId, Timestamp, TransactionId, Version};

use super::account::Currency;
use super::ledger::{LedgerTx, Payment};
use super::store::EconomyStore;
use super::transaction::{Charges, TransactionKind, basis_points};

/// A card offered for sale. At most one active listing exists per card.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Listing {
    pub card: CardId,
    pub seller: AccountId,
    /// Asking price in gold.
    pub price: u64,
    pub listed_at: Timestamp,
    #[cfg_attr(feature = "serde", serde(default))]
    pub version: Version,
}

/// A completed marketplace purchase.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sale {
    pub listing: Listing,
    pub buyer: AccountId,
    pub charges: Charges,
    pub transaction: TransactionId,
}

/// Marketplace trades settle in gold.
pub const MARKET_CURRENCY: Currency = Currency::Gold;

impl<S: EconomyStore + ?Sized> LedgerTx<'_, S> {
    /// Offer an owned, unlisted card for `price`.
    pub fn list_card(
        &mut self,
        params: &MarketParams,
        seller: AccountId,
        card: CardId,
        price: u64,
    ) -> Result<Listing> {
        if !(params.min_price..=params.max_price).contains(&price) {
            return Err(EngineError::invalid("price outside marketplace bounds"));
        }
        self.account(seller)?;
        self.owned_card(seller, card)?;
        if self.listing(card)?.is_some() {
            return Err(EngineError::invalid("card is already listed"));
        }

        let listing = Listing {
            card,
            seller,
            price,
            listed_at: self.now(),
            version: Version::NEW,
        };
        self.put_listing(listing.clone());
        Ok(listing)
    }

    /// Withdraw a listing. Only the seller may cancel.
    pub fn cancel_listing(&mut self, seller: AccountId, card: CardId) -> Result<Listing> {
        let listing = self
            .listing(card)?
            .ok_or(EngineError::NotFound(Missing::Listing(card)))?;
        if listing.seller != seller {
            return Err(EngineError::Unauthorized {
                account: seller,
                card,
            });
        }
        self.remove_listing(card)
    }

    /// Buy a listed card: the buyer pays the asking price, the seller
    /// receives it minus fee and tax, and the card changes hands. A seller
    /// with an active VIP status also receives the platform's seller bonus.
    pub fn buy_card(
        &mut self,
        params: &MarketParams,
        buyer: AccountId,
        card: CardId,
    ) -> Result<Sale> {
        let listing = self
            .listing(card)?
            .cloned()
            .ok_or(EngineError::NotFound(Missing::Listing(card)))?;
        if listing.seller == buyer {
            return Err(EngineError::invalid("cannot buy your own listing"));
        }
        self.account(buyer)?;
        if self.card(card)?.owner != listing.seller {
            return Err(EngineError::Corrupted(format!(
                "{card} is listed by {} but owned by someone else",
                listing.seller
            )));
        }

        let now = self.now();
        let mut charges = Charges::assess(listing.price, params.fee_bps, params.tax_bps)?;
        if self.account(listing.seller)?.active_vip(now).is_some() {
            charges = charges.with_bonus(basis_points(listing.price, params.vip_seller_bonus_bps));
        }
        let transaction = self.pay(Payment {
            kind: TransactionKind::Sale,
            from: Some(buyer),
            to: Some(listing.seller),
            card: Some(card),
            currency: MARKET_CURRENCY,
            charges,
        })?;
        self.remove_listing(card)?;
        self.card_mut(card)?.owner = buyer;

        Ok(Sale {
            listing,
            buyer,
            charges,
            transaction,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Archetype, Card, CardStats, Rarity};
    use crate::economy::ledger::tests::{TestStore, funded};
    use crate::economy::EconomyLedger;
    use crate::config::EngineConfig;
    use crate::economy::VipStatus;

    fn card(id: u64, owner: u64) -> Card {
        Card::new(
            CardId(id),
            3,
            Archetype::Mage,
            Rarity::Rare,
            CardStats::new(30, 20, 90),
            AccountId(owner),
        )
    }

    fn market() -> TestStore {
        TestStore::default()
            .with_account(funded(1, 0))
            .with_account(funded(2, 2_000))
            .with_card(card(7, 1))
    }

    #[test]
    fn sale_moves_card_and_gold_minus_fee() {
        let store = market();
        let config = EngineConfig::default();
        let ledger = EconomyLedger::new(&store, &config);

        ledger
            .run(5, |tx, cfg| tx.list_card(&cfg.market, AccountId(1), CardId(7), 1_000))
            .expect("list");
        let sale = ledger
            .run(6, |tx, cfg| tx.buy_card(&cfg.market, AccountId(2), CardId(7)))
            .expect("buy")
            .value;

        assert_eq!((sale.charges.fee, sale.charges.net), (50, 950));
        assert_eq!(store.balances(AccountId(1)).gold, 950);
        assert_eq!(store.balances(AccountId(2)).gold, 1_000);
        assert_eq!(store.cards.borrow()[&CardId(7)].owner, AccountId(2));
        assert!(store.listings.borrow().is_empty());
    }

    #[test]
    fn vip_seller_receives_platform_bonus() {
        let seller = funded(1, 0).with_vip(VipStatus {
            shop_discount: 0,
            reward_boost: 0,
            expires_at: 100,
        });
        let store = TestStore::default()
            .with_account(seller)
            .with_account(funded(2, 2_000))
            .with_card(card(7, 1));
        let config = EngineConfig::default();
        let ledger = EconomyLedger::new(&store, &config);

        ledger
            .run(5, |tx, cfg| tx.list_card(&cfg.market, AccountId(1), CardId(7), 1_000))
            .expect("list");
        let sale = ledger
            .run(6, |tx, cfg| tx.buy_card(&cfg.market, AccountId(2), CardId(7)))
            .expect("buy")
            .value;

        // 1000 - 50 fee - 0 tax + 10 bonus
        assert_eq!(sale.charges.bonus, 10);
        assert_eq!(sale.charges.net, 960);
        assert_eq!(
            sale.charges.price - sale.charges.fee - sale.charges.tax + sale.charges.bonus,
            sale.charges.net
        );
        assert_eq!(store.balances(AccountId(1)).gold, 960);
        assert_eq!(store.balances(AccountId(2)).gold, 1_000);
    }

    #[test]
    fn expired_vip_earns_no_bonus() {
        let seller = funded(1, 0).with_vip(VipStatus {
            shop_discount: 0,
            reward_boost: 0,
            expires_at: 6,
        });
        let store = TestStore::default()
            .with_account(seller)
            .with_account(funded(2, 2_000))
            .with_card(card(7, 1));
        let config = EngineConfig::default();
        let ledger = EconomyLedger::new(&store, &config);

        ledger
            .run(5, |tx, cfg| tx.list_card(&cfg.market, AccountId(1), CardId(7), 1_000))
            .expect("list");
        let sale = ledger
            .run(6, |tx, cfg| tx.buy_card(&cfg.market, AccountId(2), CardId(7)))
            .expect("buy")
            .value;
        assert_eq!((sale.charges.bonus, sale.charges.net), (0, 950));
    }

    #[test]
    fn listing_rules() {
        let store = market();
        let config = EngineConfig::default();
        let ledger = EconomyLedger::new(&store, &config);
        let list = |seller: u64, price: u64| {
            ledger.run(0, |tx, cfg| {
                tx.list_card(&cfg.market, AccountId(seller), CardId(7), price)
            })
        };

        assert_eq!(
            list(1, 5).unwrap_err(),
            EngineError::invalid("price outside marketplace bounds")
        );
        assert_eq!(
            list(2, 100).unwrap_err(),
            EngineError::Unauthorized {
                account: AccountId(2),
                card: CardId(7)
            }
        );
        list(1, 100).expect("first listing");
        assert_eq!(
            list(1, 200).unwrap_err(),
            EngineError::invalid("card is already listed")
        );
    }

    #[test]
    fn own_listing_and_cancelled_listing_cannot_be_bought() {
        let store = market();
        let config = EngineConfig::default();
        let ledger = EconomyLedger::new(&store, &config);
        ledger
            .run(0, |tx, cfg| tx.list_card(&cfg.market, AccountId(1), CardId(7), 500))
            .expect("list");

        let err = ledger
            .run(0, |tx, cfg| tx.buy_card(&cfg.market, AccountId(1), CardId(7)))
            .unwrap_err();
        assert_eq!(err, EngineError::invalid("cannot buy your own listing"));

        let err = ledger
            .run(0, |tx, _| tx.cancel_listing(AccountId(2), CardId(7)))
            .unwrap_err();
        assert!(matches!(err, EngineError::Unauthorized { .. }));

        ledger
            .run(0, |tx, _| tx.cancel_listing(AccountId(1), CardId(7)))
            .expect("cancel");
        let err = ledger
            .run(0, |tx, cfg| tx.buy_card(&cfg.market, AccountId(2), CardId(7)))
            .unwrap_err();
        assert_eq!(err, EngineError::NotFound(Missing::Listing(CardId(7))));
    }

    #[test]
    fn buyer_short_of_gold_changes_nothing() {
        let store = market();
        let config = EngineConfig::default();
        let ledger = EconomyLedger::new(&store, &config);
        ledger
            .run(0, |tx, cfg| tx.list_card(&cfg.market, AccountId(1), CardId(7), 5_000))
            .expect("list");
        let commits = store.commits.get();

        let err = ledger
            .run(0, |tx, cfg| tx.buy_card(&cfg.market, AccountId(2), CardId(7)))
            .unwrap_err();
        assert!(matches!(err, EngineError::InsufficientFunds { required: 5_000, .. }));
        assert_eq!(store.commits.get(), commits);
        assert_eq!(store.cards.borrow()[&CardId(7)].owner, AccountId(1));
        assert_eq!(store.listings.borrow().len(), 1);
    }
}
