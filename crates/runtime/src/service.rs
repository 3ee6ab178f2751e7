//! Request-level orchestration of economy flows.
//!
//! [`ArenaService`] runs every engine flow as a unit of work against an
//! [`EconomyStore`], retrying on commit conflicts with fresh reads. Randomness
//! for a request is derived once; each retry replays the same stream.

use std::sync::atomic::{AtomicU64, Ordering};

use arena_core::economy::{
    DisputeVerdict, LedgerTx, Listing, PackOpening, Placement, Receipt, RewardGrant, Sale,
    UpgradeOutcome,
};
use arena_core::reward::{AchievementTier, QuestDifficulty};
use arena_core::{
    Account, AccountId, BattleRequest, BattleResult, CardId, Currency, EconomyLedger,
    EconomyStore, EngineConfig, EngineError, PackKind, RandomSource, StoreError, TransactionId,
};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::RuntimeConfig;
use crate::error::Result;
use crate::random::{SeedPlan, StreamTag};

/// Entry point for running arena flows against a shared store.
///
/// `&ArenaService` can be used from many threads at once; the store's
/// versioned commit keeps concurrent requests consistent.
pub struct ArenaService<S: EconomyStore, C: Clock = SystemClock> {
    store: S,
    engine: EngineConfig,
    clock: C,
    max_commit_attempts: u32,
    rng_seed: u64,
    nonce: AtomicU64,
}

impl<S: EconomyStore> ArenaService<S> {
    pub fn new(store: S, config: RuntimeConfig) -> Self {
        Self::with_clock(store, config, SystemClock)
    }
}

impl<S: EconomyStore, C: Clock> ArenaService<S, C> {
    pub fn with_clock(store: S, config: RuntimeConfig, clock: C) -> Self {
        Self {
            store,
            engine: config.engine,
            clock,
            max_commit_attempts: config.max_commit_attempts.max(1),
            rng_seed: config.rng_seed,
            nonce: AtomicU64::new(0),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn engine(&self) -> &EngineConfig {
        &self.engine
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Current snapshot of an account.
    pub fn account(&self, id: AccountId) -> Result<Option<Account>> {
        Ok(self.store.account(id).map_err(EngineError::from)?)
    }

    fn seed_plan(&self, initiator: AccountId, tag: StreamTag) -> SeedPlan {
        SeedPlan {
            base: self.rng_seed,
            nonce: self.nonce.fetch_add(1, Ordering::Relaxed),
            initiator: initiator.0,
            tag,
        }
    }

    /// Stage and commit `work`, retrying on version conflicts.
    fn execute<T>(
        &self,
        operation: &'static str,
        plan: SeedPlan,
        work: impl Fn(&mut LedgerTx<'_, S>, &EngineConfig, &mut dyn RandomSource) -> arena_core::Result<T>,
    ) -> Result<Receipt<T>> {
        let ledger = EconomyLedger::new(&self.store, &self.engine);

        for attempt in 1..=self.max_commit_attempts {
            let mut rng = plan.rng();
            let now = self.clock.now();
            debug!(operation, attempt, now, "staging unit of work");

            match ledger.run(now, |tx, config| work(tx, config, &mut rng)) {
                Ok(receipt) => {
                    if attempt > 1 {
                        info!(operation, attempt, "committed after retrying");
                    }
                    return Ok(receipt);
                }
                Err(EngineError::Store(StoreError::Conflict(record))) => {
                    warn!(
                        operation,
                        attempt,
                        max_attempts = self.max_commit_attempts,
                        %record,
                        "commit conflict, retrying with fresh reads"
                    );
                }
                Err(err) => {
                    debug!(operation, attempt, error = %err, "unit of work rejected");
                    return Err(err.into());
                }
            }
        }

        warn!(
            operation,
            attempts = self.max_commit_attempts,
            "giving up after repeated commit conflicts"
        );
        Err(EngineError::Contended {
            attempts: self.max_commit_attempts,
        }
        .into())
    }

    /// [`execute`](Self::execute) for flows that never roll.
    fn settle<T>(
        &self,
        operation: &'static str,
        account: AccountId,
        work: impl Fn(&mut LedgerTx<'_, S>, &EngineConfig) -> arena_core::Result<T>,
    ) -> Result<Receipt<T>> {
        let plan = self.seed_plan(account, StreamTag::Ledger);
        self.execute(operation, plan, |tx, config, _| work(tx, config))
    }

    /// Fight and settle a battle.
    pub fn battle(&self, request: &BattleRequest) -> Result<Receipt<BattleResult>> {
        let plan = self.seed_plan(request.initiator, StreamTag::Battle);
        let receipt = self.execute("battle", plan, |tx, config, rng| {
            tx.fight(config, rng, request)
        })?;
        let result = &receipt.value;
        info!(
            kind = %result.kind,
            initiator = %request.initiator,
            winner = ?result.winner,
            reason = ?result.reason,
            turns = result.turns,
            "battle settled"
        );
        Ok(receipt)
    }

    pub fn list_card(
        &self,
        seller: AccountId,
        card: CardId,
        price: u64,
    ) -> Result<Receipt<Listing>> {
        let receipt = self.settle("list_card", seller, |tx, config| {
            tx.list_card(&config.market, seller, card, price)
        })?;
        info!(%seller, %card, price, "card listed");
        Ok(receipt)
    }

    pub fn cancel_listing(&self, seller: AccountId, card: CardId) -> Result<Receipt<Listing>> {
        let receipt = self.settle("cancel_listing", seller, |tx, _| {
            tx.cancel_listing(seller, card)
        })?;
        info!(%seller, %card, "listing cancelled");
        Ok(receipt)
    }

    pub fn buy_card(&self, buyer: AccountId, card: CardId) -> Result<Receipt<Sale>> {
        let receipt = self.settle("buy_card", buyer, |tx, config| {
            tx.buy_card(&config.market, buyer, card)
        })?;
        let sale = &receipt.value;
        info!(
            %buyer,
            seller = %sale.listing.seller,
            %card,
            price = sale.charges.price,
            net = sale.charges.net,
            "card sold"
        );
        Ok(receipt)
    }

    pub fn purchase_pack(&self, buyer: AccountId, kind: PackKind) -> Result<Receipt<PackOpening>> {
        let plan = self.seed_plan(buyer, StreamTag::Pack);
        let receipt = self.execute("purchase_pack", plan, |tx, config, rng| {
            tx.purchase_pack(config, rng, buyer, kind)
        })?;
        let opening = &receipt.value;
        info!(
            %buyer,
            %kind,
            paid = opening.paid,
            currency = %opening.currency,
            cards = opening.cards.len(),
            "pack opened"
        );
        Ok(receipt)
    }

    pub fn upgrade_card(
        &self,
        requester: AccountId,
        keep: CardId,
        consume: CardId,
    ) -> Result<Receipt<UpgradeOutcome>> {
        let plan = self.seed_plan(requester, StreamTag::Upgrade);
        let receipt = self.execute("upgrade_card", plan, |tx, config, rng| {
            tx.upgrade_card(&config.upgrade, rng, requester, keep, consume)
        })?;
        let outcome = &receipt.value;
        info!(
            %requester,
            card = %outcome.card.id,
            success = outcome.success,
            level = outcome.card.level,
            cost = outcome.cost,
            "upgrade resolved"
        );
        Ok(receipt)
    }

    /// Move currency between two accounts, charging `fee_bps` on the sender.
    pub fn transfer(
        &self,
        from: AccountId,
        to: AccountId,
        currency: Currency,
        amount: u64,
        fee_bps: u32,
    ) -> Result<Receipt<TransactionId>> {
        self.settle("transfer", from, |tx, _| {
            tx.transfer(from, to, currency, amount, fee_bps)
        })
    }

    pub fn claim_daily_reward(&self, account: AccountId) -> Result<Receipt<RewardGrant>> {
        let receipt = self.settle("claim_daily_reward", account, |tx, config| {
            tx.claim_daily_reward(config, account)
        })?;
        info!(%account, reward = ?receipt.value.reward, "daily reward claimed");
        Ok(receipt)
    }

    pub fn claim_quest_reward(
        &self,
        account: AccountId,
        difficulty: QuestDifficulty,
    ) -> Result<Receipt<RewardGrant>> {
        self.settle("claim_quest_reward", account, |tx, config| {
            tx.claim_quest_reward(config, account, difficulty)
        })
    }

    pub fn claim_achievement_reward(
        &self,
        account: AccountId,
        tier: AchievementTier,
    ) -> Result<Receipt<RewardGrant>> {
        self.settle("claim_achievement_reward", account, |tx, config| {
            tx.claim_achievement_reward(config, account, tier)
        })
    }

    pub fn claim_referral_reward(
        &self,
        account: AccountId,
        referrals: u32,
    ) -> Result<Receipt<RewardGrant>> {
        self.settle("claim_referral_reward", account, |tx, config| {
            tx.claim_referral_reward(config, account, referrals)
        })
    }

    /// Pay weekly tournament prizes; `standings[0]` finished first.
    pub fn pay_tournament(&self, standings: &[AccountId]) -> Result<Receipt<Vec<Placement>>> {
        let receipt = self.settle("pay_tournament", AccountId(0), |tx, config| {
            tx.pay_tournament(config, standings)
        })?;
        info!(
            entrants = standings.len(),
            paid = receipt.value.len(),
            "tournament prizes paid"
        );
        Ok(receipt)
    }

    pub fn open_dispute(
        &self,
        buyer: AccountId,
        transaction: TransactionId,
    ) -> Result<Receipt<arena_core::Transaction>> {
        let receipt = self.settle("open_dispute", buyer, |tx, _| {
            tx.open_dispute(buyer, transaction)
        })?;
        info!(%buyer, %transaction, "dispute opened");
        Ok(receipt)
    }

    pub fn resolve_dispute(
        &self,
        transaction: TransactionId,
        verdict: DisputeVerdict,
    ) -> Result<Receipt<Option<TransactionId>>> {
        let receipt = self.settle("resolve_dispute", AccountId(0), |tx, _| {
            tx.resolve_dispute(transaction, verdict)
        })?;
        info!(%transaction, %verdict, refund = ?receipt.value, "dispute resolved");
        Ok(receipt)
    }
}
