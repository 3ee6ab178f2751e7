//! Reward claims and tournament payouts.
//!
//! Whether a quest, achievement or referral milestone was actually reached
//! is decided by the caller; these flows only look up and credit the reward.

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::ids::{AccountId, TransactionId};
use crate::reward::{
    AchievementTier, QuestDifficulty, RewardBundle, achievement_reward, claim_daily, quest_reward,
    referral_reward, tournament_prize,
};

use super::ledger::LedgerTx;
use super::store::EconomyStore;

/// A credited reward.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardGrant {
    pub account: AccountId,
    pub reward: RewardBundle,
    pub transactions: Vec<TransactionId>,
}

/// A tournament prize paid for a final rank.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    pub rank: u32,
    pub grant: RewardGrant,
}

impl<S: EconomyStore + ?Sized> LedgerTx<'_, S> {
    fn credit_reward(&mut self, account: AccountId, reward: RewardBundle) -> Result<RewardGrant> {
        let transactions = self.grant(account, reward)?;
        Ok(RewardGrant {
            account,
            reward,
            transactions,
        })
    }

    /// Claim today's login reward and advance the login streak.
    pub fn claim_daily_reward(
        &mut self,
        config: &EngineConfig,
        account: AccountId,
    ) -> Result<RewardGrant> {
        let now = self.now();
        let login = self.account(account)?.daily_login;
        let (reward, next) = claim_daily(&config.daily, login, now)?;
        self.account_mut(account)?.daily_login = next;
        self.credit_reward(account, reward)
    }

    pub fn claim_quest_reward(
        &mut self,
        config: &EngineConfig,
        account: AccountId,
        difficulty: QuestDifficulty,
    ) -> Result<RewardGrant> {
        self.credit_reward(account, quest_reward(&config.quests, difficulty))
    }

    pub fn claim_achievement_reward(
        &mut self,
        config: &EngineConfig,
        account: AccountId,
        tier: AchievementTier,
    ) -> Result<RewardGrant> {
        self.credit_reward(account, achievement_reward(&config.achievements, tier))
    }

    /// Credit the milestone reward for exactly `referrals` referrals.
    pub fn claim_referral_reward(
        &mut self,
        config: &EngineConfig,
        account: AccountId,
        referrals: u32,
    ) -> Result<RewardGrant> {
        let reward = referral_reward(&config.referrals, referrals)
            .ok_or(EngineError::invalid("referral count is not a milestone"))?;
        self.credit_reward(account, reward)
    }

    /// Pay weekly prizes. `standings[0]` finished first; ranks without a
    /// prize band are skipped.
    pub fn pay_tournament(
        &mut self,
        config: &EngineConfig,
        standings: &[AccountId],
    ) -> Result<Vec<Placement>> {
        let mut placements = Vec::new();
        for (index, &account) in standings.iter().enumerate() {
            let rank = index as u32 + 1;
            if standings[..index].contains(&account) {
                return Err(EngineError::invalid("account appears twice in the standings"));
            }
            let Some(prize) = tournament_prize(&config.tournament, rank) else {
                continue;
            };
            placements.push(Placement {
                rank,
                grant: self.credit_reward(account, prize)?,
            });
        }
        Ok(placements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::ledger::tests::{TestStore, funded};
    use crate::economy::{Balances, EconomyLedger};
    use crate::error::Limit;
    use crate::ids::SECONDS_PER_DAY;

    #[test]
    fn daily_claims_once_per_day() {
        let store = TestStore::default().with_account(funded(1, 0));
        let config = EngineConfig::default();
        let ledger = EconomyLedger::new(&store, &config);
        let claim = |now| ledger.run(now, |tx, cfg| tx.claim_daily_reward(cfg, AccountId(1)));

        claim(3 * SECONDS_PER_DAY).expect("day 1");
        assert_eq!(
            claim(3 * SECONDS_PER_DAY + 10).unwrap_err(),
            EngineError::LimitExceeded(Limit::DailyReward)
        );
        let second = claim(4 * SECONDS_PER_DAY).expect("day 2").value;
        assert_eq!(second.reward, RewardBundle::gold(150));
        assert_eq!(store.balances(AccountId(1)).gold, 250);
    }

    #[test]
    fn quest_achievement_and_referral_rewards() {
        let store = TestStore::default().with_account(funded(1, 0));
        let config = EngineConfig::default();
        let ledger = EconomyLedger::new(&store, &config);

        ledger
            .run(0, |tx, cfg| tx.claim_quest_reward(cfg, AccountId(1), QuestDifficulty::Easy))
            .expect("quest");
        ledger
            .run(0, |tx, cfg| {
                tx.claim_achievement_reward(cfg, AccountId(1), AchievementTier::Silver)
            })
            .expect("achievement");
        ledger
            .run(0, |tx, cfg| tx.claim_referral_reward(cfg, AccountId(1), 5))
            .expect("referral");
        assert_eq!(store.balances(AccountId(1)), Balances::new(1_250, 10, 20));

        let err = ledger
            .run(0, |tx, cfg| tx.claim_referral_reward(cfg, AccountId(1), 4))
            .unwrap_err();
        assert_eq!(err, EngineError::invalid("referral count is not a milestone"));
    }

    #[test]
    fn tournament_pays_prize_bands() {
        let mut store = TestStore::default();
        let standings: Vec<AccountId> = (1..=60).map(AccountId).collect();
        for &id in &standings {
            store = store.with_account(funded(id.0, 0));
        }
        let config = EngineConfig::default();
        let placements = EconomyLedger::new(&store, &config)
            .run(0, |tx, cfg| tx.pay_tournament(cfg, &standings))
            .expect("payout")
            .value;

        assert_eq!(placements.len(), 50);
        assert_eq!(store.balances(AccountId(1)).gold, 10_000);
        assert_eq!(store.balances(AccountId(10)).gold, 1_000);
        assert_eq!(store.balances(AccountId(51)).gold, 0);
    }
}
