//! Exact table lookups: daily login, quests, achievements, referrals and
//! weekly tournament prizes. No randomness.

use crate::config::{
    AchievementRewardTable, DailyRewardTable, QuestRewardTable, ReferralMilestone, TournamentPrize,
};
use crate::error::{EngineError, Limit, Result};
use crate::ids::{Timestamp, day_index};

use super::{AchievementTier, QuestDifficulty, RewardBundle};

/// Login streak position of an account.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DailyLogin {
    /// UTC day index of the last claim.
    pub last_claim_day: Option<i64>,
    /// 1-based day in the reward cycle of the last claim; 0 before any claim.
    pub day_in_cycle: u32,
}

/// Claim today's login reward.
///
/// Consecutive days walk the cycle and wrap after its last day; a missed day
/// restarts at day 1. A second claim on the same UTC day is refused.
pub fn claim_daily(
    table: &DailyRewardTable,
    login: DailyLogin,
    now: Timestamp,
) -> Result<(RewardBundle, DailyLogin)> {
    if table.days.is_empty() {
        return Err(EngineError::invalid("daily reward table is empty"));
    }

    let today = day_index(now);
    let cycle = table.days.len() as u32;
    let day = match login.last_claim_day {
        Some(last) if last == today => {
            return Err(EngineError::LimitExceeded(Limit::DailyReward));
        }
        Some(last) if last + 1 == today => login.day_in_cycle % cycle + 1,
        _ => 1,
    };

    let reward = table.days[(day - 1) as usize];
    Ok((
        reward,
        DailyLogin {
            last_claim_day: Some(today),
            day_in_cycle: day,
        },
    ))
}

pub fn quest_reward(table: &QuestRewardTable, difficulty: QuestDifficulty) -> RewardBundle {
    table.get(difficulty)
}

pub fn achievement_reward(table: &AchievementRewardTable, tier: AchievementTier) -> RewardBundle {
    table.get(tier)
}

/// Reward for reaching exactly `referrals` successful referrals, if that
/// count is a milestone.
pub fn referral_reward(milestones: &[ReferralMilestone], referrals: u32) -> Option<RewardBundle> {
    milestones
        .iter()
        .find(|milestone| milestone.referrals == referrals)
        .map(|milestone| milestone.reward)
}

/// Weekly tournament prize for a 1-based final rank.
pub fn tournament_prize(prizes: &[TournamentPrize], rank: u32) -> Option<RewardBundle> {
    prizes
        .iter()
        .find(|prize| (prize.first..=prize.last).contains(&rank))
        .map(|prize| prize.reward)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::ids::SECONDS_PER_DAY;

    const DAY: i64 = SECONDS_PER_DAY;

    #[test]
    fn consecutive_claims_walk_and_wrap_the_cycle() {
        let table = EngineConfig::default().daily;
        let mut login = DailyLogin::default();
        let mut rewards = Vec::new();
        for day in 0..8 {
            let (reward, next) = claim_daily(&table, login, 100 * DAY + day * DAY + 60)
                .expect("claim");
            rewards.push(reward);
            login = next;
        }
        assert_eq!(rewards[0], RewardBundle::gold(100));
        assert_eq!(rewards[6], RewardBundle::gold(500).with_gems(25).with_tokens(50));
        assert_eq!(rewards[7], RewardBundle::gold(100));
        assert_eq!(login.day_in_cycle, 1);
    }

    #[test]
    fn second_claim_same_day_is_refused() {
        let table = EngineConfig::default().daily;
        let (_, login) = claim_daily(&table, DailyLogin::default(), 5 * DAY).expect("claim");
        let err = claim_daily(&table, login, 6 * DAY - 1).unwrap_err();
        assert_eq!(err, EngineError::LimitExceeded(Limit::DailyReward));
    }

    #[test]
    fn missed_day_restarts_cycle() {
        let table = EngineConfig::default().daily;
        let login = DailyLogin {
            last_claim_day: Some(10),
            day_in_cycle: 4,
        };
        let (reward, next) = claim_daily(&table, login, 12 * DAY).expect("claim");
        assert_eq!(next.day_in_cycle, 1);
        assert_eq!(reward, RewardBundle::gold(100));

        let (reward, next) = claim_daily(&table, login, 11 * DAY).expect("claim");
        assert_eq!(next.day_in_cycle, 5);
        assert_eq!(reward, RewardBundle::gold(300).with_gems(10));
    }

    #[test]
    fn lookups_are_exact() {
        let config = EngineConfig::default();
        assert_eq!(
            quest_reward(&config.quests, QuestDifficulty::Hard),
            RewardBundle::gold(500).with_tokens(50).with_gems(5)
        );
        assert_eq!(
            achievement_reward(&config.achievements, AchievementTier::Bronze),
            RewardBundle::gold(50)
        );
        assert_eq!(referral_reward(&config.referrals, 5).map(|r| r.gems), Some(10));
        assert_eq!(referral_reward(&config.referrals, 6), None);
    }

    #[test]
    fn tournament_prizes_by_rank_band() {
        let prizes = EngineConfig::default().tournament;
        assert_eq!(tournament_prize(&prizes, 1).map(|r| r.gold), Some(10_000));
        assert_eq!(tournament_prize(&prizes, 7).map(|r| r.gold), Some(1_000));
        assert_eq!(tournament_prize(&prizes, 50).map(|r| r.gold), Some(250));
        assert_eq!(tournament_prize(&prizes, 51), None);
        assert_eq!(tournament_prize(&prizes, 0), None);
    }
}
