//! Battle rewards: base values, win streak, level and boosts.

use crate::config::{BattleRules, RewardParams};
use crate::ids::AccountId;

/// Player state that influences battle rewards and rating.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerContext {
    pub account: AccountId,
    pub level: u32,
    pub rating: u32,
    pub win_streak: u32,
    /// Combined VIP and clan reward boost, percent.
    pub reward_boost: u32,
}

#[derive(Clone, Copy, Debug)]
pub struct RewardCalculator<'a> {
    params: &'a RewardParams,
    rules: &'a BattleRules,
}

impl<'a> RewardCalculator<'a> {
    pub fn new(params: &'a RewardParams, rules: &'a BattleRules) -> Self {
        Self { params, rules }
    }

    /// Gold and tokens for the winner.
    ///
    /// # Formula
    ///
    /// ```text
    /// streak  = min(win_streak, cap)
    /// tokens  = base_tokens + streak × 5
    /// gold    = base_gold + streak × 5 × 10
    /// payout  = floor(x × (1 + level × 0.05) × (1 + boost%))
    /// ```
    pub fn winner(&self, player: &PlayerContext) -> (u64, u64) {
        let streak = u64::from(player.win_streak.min(self.params.streak_cap));
        let token_bonus = streak * self.params.streak_tokens;
        let gold_bonus = token_bonus * self.params.streak_gold_factor;

        let gold = self.scale(self.rules.winner_gold + gold_bonus, player);
        let tokens = self.scale(self.rules.winner_tokens + token_bonus, player);
        (gold, tokens)
    }

    /// Gold and tokens for the loser: the base values, unmodified.
    pub fn loser(&self) -> (u64, u64) {
        (self.rules.loser_gold, self.rules.loser_tokens)
    }

    fn scale(&self, amount: u64, player: &PlayerContext) -> u64 {
        let level = 1000 + u128::from(player.level) * u128::from(self.params.level_bonus);
        let boost = 100 + u128::from(player.reward_boost);
        let scaled = u128::from(amount) * level * boost / 100_000;
        scaled.min(u128::from(u64::MAX)) as u64
    }
}
