//! Reward computation.
//!
//! Every function here returns a payload; applying it to balances is the
//! ledger's job. That split lets callers inspect or display a reward before
//! anything is committed.

pub mod battle;
pub mod tables;

pub use battle::{PlayerContext, RewardCalculator};
pub use tables::{DailyLogin, achievement_reward, claim_daily, quest_reward, referral_reward, tournament_prize};

/// Gold, gems and tokens granted together.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RewardBundle {
    pub gold: u64,
    pub gems: u64,
    pub tokens: u64,
}

impl RewardBundle {
    pub const fn gold(gold: u64) -> Self {
        Self {
            gold,
            gems: 0,
            tokens: 0,
        }
    }

    #[must_use]
    pub const fn with_gems(mut self, gems: u64) -> Self {
        self.gems = gems;
        self
    }

    #[must_use]
    pub const fn with_tokens(mut self, tokens: u64) -> Self {
        self.tokens = tokens;
        self
    }

    pub const fn is_empty(&self) -> bool {
        self.gold == 0 && self.gems == 0 && self.tokens == 0
    }
}

/// Battle reward for one side: currency plus rating change.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RewardPayload {
    pub gold: u64,
    pub tokens: u64,
    pub rating_delta: i64,
}

impl RewardPayload {
    pub fn bundle(&self) -> RewardBundle {
        RewardBundle::gold(self.gold).with_tokens(self.tokens)
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum QuestDifficulty {
    Easy,
    Medium,
    Hard,
    Legendary,
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AchievementTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}
