//! ELO-like rating adjustment.
//!
//! Deltas are computed here and applied by the economy settlement; nothing in
//! this module touches an account.

use crate::config::{BattleRules, RatingParams};

/// Signed rating change for each side of a battle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RatingDelta {
    pub winner: i64,
    pub loser: i64,
}

#[derive(Clone, Copy, Debug)]
pub struct RatingAdjuster<'a> {
    params: &'a RatingParams,
    rules: &'a BattleRules,
}

impl<'a> RatingAdjuster<'a> {
    pub fn new(params: &'a RatingParams, rules: &'a BattleRules) -> Self {
        Self { params, rules }
    }

    /// Compute both deltas. `None` marks a side without a rating (the AI).
    ///
    /// When both ratings are known and differ by more than the gap
    /// threshold, the winner's gain is halved for an expected win and
    /// raised by half for an upset. The loser never drops below 0.
    pub fn compute(&self, winner: Option<u32>, loser: Option<u32>) -> RatingDelta {
        let mut gain = self.rules.rating_win;

        if let (Some(winner), Some(loser)) = (winner, loser) {
            let gap = i64::from(winner) - i64::from(loser);
            if gap > self.params.gap_threshold {
                gain = gain * self.params.expected_percent / 100;
            } else if -gap > self.params.gap_threshold {
                gain = gain * self.params.upset_percent / 100;
            }
        }

        let loss = match loser {
            Some(rating) => self.rules.rating_loss.min(i64::from(rating)),
            None => self.rules.rating_loss,
        };

        RatingDelta {
            winner: gain,
            loser: -loss.max(0),
        }
    }
}

/// Apply a delta to a rating, flooring at 0.
pub fn apply_rating(rating: u32, delta: i64) -> u32 {
    (i64::from(rating) + delta).clamp(0, i64::from(u32::MAX)) as u32
}
