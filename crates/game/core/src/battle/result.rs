//! Battle results: outcome plus the rating and reward deltas it earns.
//!
//! A [`BattleResult`] is computed in full before anything is applied, so the
//! caller can show it, store it, or hand it to the ledger for settlement.

use crate::config::EngineConfig;
use crate::ids::AccountId;
use crate::rating::{RatingAdjuster, RatingDelta};
use crate::reward::{PlayerContext, RewardCalculator, RewardPayload};

use super::log::{BattleEvent, EndReason};
use super::simulator::{BattleOutcome, SideSummary};
use super::types::{BattleType, Side};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Participant {
    Player(AccountId),
    Ai,
}

impl Participant {
    pub const fn account(&self) -> Option<AccountId> {
        match self {
            Participant::Player(account) => Some(*account),
            Participant::Ai => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParticipantSnapshot {
    pub participant: Participant,
    /// Deck power before the battle.
    pub power: u64,
    pub starting_health: u64,
    pub remaining_health: u64,
    pub reward: RewardPayload,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleResult {
    pub kind: BattleType,
    pub initiator: ParticipantSnapshot,
    pub opponent: ParticipantSnapshot,
    pub winning_side: Side,
    /// Winning account; `None` when the AI won.
    pub winner: Option<AccountId>,
    pub reason: EndReason,
    pub rating: RatingDelta,
    pub turns: u32,
    pub log: Vec<BattleEvent>,
}

impl BattleResult {
    /// Attach rating and reward deltas to a resolved battle.
    ///
    /// `opponent` is `None` for an AI opponent, which earns nothing and has
    /// no rating.
    pub fn compose(
        outcome: BattleOutcome,
        initiator: &PlayerContext,
        opponent: Option<&PlayerContext>,
        config: &EngineConfig,
    ) -> Self {
        let rules = config.battle_rules(outcome.kind);
        let players = [Some(initiator), opponent];
        let player = |side: Side| match side {
            Side::Initiator => players[0],
            Side::Opponent => players[1],
        };

        let winner = player(outcome.winner);
        let loser = player(outcome.loser());
        let rating = RatingAdjuster::new(&config.rating, rules)
            .compute(winner.map(|p| p.rating), loser.map(|p| p.rating));

        let calculator = RewardCalculator::new(&config.rewards, rules);
        let reward = |side: Side| match player(side) {
            None => RewardPayload::default(),
            Some(ctx) if side == outcome.winner => {
                let (gold, tokens) = calculator.winner(ctx);
                RewardPayload {
                    gold,
                    tokens,
                    rating_delta: rating.winner,
                }
            }
            Some(_) => {
                let (gold, tokens) = calculator.loser();
                RewardPayload {
                    gold,
                    tokens,
                    rating_delta: rating.loser,
                }
            }
        };

        let snapshot = |side: Side, summary: &SideSummary| ParticipantSnapshot {
            participant: player(side).map_or(Participant::Ai, |ctx| Participant::Player(ctx.account)),
            power: summary.power,
            starting_health: summary.starting_health,
            remaining_health: summary.remaining_health,
            reward: reward(side),
        };

        Self {
            kind: outcome.kind,
            initiator: snapshot(Side::Initiator, &outcome.initiator),
            opponent: snapshot(Side::Opponent, &outcome.opponent),
            winning_side: outcome.winner,
            winner: winner.map(|ctx| ctx.account),
            reason: outcome.reason,
            rating,
            turns: outcome.turns,
            log: outcome.log,
        }
    }

    pub fn side(&self, side: Side) -> &ParticipantSnapshot {
        match side {
            Side::Initiator => &self.initiator,
            Side::Opponent => &self.opponent,
        }
    }

    /// SHA-256 root of the battle log.
    #[cfg(feature = "serde")]
    pub fn log_root(&self) -> Result<[u8; 32], bincode::Error> {
        super::log::compute_log_root(&self.log)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(kind: BattleType, winner: Side) -> BattleOutcome {
        let summary = |remaining| SideSummary {
            power: 500,
            starting_health: 400,
            remaining_health: remaining,
        };
        BattleOutcome {
            kind,
            winner,
            reason: EndReason::Knockout,
            turns: 12,
            initiator: summary(if winner == Side::Initiator { 80 } else { 0 }),
            opponent: summary(if winner == Side::Opponent { 80 } else { 0 }),
            log: Vec::new(),
        }
    }

    fn player(account: u64, rating: u32, win_streak: u32) -> PlayerContext {
        PlayerContext {
            account: AccountId(account),
            level: 10,
            rating,
            win_streak,
            reward_boost: 0,
        }
    }

    #[test]
    fn winner_and_loser_payloads() {
        let config = EngineConfig::default();
        let result = BattleResult::compose(
            outcome(BattleType::Quick, Side::Initiator),
            &player(1, 1000, 3),
            Some(&player(2, 1000, 0)),
            &config,
        );

        assert_eq!(result.winner, Some(AccountId(1)));
        assert_eq!(
            result.initiator.reward,
            RewardPayload {
                gold: 375,
                tokens: 97,
                rating_delta: 15
            }
        );
        assert_eq!(
            result.opponent.reward,
            RewardPayload {
                gold: 25,
                tokens: 10,
                rating_delta: -10
            }
        );
        assert_eq!(result.turns, 12);
    }

    #[test]
    fn ai_win_has_no_winner_account() {
        let config = EngineConfig::default();
        let result = BattleResult::compose(
            outcome(BattleType::Ranked, Side::Opponent),
            &player(1, 1000, 5),
            None,
            &config,
        );

        assert_eq!(result.winner, None);
        assert_eq!(result.opponent.participant, Participant::Ai);
        assert_eq!(result.opponent.reward, RewardPayload::default());
        assert_eq!(result.initiator.reward.gold, 50);
        assert_eq!(result.initiator.reward.rating_delta, -20);
    }
}
