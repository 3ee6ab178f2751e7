//! Deterministic rules for the card arena.
//!
//! `arena-core` computes card power, resolves battles, derives rating and
//! reward deltas and stages every balance change as a versioned unit of
//! work. It performs no I/O: randomness arrives through [`RandomSource`] and
//! storage through [`EconomyStore`], both supplied by the caller.
pub mod battle;
pub mod card;
pub mod combat;
pub mod config;
pub mod economy;
pub mod error;
pub mod ids;
pub mod rating;
pub mod reward;
pub mod rng;

pub use battle::{
    BattleOutcome, BattlePhase, BattleResult, BattleSimulator, BattleStrategy, BattleType, Deck,
    Eligibility, EndReason, Participant, Quick, Resolution, Side, TurnBased,
};
pub use card::{Archetype, Card, CardStats, Rarity, RarityTable, TypeAdvantageTable, calculate_power};
pub use config::EngineConfig;
pub use economy::{
    Account, BattleRequest, Currency, EconomyLedger, EconomyStore, LedgerTx, Listing, Opponent,
    PackKind, Transaction, TransactionKind, TransactionStatus,
};
pub use error::{EngineError, ErrorSeverity, GameError, Result, StoreError};
pub use ids::{AccountId, CardId, Timestamp, TransactionId, Version};
pub use rating::{RatingAdjuster, RatingDelta};
pub use reward::{PlayerContext, RewardBundle, RewardCalculator, RewardPayload};
pub use rng::{PcgRng, RandomSource};
