//! Battle resolution: decks, the turn-based state machine, strategies and
//! results.

pub mod ai;
pub mod log;
pub mod result;
pub mod simulator;
pub mod strategy;
pub mod types;

pub use ai::{AI_ACCOUNT, ai_deck};
#[cfg(feature = "serde")]
pub use log::compute_log_root;
pub use log::{BattleEvent, EndReason, TurnEvent};
pub use result::{BattleResult, Participant, ParticipantSnapshot};
pub use simulator::{BattleOutcome, BattlePhase, BattleSimulator, SideSummary};
pub use strategy::{BattleSetup, BattleStrategy, Quick, Resolution, TurnBased};
pub use types::{BattleType, Deck, Eligibility, MAX_DECK_SIZE, Side};
