//! Interchangeable battle resolution strategies.
//!
//! Callers trade fidelity for cost: [`TurnBased`] plays the full turn loop
//! and produces a replayable log, [`Quick`] rolls once on deck power. Both
//! go through the same [`BattleSimulator`] preconditions.

use crate::config::EngineConfig;
use crate::error::Result;
use crate::ids::AccountId;
use crate::rng::RandomSource;

use super::simulator::{BattleOutcome, BattlePhase, BattleSimulator};
use super::types::{BattleType, Deck, Eligibility};

/// Everything needed to fight one battle.
#[derive(Clone, Debug)]
pub struct BattleSetup {
    pub kind: BattleType,
    /// Account paying the entry cost.
    pub initiator: AccountId,
    pub eligibility: Eligibility,
    pub initiator_deck: Deck,
    pub opponent_deck: Deck,
}

pub trait BattleStrategy {
    fn resolve(
        &self,
        setup: BattleSetup,
        config: &EngineConfig,
        rng: &mut dyn RandomSource,
    ) -> Result<BattleOutcome>;
}

/// Full turn loop.
#[derive(Clone, Copy, Debug, Default)]
pub struct TurnBased;

/// Single win-probability roll on deck power.
#[derive(Clone, Copy, Debug, Default)]
pub struct Quick;

fn started(setup: BattleSetup, config: &EngineConfig) -> Result<BattleSimulator> {
    let mut battle =
        BattleSimulator::setup(setup.kind, setup.initiator_deck, setup.opponent_deck, config)?;
    battle.start(setup.initiator, setup.eligibility)?;
    Ok(battle)
}

impl BattleStrategy for TurnBased {
    fn resolve(
        &self,
        setup: BattleSetup,
        config: &EngineConfig,
        rng: &mut dyn RandomSource,
    ) -> Result<BattleOutcome> {
        let mut battle = started(setup, config)?;
        if battle.phase() == BattlePhase::InProgress {
            battle.run(rng)?;
        }
        battle.into_outcome()
    }
}

impl BattleStrategy for Quick {
    fn resolve(
        &self,
        setup: BattleSetup,
        config: &EngineConfig,
        rng: &mut dyn RandomSource,
    ) -> Result<BattleOutcome> {
        let mut battle = started(setup, config)?;
        if battle.phase() == BattlePhase::InProgress {
            battle.resolve_quick(rng)?;
        }
        battle.into_outcome()
    }
}

/// Strategy selector carried in battle requests.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Resolution {
    #[default]
    TurnBased,
    Quick,
}

impl BattleStrategy for Resolution {
    fn resolve(
        &self,
        setup: BattleSetup,
        config: &EngineConfig,
        rng: &mut dyn RandomSource,
    ) -> Result<BattleOutcome> {
        match self {
            Resolution::TurnBased => TurnBased.resolve(setup, config, rng),
            Resolution::Quick => Quick.resolve(setup, config, rng),
        }
    }
}
