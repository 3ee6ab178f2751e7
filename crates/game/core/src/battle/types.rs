use arrayvec::ArrayVec;

use crate::card::{Card, RarityTable};
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};

/// Upper bound on deck size.
pub const MAX_DECK_SIZE: usize = EngineConfig::MAX_DECK_SIZE;

/// Kind of battle; selects rewards, rating deltas and entry costs.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BattleType {
    #[default]
    Quick,
    Ranked,
    Tournament,
    Clan,
    Practice,
}

/// One of the two battle participants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    Initiator,
    Opponent,
}

impl Side {
    pub const fn other(self) -> Self {
        match self {
            Side::Initiator => Side::Opponent,
            Side::Opponent => Side::Initiator,
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Side::Initiator => 0,
            Side::Opponent => 1,
        }
    }
}

/// Cards a side brings into battle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Deck {
    cards: ArrayVec<Card, MAX_DECK_SIZE>,
}

impl Deck {
    /// Build a deck, rejecting oversized decks and repeated card ids.
    pub fn new(cards: impl IntoIterator<Item = Card>) -> Result<Self> {
        let mut deck: ArrayVec<Card, MAX_DECK_SIZE> = ArrayVec::new();
        for card in cards {
            if deck.iter().any(|existing| existing.id == card.id) {
                return Err(EngineError::invalid("deck contains the same card twice"));
            }
            deck.try_push(card)
                .map_err(|_| EngineError::invalid("deck exceeds maximum size"))?;
        }
        Ok(Self { cards: deck })
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Sum of card health; the side's hit points for the whole battle.
    pub fn pooled_health(&self) -> u64 {
        self.cards.iter().map(|card| u64::from(card.stats.health)).sum()
    }

    /// Sum of recomputed card power.
    pub fn power(&self, rarities: &RarityTable) -> u64 {
        self.cards
            .iter()
            .map(|card| card.power(rarities))
            .fold(0u64, u64::saturating_add)
    }
}

/// Resources the initiator holds when asking to start a battle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Eligibility {
    pub energy: u32,
    pub tickets: u32,
}

impl Eligibility {
    pub const fn new(energy: u32, tickets: u32) -> Self {
        Self { energy, tickets }
    }
}
