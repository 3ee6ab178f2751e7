//! Deck loader.
//!
//! Decks are authored in RON as a name, an owning account and a list of
//! card instances. Card ids and owners are plain integers in the file.

use std::path::Path;

use arena_core::{AccountId, Archetype, Card, CardId, CardStats, Deck, Rarity};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// One card entry in a deck file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct CardSpec {
    pub id: u64,
    pub template: u32,
    pub archetype: Archetype,
    pub rarity: Rarity,
    #[serde(default = "first_level")]
    pub level: u32,
    pub stats: CardStats,
}

const fn first_level() -> u32 {
    1
}

impl CardSpec {
    pub fn to_card(&self, owner: AccountId) -> Card {
        Card::new(
            CardId(self.id),
            self.template,
            self.archetype,
            self.rarity,
            self.stats,
            owner,
        )
        .with_level(self.level)
    }
}

/// A deck file as authored.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct DeckSpec {
    pub name: String,
    pub owner: u64,
    pub cards: Vec<CardSpec>,
}

impl DeckSpec {
    pub fn owner(&self) -> AccountId {
        AccountId(self.owner)
    }

    /// Card instances owned by the deck's account.
    pub fn cards(&self) -> Vec<Card> {
        let owner = self.owner();
        self.cards.iter().map(|spec| spec.to_card(owner)).collect()
    }

    /// Build a battle deck, rejecting duplicate ids and oversized decks.
    pub fn deck(&self) -> LoadResult<Deck> {
        Deck::new(self.cards())
            .map_err(|e| anyhow::anyhow!("Invalid deck '{}': {}", self.name, e))
    }
}

/// Loader for deck definitions from RON files.
pub struct DeckLoader;

impl DeckLoader {
    /// Load a deck definition from a RON file.
    pub fn load(path: &Path) -> LoadResult<DeckSpec> {
        let content = read_file(path)?;
        let spec = Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load deck {}: {}", path.display(), e))?;
        Ok(spec)
    }

    pub fn parse(content: &str) -> LoadResult<DeckSpec> {
        let spec: DeckSpec = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse deck RON: {}", e))?;
        if let Some(card) = spec.cards.iter().find(|card| card.level == 0) {
            anyhow::bail!("card {} in deck '{}' has level 0", card.id, spec.name);
        }
        Ok(spec)
    }
}
