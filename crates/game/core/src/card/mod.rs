//! Cards: archetypes, rarities, stats and derived power.

pub mod advantage;
pub mod mint;
pub mod power;

pub use advantage::TypeAdvantageTable;
pub use mint::mint_card;
pub use power::{RarityTable, calculate_power};

use crate::ids::{AccountId, CardId, Version};

/// Combat archetype of a card; drives the type-advantage matrix.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Archetype {
    Warrior,
    Mage,
    Assassin,
    Tank,
    Support,
}

impl Archetype {
    /// Row/column of this archetype in [`TypeAdvantageTable`].
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Rarity tier of a card.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

/// Base combat attributes of a card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardStats {
    pub attack: u32,
    pub defense: u32,
    pub health: u32,
}

impl CardStats {
    pub const fn new(attack: u32, defense: u32, health: u32) -> Self {
        Self {
            attack,
            defense,
            health,
        }
    }
}

/// An owned card instance.
///
/// Power is deliberately absent: it is always derived through
/// [`Card::power`] from the current stats, rarity and level.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Card {
    pub id: CardId,
    /// Catalogue number shared by every copy of the same card design.
    pub template: u32,
    pub archetype: Archetype,
    pub rarity: Rarity,
    pub level: u32,
    pub stats: CardStats,
    pub owner: AccountId,
    #[cfg_attr(feature = "serde", serde(default))]
    pub version: Version,
}

impl Card {
    pub fn new(
        id: CardId,
        template: u32,
        archetype: Archetype,
        rarity: Rarity,
        stats: CardStats,
        owner: AccountId,
    ) -> Self {
        Self {
            id,
            template,
            archetype,
            rarity,
            level: 1,
            stats,
            owner,
            version: Version::NEW,
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Combat and valuation strength of this card.
    pub fn power(&self, rarities: &RarityTable) -> u64 {
        calculate_power(&self.stats, self.rarity, self.level, rarities)
    }

    /// True when `other` can be merged into this card by an upgrade.
    ///
    /// Copies of the same card stay identical whatever their levels.
    pub fn is_identical_to(&self, other: &Card) -> bool {
        self.archetype == other.archetype
            && self.template == other.template
            && self.rarity == other.rarity
    }
}
