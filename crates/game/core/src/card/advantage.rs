//! Archetype type-advantage matrix.

use strum::EnumCount;

use super::Archetype;

/// Neutral multiplier (×1.0) in per-mille.
pub const NEUTRAL: u32 = 1000;

/// Attacker → defender damage multipliers in per-mille.
///
/// Rows are indexed by attacker, columns by defender, both in
/// [`Archetype`] declaration order. The matrix is total, so every ordered
/// pair has a multiplier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeAdvantageTable {
    pub matrix: [[u32; Archetype::COUNT]; Archetype::COUNT],
}

impl TypeAdvantageTable {
    /// Table where every matchup is neutral.
    pub const fn neutral() -> Self {
        Self {
            matrix: [[NEUTRAL; Archetype::COUNT]; Archetype::COUNT],
        }
    }

    /// Multiplier applied when `attacker` hits `defender`.
    pub const fn multiplier(&self, attacker: Archetype, defender: Archetype) -> u32 {
        self.matrix[attacker.index()][defender.index()]
    }

    #[must_use]
    pub const fn with(mut self, attacker: Archetype, defender: Archetype, per_mille: u32) -> Self {
        self.matrix[attacker.index()][defender.index()] = per_mille;
        self
    }
}

impl Default for TypeAdvantageTable {
    fn default() -> Self {
        use Archetype::*;

        Self::neutral()
            // advantages
            .with(Warrior, Mage, 1300)
            .with(Mage, Tank, 1300)
            .with(Assassin, Support, 1300)
            .with(Tank, Assassin, 1300)
            .with(Support, Warrior, 1200)
            // counters
            .with(Mage, Warrior, 800)
            .with(Tank, Mage, 800)
            .with(Assassin, Tank, 800)
            .with(Support, Assassin, 800)
            .with(Warrior, Support, 900)
    }
}
