//! Card power calculation.

use super::{CardStats, Rarity};

/// Rarity power multipliers, expressed in tenths (`15` means ×1.5).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RarityTable {
    pub common: u32,
    pub rare: u32,
    pub epic: u32,
    pub legendary: u32,
    pub mythic: u32,
}

impl RarityTable {
    pub const fn tenths(&self, rarity: Rarity) -> u32 {
        match rarity {
            Rarity::Common => self.common,
            Rarity::Rare => self.rare,
            Rarity::Epic => self.epic,
            Rarity::Legendary => self.legendary,
            Rarity::Mythic => self.mythic,
        }
    }
}

impl Default for RarityTable {
    fn default() -> Self {
        Self {
            common: 10,
            rare: 15,
            epic: 20,
            legendary: 30,
            mythic: 50,
        }
    }
}

/// Calculate card power.
///
/// # Formula
///
/// ```text
/// power = floor((attack + defense + health / 2)
///               × rarity_multiplier
///               × (1 + (level - 1) × 0.1))
/// ```
///
/// Evaluated exactly in integers by scaling every fractional term:
///
/// ```text
/// power = (2·attack + 2·defense + health) × rarity_tenths × (9 + level) / 200
/// ```
///
/// A level of 0 is treated as level 1.
pub fn calculate_power(stats: &CardStats, rarity: Rarity, level: u32, rarities: &RarityTable) -> u64 {
    let level = u64::from(level.max(1));
    let doubled_base =
        2 * u64::from(stats.attack) + 2 * u64::from(stats.defense) + u64::from(stats.health);
    let scaled = u128::from(doubled_base)
        * u128::from(rarities.tenths(rarity))
        * u128::from(9 + level);

    (scaled / 200).min(u128::from(u64::MAX)) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn power(attack: u32, defense: u32, health: u32, rarity: Rarity, level: u32) -> u64 {
        calculate_power(
            &CardStats::new(attack, defense, health),
            rarity,
            level,
            &RarityTable::default(),
        )
    }

    #[test]
    fn legendary_level_one() {
        // (100 + 80 + 150/2) × 3 × 1.0 = 765
        assert_eq!(power(100, 80, 150, Rarity::Legendary, 1), 765);
    }

    #[test]
    fn fractional_terms_are_floored_once() {
        // (10 + 10 + 15/2) × 1.5 × 1.1 = 27.5 × 1.65 = 45.375
        assert_eq!(power(10, 10, 15, Rarity::Rare, 2), 45);
        // (1 + 0 + 1/2) × 1 × 1.0 = 1.5
        assert_eq!(power(1, 0, 1, Rarity::Common, 1), 1);
    }

    #[test]
    fn level_scales_linearly() {
        // 200 × 5 × 2.0
        assert_eq!(power(100, 100, 0, Rarity::Mythic, 11), 2000);
        assert_eq!(power(100, 100, 0, Rarity::Mythic, 0), 1000);
    }

    proptest! {
        #[test]
        fn deterministic(a in 0u32..100_000, d in 0u32..100_000, h in 0u32..100_000, lvl in 1u32..200) {
            prop_assert_eq!(power(a, d, h, Rarity::Epic, lvl), power(a, d, h, Rarity::Epic, lvl));
        }

        #[test]
        fn monotonic_in_every_input(
            a in 0u32..100_000,
            d in 0u32..100_000,
            h in 0u32..100_000,
            lvl in 1u32..200,
            bump in 1u32..1_000,
        ) {
            let base = power(a, d, h, Rarity::Rare, lvl);
            prop_assert!(power(a + bump, d, h, Rarity::Rare, lvl) >= base);
            prop_assert!(power(a, d + bump, h, Rarity::Rare, lvl) >= base);
            prop_assert!(power(a, d, h + bump, Rarity::Rare, lvl) >= base);
            prop_assert!(power(a, d, h, Rarity::Rare, lvl + bump) >= base);
        }
    }
}
