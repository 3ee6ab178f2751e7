//! Random card generation for packs and AI opponents.

use strum::{EnumCount, IntoEnumIterator};

use crate::config::{MintParams, StatBand};
use crate::ids::{AccountId, CardId};
use crate::rng::RandomSource;

use super::{Archetype, Card, CardStats, Rarity, RarityTable};

fn roll_stat(band: StatBand, rarity: Rarity, rarities: &RarityTable, rng: &mut dyn RandomSource) -> u32 {
    let base = rng.range(band.min, band.max);
    (u64::from(base) * u64::from(rarities.tenths(rarity)) / 10).min(u64::from(u32::MAX)) as u32
}

/// Mint a level-1 card of the given rarity.
///
/// Archetype and template are uniform; each stat is drawn from its Common
/// band and scaled by the rarity multiplier. Draw order: archetype,
/// template, attack, defense, health.
pub fn mint_card(
    params: &MintParams,
    rarities: &RarityTable,
    rng: &mut dyn RandomSource,
    id: CardId,
    rarity: Rarity,
    owner: AccountId,
) -> Card {
    let archetype = Archetype::iter()
        .nth(rng.below(Archetype::COUNT as u32) as usize)
        .unwrap_or(Archetype::Warrior);
    let template = rng.range(1, params.templates_per_archetype.max(1));
    let stats = CardStats::new(
        roll_stat(params.attack, rarity, rarities, rng),
        roll_stat(params.defense, rarity, rarities, rng),
        roll_stat(params.health, rarity, rarities, rng),
    );
    Card::new(id, template, archetype, rarity, stats, owner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::rng::{PcgRng, ScriptedRng};

    #[test]
    fn scripted_draws_pick_archetype_and_scale_stats() {
        let config = EngineConfig::default();
        // archetype 3 (Tank), template draw 0 -> 1, band minimums
        let mut rng = ScriptedRng::new([3, 0, 0, 0, 0]);
        let card = mint_card(
            &config.minting,
            &config.rarities,
            &mut rng,
            CardId(1),
            Rarity::Epic,
            AccountId(4),
        );
        assert_eq!(card.archetype, Archetype::Tank);
        assert_eq!(card.template, 1);
        assert_eq!(card.stats, CardStats::new(40, 20, 120));
        assert_eq!(card.level, 1);
        assert_eq!(card.owner, AccountId(4));
    }

    #[test]
    fn stats_stay_within_scaled_bands() {
        let config = EngineConfig::default();
        let mut rng = PcgRng::new(99);
        for n in 0..200 {
            let card = mint_card(
                &config.minting,
                &config.rarities,
                &mut rng,
                CardId(n),
                Rarity::Legendary,
                AccountId(1),
            );
            assert!((60..=150).contains(&card.stats.attack));
            assert!((180..=360).contains(&card.stats.health));
            assert!((1..=20).contains(&card.template));
        }
    }
}
