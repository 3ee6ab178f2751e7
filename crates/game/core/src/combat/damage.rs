//! Damage calculation and application.

use crate::card::{Card, TypeAdvantageTable};
use crate::config::DamageParams;
use crate::rng::RandomSource;

/// One resolved hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRoll {
    pub damage: u64,
    pub critical: bool,
    /// Type-advantage multiplier that was applied, per-mille.
    pub advantage: u32,
    /// Variance factor that was drawn, per-mille.
    pub variance: u32,
}

/// Mitigated damage before advantage, variance and critical, in per-mille
/// units of damage.
///
/// # Formula
///
/// ```text
/// reduction = min(defense × 0.4, attack × 0.6)
/// damage    = max(attack − reduction, attack × 0.25)
/// ```
pub fn base_damage(attack: u32, defense: u32, params: &DamageParams) -> u128 {
    let attack = u128::from(attack);
    let defense = u128::from(defense);

    let reduction = (defense * u128::from(params.defense_factor))
        .min(attack * u128::from(params.mitigation_cap));
    let mitigated = (attack * 1000).saturating_sub(reduction);
    let floor = attack * u128::from(params.minimum_share);

    mitigated.max(floor)
}

/// Resolve one attack from `attacker` onto `defender`.
///
/// Draws the variance factor first, then the critical roll. The result is
/// floored once at the end.
pub fn resolve_damage(
    attacker: &Card,
    defender: &Card,
    advantage: &TypeAdvantageTable,
    params: &DamageParams,
    rng: &mut dyn RandomSource,
) -> DamageRoll {
    let base = base_damage(attacker.stats.attack, defender.stats.defense, params);
    let multiplier = advantage.multiplier(attacker.archetype, defender.archetype);
    let variance = rng.range(params.variance_min, params.variance_max);
    let critical = rng.chance(params.crit_chance);
    let crit_factor = if critical { params.crit_multiplier } else { 1 };

    let scaled = base * u128::from(multiplier) * u128::from(variance) * u128::from(crit_factor);
    let damage = (scaled / 1_000_000_000).min(u128::from(u64::MAX)) as u64;

    DamageRoll {
        damage,
        critical,
        advantage: multiplier,
        variance,
    }
}

/// Apply damage to pooled health, clamped to 0.
pub fn apply_damage(current_hp: u64, damage: u64) -> u64 {
    current_hp.saturating_sub(damage)
}
