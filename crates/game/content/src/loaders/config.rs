//! Engine configuration loader.

use std::path::Path;

use arena_core::EngineConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for the engine balance sheet from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Sections missing from the file keep their default values.
    pub fn load(path: &Path) -> LoadResult<EngineConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path.display(), e))
    }

    /// Parse and validate config TOML.
    pub fn parse(content: &str) -> LoadResult<EngineConfig> {
        let config: EngineConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        Self::validate(&config)?;
        Ok(config)
    }

    fn validate(config: &EngineConfig) -> LoadResult<()> {
        let damage = &config.damage;
        anyhow::ensure!(
            damage.variance_min <= damage.variance_max,
            "damage.variance_min must not exceed damage.variance_max"
        );
        anyhow::ensure!(
            config.battle.min_deck_size <= EngineConfig::MAX_DECK_SIZE,
            "battle.min_deck_size exceeds the maximum deck size of {}",
            EngineConfig::MAX_DECK_SIZE
        );
        anyhow::ensure!(
            config.market.min_price <= config.market.max_price,
            "market.min_price must not exceed market.max_price"
        );
        anyhow::ensure!(
            config
                .market
                .fee_bps
                .checked_add(config.market.tax_bps)
                .is_some_and(|total| total <= 10_000),
            "market fee and tax exceed 100%"
        );
        anyhow::ensure!(
            config.market.vip_seller_bonus_bps <= 10_000,
            "market.vip_seller_bonus_bps exceeds 100%"
        );
        anyhow::ensure!(!config.daily.days.is_empty(), "daily reward table is empty");
        for (name, pack) in [
            ("basic", &config.shop.packs.basic),
            ("premium", &config.shop.packs.premium),
            ("legendary", &config.shop.packs.legendary),
        ] {
            anyhow::ensure!(pack.total_weight() > 0, "pack {name} has no rarity weights");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundled_data_dir;

    #[test]
    fn bundled_config_matches_defaults() {
        let config = ConfigLoader::load(&bundled_data_dir().join("config.toml")).expect("load");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("[market]\nfee_bps = 250\n").expect("parse");
        assert_eq!(config.market.fee_bps, 250);
        assert_eq!(config.market.min_price, 10);
        assert_eq!(config.battle.max_turns, 100);
    }

    #[test]
    fn inconsistent_config_is_rejected() {
        let err = ConfigLoader::parse("[damage]\nvariance_min = 1200\nvariance_max = 1100\n")
            .unwrap_err();
        assert!(err.to_string().contains("variance_min"));
    }

    #[test]
    fn fee_and_tax_near_the_integer_limit_are_rejected() {
        let err = ConfigLoader::parse("[market]\nfee_bps = 4294967295\ntax_bps = 1\n")
            .unwrap_err();
        assert!(err.to_string().contains("fee and tax exceed 100%"));
    }
}
