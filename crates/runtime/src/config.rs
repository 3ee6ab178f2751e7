//! Runtime configuration structures and loaders.

use std::env;
use std::path::{Path, PathBuf};

use arena_content::ConfigLoader;
use arena_core::EngineConfig;

use crate::error::{Result, RuntimeError};

/// Configuration required to run economy flows against a store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub engine: EngineConfig,
    /// Commit attempts per request before giving up with `Contended`.
    pub max_commit_attempts: u32,
    /// Base seed mixed into every per-request random stream.
    pub rng_seed: u64,
    pub config_path: Option<PathBuf>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            max_commit_attempts: Self::DEFAULT_COMMIT_ATTEMPTS,
            rng_seed: 0,
            config_path: None,
        }
    }
}

impl RuntimeConfig {
    pub const DEFAULT_COMMIT_ATTEMPTS: u32 = 3;

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_CONFIG_PATH` - TOML balance sheet (default: built-in values)
    /// - `ARENA_MAX_COMMIT_ATTEMPTS` - Commit attempts per request (default: 3)
    /// - `ARENA_RNG_SEED` - Base random seed (default: random)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(attempts) = read_var::<u32>(&lookup, "ARENA_MAX_COMMIT_ATTEMPTS") {
            config.max_commit_attempts = attempts.max(1);
        }

        config.rng_seed =
            read_var::<u64>(&lookup, "ARENA_RNG_SEED").unwrap_or_else(rand::random::<u64>);

        if let Some(path) = lookup("ARENA_CONFIG_PATH") {
            config = config.with_config_path(path)?;
        }

        Ok(config)
    }

    /// Replace the engine configuration with the contents of a TOML file.
    pub fn with_config_path(mut self, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        self.engine =
            ConfigLoader::load(path).map_err(|e| RuntimeError::Config(format!("{e:#}")))?;
        self.config_path = Some(path.to_path_buf());
        Ok(self)
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    #[must_use]
    pub fn with_max_commit_attempts(mut self, attempts: u32) -> Self {
        self.max_commit_attempts = attempts.max(1);
        self
    }
}

fn read_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.parse().ok()
}
