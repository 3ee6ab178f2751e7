//! Content factory for loading the balance sheet and decks from a data directory.

use std::path::{Path, PathBuf};

use arena_core::EngineConfig;

use crate::loaders::{ConfigLoader, DeckLoader, DeckSpec, LoadResult};

/// Content factory that loads all arena content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// └── decks/
///     ├── starter.ron
///     └── rival.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the content shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(crate::bundled_data_dir())
    }

    /// Load the engine configuration from `config.toml`.
    pub fn load_config(&self) -> LoadResult<EngineConfig> {
        let path = self.data_dir.join("config.toml");
        ConfigLoader::load(&path)
    }

    /// Load a deck from `decks/{name}.ron`.
    pub fn load_deck(&self, name: &str) -> LoadResult<DeckSpec> {
        let path = self.data_dir.join("decks").join(format!("{name}.ron"));
        DeckLoader::load(&path)
    }

    /// Get the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
