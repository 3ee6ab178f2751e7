//! Data-driven content definitions and loaders.
//!
//! This crate ships the default content files and loads them:
//! - Engine balance sheet (`config.toml`, TOML)
//! - Decks (`decks/*.ron`, RON)
//!
//! All loaders use arena-core types directly with serde for RON/TOML
//! deserialization.

use std::path::PathBuf;

#[cfg(feature = "loaders")]
pub mod loaders;

#[cfg(feature = "loaders")]
pub use loaders::{CardSpec, ConfigLoader, ContentFactory, DeckLoader, DeckSpec};

/// Directory holding the content files shipped with this crate.
pub fn bundled_data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data")
}
