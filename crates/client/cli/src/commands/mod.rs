//! Simulator subcommands.

mod battle;
mod inspect;

pub use battle::Battle;
pub use inspect::Inspect;

use std::path::PathBuf;

use anyhow::Result;
use arena_content::ContentFactory;
use arena_runtime::RuntimeConfig;

/// Content factory over `data_dir`, or the bundled content when absent.
fn factory(data_dir: Option<PathBuf>) -> ContentFactory {
    match data_dir {
        Some(dir) => ContentFactory::new(dir),
        None => ContentFactory::bundled(),
    }
}

/// Runtime configuration from the environment, with the balance sheet taken
/// from `--config`, then `ARENA_CONFIG_PATH`, then the content directory.
fn runtime_config(factory: &ContentFactory, config: Option<PathBuf>) -> Result<RuntimeConfig> {
    let mut runtime = RuntimeConfig::from_env()?;
    match config {
        Some(path) => runtime = runtime.with_config_path(path)?,
        None if runtime.config_path.is_none() => runtime.engine = factory.load_config()?,
        None => {}
    }
    Ok(runtime)
}
