pub mod catalog;
pub mod config;
pub mod notes;
pub mod rate;
pub mod status;
pub mod top;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use trainer_core::config::{Config, ConfigPaths};
use trainer_core::{Trainer, TrainerOptions};

/// Resolves the effective config and opens the engine it describes.
/// Without `--config`, a missing default config file means built-in defaults.
pub fn open_trainer(config_path: Option<PathBuf>) -> Result<(Config, Trainer)> {
    let paths = ConfigPaths::resolve()?;
    let config = match config_path {
        Some(path) => Config::load(&path).with_context(|| {
            format!("load config at {} (run `beer-trainer init` if missing)", path.display())
        })?,
        None => Config::load_or_default(&paths.config_path)?,
    };
    let options = TrainerOptions::from_config(&config, &paths);
    debug!(
        catalog = %options.catalog_path.display(),
        feedback = %options.feedback_path.display(),
        "opening trainer"
    );
    let trainer = Trainer::open(options)?;
    Ok((config, trainer))
}
