use std::path::PathBuf;

use anyhow::{Context, Result};

use trainer_core::config::{Config, ConfigPaths};

pub fn print_effective(config_path: Option<PathBuf>) -> Result<()> {
    let paths = ConfigPaths::resolve()?;
    let config = match config_path {
        Some(path) => Config::load(&path).with_context(|| format!("load config {}", path.display()))?,
        None => Config::load_or_default(&paths.config_path)?,
    };
    let output = config.to_toml_string()?;
    println!("{}", output);
    Ok(())
}
