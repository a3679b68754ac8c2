use std::path::PathBuf;

use anyhow::{Context, Result};

pub fn execute(config_path: Option<PathBuf>, count: Option<usize>, json: bool) -> Result<()> {
    let (config, trainer) = super::open_trainer(config_path)?;
    let ranked = trainer.get_top_n(count.unwrap_or(config.ranking.default_top_n));

    if json {
        let output = serde_json::to_string_pretty(&ranked).context("render ranking JSON")?;
        println!("{}", output);
        return Ok(());
    }
    if ranked.is_empty() {
        println!("No feedback recorded yet.");
    }
    for (position, entry) in ranked.iter().enumerate() {
        let name = if entry.display.name.is_empty() {
            "(not in catalog)"
        } else {
            entry.display.name.as_str()
        };
        println!("{:>2}. {:<12} {:>4}  {}", position + 1, entry.product_id, entry.score, name);
    }
    Ok(())
}
