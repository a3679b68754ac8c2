use std::path::PathBuf;

use anyhow::Result;

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let (_config, trainer) = super::open_trainer(config_path)?;
    println!("Catalog entries: {}", trainer.catalog().len());
    println!("Feedback entries: {}", trainer.feedback().len());
    println!("Rated beers: {}", trainer.profile().rated_count());
    println!("Feedback log: {}", trainer.feedback_path().display());
    if !trainer.diagnostics().is_empty() {
        println!("Notices raised while loading:");
        for notice in trainer.diagnostics().iter() {
            println!("  [{}] {}", notice.kind, notice.message);
        }
    }
    Ok(())
}
