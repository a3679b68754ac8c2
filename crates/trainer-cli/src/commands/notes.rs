use std::path::PathBuf;

use anyhow::Result;

pub fn execute(config_path: Option<PathBuf>, category: &str) -> Result<()> {
    let (_config, trainer) = super::open_trainer(config_path)?;
    let notes = trainer.get_notes_for_category(category);
    if notes.is_empty() {
        println!("No notes for {category}.");
    }
    for note in notes {
        println!("- {note}");
    }
    Ok(())
}
