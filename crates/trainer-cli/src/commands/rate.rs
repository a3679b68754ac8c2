use std::path::PathBuf;

use anyhow::Result;

pub struct RateInputs {
    pub config_path: Option<PathBuf>,
    pub beer_id: String,
    pub rating: String,
    pub notes: String,
    pub category: Option<String>,
}

pub fn execute(inputs: RateInputs) -> Result<()> {
    let (_config, mut trainer) = super::open_trainer(inputs.config_path)?;
    let entry = trainer.submit_feedback(
        &inputs.beer_id,
        &inputs.rating,
        &inputs.notes,
        inputs.category.as_deref(),
    )?;
    println!(
        "Recorded {} for {} (score now {}).",
        entry.rating,
        entry.product_id,
        trainer.score(&entry.product_id)
    );
    Ok(())
}
