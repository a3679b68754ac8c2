use std::path::PathBuf;

use anyhow::Result;

use trainer_core::CatalogEntry;

#[derive(Debug)]
pub enum CatalogAction {
    List,
    Show {
        beer_id: String,
    },
    Search {
        query: String,
        category: Option<String>,
        limit: Option<usize>,
    },
    Categories,
}

pub fn execute(config_path: Option<PathBuf>, action: CatalogAction) -> Result<()> {
    let (config, trainer) = super::open_trainer(config_path)?;

    match action {
        CatalogAction::List => {
            for beer_id in trainer.list_catalog_ids() {
                if let Some(entry) = trainer.get_catalog_entry(beer_id) {
                    println!("{}", summary_line(entry));
                }
            }
        }
        CatalogAction::Show { beer_id } => match trainer.get_catalog_entry(&beer_id) {
            Some(entry) => {
                println!("{}", summary_line(entry));
                println!("  style: {} / {}", entry.category, entry.subcategory);
                println!("  abv: {}  volume: {}  price: {}", entry.abv, entry.volume, entry.price);
                println!("  score: {}", trainer.score(&beer_id));
            }
            None => println!("{beer_id} is not in the catalog"),
        },
        CatalogAction::Search {
            query,
            category,
            limit,
        } => {
            let limit = limit.unwrap_or(config.search.limit);
            let matches = trainer.search_catalog(&query, category.as_deref(), limit);
            if matches.is_empty() {
                println!("No matches.");
            }
            for entry in matches {
                println!("{}", summary_line(entry));
            }
        }
        CatalogAction::Categories => {
            for category in trainer.categories() {
                println!("{category}");
            }
        }
    }
    Ok(())
}

fn summary_line(entry: &CatalogEntry) -> String {
    if entry.category.is_empty() {
        format!("{}\t{}", entry.product_id, entry.name)
    } else {
        format!("{}\t{} ({})", entry.product_id, entry.name, entry.category)
    }
}
