use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, CatalogEntry};
use crate::profile::Profile;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayFields {
    pub name: String,
    #[serde(rename = "style_main")]
    pub category: String,
    #[serde(rename = "style_sub")]
    pub subcategory: String,
    pub abv: String,
    pub volume: String,
    pub price: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedEntry {
    #[serde(rename = "beer_id")]
    pub product_id: String,
    pub score: u32,
    #[serde(flatten)]
    pub display: DisplayFields,
}

impl DisplayFields {
    /// Ids missing from the catalog get all-empty fields.
    pub fn from_entry(entry: Option<&CatalogEntry>) -> Self {
        match entry {
            Some(entry) => Self {
                name: entry.name.clone(),
                category: entry.category.clone(),
                subcategory: entry.subcategory.clone(),
                abv: entry.abv.clone(),
                volume: entry.volume.clone(),
                price: entry.price.clone(),
            },
            None => Self::default(),
        }
    }
}

/// Highest scores first. Equal scores keep the order in which the ids were
/// first rated.
pub fn top_n(profile: &Profile, catalog: &Catalog, n: usize) -> Vec<RankedEntry> {
    let mut ranked: Vec<&(String, u32)> = profile.scores().iter().collect();
    ranked.sort_by(|left, right| right.1.cmp(&left.1));
    ranked
        .into_iter()
        .take(n)
        .map(|(product_id, score)| RankedEntry {
            product_id: product_id.clone(),
            score: *score,
            display: DisplayFields::from_entry(catalog.lookup(product_id)),
        })
        .collect()
}
