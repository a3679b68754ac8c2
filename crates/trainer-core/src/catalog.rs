//! Read-only product catalog loaded from a CSV file or a spreadsheet.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use calamine::{open_workbook_auto, Data, Reader};
use serde::{Deserialize, Serialize};

use crate::config::{CatalogColumns, CatalogConfig};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::TrainerError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub subcategory: String,
    pub abv: String,
    pub volume: String,
    pub price: String,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    index: HashMap<String, usize>,
}

/// Header plus string cells, whatever the source format.
struct Table {
    header: Vec<String>,
    rows: Vec<Vec<String>>,
}

struct ColumnMap {
    id: usize,
    name: Option<usize>,
    category: Option<usize>,
    subcategory: Option<usize>,
    abv: Option<usize>,
    volume: Option<usize>,
    price: Option<usize>,
}

impl CatalogEntry {
    pub fn new(product_id: impl Into<String>, name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            category: category.into(),
            ..Self::default()
        }
    }
}

impl Catalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a catalog from ready-made entries. Blank ids are skipped and
    /// later duplicates lose to the first occurrence.
    pub fn from_entries(
        entries: impl IntoIterator<Item = CatalogEntry>,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut catalog = Self::empty();
        for (position, entry) in entries.into_iter().enumerate() {
            catalog.insert(entry, position + 1, diagnostics);
        }
        catalog
    }

    /// Loads the catalog at `path`. A missing file is not an error: the
    /// result is an empty catalog and a `MissingSource` diagnostic.
    pub fn load(path: &Path, config: &CatalogConfig, diagnostics: &mut Diagnostics) -> Result<Self> {
        if !path.exists() {
            diagnostics.record(
                DiagnosticKind::MissingSource,
                format!("catalog {} not found, continuing with an empty catalog", path.display()),
            );
            return Ok(Self::empty());
        }

        let table = match extension(path).as_deref() {
            Some("csv") => read_csv(path)?,
            Some("xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => read_workbook(path, config.sheet.as_deref())?,
            _ => return Err(TrainerError::UnsupportedFormat(path.to_path_buf()).into()),
        };

        let columns = ColumnMap::resolve(&table.header, &config.columns).ok_or_else(|| {
            TrainerError::MissingColumn {
                path: path.to_path_buf(),
                column: config.columns.id.clone(),
            }
        })?;

        let mut catalog = Self::empty();
        for (position, row) in table.rows.iter().enumerate() {
            // +2: one for the header, one for 1-based row numbers.
            catalog.insert(columns.entry(row), position + 2, diagnostics);
        }
        tracing::info!(path = %path.display(), entries = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    fn insert(&mut self, entry: CatalogEntry, row: usize, diagnostics: &mut Diagnostics) {
        if entry.product_id.trim().is_empty() {
            diagnostics.record(DiagnosticKind::SkippedRow, format!("catalog row {row} has no id"));
            return;
        }
        if self.index.contains_key(&entry.product_id) {
            diagnostics.record(
                DiagnosticKind::DuplicateId,
                format!("catalog row {row} repeats id {}, keeping the first", entry.product_id),
            );
            return;
        }
        self.index.insert(entry.product_id.clone(), self.entries.len());
        self.entries.push(entry);
    }

    pub fn lookup(&self, product_id: &str) -> Option<&CatalogEntry> {
        self.index.get(product_id).map(|&position| &self.entries[position])
    }

    /// Ids in source row order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.product_id.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Case-insensitive substring search over display name and primary
    /// category. A blank query matches every entry. Results keep catalog
    /// order, are unique by display name and capped at `limit`.
    pub fn search(&self, query: &str, category: Option<&str>, limit: usize) -> Vec<&CatalogEntry> {
        let needle = query.trim().to_lowercase();
        let mut seen_names = HashSet::new();
        self.entries
            .iter()
            .filter(|entry| category.map_or(true, |wanted| entry.category == wanted))
            .filter(|entry| {
                needle.is_empty()
                    || entry.name.to_lowercase().contains(&needle)
                    || entry.category.to_lowercase().contains(&needle)
            })
            .filter(|entry| seen_names.insert(entry.name.as_str()))
            .take(limit)
            .collect()
    }

    /// Distinct non-empty primary categories, sorted.
    pub fn categories(&self) -> Vec<&str> {
        let unique: BTreeSet<&str> = self
            .entries
            .iter()
            .map(|entry| entry.category.as_str())
            .filter(|category| !category.is_empty())
            .collect();
        unique.into_iter().collect()
    }
}

impl ColumnMap {
    fn resolve(header: &[String], columns: &CatalogColumns) -> Option<Self> {
        let find = |name: &str| header.iter().position(|column| column == name);
        Some(Self {
            id: find(&columns.id)?,
            name: find(&columns.name),
            category: find(&columns.category),
            subcategory: find(&columns.subcategory),
            abv: find(&columns.abv),
            volume: find(&columns.volume),
            price: find(&columns.price),
        })
    }

    fn entry(&self, row: &[String]) -> CatalogEntry {
        let cell = |position: Option<usize>| {
            position
                .and_then(|position| row.get(position))
                .cloned()
                .unwrap_or_default()
        };
        CatalogEntry {
            product_id: cell(Some(self.id)).trim().to_string(),
            name: cell(self.name),
            category: cell(self.category),
            subcategory: cell(self.subcategory),
            abv: cell(self.abv),
            volume: cell(self.volume),
            price: cell(self.price),
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

fn read_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("open catalog {}", path.display()))?;
    let header = reader
        .headers()
        .with_context(|| format!("read catalog header {}", path.display()))?
        .iter()
        .map(|column| column.trim().to_string())
        .collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.with_context(|| format!("read catalog row {}", path.display()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(Table { header, rows })
}

fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<Table> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|err| anyhow!("open catalog {}: {err}", path.display()))?;
    let range = match sheet {
        Some(name) => workbook
            .worksheet_range(name)
            .map_err(|err| anyhow!("read sheet {name} of {}: {err}", path.display()))?,
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| anyhow!("catalog {} has no worksheets", path.display()))?
            .map_err(|err| anyhow!("read first sheet of {}: {err}", path.display()))?,
    };

    let mut rows = range.rows().map(|row| row.iter().map(cell_text).collect::<Vec<_>>());
    let header = rows
        .next()
        .unwrap_or_default()
        .into_iter()
        .map(|column| column.trim().to_string())
        .collect();
    Ok(Table {
        header,
        rows: rows.collect(),
    })
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.clone(),
        other => other.to_string(),
    }
}
