//! Append-only feedback log persisted as a pretty-printed JSON array.

use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use time::OffsetDateTime;
use tracing::debug;

use crate::config::CorruptPolicy;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::error::TrainerError;

/// Ordinal tasting verdict. Persisted as its weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Rating {
    Bad,
    Neutral,
    Good,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    #[serde(rename = "beer_id")]
    pub product_id: String,
    pub rating: Rating,
    #[serde(default)]
    pub notes: String,
    #[serde(rename = "style", default)]
    pub category: Option<String>,
}

#[derive(Debug)]
pub struct FeedbackLog {
    path: PathBuf,
    entries: Vec<FeedbackEntry>,
}

impl Rating {
    /// Maps a UI label to a rating. Unrecognized labels count as neutral.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "good" | "良い" => Rating::Good,
            "bad" | "悪い" => Rating::Bad,
            _ => Rating::Neutral,
        }
    }

    pub fn weight(self) -> u32 {
        match self {
            Rating::Bad => 0,
            Rating::Neutral => 1,
            Rating::Good => 2,
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.weight() as u8
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Rating::Bad),
            1 => Ok(Rating::Neutral),
            2 => Ok(Rating::Good),
            other => Err(format!("rating must be 0, 1 or 2, got {other}")),
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            Rating::Bad => "bad",
            Rating::Neutral => "neutral",
            Rating::Good => "good",
        };
        write!(f, "{value}")
    }
}

impl FeedbackEntry {
    /// A blank category is stored as no category.
    pub fn new(
        product_id: impl Into<String>,
        rating: Rating,
        notes: impl Into<String>,
        category: Option<String>,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            rating,
            notes: notes.into(),
            category: category.filter(|value| !value.trim().is_empty()),
        }
    }
}

impl FeedbackLog {
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
        }
    }

    /// Restores the log at `path`. A missing or blank file is an empty log.
    /// A file that does not parse is handled according to `on_corrupt`.
    pub fn load(path: &Path, on_corrupt: CorruptPolicy, diagnostics: &mut Diagnostics) -> Result<Self> {
        if !path.exists() {
            diagnostics.record(
                DiagnosticKind::MissingSource,
                format!("feedback log {} not found, starting empty", path.display()),
            );
            return Ok(Self::empty(path));
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read feedback log {}", path.display()))?;
        if contents.trim().is_empty() {
            return Ok(Self::empty(path));
        }

        match serde_json::from_str::<Vec<FeedbackEntry>>(&contents) {
            Ok(entries) => {
                debug!(path = %path.display(), entries = entries.len(), "feedback log restored");
                Ok(Self {
                    path: path.to_path_buf(),
                    entries,
                })
            }
            Err(err) => match on_corrupt {
                CorruptPolicy::Fail => Err(TrainerError::CorruptLog {
                    path: path.to_path_buf(),
                    reason: err.to_string(),
                }
                .into()),
                CorruptPolicy::Quarantine => {
                    let moved_to = quarantine(path)?;
                    diagnostics.record(
                        DiagnosticKind::QuarantinedLog,
                        format!(
                            "feedback log {} is malformed ({err}); moved to {} and starting empty",
                            path.display(),
                            moved_to.display()
                        ),
                    );
                    Ok(Self::empty(path))
                }
            },
        }
    }

    /// Appends and rewrites the whole log. On a failed write the entry is
    /// dropped again so memory never holds more than disk.
    pub fn append(&mut self, entry: FeedbackEntry) -> Result<()> {
        self.entries.push(entry);
        if let Err(err) = self.save() {
            self.entries.pop();
            return Err(err);
        }
        Ok(())
    }

    /// Writes the full log to a sibling temp file, then renames it into place.
    pub fn save(&self) -> Result<()> {
        let parent = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        fs::create_dir_all(parent)
            .with_context(|| format!("create feedback dir {}", parent.display()))?;

        let contents = serde_json::to_string_pretty(&self.entries).context("render feedback JSON")?;
        let mut staged = NamedTempFile::new_in(parent)
            .with_context(|| format!("stage feedback log in {}", parent.display()))?;
        staged
            .write_all(contents.as_bytes())
            .context("write staged feedback log")?;
        // Keep the mode of the log being replaced; temp files start owner-only.
        if let Ok(existing) = fs::metadata(&self.path) {
            staged
                .as_file()
                .set_permissions(existing.permissions())
                .context("copy feedback log permissions")?;
        }
        staged
            .persist(&self.path)
            .with_context(|| format!("write feedback log {}", self.path.display()))?;
        Ok(())
    }

    pub fn entries(&self) -> &[FeedbackEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn quarantine(path: &Path) -> Result<PathBuf> {
    let stamp = OffsetDateTime::now_utc().unix_timestamp();
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "feedback.json".to_string());
    let mut target = path.with_file_name(format!("{file_name}.corrupt-{stamp}"));
    let mut attempt = 1u32;
    while target.exists() {
        target = path.with_file_name(format!("{file_name}.corrupt-{stamp}-{attempt}"));
        attempt += 1;
    }
    fs::rename(path, &target).with_context(|| {
        format!("quarantine feedback log {} to {}", path.display(), target.display())
    })?;
    Ok(target)
}
