use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::TrainerError;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageConfig,
    pub catalog: CatalogConfig,
    pub feedback: FeedbackConfig,
    pub ranking: RankingConfig,
    pub search: SearchConfig,
}

/// File locations. Values may use `${DATA_DIR}`, `${CONFIG_DIR}` and `${HOME}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub feedback_path: String,
    pub catalog_path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Worksheet to read from spreadsheet catalogs; the first one when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    pub columns: CatalogColumns,
}

/// Header names of the catalog source. Only `id` is required to exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogColumns {
    pub id: String,
    pub name: String,
    pub category: String,
    pub subcategory: String,
    pub abv: String,
    pub volume: String,
    pub price: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedbackConfig {
    pub keep_empty_notes: bool,
    pub on_corrupt: CorruptPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorruptPolicy {
    /// Move the unreadable log aside and start from an empty one.
    Quarantine,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub default_top_n: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub limit: usize,
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub config_path: PathBuf,
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl Config {
    pub fn default_config() -> Self {
        Self {
            storage: StorageConfig::default(),
            catalog: CatalogConfig::default(),
            feedback: FeedbackConfig::default(),
            ranking: RankingConfig::default(),
            search: SearchConfig::default(),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("parse config TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        let output = toml::to_string_pretty(self).context("render config TOML")?;
        Ok(output)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("read config at {}", path.display()))?;
        Self::from_toml_str(&contents)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default_config());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create config dir {}", parent.display()))?;
        }
        let contents = self.to_toml_string()?;
        fs::write(path, contents).with_context(|| format!("write config at {}", path.display()))?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.catalog.columns.id.trim().is_empty() {
            return Err(TrainerError::InvalidConfig("catalog.columns.id must not be empty".into()).into());
        }
        if self.storage.feedback_path.trim().is_empty() {
            return Err(TrainerError::InvalidConfig("storage.feedback_path must not be empty".into()).into());
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            feedback_path: "${DATA_DIR}/user_feedback.json".to_string(),
            catalog_path: "${DATA_DIR}/beer_data.xlsx".to_string(),
        }
    }
}

impl Default for CatalogColumns {
    fn default() -> Self {
        Self {
            id: "beer_id".to_string(),
            name: "name_jp".to_string(),
            category: "style_main_jp".to_string(),
            subcategory: "style_sub_jp".to_string(),
            abv: "abv".to_string(),
            volume: "volume".to_string(),
            price: "price".to_string(),
        }
    }
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            keep_empty_notes: false,
            on_corrupt: CorruptPolicy::Quarantine,
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self { default_top_n: 5 }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { limit: 10 }
    }
}

impl ConfigPaths {
    pub fn resolve() -> Result<Self> {
        let project_dirs = ProjectDirs::from("io", "beer-trainer", "beer-trainer")
            .ok_or_else(|| anyhow::anyhow!("unable to determine project directories"))?;
        let config_dir = project_dirs.config_dir();
        let data_dir = project_dirs.data_dir();
        Ok(Self {
            config_path: config_dir.join("config.toml"),
            config_dir: config_dir.to_path_buf(),
            data_dir: data_dir.to_path_buf(),
        })
    }

    /// Paths rooted at an explicit directory instead of the platform defaults.
    pub fn rooted_at(root: &Path) -> Self {
        Self {
            config_path: root.join("config.toml"),
            config_dir: root.to_path_buf(),
            data_dir: root.to_path_buf(),
        }
    }
}
