use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrainerError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("catalog {} has no `{column}` column", path.display())]
    MissingColumn { path: PathBuf, column: String },
    #[error("unsupported catalog format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("feedback log {} is malformed: {reason}", path.display())]
    CorruptLog { path: PathBuf, reason: String },
}
