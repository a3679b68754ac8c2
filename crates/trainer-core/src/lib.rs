pub mod catalog;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod feedback;
pub mod paths;
pub mod profile;
pub mod ranking;
pub mod trainer;

pub use catalog::{Catalog, CatalogEntry};
pub use config::{CatalogColumns, Config, ConfigPaths, CorruptPolicy};
pub use diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
pub use error::TrainerError;
pub use feedback::{FeedbackEntry, FeedbackLog, Rating};
pub use profile::Profile;
pub use ranking::{DisplayFields, RankedEntry};
pub use trainer::{Trainer, TrainerOptions};
