//! Operator-facing notices raised while loading or recording data.
//!
//! None of these are failures: the engine has already recovered by the time
//! one is recorded. They are mirrored to `tracing` at warn level and kept
//! until the caller drains them.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A catalog or feedback file did not exist; an empty collection was used.
    MissingSource,
    /// Feedback referenced an id the catalog does not contain.
    DanglingProduct,
    /// A malformed feedback log was moved aside.
    QuarantinedLog,
    SkippedRow,
    DuplicateId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub at: OffsetDateTime,
    pub kind: DiagnosticKind,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct Diagnostics {
    pending: Vec<Diagnostic>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            at: OffsetDateTime::now_utc(),
            kind,
            message: message.into(),
        }
    }
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let diagnostic = Diagnostic::new(kind, message);
        warn!(kind = %diagnostic.kind, "{}", diagnostic.message);
        self.pending.push(diagnostic);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.pending.iter()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.pending.iter().filter(|d| d.kind == kind).count()
    }

    pub fn drain(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.pending)
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            DiagnosticKind::MissingSource => "missing_source",
            DiagnosticKind::DanglingProduct => "dangling_product",
            DiagnosticKind::QuarantinedLog => "quarantined_log",
            DiagnosticKind::SkippedRow => "skipped_row",
            DiagnosticKind::DuplicateId => "duplicate_id",
        };
        write!(f, "{value}")
    }
}
