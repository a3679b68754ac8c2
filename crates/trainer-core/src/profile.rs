//! Running score and note aggregation derived from the feedback log.

use std::collections::HashMap;

use crate::feedback::FeedbackEntry;

/// Derived state; replaying the same entries in the same order always
/// produces an equal profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    scores: Vec<(String, u32)>,
    positions: HashMap<String, usize>,
    notes: HashMap<String, Vec<String>>,
    keep_empty_notes: bool,
}

impl Profile {
    /// With `keep_empty_notes` off, notes that are blank after trimming are
    /// not collected (the rating still counts).
    pub fn new(keep_empty_notes: bool) -> Self {
        Self {
            keep_empty_notes,
            ..Self::default()
        }
    }

    pub fn replay<'a>(entries: impl IntoIterator<Item = &'a FeedbackEntry>, keep_empty_notes: bool) -> Self {
        let mut profile = Self::new(keep_empty_notes);
        for entry in entries {
            profile.update(entry);
        }
        profile
    }

    /// Folds one log entry in. Must be called once per entry, in log order.
    pub fn update(&mut self, entry: &FeedbackEntry) {
        let position = match self.positions.get(&entry.product_id) {
            Some(&position) => position,
            None => {
                self.positions.insert(entry.product_id.clone(), self.scores.len());
                self.scores.push((entry.product_id.clone(), 0));
                self.scores.len() - 1
            }
        };
        let score = &mut self.scores[position].1;
        *score = score.saturating_add(entry.rating.weight());

        if let Some(category) = &entry.category {
            if self.keep_empty_notes || !entry.notes.trim().is_empty() {
                self.notes
                    .entry(category.clone())
                    .or_default()
                    .push(entry.notes.clone());
            }
        }
    }

    pub fn score(&self, product_id: &str) -> u32 {
        self.positions
            .get(product_id)
            .map(|&position| self.scores[position].1)
            .unwrap_or(0)
    }

    /// `(product_id, score)` pairs in order of first appearance.
    pub fn scores(&self) -> &[(String, u32)] {
        &self.scores
    }

    pub fn notes_for(&self, category: &str) -> &[String] {
        self.notes.get(category).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rated_count(&self) -> usize {
        self.scores.len()
    }
}
