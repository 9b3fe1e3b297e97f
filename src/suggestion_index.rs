//! Suggestions grouped by target paragraph.

use std::collections::HashMap;

use crate::paragraph::ParagraphId;
use crate::suggestion::{IntakeReport, Suggestion};

/// Mapping from target paragraph id to its suggestions in arrival order.
///
/// Lookups for unknown ids return an empty slice.
#[derive(Debug, Clone, Default)]
pub struct SuggestionIndex {
    by_target: HashMap<ParagraphId, Vec<Suggestion>>,
    /// Target ids in first-arrival order, for deterministic iteration
    order: Vec<ParagraphId>,
    len: usize,
}

impl SuggestionIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_suggestions(suggestions: impl IntoIterator<Item = Suggestion>) -> Self {
        let mut index = Self::new();
        index.extend(suggestions);
        index
    }

    /// Index the accepted half of an intake report.
    pub fn from_intake(report: &IntakeReport) -> Self {
        Self::from_suggestions(report.suggestions.iter().cloned())
    }

    pub fn insert(&mut self, suggestion: Suggestion) {
        let bucket = self
            .by_target
            .entry(suggestion.target_id.clone())
            .or_insert_with(Vec::new);
        if bucket.is_empty() {
            self.order.push(suggestion.target_id.clone());
        }
        bucket.push(suggestion);
        self.len += 1;
    }

    /// Suggestions for `target_id`, in arrival order.
    pub fn get(&self, target_id: &ParagraphId) -> &[Suggestion] {
        self.by_target
            .get(target_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, target_id: &ParagraphId) -> bool {
        self.by_target.contains_key(target_id)
    }

    /// Target ids that have at least one suggestion, in first-arrival order.
    pub fn target_ids(&self) -> impl Iterator<Item = &ParagraphId> {
        self.order.iter()
    }

    /// Total number of suggestions.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Extend<Suggestion> for SuggestionIndex {
    fn extend<I: IntoIterator<Item = Suggestion>>(&mut self, iter: I) {
        for suggestion in iter {
            self.insert(suggestion);
        }
    }
}

impl FromIterator<Suggestion> for SuggestionIndex {
    fn from_iter<I: IntoIterator<Item = Suggestion>>(iter: I) -> Self {
        Self::from_suggestions(iter)
    }
}
