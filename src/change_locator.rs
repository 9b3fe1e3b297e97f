//! Locating suggestion fragments inside a paragraph.
//!
//! Every occurrence of a suggestion's original fragment becomes one
//! [`ChangeOp`]. Occurrences of the same fragment never overlap each other
//! (the scan resumes after each hit), but occurrences of different
//! fragments can; the segment builder deals with that.

use serde::{Deserialize, Serialize};

use crate::suggestion::{Suggestion, SuggestionStatus};

/// One located occurrence of a suggestion's original fragment.
///
/// `start` and `end` are byte offsets into the paragraph text and always
/// fall on character boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeOp {
    pub start: usize,
    pub end: usize,
    pub original_fragment: String,
    pub replacement_fragment: String,
    pub reason: Option<String>,
    pub status: SuggestionStatus,
    /// Position of the originating suggestion in the paragraph's list
    pub ordinal: usize,
}

impl ChangeOp {
    fn from_suggestion(start: usize, suggestion: &Suggestion, ordinal: usize) -> Self {
        Self {
            start,
            end: start + suggestion.original_fragment.len(),
            original_fragment: suggestion.original_fragment.clone(),
            replacement_fragment: suggestion.replacement_fragment.clone(),
            reason: suggestion.reason.clone(),
            status: suggestion.status,
            ordinal,
        }
    }

    /// Span length in bytes.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True if the two spans share at least one byte.
    pub fn overlaps(&self, other: &ChangeOp) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A suggestion that produced no occurrence in the paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnlocatedSuggestion {
    /// Position of the suggestion in the paragraph's list
    pub ordinal: usize,
    pub suggestion: Suggestion,
}

/// Result of locating a paragraph's suggestions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocatedChanges {
    /// Sorted by start ascending, longer span first on equal start
    pub ops: Vec<ChangeOp>,
    /// Suggestions with an empty or absent fragment, in arrival order
    pub unlocated: Vec<UnlocatedSuggestion>,
}

impl LocatedChanges {
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty() && self.unlocated.is_empty()
    }
}

/// Finds fragment occurrences in paragraph text.
pub struct ChangeLocator;

impl ChangeLocator {
    /// Locate every occurrence of every suggestion's fragment in `text`.
    pub fn locate(text: &str, suggestions: &[Suggestion]) -> LocatedChanges {
        let mut located = LocatedChanges::default();

        for (ordinal, suggestion) in suggestions.iter().enumerate() {
            let fragment = suggestion.original_fragment.as_str();
            let found_before = located.ops.len();

            if !fragment.is_empty() {
                located.ops.extend(
                    text.match_indices(fragment)
                        .map(|(start, _)| ChangeOp::from_suggestion(start, suggestion, ordinal)),
                );
            }

            if located.ops.len() == found_before {
                located.unlocated.push(UnlocatedSuggestion {
                    ordinal,
                    suggestion: suggestion.clone(),
                });
            }
        }

        // Stable: equal start and length keep suggestion order.
        located
            .ops
            .sort_by(|a, b| a.start.cmp(&b.start).then_with(|| b.len().cmp(&a.len())));

        located
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn starts(located: &LocatedChanges) -> Vec<(usize, usize)> {
        located.ops.iter().map(|op| (op.start, op.end)).collect()
    }

    #[test]
    fn test_single_occurrence() {
        let suggestions = vec![Suggestion::pending("p", "cat", "dog")];
        let located = ChangeLocator::locate("The cat sat on the mat.", &suggestions);

        assert_eq!(starts(&located), vec![(4, 7)]);
        assert!(located.unlocated.is_empty());
    }

    #[test]
    fn test_every_occurrence_is_located() {
        let suggestions = vec![Suggestion::pending("p", "a", "b")];
        let located = ChangeLocator::locate("aaa", &suggestions);

        assert_eq!(starts(&located), vec![(0, 1), (1, 2), (2, 3)]);
    }

    #[test]
    fn test_same_fragment_occurrences_do_not_overlap() {
        let suggestions = vec![Suggestion::pending("p", "aa", "b")];
        let located = ChangeLocator::locate("aaaaa", &suggestions);

        assert_eq!(starts(&located), vec![(0, 2), (2, 4)]);
    }

    #[test]
    fn test_sorted_by_start_then_longer_first() {
        let suggestions = vec![
            Suggestion::pending("p", "sat", "stood"),
            Suggestion::pending("p", "cat", "dog"),
            Suggestion::pending("p", "cat sat", "dog stood"),
        ];
        let located = ChangeLocator::locate("The cat sat.", &suggestions);

        assert_eq!(starts(&located), vec![(4, 11), (4, 7), (8, 11)]);
        assert_eq!(located.ops[0].ordinal, 2);
        assert_eq!(located.ops[1].ordinal, 1);
    }

    #[test]
    fn test_equal_spans_keep_suggestion_order() {
        let suggestions = vec![
            Suggestion::pending("p", "cat", "dog"),
            Suggestion::pending("p", "cat", "kitten"),
        ];
        let located = ChangeLocator::locate("a cat", &suggestions);

        let replacements: Vec<&str> = located
            .ops
            .iter()
            .map(|op| op.replacement_fragment.as_str())
            .collect();
        assert_eq!(replacements, vec!["dog", "kitten"]);
    }

    #[test]
    fn test_missing_and_empty_fragments_are_unlocated() {
        let suggestions = vec![
            Suggestion::pending("p", "xyz", "abc"),
            Suggestion::pending("p", "", "inserted"),
            Suggestion::pending("p", "def", "DEF"),
        ];
        let located = ChangeLocator::locate("abc def", &suggestions);

        assert_eq!(starts(&located), vec![(4, 7)]);
        let ordinals: Vec<usize> = located.unlocated.iter().map(|u| u.ordinal).collect();
        assert_eq!(ordinals, vec![0, 1]);
    }

    #[test]
    fn test_offsets_are_bytes_on_char_boundaries() {
        let text = "审较建议书";
        let suggestions = vec![Suggestion::pending("p", "审较", "审校")];
        let located = ChangeLocator::locate(text, &suggestions);

        let op = &located.ops[0];
        assert_eq!((op.start, op.end), (0, 6));
        assert_eq!(&text[op.start..op.end], "审较");
    }

    #[test]
    fn test_overlaps() {
        let suggestions = vec![
            Suggestion::pending("p", "cat sat", "x"),
            Suggestion::pending("p", "sat on", "y"),
        ];
        let located = ChangeLocator::locate("cat sat on", &suggestions);
        assert!(located.ops[0].overlaps(&located.ops[1]));
    }
}
