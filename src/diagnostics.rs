//! Non-fatal conditions met while processing a document.
//!
//! Nothing in the pipeline fails on bad input. Each condition is recorded
//! here instead, and the affected paragraph degrades to the best output
//! available. The accumulator is passed explicitly into each call so a
//! caller decides its lifetime (per document, per batch, ...).

use std::fmt;

use crate::paragraph::ParagraphId;
use crate::segment::OverlapEvent;
use crate::suggestion::MalformedSuggestion;

/// One recorded condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A suggestion record rejected during intake.
    MalformedSuggestion(MalformedSuggestion),
    /// A source paragraph with no target at or above the threshold.
    /// `approximate` is set when some of its scores were chunked lower
    /// bounds, so an exact comparison might have matched it.
    NoMatch {
        source_id: ParagraphId,
        approximate: bool,
    },
    /// A suggestion whose fragment is empty or absent from the matched text.
    FragmentNotFound {
        target_id: ParagraphId,
        ordinal: usize,
        original_fragment: String,
    },
    /// A change starting inside a previously emitted change.
    Overlap {
        target_id: ParagraphId,
        start: usize,
        end: usize,
        cursor: usize,
        ordinal: usize,
        skipped: bool,
    },
    /// Suggestions keyed to an id absent from the target extraction.
    UnknownTarget {
        target_id: ParagraphId,
        suggestions: usize,
    },
}

impl Diagnostic {
    pub(crate) fn overlap(target_id: &ParagraphId, event: &OverlapEvent) -> Self {
        Diagnostic::Overlap {
            target_id: target_id.clone(),
            start: event.start,
            end: event.end,
            cursor: event.cursor,
            ordinal: event.ordinal,
            skipped: event.skipped,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MalformedSuggestion(rejected) => {
                write!(f, "malformed suggestion: {}", rejected)
            }
            Diagnostic::NoMatch {
                source_id,
                approximate,
            } => write!(
                f,
                "no target paragraph matches source {}{}",
                source_id,
                if *approximate {
                    " (long input, similarity approximated)"
                } else {
                    ""
                }
            ),
            Diagnostic::FragmentNotFound {
                target_id,
                ordinal,
                original_fragment,
            } => write!(
                f,
                "fragment {:?} of suggestion #{} not found in paragraph {}",
                original_fragment, ordinal, target_id
            ),
            Diagnostic::Overlap {
                target_id,
                start,
                end,
                cursor,
                ordinal,
                skipped,
            } => write!(
                f,
                "change {}..{} of suggestion #{} in paragraph {} overlaps previous change ending at {}{}",
                start,
                end,
                ordinal,
                target_id,
                cursor,
                if *skipped { " (skipped)" } else { "" }
            ),
            Diagnostic::UnknownTarget {
                target_id,
                suggestions,
            } => write!(
                f,
                "{} suggestion(s) reference unknown paragraph {}",
                suggestions, target_id
            ),
        }
    }
}

/// Per-kind tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticCounts {
    pub malformed: usize,
    pub no_match: usize,
    pub fragment_not_found: usize,
    pub overlap: usize,
    pub unknown_target: usize,
}

impl DiagnosticCounts {
    pub fn total(&self) -> usize {
        self.malformed + self.no_match + self.fragment_not_found + self.overlap + self.unknown_target
    }
}

/// Ordered accumulator of [`Diagnostic`]s.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    records: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, diagnostic: Diagnostic) {
        match &diagnostic {
            // Unmatched paragraphs are routine (headers, captions, ...).
            Diagnostic::NoMatch {
                approximate: false, ..
            } => tracing::debug!(diagnostic = %diagnostic, "proofread"),
            _ => tracing::warn!(diagnostic = %diagnostic, "proofread"),
        }
        self.records.push(diagnostic);
    }

    /// Record intake rejections, e.g. from [`IntakeReport::rejected`](crate::IntakeReport).
    pub fn record_malformed<'a>(&mut self, rejected: impl IntoIterator<Item = &'a MalformedSuggestion>) {
        for entry in rejected {
            self.record(Diagnostic::MalformedSuggestion(entry.clone()));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn counts(&self) -> DiagnosticCounts {
        let mut counts = DiagnosticCounts::default();
        for record in &self.records {
            match record {
                Diagnostic::MalformedSuggestion(_) => counts.malformed += 1,
                Diagnostic::NoMatch { .. } => counts.no_match += 1,
                Diagnostic::FragmentNotFound { .. } => counts.fragment_not_found += 1,
                Diagnostic::Overlap { .. } => counts.overlap += 1,
                Diagnostic::UnknownTarget { .. } => counts.unknown_target += 1,
            }
        }
        counts
    }

    /// Source paragraphs that found no match, in source order.
    pub fn no_match_ids(&self) -> impl Iterator<Item = &ParagraphId> {
        self.records.iter().filter_map(|record| match record {
            Diagnostic::NoMatch { source_id, .. } => Some(source_id),
            _ => None,
        })
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.records
    }
}
