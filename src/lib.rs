#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Fuzzy paragraph alignment and inline suggestion diffs for proofreading.
//!
//! Two extractions of the same document rarely agree on paragraph boundaries or
//! identifiers. This crate links paragraphs across the two extractions by LCS
//! similarity, then turns edit suggestions keyed to one extraction into ordered
//! segment sequences ("keep this text / replace that fragment") against the
//! matched paragraph's text.
//!
//! ## Pipeline
//!
//! - [`SimilarityScorer`] - LCS-based similarity in `[0, 1]`
//! - [`ParagraphAligner`] - greedy per-source threshold matching
//! - [`SuggestionIntake`] - typed validation of raw suggestion payloads
//! - [`SuggestionIndex`] - suggestions grouped by target paragraph
//! - [`ChangeLocator`] - every occurrence of each suggestion's fragment
//! - [`SegmentBuilder`] - literal / replacement / annotation segments
//! - [`ProofreadPipeline`] - per-paragraph glue feeding a [`Renderer`]
//!
//! Nothing here performs I/O except [`ProofreadConfig::load`]. Non-fatal
//! conditions are collected in a [`Diagnostics`] accumulator.
//!
//! ## Example
//!
//! ```
//! use layered_proofread::{
//!     Paragraph, ProofreadConfig, ProofreadPipeline, Segment, Suggestion, SuggestionIndex,
//!     Diagnostics,
//! };
//!
//! let source = vec![Paragraph::new("s1", "The cat sat on the mat.")];
//! let target = vec![Paragraph::new("t1", "The cat sat on the mat.")];
//! let index = SuggestionIndex::from_suggestions(vec![
//!     Suggestion::pending("t1", "cat", "dog").with_reason("animal mismatch"),
//! ]);
//!
//! let pipeline = ProofreadPipeline::new(ProofreadConfig::default()).unwrap();
//! let mut diagnostics = Diagnostics::new();
//! let diffs: Vec<_> = pipeline
//!     .diffs(&source, &target, &index, &mut diagnostics)
//!     .collect();
//!
//! assert_eq!(diffs.len(), 1);
//! assert_eq!(diffs[0].segments[0], Segment::literal("The "));
//! ```

mod aligner;
mod change_locator;
mod config;
mod diagnostics;
mod display;
mod errors;
mod paragraph;
mod pipeline;
mod segment;
mod similarity;
mod suggestion;
mod suggestion_index;

pub use aligner::{Alignment, MatchResult, ParagraphAligner, DEFAULT_THRESHOLD};
pub use change_locator::{ChangeLocator, ChangeOp, LocatedChanges, UnlocatedSuggestion};
pub use config::ProofreadConfig;
pub use diagnostics::{Diagnostic, DiagnosticCounts, Diagnostics};
pub use display::SegmentDisplay;
pub use errors::{ProofreadError, ProofreadResult};
pub use paragraph::{select_body_paragraphs, ElementType, Paragraph, ParagraphId};
pub use pipeline::{ParagraphDiff, ParagraphDiffs, ProofreadPipeline, Renderer, RunSummary};
pub use segment::{
    reconstruct_original, Annotation, BuiltSegments, OverlapEvent, OverlapPolicy, Segment,
    SegmentBuilder,
};
pub use similarity::{
    alignment_details, lcs_length, similarity, AlignmentDetails, Granularity, SimilarityScore,
    SimilarityScorer, DEFAULT_MAX_LCS_CELLS,
};
pub use suggestion::{
    IntakeReport, MalformedReason, MalformedSuggestion, Suggestion, SuggestionIntake,
    SuggestionStatus,
};
pub use suggestion_index::SuggestionIndex;

#[cfg(test)]
mod tests {
    mod intake;
    mod pipeline;
    mod scenarios;
}
