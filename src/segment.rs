//! Segment sequences for rendering a paragraph with its suggestions.
//!
//! A paragraph becomes an ordered list of segments:
//!
//! ```text
//! The cat sat on the mat.
//! ╰──╯╰─╯╰──────────────╯
//! Lit Rep      Lit
//! ```
//!
//! `Literal` text passes through untouched, `Replacement` marks one located
//! occurrence (render the original struck out, then the replacement), and
//! `Annotation` carries a suggestion whose fragment could not be found; it
//! is appended after the inline content and covers no text.

use serde::{Deserialize, Serialize};

use crate::change_locator::{ChangeOp, LocatedChanges};
use crate::suggestion::SuggestionStatus;

/// What to do with a change that starts inside an already emitted one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverlapPolicy {
    /// Emit it right after the previous replacement and move the cursor to
    /// its end, even when that moves the cursor backwards. The original-text
    /// view then repeats the shared characters.
    #[default]
    Sequential,
    /// Emit it like `Sequential`, but the cursor never moves backwards, so
    /// text after a contained change is not repeated.
    ForwardOnly,
    /// Drop it. The original-text view stays exact.
    SkipOverlapping,
}

/// Suggestion shown after the paragraph because its fragment was not found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub original_fragment: String,
    pub replacement_fragment: String,
    pub reason: Option<String>,
    pub status: SuggestionStatus,
    /// Position of the originating suggestion in the paragraph's list
    pub ordinal: usize,
}

/// One unit of a paragraph's rendered content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Segment {
    Literal(String),
    Replacement(ChangeOp),
    Annotation(Annotation),
}

impl Segment {
    pub fn literal(text: impl Into<String>) -> Self {
        Segment::Literal(text.into())
    }

    /// Text this segment contributes to the paragraph as extracted.
    pub fn original_text(&self) -> &str {
        match self {
            Segment::Literal(text) => text,
            Segment::Replacement(op) => &op.original_fragment,
            Segment::Annotation(_) => "",
        }
    }

    /// Text this segment contributes once every replacement is applied.
    pub fn revised_text(&self) -> &str {
        match self {
            Segment::Literal(text) => text,
            Segment::Replacement(op) => &op.replacement_fragment,
            Segment::Annotation(_) => "",
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Segment::Literal(_))
    }

    pub fn is_replacement(&self) -> bool {
        matches!(self, Segment::Replacement(_))
    }

    pub fn is_annotation(&self) -> bool {
        matches!(self, Segment::Annotation(_))
    }
}

/// Join the original-text view of a segment sequence.
pub fn reconstruct_original(segments: &[Segment]) -> String {
    segments.iter().map(Segment::original_text).collect()
}

/// A change that started before the end of the previous emitted change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlapEvent {
    pub start: usize,
    pub end: usize,
    /// End of the furthest change emitted before this one
    pub cursor: usize,
    pub ordinal: usize,
    /// True when the change was dropped
    pub skipped: bool,
}

/// Segments for one paragraph plus any overlaps met while building them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuiltSegments {
    pub segments: Vec<Segment>,
    pub overlaps: Vec<OverlapEvent>,
}

impl BuiltSegments {
    pub fn has_overlap(&self) -> bool {
        !self.overlaps.is_empty()
    }

    pub fn replacements(&self) -> impl Iterator<Item = &ChangeOp> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Replacement(op) => Some(op),
            _ => None,
        })
    }

    pub fn annotations(&self) -> impl Iterator<Item = &Annotation> {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Annotation(annotation) => Some(annotation),
            _ => None,
        })
    }
}

/// Walks located changes over the paragraph text.
#[derive(Debug, Clone, Default)]
pub struct SegmentBuilder {
    policy: OverlapPolicy,
}

impl SegmentBuilder {
    pub fn new(policy: OverlapPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    /// Build the segment sequence for `text`.
    ///
    /// `located.ops` must be sorted the way [`ChangeLocator`](crate::ChangeLocator)
    /// sorts them and must have been located in this same `text`.
    pub fn build(&self, text: &str, located: &LocatedChanges) -> BuiltSegments {
        let mut built = BuiltSegments::default();

        if located.ops.is_empty() {
            built.segments.push(Segment::literal(text));
        } else {
            let mut cursor = 0;
            // End of the furthest change emitted so far
            let mut reach = 0;
            for op in &located.ops {
                if op.start < reach {
                    let skipped = self.policy == OverlapPolicy::SkipOverlapping;
                    built.overlaps.push(OverlapEvent {
                        start: op.start,
                        end: op.end,
                        cursor: reach,
                        ordinal: op.ordinal,
                        skipped,
                    });
                    if skipped {
                        continue;
                    }
                }

                if op.start > cursor {
                    built.segments.push(Segment::literal(&text[cursor..op.start]));
                }
                built.segments.push(Segment::Replacement(op.clone()));
                cursor = match self.policy {
                    OverlapPolicy::ForwardOnly => cursor.max(op.end),
                    OverlapPolicy::Sequential | OverlapPolicy::SkipOverlapping => op.end,
                };
                reach = reach.max(op.end);
            }

            if cursor < text.len() {
                built.segments.push(Segment::literal(&text[cursor..]));
            }
        }

        built
            .segments
            .extend(located.unlocated.iter().map(|unlocated| {
                let suggestion = &unlocated.suggestion;
                Segment::Annotation(Annotation {
                    original_fragment: suggestion.original_fragment.clone(),
                    replacement_fragment: suggestion.replacement_fragment.clone(),
                    reason: suggestion.reason.clone(),
                    status: suggestion.status,
                    ordinal: unlocated.ordinal,
                })
            }));

        built
    }
}
