//! Annotated plain-text report.
//!
//! One block per paragraph:
//!
//! ```text
//! Page: 1
//! Original: The [-cat-]{+dog+}【pending】 sat on the mat.
//! Reason: animal mismatch
//! ```
//!
//! Markup and labels come from [`ReportLabels`], so the same renderer
//! produces the Chinese report with [`ReportLabels::simplified_chinese`].

use std::fmt::{self, Write};
use std::ops::ControlFlow;

use layered_proofread::{ParagraphDiff, Renderer, RunSummary, Segment, SuggestionStatus};

use crate::labels::ReportLabels;

/// Writes paragraph diffs as annotated text into any [`fmt::Write`].
pub struct AnnotatedTextRenderer<W> {
    out: W,
    labels: ReportLabels,
    rendered: usize,
}

impl<W: Write> AnnotatedTextRenderer<W> {
    /// Renderer with English labels.
    pub fn new(out: W) -> Self {
        Self::with_labels(out, ReportLabels::default())
    }

    pub fn with_labels(out: W, labels: ReportLabels) -> Self {
        Self {
            out,
            labels,
            rendered: 0,
        }
    }

    pub fn labels(&self) -> &ReportLabels {
        &self.labels
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_paragraph(&mut self, diff: &ParagraphDiff) -> fmt::Result {
        let Self {
            out,
            labels,
            rendered,
        } = self;

        if *rendered > 0 {
            writeln!(out, "{}", labels.separator)?;
        }
        if let Some(page) = diff.page_number {
            writeln!(out, "{}{}", labels.page, page)?;
        }

        out.write_str(&labels.original)?;

        // (ordinal, reason) per change, one reason line per suggestion
        let mut reasons: Vec<(usize, Option<&str>)> = Vec::new();
        for segment in &diff.segments {
            match segment {
                Segment::Literal(text) => out.write_str(text)?,
                Segment::Replacement(op) => {
                    write!(
                        out,
                        "{}{}{}{}{}{}",
                        labels.deleted_open,
                        op.original_fragment,
                        labels.deleted_close,
                        labels.inserted_open,
                        op.replacement_fragment,
                        labels.inserted_close
                    )?;
                    write_status(out, labels, op.status)?;
                    reasons.push((op.ordinal, op.reason.as_deref()));
                }
                Segment::Annotation(annotation) => {
                    write!(
                        out,
                        "{}{}{}",
                        labels.suggested_open, annotation.replacement_fragment, labels.suggested_close
                    )?;
                    write_status(out, labels, annotation.status)?;
                    reasons.push((annotation.ordinal, annotation.reason.as_deref()));
                }
            }
        }
        out.write_char('\n')?;

        reasons.sort_by_key(|(ordinal, _)| *ordinal);
        reasons.dedup_by_key(|(ordinal, _)| *ordinal);
        for (_, reason) in reasons {
            writeln!(
                out,
                "{}{}",
                labels.reason,
                reason.unwrap_or(labels.default_reason.as_str())
            )?;
        }

        *rendered += 1;
        Ok(())
    }
}

fn write_status<W: Write>(out: &mut W, labels: &ReportLabels, status: SuggestionStatus) -> fmt::Result {
    write!(
        out,
        "{}{}{}",
        labels.status_open,
        labels.status.label(status),
        labels.status_close
    )
}

impl<W: Write> Renderer for AnnotatedTextRenderer<W> {
    type Error = fmt::Error;

    fn render(&mut self, diff: &ParagraphDiff) -> Result<ControlFlow<()>, Self::Error> {
        self.write_paragraph(diff)?;
        Ok(ControlFlow::Continue(()))
    }

    fn finish(&mut self, _summary: &RunSummary) -> Result<(), Self::Error> {
        if self.rendered == 0 {
            writeln!(self.out, "{}", self.labels.empty_report)?;
        }
        Ok(())
    }
}
