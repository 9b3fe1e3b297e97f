//! Per-paragraph orchestration.
//!
//! [`ProofreadPipeline`] aligns the two extractions once, then walks the
//! source paragraphs in order. Each matched paragraph with suggestions
//! becomes a [`ParagraphDiff`]; everything that goes wrong along the way is
//! recorded in the caller's [`Diagnostics`].
//!
//! The walk is lazy. A caller (or a [`Renderer`] returning
//! [`ControlFlow::Break`]) can stop after any completed paragraph.

use std::collections::HashSet;
use std::convert::Infallible;
use std::iter::Peekable;
use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

use crate::aligner::{Alignment, MatchResult, ParagraphAligner};
use crate::change_locator::ChangeLocator;
use crate::config::ProofreadConfig;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::display::SegmentDisplay;
use crate::errors::ProofreadResult;
use crate::paragraph::{select_body_paragraphs, ElementType, Paragraph, ParagraphId};
use crate::segment::{Segment, SegmentBuilder};
use crate::suggestion_index::SuggestionIndex;

/// Everything a renderer needs for one matched paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphDiff {
    pub source_id: ParagraphId,
    pub target_id: ParagraphId,
    pub similarity: f64,
    /// False when `similarity` is a chunked lower bound
    pub exact: bool,
    /// Metadata of the source paragraph, unchanged
    pub page_number: Option<u32>,
    pub heading_level: Option<u8>,
    pub element_type: ElementType,
    /// Segments built against the target paragraph's text
    pub segments: Vec<Segment>,
    /// True when at least one change overlapped a previous one
    pub overlapped: bool,
}

impl ParagraphDiff {
    pub fn display(&self) -> SegmentDisplay<'_> {
        SegmentDisplay::new(&self.segments)
    }

    /// True when the paragraph carries no replacement or annotation.
    pub fn is_unannotated(&self) -> bool {
        self.segments.iter().all(Segment::is_literal)
    }
}

/// Totals for one document run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Source paragraphs considered
    pub sources: usize,
    /// Source paragraphs with a match
    pub matched: usize,
    /// Diffs handed to the renderer
    pub rendered: usize,
    /// True if the renderer stopped the run early
    pub cancelled: bool,
}

/// Consumer of [`ParagraphDiff`]s, e.g. a document writer.
pub trait Renderer {
    type Error;

    /// Render one paragraph. Return `ControlFlow::Break(())` to abandon the
    /// rest of the document.
    fn render(&mut self, diff: &ParagraphDiff) -> Result<ControlFlow<()>, Self::Error>;

    /// Called once after the last paragraph, including after a break.
    fn finish(&mut self, _summary: &RunSummary) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Renderer for Vec<ParagraphDiff> {
    type Error = Infallible;

    fn render(&mut self, diff: &ParagraphDiff) -> Result<ControlFlow<()>, Self::Error> {
        self.push(diff.clone());
        Ok(ControlFlow::Continue(()))
    }
}

/// Aligns two extractions and builds segment sequences for matched paragraphs.
#[derive(Debug, Clone)]
pub struct ProofreadPipeline {
    config: ProofreadConfig,
    aligner: ParagraphAligner,
    builder: SegmentBuilder,
}

impl ProofreadPipeline {
    pub fn new(config: ProofreadConfig) -> ProofreadResult<Self> {
        config.validate()?;
        let aligner = config.aligner()?;
        let builder = SegmentBuilder::new(config.overlap_policy);
        Ok(Self {
            config,
            aligner,
            builder,
        })
    }

    pub fn config(&self) -> &ProofreadConfig {
        &self.config
    }

    /// Align the extractions, honoring `body_element`.
    pub fn align(&self, source: &[Paragraph], target: &[Paragraph]) -> Alignment {
        let source = self.select(source);
        let target = self.select(target);
        self.aligner.align_refs(&source, &target)
    }

    /// Lazily produce one diff per matched source paragraph, in source order.
    pub fn diffs<'a>(
        &'a self,
        source: &'a [Paragraph],
        target: &'a [Paragraph],
        index: &'a SuggestionIndex,
        diagnostics: &'a mut Diagnostics,
    ) -> ParagraphDiffs<'a> {
        let source = self.select(source);
        let target_selected = self.select(target);

        let known: HashSet<&ParagraphId> = target.iter().map(|p| &p.id).collect();
        for target_id in index.target_ids() {
            if !known.contains(target_id) {
                diagnostics.record(Diagnostic::UnknownTarget {
                    target_id: target_id.clone(),
                    suggestions: index.get(target_id).len(),
                });
            }
        }

        let alignment = self.aligner.align_refs(&source, &target_selected);
        tracing::debug!(
            sources = source.len(),
            targets = target_selected.len(),
            suggestions = index.len(),
            "pipeline: document start"
        );

        ParagraphDiffs {
            builder: &self.builder,
            emit_unannotated: self.config.emit_unannotated,
            matched: alignment.matches.len(),
            matches: alignment.matches.into_iter().peekable(),
            approximate_misses: alignment.approximate_misses.into_iter().collect(),
            source,
            target: target_selected,
            index,
            diagnostics,
            position: 0,
        }
    }

    /// Feed every diff to `renderer` until it breaks or the document ends.
    pub fn run<R: Renderer>(
        &self,
        source: &[Paragraph],
        target: &[Paragraph],
        index: &SuggestionIndex,
        diagnostics: &mut Diagnostics,
        renderer: &mut R,
    ) -> Result<RunSummary, R::Error> {
        let mut diffs = self.diffs(source, target, index, diagnostics);
        let mut rendered = 0;
        let mut cancelled = false;

        for diff in diffs.by_ref() {
            rendered += 1;
            if renderer.render(&diff)?.is_break() {
                cancelled = true;
                break;
            }
        }

        let summary = RunSummary {
            sources: diffs.sources(),
            matched: diffs.matched(),
            rendered,
            cancelled,
        };
        drop(diffs);

        tracing::debug!(
            sources = summary.sources,
            matched = summary.matched,
            rendered = summary.rendered,
            cancelled = summary.cancelled,
            "pipeline: document done"
        );

        renderer.finish(&summary)?;
        Ok(summary)
    }

    fn select<'p>(&self, paragraphs: &'p [Paragraph]) -> Vec<&'p Paragraph> {
        match self.config.body_element {
            Some(element_type) => select_body_paragraphs(paragraphs, element_type),
            None => paragraphs.iter().collect(),
        }
    }
}

/// Iterator returned by [`ProofreadPipeline::diffs`].
pub struct ParagraphDiffs<'a> {
    builder: &'a SegmentBuilder,
    emit_unannotated: bool,
    matched: usize,
    matches: Peekable<std::vec::IntoIter<MatchResult>>,
    /// Unmatched sources whose scores were chunked lower bounds
    approximate_misses: HashSet<ParagraphId>,
    source: Vec<&'a Paragraph>,
    target: Vec<&'a Paragraph>,
    index: &'a SuggestionIndex,
    diagnostics: &'a mut Diagnostics,
    /// Next source position to visit
    position: usize,
}

impl<'a> ParagraphDiffs<'a> {
    /// Source paragraphs considered for alignment.
    pub fn sources(&self) -> usize {
        self.source.len()
    }

    /// Source paragraphs that found a match.
    pub fn matched(&self) -> usize {
        self.matched
    }

    fn diff_for(&mut self, m: MatchResult) -> Option<ParagraphDiff> {
        let source = self.source[m.source_index];
        let target = self.target[m.target_index];
        let suggestions = self.index.get(&target.id);

        if suggestions.is_empty() && !self.emit_unannotated {
            tracing::debug!(source = %source.id, target = %target.id, "pipeline: no suggestions");
            return None;
        }

        let located = ChangeLocator::locate(&target.text, suggestions);
        for unlocated in &located.unlocated {
            self.diagnostics.record(Diagnostic::FragmentNotFound {
                target_id: target.id.clone(),
                ordinal: unlocated.ordinal,
                original_fragment: unlocated.suggestion.original_fragment.clone(),
            });
        }

        let built = self.builder.build(&target.text, &located);
        for event in &built.overlaps {
            self.diagnostics.record(Diagnostic::overlap(&target.id, event));
        }

        tracing::debug!(
            source = %source.id,
            target = %target.id,
            similarity = m.similarity,
            changes = located.ops.len(),
            "pipeline: paragraph"
        );

        Some(ParagraphDiff {
            source_id: m.source_id,
            target_id: m.target_id,
            similarity: m.similarity,
            exact: m.exact,
            page_number: source.page_number,
            heading_level: source.heading_level,
            element_type: source.element_type,
            overlapped: built.has_overlap(),
            segments: built.segments,
        })
    }
}

impl<'a> Iterator for ParagraphDiffs<'a> {
    type Item = ParagraphDiff;

    fn next(&mut self) -> Option<ParagraphDiff> {
        while self.position < self.source.len() {
            let position = self.position;
            self.position += 1;

            let is_matched = self
                .matches
                .peek()
                .map_or(false, |m| m.source_index == position);
            if !is_matched {
                let source_id = self.source[position].id.clone();
                let approximate = self.approximate_misses.contains(&source_id);
                self.diagnostics.record(Diagnostic::NoMatch {
                    source_id,
                    approximate,
                });
                continue;
            }

            if let Some(m) = self.matches.next() {
                if let Some(diff) = self.diff_for(m) {
                    return Some(diff);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StopAfter {
        limit: usize,
        seen: Vec<ParagraphId>,
        finished: Option<RunSummary>,
    }

    impl Renderer for StopAfter {
        type Error = Infallible;

        fn render(&mut self, diff: &ParagraphDiff) -> Result<ControlFlow<()>, Self::Error> {
            self.seen.push(diff.source_id.clone());
            if self.seen.len() >= self.limit {
                Ok(ControlFlow::Break(()))
            } else {
                Ok(ControlFlow::Continue(()))
            }
        }

        fn finish(&mut self, summary: &RunSummary) -> Result<(), Self::Error> {
            self.finished = Some(*summary);
            Ok(())
        }
    }

    fn document() -> (Vec<Paragraph>, Vec<Paragraph>, SuggestionIndex) {
        let source = vec![
            Paragraph::new("s1", "First paragraph with a typo.").with_page(1),
            Paragraph::new("s2", "Second paragraph with a typo.").with_page(1),
            Paragraph::new("s3", "Third paragraph with a typo.").with_page(2),
        ];
        let target = vec![
            Paragraph::new("t1", "First paragraph with a typo."),
            Paragraph::new("t2", "Second paragraph with a typo."),
            Paragraph::new("t3", "Third paragraph with a typo."),
        ];
        let index = SuggestionIndex::from_suggestions(
            ["t1", "t2", "t3"]
                .into_iter()
                .map(|id| crate::Suggestion::pending(id, "typo", "mistake")),
        );
        (source, target, index)
    }

    #[test]
    fn test_renderer_break_stops_the_document() {
        let (source, target, index) = document();
        let pipeline = ProofreadPipeline::new(ProofreadConfig::default()).unwrap();
        let mut diagnostics = Diagnostics::new();
        let mut renderer = StopAfter {
            limit: 2,
            seen: Vec::new(),
            finished: None,
        };

        let summary = pipeline
            .run(&source, &target, &index, &mut diagnostics, &mut renderer)
            .unwrap();

        assert_eq!(renderer.seen, vec![ParagraphId::from("s1"), ParagraphId::from("s2")]);
        assert_eq!(
            summary,
            RunSummary {
                sources: 3,
                matched: 3,
                rendered: 2,
                cancelled: true,
            }
        );
        assert_eq!(renderer.finished, Some(summary));
    }

    #[test]
    fn test_metadata_comes_from_source_paragraph() {
        let (source, target, index) = document();
        let pipeline = ProofreadPipeline::new(ProofreadConfig::default()).unwrap();
        let mut diagnostics = Diagnostics::new();

        let diffs: Vec<ParagraphDiff> = pipeline
            .diffs(&source, &target, &index, &mut diagnostics)
            .collect();

        let pages: Vec<Option<u32>> = diffs.iter().map(|d| d.page_number).collect();
        assert_eq!(pages, vec![Some(1), Some(1), Some(2)]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ProofreadConfig {
            threshold: -0.1,
            ..ProofreadConfig::default()
        };
        assert!(ProofreadPipeline::new(config).is_err());
    }
}
