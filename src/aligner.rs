//! Greedy paragraph alignment between two extractions.
//!
//! Each source paragraph is compared against every target paragraph and
//! linked to the single best-scoring target at or above the threshold.
//! The matcher is deliberately greedy and per-source:
//!
//! - a target may be chosen by several sources (many-to-one is allowed)
//! - ties go to the earliest target in extraction order
//! - a source with no target at or above the threshold is dropped
//!
//! Scoring is spread across sources with rayon; each source's best-target
//! reduction runs sequentially in target order, so the result does not
//! depend on scheduling.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{ProofreadError, ProofreadResult};
use crate::paragraph::{Paragraph, ParagraphId};
use crate::similarity::{SimilarityScore, SimilarityScorer};

/// Minimum similarity for two paragraphs to be considered the same.
pub const DEFAULT_THRESHOLD: f64 = 0.75;

/// A source paragraph linked to its best target paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub source_id: ParagraphId,
    pub target_id: ParagraphId,
    /// Similarity in `[threshold, 1]`
    pub similarity: f64,
    /// Index of the source paragraph in the source slice
    pub source_index: usize,
    /// Index of the target paragraph in the target slice
    pub target_index: usize,
    /// False when `similarity` is a chunked lower bound
    pub exact: bool,
}

/// Queryable alignment between two paragraph collections.
#[derive(Debug, Clone, Default)]
pub struct Alignment {
    /// Matches in source order, at most one per source paragraph
    pub matches: Vec<MatchResult>,
    /// Source paragraphs with no target at or above the threshold
    pub unmatched: Vec<ParagraphId>,
    /// Unmatched sources where at least one comparison was only
    /// approximated; a full LCS might have matched them
    pub approximate_misses: Vec<ParagraphId>,
}

impl Alignment {
    pub fn matches(&self) -> impl Iterator<Item = &MatchResult> {
        self.matches.iter()
    }

    pub fn unmatched(&self) -> impl Iterator<Item = &ParagraphId> {
        self.unmatched.iter()
    }

    /// The match for a given source paragraph, if any.
    pub fn match_for(&self, source_id: &ParagraphId) -> Option<&MatchResult> {
        self.matches.iter().find(|m| &m.source_id == source_id)
    }

    /// True if `source_id` went unmatched after an approximated comparison.
    pub fn is_approximate_miss(&self, source_id: &ParagraphId) -> bool {
        self.approximate_misses.contains(source_id)
    }

    /// How many source paragraphs were linked to `target_id`.
    pub fn fan_in(&self, target_id: &ParagraphId) -> usize {
        self.matches
            .iter()
            .filter(|m| &m.target_id == target_id)
            .count()
    }
}

/// Threshold matcher over [`SimilarityScorer`].
#[derive(Debug, Clone)]
pub struct ParagraphAligner {
    scorer: SimilarityScorer,
    threshold: f64,
    parallel: bool,
}

impl Default for ParagraphAligner {
    fn default() -> Self {
        Self::new()
    }
}

impl ParagraphAligner {
    /// Aligner with the default scorer and a 0.75 threshold.
    pub fn new() -> Self {
        Self {
            scorer: SimilarityScorer::new(),
            threshold: DEFAULT_THRESHOLD,
            parallel: true,
        }
    }

    /// Set the match threshold. Must be a finite value in `[0, 1]`.
    pub fn with_threshold(mut self, threshold: f64) -> ProofreadResult<Self> {
        if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
            return Err(ProofreadError::InvalidThreshold { value: threshold });
        }
        self.threshold = threshold;
        Ok(self)
    }

    pub fn with_scorer(mut self, scorer: SimilarityScorer) -> Self {
        self.scorer = scorer;
        self
    }

    /// Score on the calling thread only.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Align every source paragraph against the target collection.
    pub fn align(&self, source: &[Paragraph], target: &[Paragraph]) -> Alignment {
        let source_refs: Vec<&Paragraph> = source.iter().collect();
        let target_refs: Vec<&Paragraph> = target.iter().collect();
        self.align_refs(&source_refs, &target_refs)
    }

    /// Same as [`align`](Self::align) over pre-filtered paragraph lists.
    ///
    /// `source_index` / `target_index` refer to positions in these lists.
    pub fn align_refs(&self, source: &[&Paragraph], target: &[&Paragraph]) -> Alignment {
        let best: Vec<BestTarget> = if self.parallel && source.len() > 1 {
            source
                .par_iter()
                .map(|s| self.best_target(s, target))
                .collect()
        } else {
            source.iter().map(|s| self.best_target(s, target)).collect()
        };

        let mut alignment = Alignment::default();
        for (source_index, (paragraph, best)) in source.iter().zip(best).enumerate() {
            match best.found {
                Some((target_index, score)) => alignment.matches.push(MatchResult {
                    source_id: paragraph.id.clone(),
                    target_id: target[target_index].id.clone(),
                    similarity: score.similarity,
                    source_index,
                    target_index,
                    exact: score.exact,
                }),
                None => {
                    if best.approximated {
                        tracing::warn!(
                            source = %paragraph.id,
                            "aligner: no match, but some scores were chunked lower bounds"
                        );
                        alignment.approximate_misses.push(paragraph.id.clone());
                    }
                    alignment.unmatched.push(paragraph.id.clone());
                }
            }
        }

        tracing::debug!(
            sources = source.len(),
            targets = target.len(),
            matched = alignment.matches.len(),
            unmatched = alignment.unmatched.len(),
            threshold = self.threshold,
            "aligner: alignment complete"
        );

        alignment
    }

    /// Best target for one source. Strictly greater wins, so the earliest
    /// target keeps a tie.
    fn best_target(&self, source: &Paragraph, target: &[&Paragraph]) -> BestTarget {
        let mut best = BestTarget::default();
        for (index, candidate) in target.iter().enumerate() {
            let score = self.scorer.score(&source.text, &candidate.text);
            best.approximated |= !score.exact;
            if score.similarity < self.threshold {
                continue;
            }
            match best.found {
                Some((_, best_score)) if score.similarity <= best_score.similarity => {}
                _ => best.found = Some((index, score)),
            }
        }
        best
    }
}

#[derive(Default)]
struct BestTarget {
    found: Option<(usize, SimilarityScore)>,
    /// Some comparison used the chunked fallback
    approximated: bool,
}
