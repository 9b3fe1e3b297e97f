//! LCS-based string similarity.
//!
//! Similarity is the Dice-style ratio `2·L / (len(a) + len(b))` where `L` is
//! the length of the longest common subsequence. Two empty strings are
//! identical (`1.0`); anything with no common unit scores `0.0`.
//!
//! The LCS table is `O(n·m)` in time. Rows are rolled so memory stays
//! `O(min(n, m))`, and inputs whose table would exceed a cell budget are
//! scored chunk-by-chunk (see [`SimilarityScorer::with_max_cells`]).

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Default cell budget for one LCS table (roughly 2000 × 2000 characters).
pub const DEFAULT_MAX_LCS_CELLS: usize = 4_000_000;

/// Unit over which the common subsequence is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// Unicode scalar values. Matches how extraction tools count text length.
    #[default]
    Chars,
    /// Extended grapheme clusters.
    Graphemes,
}

/// Result of scoring two strings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityScore {
    /// Common subsequence length (a lower bound when `exact` is false)
    pub lcs_len: usize,
    /// Similarity in `[0, 1]`
    pub similarity: f64,
    /// False when the inputs were too large and scored in chunks
    pub exact: bool,
}

/// Common subsequence details, mirroring what the proofreading tool logs
/// when it explains a match.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentDetails {
    /// One longest common subsequence
    pub common: String,
    pub common_len: usize,
    pub similarity: f64,
}

/// LCS similarity scorer.
#[derive(Debug, Clone)]
pub struct SimilarityScorer {
    granularity: Granularity,
    max_cells: usize,
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarityScorer {
    pub fn new() -> Self {
        Self {
            granularity: Granularity::Chars,
            max_cells: DEFAULT_MAX_LCS_CELLS,
        }
    }

    pub fn with_granularity(mut self, granularity: Granularity) -> Self {
        self.granularity = granularity;
        self
    }

    /// Bound the LCS table size. Pairs above the bound are split into
    /// proportional chunks whose LCS lengths are summed.
    pub fn with_max_cells(mut self, max_cells: usize) -> Self {
        self.max_cells = max_cells.max(1);
        self
    }

    pub fn granularity(&self) -> Granularity {
        self.granularity
    }

    /// Similarity of `a` and `b` in `[0, 1]`.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        self.score(a, b).similarity
    }

    /// Score two strings, reporting whether the chunked fallback was used.
    pub fn score(&self, a: &str, b: &str) -> SimilarityScore {
        match self.granularity {
            Granularity::Chars => {
                let a: Vec<char> = a.chars().collect();
                let b: Vec<char> = b.chars().collect();
                self.score_units(&a, &b)
            }
            Granularity::Graphemes => {
                let a: Vec<&str> = a.graphemes(true).collect();
                let b: Vec<&str> = b.graphemes(true).collect();
                self.score_units(&a, &b)
            }
        }
    }

    fn score_units<T: PartialEq>(&self, a: &[T], b: &[T]) -> SimilarityScore {
        let total = a.len() + b.len();
        if total == 0 {
            return SimilarityScore {
                lcs_len: 0,
                similarity: 1.0,
                exact: true,
            };
        }

        let (lcs_len, exact) = if a.len().saturating_mul(b.len()) > self.max_cells {
            let chunks = chunk_count(a.len(), b.len(), self.max_cells);
            tracing::debug!(
                units_a = a.len(),
                units_b = b.len(),
                chunks,
                "similarity: input exceeds LCS budget, scoring in chunks"
            );
            (chunked_lcs_length(a, b, chunks), false)
        } else {
            (lcs_length(a, b), true)
        };

        let similarity = if lcs_len == 0 {
            0.0
        } else {
            (2 * lcs_len) as f64 / total as f64
        };

        SimilarityScore {
            lcs_len,
            similarity,
            exact,
        }
    }

    /// Reconstruct one longest common subsequence of `a` and `b`.
    ///
    /// The backtrack needs the whole table, so there is no chunked fallback:
    /// inputs whose table would exceed the cell budget yield `None`.
    pub fn alignment_details(&self, a: &str, b: &str) -> Option<AlignmentDetails> {
        match self.granularity {
            Granularity::Chars => {
                let a: Vec<char> = a.chars().collect();
                let b: Vec<char> = b.chars().collect();
                self.within_budget(a.len(), b.len())?;
                let common = common_subsequence(&a, &b);
                Some(details(common.iter().collect(), common.len(), a.len() + b.len()))
            }
            Granularity::Graphemes => {
                let a: Vec<&str> = a.graphemes(true).collect();
                let b: Vec<&str> = b.graphemes(true).collect();
                self.within_budget(a.len(), b.len())?;
                let common = common_subsequence(&a, &b);
                Some(details(common.concat(), common.len(), a.len() + b.len()))
            }
        }
    }

    fn within_budget(&self, n: usize, m: usize) -> Option<()> {
        if n.saturating_mul(m) > self.max_cells {
            tracing::debug!(units_a = n, units_b = m, "similarity: alignment details over LCS budget");
            return None;
        }
        Some(())
    }
}

/// Similarity of two strings with the default scorer.
pub fn similarity(a: &str, b: &str) -> f64 {
    SimilarityScorer::new().similarity(a, b)
}

/// Length of the longest common subsequence of two sequences.
///
/// Iterates the longer sequence in the outer loop and keeps two rows of the
/// shorter one.
pub fn lcs_length<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; short.len() + 1];
    let mut curr = vec![0usize; short.len() + 1];

    for x in long {
        for (j, y) in short.iter().enumerate() {
            curr[j + 1] = if x == y {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

/// One longest common subsequence and the similarity it implies, with the
/// default scorer. `None` when the inputs exceed the default LCS budget.
pub fn alignment_details(a: &str, b: &str) -> Option<AlignmentDetails> {
    SimilarityScorer::new().alignment_details(a, b)
}

/// Backtrack one longest common subsequence through a full LCS table.
fn common_subsequence<T: PartialEq + Copy>(left: &[T], right: &[T]) -> Vec<T> {
    let n = left.len();
    let m = right.len();

    // dp[i][j] = LCS length of left[0..i] and right[0..j]
    let mut dp = vec![vec![0usize; m + 1]; n + 1];
    for i in 1..=n {
        for j in 1..=m {
            dp[i][j] = if left[i - 1] == right[j - 1] {
                dp[i - 1][j - 1] + 1
            } else {
                dp[i - 1][j].max(dp[i][j - 1])
            };
        }
    }

    let mut common = Vec::with_capacity(dp[n][m]);
    let (mut i, mut j) = (n, m);
    while i > 0 && j > 0 {
        if left[i - 1] == right[j - 1] {
            common.push(left[i - 1]);
            i -= 1;
            j -= 1;
        } else if dp[i - 1][j] > dp[i][j - 1] {
            i -= 1;
        } else {
            j -= 1;
        }
    }
    common.reverse();
    common
}

fn details(common: String, common_len: usize, total: usize) -> AlignmentDetails {
    let similarity = if total == 0 {
        1.0
    } else if common_len == 0 {
        0.0
    } else {
        (2 * common_len) as f64 / total as f64
    };

    AlignmentDetails {
        common,
        common_len,
        similarity,
    }
}

fn div_ceil(value: usize, divisor: usize) -> usize {
    (value + divisor - 1) / divisor
}

/// Smallest chunk count whose per-chunk table fits in `max_cells`.
/// Symmetric in `n` and `m`.
fn chunk_count(n: usize, m: usize, max_cells: usize) -> usize {
    let estimate = ((n as f64 * m as f64) / max_cells as f64).sqrt() as usize;
    let mut k = estimate.max(1);
    while div_ceil(n, k).saturating_mul(div_ceil(m, k)) > max_cells {
        k += 1;
    }
    k
}

/// Sum of LCS lengths over `chunks` proportional slices of both inputs.
/// Never exceeds the exact LCS length.
fn chunked_lcs_length<T: PartialEq>(a: &[T], b: &[T], chunks: usize) -> usize {
    let bound = |len: usize, i: usize| i * len / chunks;
    (0..chunks)
        .map(|i| {
            let left = &a[bound(a.len(), i)..bound(a.len(), i + 1)];
            let right = &b[bound(b.len(), i)..bound(b.len(), i + 1)];
            lcs_length(left, right)
        })
        .sum()
}
