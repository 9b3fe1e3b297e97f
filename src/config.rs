//! Pipeline configuration.
//!
//! ```toml
//! threshold = 0.8
//! overlap_policy = "skip-overlapping"
//! body_element = "paragraph"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::aligner::{ParagraphAligner, DEFAULT_THRESHOLD};
use crate::errors::{ProofreadError, ProofreadResult};
use crate::paragraph::ElementType;
use crate::segment::OverlapPolicy;
use crate::similarity::{Granularity, SimilarityScorer, DEFAULT_MAX_LCS_CELLS};

/// Configuration for a [`ProofreadPipeline`](crate::ProofreadPipeline).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProofreadConfig {
    /// Minimum similarity for a paragraph match (default 0.75)
    pub threshold: f64,
    /// Largest LCS table scored exactly (default 4_000_000 cells)
    pub max_lcs_cells: usize,
    /// Unit of comparison for similarity (default chars)
    pub granularity: Granularity,
    /// Score paragraphs on the rayon pool (default true)
    pub parallel: bool,
    /// Handling of overlapping changes (default sequential; also
    /// forward-only and skip-overlapping)
    pub overlap_policy: OverlapPolicy,
    /// Also hand matched paragraphs without suggestions to the renderer
    pub emit_unannotated: bool,
    /// Only align paragraphs of this element type, when any exist
    pub body_element: Option<ElementType>,
}

impl Default for ProofreadConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            max_lcs_cells: DEFAULT_MAX_LCS_CELLS,
            granularity: Granularity::Chars,
            parallel: true,
            overlap_policy: OverlapPolicy::Sequential,
            emit_unannotated: false,
            body_element: None,
        }
    }
}

impl ProofreadConfig {
    /// Load from a TOML file. A missing file yields the defaults.
    pub fn load(path: &Path) -> ProofreadResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ProofreadError::ConfigLoad {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ProofreadError::ConfigLoad {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML text.
    pub fn from_toml_str(content: &str) -> ProofreadResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ProofreadError::InvalidConfig {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ProofreadResult<()> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(ProofreadError::InvalidThreshold {
                value: self.threshold,
            });
        }
        if self.max_lcs_cells == 0 {
            return Err(ProofreadError::InvalidConfig {
                message: "max_lcs_cells must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    pub fn scorer(&self) -> SimilarityScorer {
        SimilarityScorer::new()
            .with_granularity(self.granularity)
            .with_max_cells(self.max_lcs_cells)
    }

    pub fn aligner(&self) -> ProofreadResult<ParagraphAligner> {
        let aligner = ParagraphAligner::new()
            .with_scorer(self.scorer())
            .with_threshold(self.threshold)?;
        Ok(if self.parallel {
            aligner
        } else {
            aligner.sequential()
        })
    }
}
