#![doc(
    html_logo_url = "https://raw.githubusercontent.com/storyscript/layered-nlp/main/assets/layered-nlp.svg",
    issue_tracker_base_url = "https://github.com/storyscript/layered-nlp/issues/"
)]

//! Reference renderers for layered-proofread.
//!
//! Both renderers implement [`layered_proofread::Renderer`] and can be passed
//! straight to [`ProofreadPipeline::run`](layered_proofread::ProofreadPipeline::run).
//!
//! ## Modules
//!
//! - [`labels`] - Localized status and report labels, loadable from TOML
//! - [`text`] - Annotated plain-text report
//! - [`json`] - JSON export of paragraph diffs
//! - [`errors`] - Error types for label loading and export

pub mod errors;
pub mod json;
pub mod labels;
pub mod text;

pub use errors::{ReportError, ReportResult};
pub use json::{JsonRenderer, JsonReport};
pub use labels::{ReportLabels, StatusLabels};
pub use text::AnnotatedTextRenderer;
