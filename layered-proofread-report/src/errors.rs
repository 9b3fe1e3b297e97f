//! Error types for report rendering.

use thiserror::Error;

/// Errors that can occur while loading labels or exporting a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Error reading or parsing a label table.
    #[error("failed to load labels: {path}: {message}")]
    LabelsLoad { path: String, message: String },

    /// Error serializing the JSON export.
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for report operations.
pub type ReportResult<T> = Result<T, ReportError>;
