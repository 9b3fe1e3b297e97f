//! Error types for configuration and setup.
//!
//! Alignment and segment construction never fail; everything they cannot
//! handle degrades to a [`Diagnostic`](crate::Diagnostic). Only building a
//! pipeline from configuration can be rejected.

use thiserror::Error;

/// Errors that can occur while configuring the proofreading pipeline.
#[derive(Debug, Error)]
pub enum ProofreadError {
    /// Match threshold outside `[0, 1]` or not finite.
    #[error("invalid match threshold {value}: expected a value within 0.0..=1.0")]
    InvalidThreshold { value: f64 },

    /// Configuration value that cannot be used.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Error reading or parsing a configuration file.
    #[error("failed to load config: {path}: {message}")]
    ConfigLoad { path: String, message: String },
}

/// Result type for pipeline setup.
pub type ProofreadResult<T> = Result<T, ProofreadError>;
