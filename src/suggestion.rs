//! Suggestion records and their validation.
//!
//! Suggestions arrive as JSON produced by an AI review pass, one payload per
//! reviewed chunk. [`SuggestionIntake`] turns those payloads into typed
//! [`Suggestion`]s and sets aside everything it cannot use as
//! [`MalformedSuggestion`]s. Nothing downstream ever sees a raw record.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::paragraph::ParagraphId;

/// Review state of a suggestion. Closed set; renderers supply display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuggestionStatus {
    #[default]
    Pending,
    Accepted,
    Denied,
    /// Accepted after a reviewer changed the replacement text
    AcceptedEdited,
}

impl SuggestionStatus {
    pub const ALL: [SuggestionStatus; 4] = [
        SuggestionStatus::Pending,
        SuggestionStatus::Accepted,
        SuggestionStatus::Denied,
        SuggestionStatus::AcceptedEdited,
    ];

    /// Wire name (`pending`, `accepted`, `denied`, `accepted-edited`).
    pub fn as_str(&self) -> &'static str {
        match self {
            SuggestionStatus::Pending => "pending",
            SuggestionStatus::Accepted => "accepted",
            SuggestionStatus::Denied => "denied",
            SuggestionStatus::AcceptedEdited => "accepted-edited",
        }
    }

    /// Parse a wire name, ignoring case and surrounding whitespace.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == normalized)
    }
}

impl fmt::Display for SuggestionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated edit suggestion keyed to a target paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub target_id: ParagraphId,
    /// Text to replace. Empty means the suggestion cannot be placed inline.
    pub original_fragment: String,
    pub replacement_fragment: String,
    pub status: SuggestionStatus,
    pub reason: Option<String>,
}

impl Suggestion {
    pub fn new(
        target_id: impl Into<ParagraphId>,
        original_fragment: impl Into<String>,
        replacement_fragment: impl Into<String>,
        status: SuggestionStatus,
    ) -> Self {
        Self {
            target_id: target_id.into(),
            original_fragment: original_fragment.into(),
            replacement_fragment: replacement_fragment.into(),
            status,
            reason: None,
        }
    }

    pub fn pending(
        target_id: impl Into<ParagraphId>,
        original_fragment: impl Into<String>,
        replacement_fragment: impl Into<String>,
    ) -> Self {
        Self::new(
            target_id,
            original_fragment,
            replacement_fragment,
            SuggestionStatus::Pending,
        )
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn with_status(mut self, status: SuggestionStatus) -> Self {
        self.status = status;
        self
    }

    /// Validate one decoded JSON record.
    ///
    /// Accepts the English field names and the keys emitted by the Chinese
    /// review prompt (`材料id`, `原始内容`, `修改后内容`, `出错原因`).
    /// Scalar values are coerced to text. A missing status means pending.
    pub fn from_json_value(value: &Value) -> Result<Self, MalformedReason> {
        if !value.is_object() {
            return Err(MalformedReason::NotAnObject);
        }

        let raw: RawSuggestion = serde_json::from_value(value.clone())
            .map_err(|e| MalformedReason::InvalidShape(e.to_string()))?;

        let target_id = raw
            .target_id
            .map(Scalar::into_text)
            .filter(|id| !id.trim().is_empty())
            .ok_or(MalformedReason::MissingTargetId)?;

        let status = match raw.status {
            None => SuggestionStatus::Pending,
            Some(raw_status) => SuggestionStatus::parse(&raw_status)
                .ok_or(MalformedReason::UnknownStatus(raw_status))?,
        };

        Ok(Self {
            target_id: ParagraphId::new(target_id.trim()),
            original_fragment: raw.original_fragment.map(Scalar::into_text).unwrap_or_default(),
            replacement_fragment: raw
                .replacement_fragment
                .map(Scalar::into_text)
                .unwrap_or_default(),
            status,
            reason: raw
                .reason
                .map(Scalar::into_text)
                .filter(|reason| !reason.trim().is_empty()),
        })
    }
}

/// Wire shape of a suggestion before validation.
#[derive(Debug, Deserialize)]
struct RawSuggestion {
    #[serde(default, alias = "材料id")]
    target_id: Option<Scalar>,
    #[serde(default, alias = "原始内容")]
    original_fragment: Option<Scalar>,
    #[serde(default, alias = "修改后内容")]
    replacement_fragment: Option<Scalar>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default, alias = "出错原因")]
    reason: Option<Scalar>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    /// Text form of a scalar, spelled the way the review tooling writes
    /// numbers and booleans (`1.0`, `1e+16`, `True`), so that numeric ids
    /// key to the same paragraph.
    fn into_text(self) -> String {
        match self {
            Scalar::Text(text) => text,
            Scalar::Integer(n) => n.to_string(),
            Scalar::Float(n) => float_text(n),
            Scalar::Bool(true) => "True".to_string(),
            Scalar::Bool(false) => "False".to_string(),
        }
    }
}

/// Shortest round-trip float text with a signed, two-digit exponent.
fn float_text(n: f64) -> String {
    // `{:?}` already keeps `.0` on integral values and switches to
    // exponent form outside 1e-4..1e16.
    let text = format!("{:?}", n);
    match text.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        }
        None => text,
    }
}

/// Why a payload or record was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedReason {
    #[error("payload is empty")]
    EmptyPayload,

    #[error("payload is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("payload is not a JSON array of suggestions")]
    NotAnArray,

    #[error("suggestion is not a JSON object")]
    NotAnObject,

    #[error("suggestion has an unexpected shape: {0}")]
    InvalidShape(String),

    #[error("suggestion has no target paragraph id")]
    MissingTargetId,

    #[error("unknown suggestion status `{0}`")]
    UnknownStatus(String),
}

/// A rejected payload or record, with enough context to find it again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedSuggestion {
    /// Label of the chunk the record came from
    pub chunk: Option<String>,
    /// Position within the chunk's array (None when the whole chunk failed)
    pub position: Option<usize>,
    pub reason: MalformedReason,
}

impl fmt::Display for MalformedSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.chunk, self.position) {
            (Some(chunk), Some(position)) => write!(f, "chunk {} [{}]: {}", chunk, position, self.reason),
            (Some(chunk), None) => write!(f, "chunk {}: {}", chunk, self.reason),
            (None, Some(position)) => write!(f, "[{}]: {}", position, self.reason),
            (None, None) => write!(f, "{}", self.reason),
        }
    }
}

/// Accepted and rejected records from one intake run.
#[derive(Debug, Clone, Default)]
pub struct IntakeReport {
    /// Valid suggestions in arrival order
    pub suggestions: Vec<Suggestion>,
    pub rejected: Vec<MalformedSuggestion>,
}

/// Collects suggestions from per-chunk payloads, preserving arrival order.
///
/// # Example
///
/// ```
/// use layered_proofread::SuggestionIntake;
///
/// let mut intake = SuggestionIntake::new();
/// intake.push_chunk("c1", r#"[{"材料id": "p3", "原始内容": "teh", "修改后内容": "the"}]"#);
/// intake.push_chunk("c2", "not json");
///
/// let report = intake.finish();
/// assert_eq!(report.suggestions.len(), 1);
/// assert_eq!(report.rejected.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct SuggestionIntake {
    report: IntakeReport,
}

impl SuggestionIntake {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one chunk's JSON payload (an array of suggestion objects).
    pub fn push_chunk(&mut self, label: impl Into<String>, payload: &str) {
        let label = label.into();
        if payload.trim().is_empty() {
            self.reject(Some(label), None, MalformedReason::EmptyPayload);
            return;
        }

        match serde_json::from_str::<Value>(payload) {
            Ok(value) => self.push_value(Some(label), value),
            Err(e) => self.reject(Some(label), None, MalformedReason::InvalidJson(e.to_string())),
        }
    }

    /// Take one chunk that was already decoded by the storage layer.
    pub fn push_value(&mut self, label: Option<String>, value: Value) {
        match value {
            Value::Array(items) => {
                for (position, item) in items.iter().enumerate() {
                    match Suggestion::from_json_value(item) {
                        Ok(suggestion) => self.report.suggestions.push(suggestion),
                        Err(reason) => self.reject(label.clone(), Some(position), reason),
                    }
                }
            }
            Value::Null => self.reject(label, None, MalformedReason::EmptyPayload),
            _ => self.reject(label, None, MalformedReason::NotAnArray),
        }
    }

    /// Take an already-typed suggestion.
    pub fn push_suggestion(&mut self, suggestion: Suggestion) {
        self.report.suggestions.push(suggestion);
    }

    pub fn finish(self) -> IntakeReport {
        tracing::debug!(
            accepted = self.report.suggestions.len(),
            rejected = self.report.rejected.len(),
            "intake: suggestions decoded"
        );
        self.report
    }

    fn reject(&mut self, chunk: Option<String>, position: Option<usize>, reason: MalformedReason) {
        let rejected = MalformedSuggestion {
            chunk,
            position,
            reason,
        };
        tracing::warn!(rejected = %rejected, "intake: malformed suggestion");
        self.report.rejected.push(rejected);
    }
}
