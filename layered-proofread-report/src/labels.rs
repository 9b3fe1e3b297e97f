//! Display strings for reports.
//!
//! Label tables can be loaded from TOML; any key left out keeps its English
//! default.
//!
//! ```toml
//! page = "Seite: "
//!
//! [status]
//! pending = "offen"
//! ```

use std::fs;
use std::path::Path;

use layered_proofread::SuggestionStatus;
use serde::{Deserialize, Serialize};

use crate::errors::{ReportError, ReportResult};

/// Display text for each [`SuggestionStatus`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusLabels {
    pub pending: String,
    pub accepted: String,
    pub denied: String,
    pub accepted_edited: String,
}

impl Default for StatusLabels {
    fn default() -> Self {
        Self::english()
    }
}

impl StatusLabels {
    pub fn english() -> Self {
        Self {
            pending: "pending".to_string(),
            accepted: "accepted".to_string(),
            denied: "denied".to_string(),
            accepted_edited: "edited".to_string(),
        }
    }

    pub fn simplified_chinese() -> Self {
        Self {
            pending: "待修改".to_string(),
            accepted: "已接受修改建议".to_string(),
            denied: "已拒绝修改建议".to_string(),
            accepted_edited: "已手动修改".to_string(),
        }
    }

    pub fn label(&self, status: SuggestionStatus) -> &str {
        match status {
            SuggestionStatus::Pending => &self.pending,
            SuggestionStatus::Accepted => &self.accepted,
            SuggestionStatus::Denied => &self.denied,
            SuggestionStatus::AcceptedEdited => &self.accepted_edited,
        }
    }
}

/// Every fixed string an annotated report writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLabels {
    pub status: StatusLabels,
    /// Prefix of the page line
    pub page: String,
    /// Prefix of the annotated paragraph line
    pub original: String,
    /// Prefix of each reason line
    pub reason: String,
    /// Used when a suggestion carries no reason
    pub default_reason: String,
    /// Written around the replacement of a suggestion that could not be placed
    pub suggested_open: String,
    pub suggested_close: String,
    pub deleted_open: String,
    pub deleted_close: String,
    pub inserted_open: String,
    pub inserted_close: String,
    pub status_open: String,
    pub status_close: String,
    /// Line between two paragraphs
    pub separator: String,
    /// Written when no paragraph was rendered
    pub empty_report: String,
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self::english()
    }
}

impl ReportLabels {
    pub fn english() -> Self {
        Self {
            status: StatusLabels::english(),
            page: "Page: ".to_string(),
            original: "Original: ".to_string(),
            reason: "Reason: ".to_string(),
            default_reason: "No reason given".to_string(),
            suggested_open: " (suggested: ".to_string(),
            suggested_close: ")".to_string(),
            deleted_open: "[-".to_string(),
            deleted_close: "-]".to_string(),
            inserted_open: "{+".to_string(),
            inserted_close: "+}".to_string(),
            status_open: "【".to_string(),
            status_close: "】".to_string(),
            separator: "-".repeat(60),
            empty_report: "No suggestions matched the document.".to_string(),
        }
    }

    pub fn simplified_chinese() -> Self {
        Self {
            status: StatusLabels::simplified_chinese(),
            page: "页码：".to_string(),
            original: "原始内容：".to_string(),
            reason: "原因：".to_string(),
            default_reason: "无原因说明".to_string(),
            suggested_open: " (建议修改为：".to_string(),
            suggested_close: "）".to_string(),
            empty_report: "未找到与原始文档内容匹配的有效审校建议。".to_string(),
            ..Self::english()
        }
    }

    /// Load a label table from TOML. A missing file yields the English labels.
    pub fn load(path: &Path) -> ReportResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ReportError::LabelsLoad {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        toml::from_str(&content).map_err(|e| ReportError::LabelsLoad {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}
