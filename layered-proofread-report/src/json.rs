//! JSON export of paragraph diffs.

use std::convert::Infallible;
use std::io;
use std::ops::ControlFlow;

use layered_proofread::{ParagraphDiff, Renderer, RunSummary};
use serde::{Deserialize, Serialize};

use crate::errors::ReportResult;

/// Exported document: the run totals plus every rendered paragraph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonReport {
    /// Set once the run has finished
    pub summary: Option<RunSummary>,
    pub paragraphs: Vec<ParagraphDiff>,
}

/// Collects diffs for export as JSON.
#[derive(Debug, Default)]
pub struct JsonRenderer {
    report: JsonReport,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self) -> &JsonReport {
        &self.report
    }

    pub fn into_report(self) -> JsonReport {
        self.report
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> ReportResult<String> {
        Ok(serde_json::to_string_pretty(&self.report)?)
    }

    pub fn write_to<W: io::Write>(&self, writer: W) -> ReportResult<()> {
        serde_json::to_writer_pretty(writer, &self.report)?;
        Ok(())
    }
}

impl Renderer for JsonRenderer {
    type Error = Infallible;

    fn render(&mut self, diff: &ParagraphDiff) -> Result<ControlFlow<()>, Self::Error> {
        self.report.paragraphs.push(diff.clone());
        Ok(ControlFlow::Continue(()))
    }

    fn finish(&mut self, summary: &RunSummary) -> Result<(), Self::Error> {
        tracing::debug!(paragraphs = self.report.paragraphs.len(), "json: report complete");
        self.report.summary = Some(*summary);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use layered_proofread::{
        Diagnostics, Paragraph, ProofreadConfig, ProofreadPipeline, Suggestion, SuggestionIndex,
    };

    fn run() -> JsonRenderer {
        let source = vec![Paragraph::new("s1", "The cat sat.").with_page(4)];
        let target = vec![Paragraph::new("t1", "The cat sat.")];
        let index = SuggestionIndex::from_suggestions(vec![Suggestion::pending("t1", "cat", "dog")]);

        let pipeline = ProofreadPipeline::new(ProofreadConfig::default()).unwrap();
        let mut diagnostics = Diagnostics::new();
        let mut renderer = JsonRenderer::new();
        pipeline
            .run(&source, &target, &index, &mut diagnostics, &mut renderer)
            .unwrap();
        renderer
    }

    #[test]
    fn test_export_shape() {
        let renderer = run();
        let value: serde_json::Value = serde_json::from_str(&renderer.to_json().unwrap()).unwrap();

        assert_eq!(value["summary"]["rendered"], 1);
        let paragraph = &value["paragraphs"][0];
        assert_eq!(paragraph["source_id"], "s1");
        assert_eq!(paragraph["page_number"], 4);
        assert_eq!(paragraph["segments"][0]["kind"], "literal");
        assert_eq!(paragraph["segments"][1]["kind"], "replacement");
        assert_eq!(paragraph["segments"][1]["value"]["replacement_fragment"], "dog");
        assert_eq!(paragraph["segments"][1]["value"]["status"], "pending");
    }

    #[test]
    fn test_export_reads_back() {
        let renderer = run();
        let mut buffer = Vec::new();
        renderer.write_to(&mut buffer).unwrap();

        let report: JsonReport = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(&report, renderer.report());
    }
}
