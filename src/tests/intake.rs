//! Raw payloads through intake, indexing and the pipeline.

use crate::{
    Diagnostics, MalformedReason, Paragraph, ProofreadConfig, ProofreadPipeline, Segment,
    SuggestionIndex, SuggestionIntake, SuggestionStatus,
};

const CHUNK_1: &str = r#"[
    {"材料id": "p1", "原始内容": "审较", "修改后内容": "审校", "出错原因": "错别字"},
    {"材料id": 2, "原始内容": "2023", "修改后内容": "2024", "status": "accepted"}
]"#;

const CHUNK_2: &str = r#"[
    {"原始内容": "orphan", "修改后内容": "fixed"},
    "not an object",
    {"target_id": "p1", "original_fragment": "报告", "replacement_fragment": "报表", "status": "maybe"}
]"#;

#[test]
fn intake_accepts_both_key_sets_and_coerces_scalars() {
    let mut intake = SuggestionIntake::new();
    intake.push_chunk("c1", CHUNK_1);
    let report = intake.finish();

    assert!(report.rejected.is_empty());
    assert_eq!(report.suggestions.len(), 2);

    let first = &report.suggestions[0];
    assert_eq!(first.target_id.as_str(), "p1");
    assert_eq!(first.reason.as_deref(), Some("错别字"));
    assert_eq!(first.status, SuggestionStatus::Pending);

    let second = &report.suggestions[1];
    assert_eq!(second.target_id.as_str(), "2");
    assert_eq!(second.status, SuggestionStatus::Accepted);
}

#[test]
fn intake_rejections_are_counted_not_fatal() {
    let mut intake = SuggestionIntake::new();
    intake.push_chunk("c1", CHUNK_1);
    intake.push_chunk("c2", CHUNK_2);
    intake.push_chunk("c3", "{\"材料id\": \"p9\"}");
    intake.push_chunk("c4", "");
    let report = intake.finish();

    assert_eq!(report.suggestions.len(), 2);
    let reasons: Vec<&MalformedReason> = report.rejected.iter().map(|r| &r.reason).collect();
    assert_eq!(
        reasons,
        vec![
            &MalformedReason::MissingTargetId,
            &MalformedReason::NotAnObject,
            &MalformedReason::UnknownStatus("maybe".to_string()),
            &MalformedReason::NotAnArray,
            &MalformedReason::EmptyPayload,
        ]
    );
    assert_eq!(report.rejected[0].to_string(), "chunk c2 [0]: suggestion has no target paragraph id");

    let mut diagnostics = Diagnostics::new();
    diagnostics.record_malformed(&report.rejected);
    assert_eq!(diagnostics.counts().malformed, 5);
}

#[test]
fn intake_feeds_the_pipeline() {
    let mut intake = SuggestionIntake::new();
    intake.push_chunk("c1", CHUNK_1);
    let report = intake.finish();
    let index = SuggestionIndex::from_intake(&report);

    let source = vec![
        Paragraph::new("w1", "本审较建议书适用于全部材料。").with_page(3),
        Paragraph::new("w2", "发布日期：2023年").with_page(4),
    ];
    let target = vec![
        Paragraph::new("p1", "本审较建议书适用于全部材料。"),
        Paragraph::new("2", "发布日期：2023年"),
    ];

    let pipeline = ProofreadPipeline::new(ProofreadConfig::default()).unwrap();
    let mut diagnostics = Diagnostics::new();
    diagnostics.record_malformed(&report.rejected);
    let diffs: Vec<_> = pipeline
        .diffs(&source, &target, &index, &mut diagnostics)
        .collect();

    assert_eq!(diffs.len(), 2);
    assert_eq!(diffs[0].page_number, Some(3));
    assert_eq!(diffs[0].segments[0], Segment::literal("本"));
    assert!(diffs[0].segments[1].is_replacement());
    assert_eq!(diffs[1].segments[0], Segment::literal("发布日期："));
    assert!(diagnostics.is_empty());
}
