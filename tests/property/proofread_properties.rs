use layered_proofread::{
    reconstruct_original, similarity, ChangeLocator, OverlapPolicy, Paragraph, ParagraphAligner,
    SegmentBuilder, SimilarityScorer, Suggestion,
};
use proptest::prelude::*;

fn fragments() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-c]{0,3}", 0..4)
}

fn suggestions_for(fragments: &[String]) -> Vec<Suggestion> {
    fragments
        .iter()
        .map(|fragment| Suggestion::pending("p", fragment.as_str(), "X"))
        .collect()
}

proptest! {
    #[test]
    fn similarity_is_symmetric(a in ".{0,60}", b in ".{0,60}") {
        prop_assert_eq!(similarity(&a, &b), similarity(&b, &a));
    }

    #[test]
    fn similarity_is_in_unit_range(a in ".{0,60}", b in ".{0,60}") {
        let score = similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&score), "score {} out of range", score);
    }

    #[test]
    fn identical_strings_score_one(a in ".{1,60}") {
        prop_assert_eq!(similarity(&a, &a), 1.0);
    }

    #[test]
    fn chunked_scoring_is_a_symmetric_lower_bound(a in "[a-d]{0,40}", b in "[a-d]{0,40}") {
        let exact = SimilarityScorer::new().score(&a, &b);
        let chunked = SimilarityScorer::new().with_max_cells(16);

        let forward = chunked.score(&a, &b);
        let backward = chunked.score(&b, &a);
        prop_assert!(forward.lcs_len <= exact.lcs_len);
        prop_assert_eq!(forward.similarity, backward.similarity);
        prop_assert!((0.0..=1.0).contains(&forward.similarity));
    }

    #[test]
    fn matches_never_fall_below_threshold(
        source in prop::collection::vec("[a-e ]{0,20}", 0..6),
        target in prop::collection::vec("[a-e ]{0,20}", 0..6),
        threshold in 0.0f64..=1.0,
    ) {
        let source: Vec<Paragraph> = source
            .into_iter()
            .enumerate()
            .map(|(i, text)| Paragraph::new(format!("s{}", i), text))
            .collect();
        let target: Vec<Paragraph> = target
            .into_iter()
            .enumerate()
            .map(|(i, text)| Paragraph::new(format!("t{}", i), text))
            .collect();

        let alignment = ParagraphAligner::new()
            .with_threshold(threshold)
            .unwrap()
            .align(&source, &target);

        prop_assert_eq!(alignment.matches.len() + alignment.unmatched.len(), source.len());
        for m in alignment.matches() {
            prop_assert!(m.similarity >= threshold);
        }
    }

    #[test]
    fn segments_reproduce_text_without_overlap(text in "[a-c ]{0,40}", fragments in fragments()) {
        let suggestions = suggestions_for(&fragments);
        let located = ChangeLocator::locate(&text, &suggestions);
        let built = SegmentBuilder::new(OverlapPolicy::Sequential).build(&text, &located);

        if !built.has_overlap() {
            prop_assert_eq!(reconstruct_original(&built.segments), text);
        }
    }

    #[test]
    fn skip_overlapping_always_reproduces_text(text in "[a-c ]{0,40}", fragments in fragments()) {
        let suggestions = suggestions_for(&fragments);
        let located = ChangeLocator::locate(&text, &suggestions);
        let built = SegmentBuilder::new(OverlapPolicy::SkipOverlapping).build(&text, &located);

        prop_assert_eq!(reconstruct_original(&built.segments), text);
    }

    #[test]
    fn every_suggestion_is_placed_or_annotated(text in "[a-c ]{0,40}", fragments in fragments()) {
        let suggestions = suggestions_for(&fragments);
        let located = ChangeLocator::locate(&text, &suggestions);

        for (ordinal, suggestion) in suggestions.iter().enumerate() {
            let placed = located.ops.iter().any(|op| op.ordinal == ordinal);
            let unlocated = located.unlocated.iter().any(|u| u.ordinal == ordinal);
            prop_assert!(placed != unlocated);
            for op in located.ops.iter().filter(|op| op.ordinal == ordinal) {
                prop_assert_eq!(&text[op.start..op.end], suggestion.original_fragment.as_str());
            }
        }
    }
}
