use std::fmt::{self, Write};

use unicode_width::UnicodeWidthStr;

use crate::segment::Segment;

/// Debug view of a segment sequence.
///
/// The first line is the original-text view; each replacement is underlined
/// beneath it and fallback annotations are listed last.
///
/// ```text
/// The cat sat on the mat.
///     ╰─╯ cat → dog (pending: animal mismatch)
/// + xyz → abc (pending, not found)
/// ```
pub struct SegmentDisplay<'a> {
    segments: &'a [Segment],
}

impl<'a> SegmentDisplay<'a> {
    pub fn new(segments: &'a [Segment]) -> Self {
        Self { segments }
    }
}

impl<'a> fmt::Display for SegmentDisplay<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // (start column, end column, label) per replacement
        let mut underlines = Vec::new();
        let mut opening_line = String::new();

        for segment in self.segments {
            let start = UnicodeWidthStr::width(opening_line.as_str());
            opening_line.push_str(segment.original_text());

            if let Segment::Replacement(op) = segment {
                let end = UnicodeWidthStr::width(opening_line.as_str());
                let mut label = format!(
                    "{} → {} ({}",
                    op.original_fragment, op.replacement_fragment, op.status
                );
                if let Some(reason) = &op.reason {
                    write!(&mut label, ": {}", reason)?;
                }
                label.push(')');
                underlines.push((start, end, label));
            }
        }

        f.write_str(&opening_line)?;

        for (start, end, label) in underlines {
            f.write_char('\n')?;
            for _ in 0..start {
                f.write_char(' ')?;
            }

            f.write_char('╰')?;
            for _ in (start + 1)..end.saturating_sub(1) {
                f.write_char('─')?;
            }
            if end - start > 1 {
                f.write_char('╯')?;
            }

            write!(f, " {}", label)?;
        }

        for segment in self.segments {
            if let Segment::Annotation(annotation) = segment {
                write!(
                    f,
                    "\n+ {} → {} ({}",
                    annotation.original_fragment, annotation.replacement_fragment, annotation.status
                )?;
                if let Some(reason) = &annotation.reason {
                    write!(f, ": {}", reason)?;
                }
                f.write_str(", not found)")?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::change_locator::ChangeLocator;
    use crate::segment::{OverlapPolicy, SegmentBuilder};
    use crate::suggestion::{Suggestion, SuggestionStatus};

    fn segments(text: &str, suggestions: &[Suggestion]) -> Vec<Segment> {
        let located = ChangeLocator::locate(text, suggestions);
        SegmentBuilder::new(OverlapPolicy::Sequential)
            .build(text, &located)
            .segments
    }

    #[test]
    fn test_single_replacement() {
        let segments = segments(
            "The cat sat on the mat.",
            &[Suggestion::pending("p", "cat", "dog").with_reason("animal mismatch")],
        );

        insta::assert_snapshot!(SegmentDisplay::new(&segments), @r###"
        The cat sat on the mat.
            ╰─╯ cat → dog (pending: animal mismatch)
        "###);
    }

    #[test]
    fn test_single_char_replacements() {
        let segments = segments("aaa", &[Suggestion::pending("p", "a", "b")]);

        insta::assert_snapshot!(SegmentDisplay::new(&segments), @r###"
        aaa
        ╰ a → b (pending)
         ╰ a → b (pending)
          ╰ a → b (pending)
        "###);
    }

    #[test]
    fn test_wide_characters_and_annotations() {
        let segments = segments(
            "审较建议书",
            &[
                Suggestion::pending("p", "审较", "审校").with_status(SuggestionStatus::Accepted),
                Suggestion::pending("p", "报告", "报表").with_reason("术语"),
            ],
        );

        insta::assert_snapshot!(SegmentDisplay::new(&segments), @r###"
        审较建议书
        ╰──╯ 审较 → 审校 (accepted)
        + 报告 → 报表 (pending: 术语, not found)
        "###);
    }
}
