//! Paragraph records produced by an extraction.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Opaque paragraph identifier, unique within one extraction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParagraphId(String);

impl ParagraphId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParagraphId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ParagraphId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ParagraphId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Structural kind of an extracted element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    #[default]
    Paragraph,
    Heading,
    Table,
    Other,
}

/// One extracted paragraph. Read-only once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub id: ParagraphId,
    pub text: String,
    /// 1-based page number, when the extractor knows it
    #[serde(default)]
    pub page_number: Option<u32>,
    /// Position within the extraction
    #[serde(default)]
    pub sequence_order: usize,
    #[serde(default)]
    pub element_type: ElementType,
    /// Heading level 1..=9 (only meaningful for headings)
    #[serde(default, deserialize_with = "clamped_heading_level")]
    pub heading_level: Option<u8>,
}

fn clamped_heading_level<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let level = Option::<i64>::deserialize(deserializer)?;
    // Clamped in i64 first, so the cast cannot truncate.
    Ok(level.map(|level| level.clamp(1, 9) as u8))
}

impl Paragraph {
    /// Create a body paragraph with no page or heading information.
    pub fn new(id: impl Into<ParagraphId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            page_number: None,
            sequence_order: 0,
            element_type: ElementType::Paragraph,
            heading_level: None,
        }
    }

    pub fn with_page(mut self, page_number: u32) -> Self {
        self.page_number = Some(page_number);
        self
    }

    pub fn with_order(mut self, sequence_order: usize) -> Self {
        self.sequence_order = sequence_order;
        self
    }

    pub fn with_element_type(mut self, element_type: ElementType) -> Self {
        self.element_type = element_type;
        self
    }

    /// Mark as a heading. Levels outside 1..=9 are clamped into range.
    pub fn with_heading_level(mut self, level: u8) -> Self {
        self.element_type = ElementType::Heading;
        self.heading_level = Some(level.clamp(1, 9));
        self
    }
}

/// Keep only paragraphs of the preferred element type.
///
/// Extractions do not always tag body text consistently, so when nothing
/// matches `element_type` the whole collection is returned unchanged.
pub fn select_body_paragraphs(paragraphs: &[Paragraph], element_type: ElementType) -> Vec<&Paragraph> {
    let preferred: Vec<&Paragraph> = paragraphs
        .iter()
        .filter(|p| p.element_type == element_type)
        .collect();

    if preferred.is_empty() {
        paragraphs.iter().collect()
    } else {
        preferred
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_body_paragraphs_filters_by_type() {
        let paragraphs = vec![
            Paragraph::new("h1", "Title").with_heading_level(1),
            Paragraph::new("p1", "Body text."),
            Paragraph::new("t1", "| a | b |").with_element_type(ElementType::Table),
        ];

        let selected = select_body_paragraphs(&paragraphs, ElementType::Paragraph);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].id.as_str(), "p1");
    }

    #[test]
    fn test_select_body_paragraphs_falls_back_to_all() {
        let paragraphs = vec![
            Paragraph::new("h1", "Title").with_heading_level(1),
            Paragraph::new("t1", "| a | b |").with_element_type(ElementType::Table),
        ];

        let selected = select_body_paragraphs(&paragraphs, ElementType::Paragraph);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn test_heading_level_is_clamped() {
        let p = Paragraph::new("h", "Deep").with_heading_level(12);
        assert_eq!(p.heading_level, Some(9));
        assert_eq!(p.element_type, ElementType::Heading);
    }

    #[test]
    fn test_paragraph_deserializes_with_defaults() {
        let p: Paragraph = serde_json::from_str(r#"{"id": "p7", "text": "Hello"}"#).unwrap();
        assert_eq!(p.id, ParagraphId::from("p7"));
        assert_eq!(p.element_type, ElementType::Paragraph);
        assert_eq!(p.page_number, None);
    }

    #[test]
    fn test_deserialized_heading_level_is_clamped() {
        let levels: Vec<Option<u8>> = [
            r#"{"id": "h", "text": "T", "heading_level": 0}"#,
            r#"{"id": "h", "text": "T", "heading_level": 42}"#,
            r#"{"id": "h", "text": "T", "heading_level": 3}"#,
            r#"{"id": "h", "text": "T", "heading_level": null}"#,
        ]
        .iter()
        .map(|json| serde_json::from_str::<Paragraph>(json).unwrap().heading_level)
        .collect();

        assert_eq!(levels, vec![Some(1), Some(9), Some(3), None]);
    }
}
