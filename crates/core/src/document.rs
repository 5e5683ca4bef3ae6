use serde::{Deserialize, Serialize};

/// Number of chapters that make up one downstream level.
pub const CHAPTERS_PER_LEVEL: usize = 4;

/// Rough characters-per-token ratio used for prompt budgeting.
const CHARS_PER_TOKEN: usize = 4;

/// Best-effort metadata supplied alongside extracted text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    /// Caller-cleaned filename (no directory, no extension).
    pub filename: Option<String>,
}

impl DocumentMetadata {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// A contiguous, titled, numbered segment of a source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedChapter {
    pub chapter_number: u32,
    pub title: String,
    pub content: String,
}

impl ParsedChapter {
    pub fn new(chapter_number: u32, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            chapter_number,
            title: title.into(),
            content: content.into(),
        }
    }

    /// Content length in characters (not bytes).
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }

    /// Approximate token count of the content.
    pub fn estimated_tokens(&self) -> usize {
        self.char_count().div_ceil(CHARS_PER_TOKEN)
    }
}

/// Result of segmenting one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDocument {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub total_pages: u32,
    pub chapters: Vec<ParsedChapter>,
}

impl ParsedDocument {
    /// Chapters grouped into levels of [`CHAPTERS_PER_LEVEL`]; the last group may be shorter.
    pub fn levels(&self) -> impl Iterator<Item = &[ParsedChapter]> {
        self.chapters.chunks(CHAPTERS_PER_LEVEL)
    }

    pub fn level_count(&self) -> usize {
        self.chapters.len().div_ceil(CHAPTERS_PER_LEVEL)
    }

    pub fn total_chars(&self) -> usize {
        self.chapters.iter().map(ParsedChapter::char_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_with(n: usize) -> ParsedDocument {
        ParsedDocument {
            title: "Doc".to_string(),
            author: None,
            total_pages: 1,
            chapters: (1..=n as u32)
                .map(|i| ParsedChapter::new(i, format!("Section {i}"), "abcd"))
                .collect(),
        }
    }

    #[test]
    fn levels_group_by_four() {
        let doc = doc_with(9);
        let sizes: Vec<usize> = doc.levels().map(<[ParsedChapter]>::len).collect();
        assert_eq!(sizes, vec![4, 4, 1]);
        assert_eq!(doc.level_count(), 3);
    }

    #[test]
    fn empty_document_has_no_levels() {
        let doc = doc_with(0);
        assert_eq!(doc.levels().count(), 0);
        assert_eq!(doc.level_count(), 0);
    }

    #[test]
    fn token_estimate_rounds_up() {
        let ch = ParsedChapter::new(1, "t", "abcde");
        assert_eq!(ch.char_count(), 5);
        assert_eq!(ch.estimated_tokens(), 2);
    }

    #[test]
    fn char_count_is_not_byte_count() {
        let ch = ParsedChapter::new(1, "t", "héllo");
        assert_eq!(ch.char_count(), 5);
    }

    #[test]
    fn serializes_camel_case_and_skips_missing_author() {
        let doc = doc_with(1);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["totalPages"], 1);
        assert_eq!(json["chapters"][0]["chapterNumber"], 1);
        assert!(json.get("author").is_none());
    }

    #[test]
    fn metadata_builder_sets_fields() {
        let meta = DocumentMetadata::default()
            .with_title("T")
            .with_author("A")
            .with_filename("f");
        assert_eq!(meta.title.as_deref(), Some("T"));
        assert_eq!(meta.author.as_deref(), Some("A"));
        assert_eq!(meta.filename.as_deref(), Some("f"));
    }
}
