pub mod segmenter;
mod pdf;
mod transcript;
mod txt;

use std::path::Path;

use anyrpg_core::{AnyRpgError, DocumentMetadata};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    #[error("PDF extraction failed: {0}")]
    PdfError(String),
    #[error("Transcript parse failed: {0}")]
    TranscriptError(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ExtractionError> for AnyRpgError {
    fn from(e: ExtractionError) -> Self {
        match e {
            ExtractionError::Io(io) => AnyRpgError::Io(io),
            other => AnyRpgError::Extraction(other.to_string()),
        }
    }
}

/// A page of extracted text.
#[derive(Debug, Clone)]
pub struct PageContent {
    /// 1-based page number (for PDFs). For TXT, always 1.
    pub page_number: usize,
    /// The extracted text content.
    pub text: String,
}

/// Result of extracting text from a document.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Original filename.
    pub filename: String,
    /// File type: "pdf", "txt" or "transcript"
    pub file_type: String,
    /// Extracted pages with text.
    pub pages: Vec<PageContent>,
    /// Title carried by the file itself (transcripts).
    pub title: Option<String>,
    /// Author or guest carried by the file itself (transcripts).
    pub author: Option<String>,
}

impl ExtractedDocument {
    /// Get all text concatenated.
    pub fn full_text(&self) -> String {
        self.pages
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Page count as reported to the segmenter: the highest page number seen.
    pub fn page_count(&self) -> u32 {
        self.pages
            .iter()
            .map(|p| p.page_number)
            .max()
            .unwrap_or(0) as u32
    }

    /// Total character count across all pages.
    pub fn total_chars(&self) -> usize {
        self.pages.iter().map(|p| p.text.chars().count()).sum()
    }

    /// Caller-declared metadata, completed with what the file carries. The
    /// file's author is only used together with the file's own title.
    pub fn metadata_with(&self, declared: DocumentMetadata) -> DocumentMetadata {
        if declared.title.is_some() {
            return declared;
        }
        DocumentMetadata {
            title: self.title.clone(),
            author: declared.author.or_else(|| self.author.clone()),
            filename: declared.filename,
        }
    }
}

/// Extract text from file bytes based on file type.
pub fn extract_text(bytes: &[u8], filename: &str) -> Result<ExtractedDocument, ExtractionError> {
    let ext = filename.rsplit_once('.').map_or("", |(_, ext)| ext).to_lowercase();
    let file_type = ext.as_str();

    let mut doc = ExtractedDocument {
        filename: filename.to_string(),
        file_type: String::new(),
        pages: Vec::new(),
        title: None,
        author: None,
    };
    let file_type = match file_type {
        "pdf" => {
            doc.pages = pdf::extract_pdf(bytes)?;
            "pdf"
        }
        "txt" | "text" | "md" | "markdown" => {
            doc.pages = txt::extract_txt(bytes)?;
            "txt"
        }
        "json" => {
            let transcript = transcript::extract_transcript(bytes)?;
            doc.pages = transcript.pages;
            doc.title = transcript.title;
            doc.author = transcript.guest;
            "transcript"
        }
        other => return Err(ExtractionError::UnsupportedType(other.to_string())),
    };
    doc.file_type = file_type.to_string();

    tracing::debug!(filename, file_type, pages = doc.pages.len(), "text extracted");
    Ok(doc)
}

/// Read a file from disk and extract its text.
pub fn extract_file(path: &Path) -> Result<ExtractedDocument, ExtractionError> {
    let bytes = std::fs::read(path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    extract_text(&bytes, &filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = extract_text(b"data", "sheet.xlsx").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedType(ref t) if t == "xlsx"));
    }

    #[test]
    fn missing_extension_is_rejected() {
        let err = extract_text(b"data", "README").unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedType(ref t) if t.is_empty()));
    }

    #[test]
    fn text_files_dispatch_case_insensitively() {
        let doc = extract_text(b"Hello", "NOTES.TXT").unwrap();
        assert_eq!(doc.file_type, "txt");
        assert_eq!(doc.page_count(), 1);
        assert_eq!(doc.full_text(), "Hello");
    }

    #[test]
    fn markdown_is_read_as_text() {
        let doc = extract_text(b"# Heading\n\nBody", "notes.md").unwrap();
        assert_eq!(doc.file_type, "txt");
        assert!(doc.full_text().contains("Body"));
    }

    #[test]
    fn full_text_joins_pages_with_blank_line() {
        let doc = ExtractedDocument {
            filename: "a.pdf".to_string(),
            file_type: "pdf".to_string(),
            pages: vec![
                PageContent { page_number: 1, text: "one".to_string() },
                PageContent { page_number: 3, text: "three".to_string() },
            ],
            title: None,
            author: None,
        };
        assert_eq!(doc.full_text(), "one\n\nthree");
        assert_eq!(doc.page_count(), 3);
        assert_eq!(doc.total_chars(), 8);
    }

    #[test]
    fn invalid_pdf_bytes_fail() {
        let err = extract_text(b"not a pdf at all", "broken.pdf").unwrap_err();
        assert!(matches!(err, ExtractionError::PdfError(_)));
    }

    #[test]
    fn extract_file_reads_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "Line one\nLine two").unwrap();
        let doc = extract_file(file.path()).unwrap();
        assert_eq!(doc.full_text(), "Line one\nLine two");
        assert!(doc.filename.ends_with(".txt"));
    }

    #[test]
    fn extract_file_missing_is_io_error() {
        let err = extract_file(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, ExtractionError::Io(_)));
    }

    #[test]
    fn extraction_error_converts_to_crate_error() {
        let e: AnyRpgError = ExtractionError::UnsupportedType("xlsx".to_string()).into();
        assert!(matches!(e, AnyRpgError::Extraction(_)));
    }

    #[test]
    fn json_is_read_as_transcript() {
        let json = br#"{"title": "Focus | Dr. Ada Byron", "transcript": [{"text": "hi", "start": 0}]}"#;
        let doc = extract_text(json, "episode.json").unwrap();
        assert_eq!(doc.file_type, "transcript");
        assert_eq!(doc.full_text(), "[0:00] hi");
        assert_eq!(doc.title.as_deref(), Some("Focus | Dr. Ada Byron"));
        assert_eq!(doc.author.as_deref(), Some("Dr. Ada Byron"));
    }

    #[test]
    fn declared_title_wins_over_file_metadata() {
        let mut doc = extract_text(b"body", "a.txt").unwrap();
        doc.title = Some("Carried Title".to_string());
        doc.author = Some("Carried Author".to_string());

        let meta = doc.metadata_with(DocumentMetadata::default().with_title("Declared"));
        assert_eq!(meta.title.as_deref(), Some("Declared"));
        assert_eq!(meta.author, None);

        let meta = doc.metadata_with(DocumentMetadata::default().with_filename("a.txt"));
        assert_eq!(meta.title.as_deref(), Some("Carried Title"));
        assert_eq!(meta.author.as_deref(), Some("Carried Author"));
        assert_eq!(meta.filename.as_deref(), Some("a.txt"));
    }
}
