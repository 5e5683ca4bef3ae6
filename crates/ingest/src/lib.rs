//! Document ingestion: text extraction and chapter segmentation.

pub mod document;

pub use document::segmenter::{
    detect_chapters, extract_title, parse_document, parse_pdf_text, split_by_size, ResolvedTitle,
};
pub use document::{extract_file, extract_text, ExtractedDocument, ExtractionError};
