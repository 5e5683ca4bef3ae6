//! Chapter segmentation engine.
//!
//! Turns raw extracted document text into an ordered list of chapters:
//! heading-pattern detection first (`Chapter 3: ...`, `Part II`, `4. Title`),
//! then a size-based splitter when detection finds too little structure,
//! then a length floor and per-chapter content caps. No input makes it fail.

mod detect;
pub(crate) mod helpers;
mod numerals;
mod pipeline;
mod split;
mod title;

pub use detect::detect_chapters;
pub use numerals::{parse_chapter_number, roman_to_int};
pub use pipeline::{parse_document, parse_pdf_text};
pub use split::split_by_size;
pub use title::{extract_title, ResolvedTitle};
