//! Segmentation orchestration: title, detection, fallback, filtering, caps.

use anyrpg_core::{DocumentMetadata, ParsedChapter, ParsedDocument, SegmenterConfig};
use tracing::{debug, info};

use super::detect::detect_chapters;
use super::helpers::truncate_chars;
use super::split::split_by_size;
use super::title::{extract_title, ResolvedTitle};
use crate::document::ExtractedDocument;

/// Segment raw document text into chapters. Never fails: every branch has a
/// degraded output, down to a single chapter for empty input.
pub fn parse_pdf_text(
    text: &str,
    num_pages: u32,
    metadata: &DocumentMetadata,
    config: &SegmenterConfig,
) -> ParsedDocument {
    let ResolvedTitle { title, author } = extract_title(text, metadata);

    let detected = detect_chapters(text, config);
    // A single substantial chapter keeps the detection result, even next to
    // near-empty ones.
    let all_thin = detected
        .iter()
        .all(|c| c.char_count() < config.thin_chapter_chars);

    let chapters = if detected.len() < config.min_chapters || all_thin {
        let target = config.target_chapters(num_pages);
        debug!(
            detected = detected.len(),
            all_thin,
            target,
            "heading detection insufficient, splitting by size"
        );
        split_by_size(text, target, config)
    } else {
        detected
    };

    let mut chapters = apply_length_floor(chapters, config);

    if chapters.is_empty() {
        debug!("no chapters produced, using leading excerpt");
        chapters.push(ParsedChapter::new(
            1,
            title.clone(),
            truncate_chars(text, config.fallback_chars),
        ));
    }

    for ch in &mut chapters {
        cap_content(ch, config.max_chapter_chars);
    }

    info!(
        title = %title,
        pages = num_pages,
        chapters = chapters.len(),
        "document segmented"
    );

    ParsedDocument {
        title,
        author,
        total_pages: num_pages,
        chapters,
    }
}

/// Segment an extracted document, using its full text and page count.
/// Title and author carried by the file fill in what `metadata` leaves open.
pub fn parse_document(
    doc: &ExtractedDocument,
    metadata: &DocumentMetadata,
    config: &SegmenterConfig,
) -> ParsedDocument {
    let metadata = doc.metadata_with(metadata.clone());
    parse_pdf_text(&doc.full_text(), doc.page_count(), &metadata, config)
}

/// Drop chapters shorter than `min_chapter_chars`, unless that would leave
/// fewer than `min_chapters`; then everything is kept.
pub(super) fn apply_length_floor(
    mut chapters: Vec<ParsedChapter>,
    config: &SegmenterConfig,
) -> Vec<ParsedChapter> {
    let keeps = |c: &ParsedChapter| c.char_count() >= config.min_chapter_chars;
    let kept = chapters.iter().filter(|c| keeps(*c)).count();
    if kept >= config.min_chapters {
        chapters.retain(keeps);
    } else if kept < chapters.len() {
        debug!(
            kept,
            total = chapters.len(),
            "keeping short chapters to stay at the chapter floor"
        );
    }
    chapters
}

fn cap_content(chapter: &mut ParsedChapter, max_chars: usize) {
    let capped = truncate_chars(&chapter.content, max_chars);
    if capped.len() < chapter.content.len() {
        chapter.content = capped.to_string();
    }
}
