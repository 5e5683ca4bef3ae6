use super::{ExtractionError, PageContent};

const BOM: char = '\u{FEFF}';

/// Plain text is a single page. Line endings are normalized to `\n` so
/// paragraph and line splitting see one convention.
pub fn extract_txt(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    let raw = String::from_utf8_lossy(bytes);
    let text = raw
        .trim_start_matches(BOM)
        .replace("\r\n", "\n")
        .replace('\r', "\n");

    Ok(vec![PageContent {
        page_number: 1,
        text: text.trim().to_string(),
    }])
}
