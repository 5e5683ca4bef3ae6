use super::{ExtractionError, PageContent};

/// Form feed; pdf-extract emits one between pages.
const PAGE_BREAK: char = '\x0C';

pub fn extract_pdf(bytes: &[u8]) -> Result<Vec<PageContent>, ExtractionError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| ExtractionError::PdfError(e.to_string()))?;

    let pages = split_pages(&text);
    if pages.is_empty() {
        // Scanned/image PDF. A single empty page still segments to one chapter.
        tracing::warn!(bytes = bytes.len(), "PDF contains no extractable text");
        return Ok(vec![PageContent {
            page_number: 1,
            text: String::new(),
        }]);
    }

    tracing::debug!(
        pages = pages.len(),
        last_page = pages.last().map_or(0, |p| p.page_number),
        "PDF text extracted"
    );
    Ok(pages)
}

/// Cut extracted text at page breaks. Blank pages are dropped but still
/// count towards the numbering of later pages.
fn split_pages(text: &str) -> Vec<PageContent> {
    text.split(PAGE_BREAK)
        .enumerate()
        .filter_map(|(i, page)| {
            let page = page.trim();
            (!page.is_empty()).then(|| PageContent {
                page_number: i + 1,
                text: page.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_without_breaks_is_one_page() {
        let pages = split_pages("  Title\n\nBody text  ");
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].page_number, 1);
        assert_eq!(pages[0].text, "Title\n\nBody text");
    }

    #[test]
    fn blank_pages_keep_their_number() {
        let pages = split_pages("one\x0C \n \x0Cthree\x0C");
        let numbers: Vec<usize> = pages.iter().map(|p| p.page_number).collect();
        assert_eq!(numbers, vec![1, 3]);
        assert_eq!(pages[1].text, "three");
    }

    #[test]
    fn whitespace_only_text_has_no_pages() {
        assert!(split_pages(" \n\x0C\t ").is_empty());
    }
}
