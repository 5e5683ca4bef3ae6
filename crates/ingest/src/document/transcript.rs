//! Video transcripts stored as JSON: `{title, transcript: [{text, start}]}`.
//!
//! Caption fragments are merged into timestamped paragraphs (`[m:ss] ...`),
//! dropping `[Music]`-style annotations, filler words and sponsor reads.
//! Each paragraph becomes one page, so longer recordings get proportionally
//! more chapters from the size-based splitter.

use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use super::segmenter::helpers::{char_len, normalize_whitespace, truncate_chars};
use super::{ExtractionError, PageContent};

/// A gap between fragments longer than this ends the paragraph.
const PAUSE_BREAK_SECS: f64 = 2.0;
/// Paragraphs are closed once they grow past this many characters.
const PARAGRAPH_MAX_CHARS: usize = 500;
/// A fragment ending a sentence closes a paragraph holding more pieces than this.
const SENTENCE_BREAK_MIN_PIECES: usize = 5;
/// Fragments starting within this window after a sponsor mention are dropped.
const SPONSOR_SKIP_SECS: f64 = 60.0;

/// Merged text above this size keeps only its head and tail.
pub const MAX_TRANSCRIPT_CHARS: usize = 320_000;
const TRUNCATION_MARKER: &str = "[... middle portion truncated for length ...]";

/// Names after a `|` that belong to the show, not a guest.
const NON_GUEST_WORDS: [&str; 3] = ["Huberman", "Series", "Podcast"];

static RE_FILLER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:um|uh|uhm|hmm)\b").unwrap());

const SPONSOR_KEYWORDS: [&str; 15] = [
    "ag1",
    "athletic greens",
    "athleticgreens",
    "lmnt",
    "drinklmnt",
    "element",
    "insidetracker",
    "eight sleep",
    "whoop",
    "our sponsors",
    "today's sponsor",
    "sponsored by",
    "use code",
    "discount code",
    "promo code",
];

static RE_SPONSOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)\b(?:{})\b", SPONSOR_KEYWORDS.join("|"))).unwrap()
});

static RE_GUEST_DR_AFTER_PIPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\|\s*(Dr\.?\s+[A-Z][a-z]+\s+[A-Z][a-z]+)").unwrap());

static RE_GUEST_DR_LEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(Dr\.?\s+[A-Z][a-z]+\s+[A-Z][a-z]+)\s*:").unwrap());

static RE_GUEST_AFTER_PIPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\|\s*([A-Z][a-z]+\s+[A-Z][a-z]+)(?:\s*\||$)").unwrap());

#[derive(Debug, Clone, Deserialize)]
struct TranscriptFile {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    transcript: Vec<TranscriptChunk>,
}

/// One caption fragment.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptChunk {
    #[serde(default)]
    pub text: String,
    /// Offset from the start of the recording, in seconds.
    #[serde(default)]
    pub start: f64,
}

/// Extracted transcript: paragraph pages plus the title and guest, if any.
#[derive(Debug, Clone)]
pub struct TranscriptText {
    pub title: Option<String>,
    pub guest: Option<String>,
    pub pages: Vec<PageContent>,
}

pub fn extract_transcript(bytes: &[u8]) -> Result<TranscriptText, ExtractionError> {
    let file: TranscriptFile = serde_json::from_slice(bytes)
        .map_err(|e| ExtractionError::TranscriptError(e.to_string()))?;

    let merged = merge_chunks(&file.transcript, true);
    let text = truncate_middle(&merged, MAX_TRANSCRIPT_CHARS);

    let mut pages: Vec<PageContent> = text
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .enumerate()
        .map(|(i, p)| PageContent {
            page_number: i + 1,
            text: p.to_string(),
        })
        .collect();

    if pages.is_empty() {
        tracing::warn!(fragments = file.transcript.len(), "transcript contains no usable text");
        pages.push(PageContent {
            page_number: 1,
            text: String::new(),
        });
    }

    let title = file
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    let guest = title.as_deref().and_then(extract_guest_name);

    tracing::debug!(
        fragments = file.transcript.len(),
        paragraphs = pages.len(),
        chars = char_len(&text),
        guest = guest.as_deref().unwrap_or("-"),
        "transcript merged"
    );

    Ok(TranscriptText {
        title,
        guest,
        pages,
    })
}

/// Remove filler words and collapse whitespace.
pub(crate) fn clean_text(text: &str) -> String {
    normalize_whitespace(&RE_FILLER.replace_all(text, ""))
}

pub(crate) fn is_sponsor_segment(text: &str) -> bool {
    RE_SPONSOR.is_match(text)
}

/// `[Music]`, `[Applause]` and similar non-speech captions.
fn is_annotation(text: &str) -> bool {
    text.starts_with('[') && text.ends_with(']')
}

/// Guest name from a video title such as `Topic | Dr. Jane Roe` or
/// `Dr. Jane Roe: Topic`.
pub(crate) fn extract_guest_name(title: &str) -> Option<String> {
    if let Some(caps) = RE_GUEST_DR_AFTER_PIPE.captures(title) {
        return Some(caps[1].trim().to_string());
    }
    if let Some(caps) = RE_GUEST_DR_LEADING.captures(title) {
        return Some(caps[1].trim().to_string());
    }
    let guest = RE_GUEST_AFTER_PIPE.captures(title)?[1].trim().to_string();
    (!NON_GUEST_WORDS.iter().any(|w| guest.contains(w))).then_some(guest)
}

#[derive(Debug, Default)]
struct Paragraph {
    start: Option<f64>,
    pieces: Vec<String>,
}

impl Paragraph {
    fn push(&mut self, piece: String, start: f64) {
        self.start.get_or_insert(start);
        self.pieces.push(piece);
    }

    /// Length of the pieces joined by single spaces.
    fn char_len(&self) -> usize {
        let chars: usize = self.pieces.iter().map(|p| char_len(p)).sum();
        chars + self.pieces.len().saturating_sub(1)
    }

    fn flush_into(&mut self, out: &mut Vec<String>) {
        let start = self.start.take().unwrap_or(0.0);
        let text = normalize_whitespace(&std::mem::take(&mut self.pieces).join(" "));
        if !text.is_empty() {
            out.push(format!("{} {text}", timestamp(start)));
        }
    }
}

/// `[m:ss]`; minutes are not wrapped into hours.
fn timestamp(secs: f64) -> String {
    let secs = secs.max(0.0) as u64;
    format!("[{}:{:02}]", secs / 60, secs % 60)
}

/// Merge caption fragments into `[m:ss] text` paragraphs separated by blank
/// lines. Paragraphs end on a pause, on length, or on a sentence end once
/// enough fragments have accumulated. Each paragraph is stamped with the
/// start of its first kept fragment.
pub(crate) fn merge_chunks(chunks: &[TranscriptChunk], skip_sponsors: bool) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = Paragraph::default();
    let mut skip_until = f64::NEG_INFINITY;

    for (i, chunk) in chunks.iter().enumerate() {
        let text = chunk.text.trim();

        if skip_sponsors && chunk.start < skip_until {
            continue;
        }
        if is_annotation(text) {
            continue;
        }
        if skip_sponsors && is_sponsor_segment(text) {
            skip_until = chunk.start + SPONSOR_SKIP_SECS;
            current.flush_into(&mut paragraphs);
            continue;
        }

        let cleaned = clean_text(text);
        if !cleaned.is_empty() {
            current.push(cleaned, chunk.start);
        }

        let next_start = chunks.get(i + 1).map_or(f64::INFINITY, |c| c.start);
        let pause = next_start - chunk.start > PAUSE_BREAK_SECS;
        let sentence_end =
            text.ends_with(['.', '?', '!']) && current.pieces.len() > SENTENCE_BREAK_MIN_PIECES;

        if pause || sentence_end || current.char_len() > PARAGRAPH_MAX_CHARS {
            current.flush_into(&mut paragraphs);
        }
    }
    current.flush_into(&mut paragraphs);

    paragraphs.join("\n\n")
}

/// Keep the first and last `max_chars / 2` characters around a marker.
pub(crate) fn truncate_middle(text: &str, max_chars: usize) -> String {
    let total = char_len(text);
    if total <= max_chars {
        return text.to_string();
    }
    let portion = max_chars / 2;
    let head = truncate_chars(text, portion);
    let tail_start = text
        .char_indices()
        .nth(total - portion)
        .map_or(text.len(), |(i, _)| i);
    format!("{head}\n\n{TRUNCATION_MARKER}\n\n{}", &text[tail_start..])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, start: f64) -> TranscriptChunk {
        TranscriptChunk {
            text: text.to_string(),
            start,
        }
    }

    #[test]
    fn fragments_merge_into_timestamped_paragraphs() {
        let chunks = [
            chunk("welcome to the", 0.32),
            chunk("show today we", 1.2),
            chunk("talk about sleep", 2.0),
            chunk("light matters most", 65.5),
        ];
        let text = merge_chunks(&chunks, true);
        assert_eq!(
            text,
            "[0:00] welcome to the show today we talk about sleep\n\n[1:05] light matters most"
        );
    }

    #[test]
    fn annotations_are_skipped() {
        let chunks = [
            chunk("[Music]", 0.0),
            chunk("hello there", 0.5),
            chunk("[Applause]", 1.0),
        ];
        assert_eq!(merge_chunks(&chunks, true), "[0:00] hello there");
    }

    #[test]
    fn filler_words_are_removed() {
        assert_eq!(clean_text("so um the  uh idea is, Hmm, simple"), "so the idea is, , simple");
        assert_eq!(clean_text("umbrella and uhuru stay"), "umbrella and uhuru stay");
    }

    #[test]
    fn sponsor_read_skips_a_minute() {
        let chunks = [
            chunk("first we cover the basics", 0.0),
            chunk("today's sponsor is a mattress", 1.0),
            chunk("it keeps you cool", 2.0),
            chunk("get ten percent off", 40.0),
            chunk("back to the science", 62.0),
        ];
        let text = merge_chunks(&chunks, true);
        assert_eq!(text, "[0:00] first we cover the basics\n\n[1:02] back to the science");
    }

    #[test]
    fn sponsors_kept_when_not_skipping() {
        let chunks = [chunk("sponsored by nobody", 0.0), chunk("really", 0.5)];
        assert_eq!(merge_chunks(&chunks, false), "[0:00] sponsored by nobody really");
    }

    #[test]
    fn sponsor_keywords_match_whole_words() {
        assert!(is_sponsor_segment("Use code HUBERMAN at checkout"));
        assert!(is_sponsor_segment("thanks to Eight Sleep"));
        assert!(!is_sponsor_segment("elementary particles"));
    }

    #[test]
    fn sentence_end_breaks_after_enough_pieces() {
        let chunks: Vec<_> = (0..8)
            .map(|i| {
                let text = if i == 5 { "six." } else { "word" };
                chunk(text, i as f64 * 0.5)
            })
            .collect();
        let text = merge_chunks(&chunks, true);
        let paragraphs: Vec<&str> = text.split("\n\n").collect();
        assert_eq!(paragraphs.len(), 2);
        assert!(paragraphs[0].ends_with("six."));
        assert_eq!(paragraphs[1], "[0:03] word word");
    }

    #[test]
    fn long_paragraphs_are_closed() {
        let piece = "a".repeat(120);
        let chunks: Vec<_> = (0..10).map(|i| chunk(&piece, i as f64)).collect();
        let text = merge_chunks(&chunks, true);
        assert_eq!(text.split("\n\n").count(), 2);
    }

    #[test]
    fn empty_transcript_merges_to_nothing() {
        assert_eq!(merge_chunks(&[], true), "");
    }

    #[test]
    fn guest_names_from_titles() {
        assert_eq!(
            extract_guest_name("How to Improve Memory | Dr. Charan Ranganath").as_deref(),
            Some("Dr. Charan Ranganath")
        );
        assert_eq!(
            extract_guest_name("Dr. Matt Walker: Improve Sleep").as_deref(),
            Some("Dr. Matt Walker")
        );
        assert_eq!(
            extract_guest_name("Mastery and Patience | Robert Greene").as_deref(),
            Some("Robert Greene")
        );
        assert_eq!(extract_guest_name("Focus Tools | Huberman Lab"), None);
        assert_eq!(extract_guest_name("Focus Tools Based on Neuroscience"), None);
    }

    #[test]
    fn short_text_is_not_truncated() {
        assert_eq!(truncate_middle("abcdef", 6), "abcdef");
    }

    #[test]
    fn long_text_keeps_head_and_tail() {
        let text = format!("{}{}{}", "h".repeat(10), "m".repeat(100), "t".repeat(10));
        let cut = truncate_middle(&text, 20);
        assert_eq!(cut, format!("{}\n\n{TRUNCATION_MARKER}\n\n{}", "h".repeat(10), "t".repeat(10)));
    }

    #[test]
    fn truncation_counts_characters() {
        let text = "é".repeat(30);
        let cut = truncate_middle(&text, 10);
        assert!(cut.starts_with("ééééé\n\n"));
        assert!(cut.ends_with("\n\nééééé"));
    }

    #[test]
    fn json_file_becomes_paragraph_pages() {
        let json = r#"{
            "video_id": "abc123",
            "title": "Science of Sleep | Dr. Matt Walker",
            "duration": 3600,
            "transcript": [
                {"text": "[Music]", "start": 0.0, "duration": 2.0},
                {"text": "welcome um back", "start": 2.5, "duration": 1.0},
                {"text": "sleep is essential", "start": 30.0, "duration": 1.5}
            ]
        }"#;
        let t = extract_transcript(json.as_bytes()).unwrap();
        assert_eq!(t.title.as_deref(), Some("Science of Sleep | Dr. Matt Walker"));
        assert_eq!(t.guest.as_deref(), Some("Dr. Matt Walker"));
        assert_eq!(t.pages.len(), 2);
        assert_eq!(t.pages[0].text, "[0:02] welcome back");
        assert_eq!(t.pages[1].page_number, 2);
        assert_eq!(t.pages[1].text, "[0:30] sleep is essential");
    }

    #[test]
    fn missing_transcript_is_one_empty_page() {
        let t = extract_transcript(br#"{"title": "  "}"#).unwrap();
        assert_eq!(t.title, None);
        assert_eq!(t.pages.len(), 1);
        assert_eq!(t.pages[0].text, "");
    }

    #[test]
    fn malformed_json_is_a_transcript_error() {
        let err = extract_transcript(b"{not json").unwrap_err();
        assert!(matches!(err, ExtractionError::TranscriptError(_)));
    }
}
