//! Heading-pattern chapter detection.
//!
//! A single pass over the document's lines. Lines matching one of the
//! heading patterns open a new chapter; everything else is buffered into
//! the open chapter. Chapter numbers are normalized and deduplicated so that
//! table-of-contents entries do not produce a second chapter with the same
//! number once the real heading appears.

use std::collections::HashSet;
use std::sync::LazyLock;

use anyrpg_core::{ParsedChapter, SegmenterConfig};
use regex::Regex;
use tracing::debug;

use super::helpers::char_len;
use super::numerals::{parse_chapter_number, NUMBER_WORDS};

const INTRODUCTION: &str = "Introduction";

/// Lines longer than this can open the implicit introduction chapter.
const INTRO_MIN_LINE_CHARS: usize = 50;

/// Short lines mentioning a page count are table-of-contents noise.
const TOC_LINE_MAX_CHARS: usize = 150;

static RE_TOC_PAGES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d+\s*pages?").unwrap());

static RE_TRAILING_PAREN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)\s*$").unwrap());

static RE_TRAILING_BRACKET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\[[^\]]*\]\s*$").unwrap());

/// How a pattern's number capture is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberKind {
    /// Digits, Roman numerals or number words.
    Numeral,
    /// A letter label (appendices); always numbered by position. Letters
    /// are never Roman-decoded, so "Appendix C" is not chapter 100.
    Label,
}

struct HeadingPattern {
    name: &'static str,
    regex: Regex,
    number: NumberKind,
    /// Used to synthesize a title when the pattern's title group is empty.
    label: &'static str,
}

impl HeadingPattern {
    fn new(name: &'static str, pattern: &str, number: NumberKind, label: &'static str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).unwrap(),
            number,
            label,
        }
    }
}

/// Heading patterns in priority order. The first match wins, so the more
/// specific forms must stay ahead of the generic numbered-title forms.
static HEADING_PATTERNS: LazyLock<Vec<HeadingPattern>> = LazyLock::new(|| {
    let words = NUMBER_WORDS.join("|");
    vec![
        HeadingPattern::new(
            "chapter",
            &format!(r"(?i)^(?:chapter|chapitre|kapitel)\s+(\d+|[ivxlcdm]+|{words})\s*[:.\-–—]+\s*(.+)$"),
            NumberKind::Numeral,
            "Chapter",
        ),
        HeadingPattern::new(
            "numbered-chapter",
            r"(?i)^\d+\.\s*chapter\s+(\d+)\s*[:.\-–—]+\s*(.+)$",
            NumberKind::Numeral,
            "Chapter",
        ),
        HeadingPattern::new(
            "part",
            &format!(r"(?i)^part\s+(\d+|[ivxlcdm]+|{words})\s*[:.\-–—]+\s*(.*)$"),
            NumberKind::Numeral,
            "Part",
        ),
        HeadingPattern::new(
            "section",
            r"(?i)^section\s+(\d+)\s*[:.\-–—]+\s*(.*)$",
            NumberKind::Numeral,
            "Section",
        ),
        HeadingPattern::new(
            "appendix",
            r"(?i)^appendix\s+([a-z])\s*[:.\-–—]+\s*(.+)$",
            NumberKind::Label,
            "Appendix",
        ),
        HeadingPattern::new(
            "numbered-title",
            r"^(\d+)\.\s+([A-Z].{9,79})$",
            NumberKind::Numeral,
            "Chapter",
        ),
        HeadingPattern::new(
            "roman-title",
            r"^([IVXLC]+)\.\s+([A-Z].{4,49})$",
            NumberKind::Numeral,
            "Chapter",
        ),
    ]
});

/// A heading line recognized by one of the patterns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Heading {
    pub pattern: &'static str,
    /// Normalized number; 0 when unparsable or a letter label.
    pub number: u32,
    pub title: String,
}

/// Match `line` (already trimmed) against the heading patterns in order.
pub(crate) fn match_heading(line: &str) -> Option<Heading> {
    HEADING_PATTERNS.iter().find_map(|p| {
        let caps = p.regex.captures(line)?;
        let raw_number = caps.get(1).map_or("", |m| m.as_str());
        let number = match p.number {
            NumberKind::Numeral => parse_chapter_number(raw_number),
            NumberKind::Label => 0,
        };
        let title = clean_title(caps.get(2).map_or("", |m| m.as_str()));
        let title = if title.is_empty() {
            format!("{} {}", p.label, raw_number)
        } else {
            title
        };
        Some(Heading {
            pattern: p.name,
            number,
            title,
        })
    })
}

/// Strip trailing `(code)` annotations and bracketed suffixes.
fn clean_title(raw: &str) -> String {
    let mut title = raw.trim().to_string();
    loop {
        let stripped = RE_TRAILING_PAREN.replace(&title, "");
        let stripped = RE_TRAILING_BRACKET.replace(&stripped, "").trim().to_string();
        if stripped == title {
            return title;
        }
        title = stripped;
    }
}

fn is_toc_noise(line: &str) -> bool {
    char_len(line) < TOC_LINE_MAX_CHARS && RE_TOC_PAGES.is_match(line)
}

struct OpenChapter<'a> {
    number: u32,
    title: String,
    lines: Vec<&'a str>,
}

impl OpenChapter<'_> {
    /// The finished chapter, or `None` when its body is too thin to keep.
    fn finish(self, min_chars: usize) -> Option<ParsedChapter> {
        let content = self.lines.join("\n").trim().to_string();
        if char_len(&content) > min_chars {
            Some(ParsedChapter::new(self.number, self.title, content))
        } else {
            debug!(
                number = self.number,
                title = %self.title,
                chars = char_len(&content),
                "dropping thin chapter"
            );
            None
        }
    }
}

/// Smallest number at or above `from` not yet claimed by a heading.
fn next_free(seen: &HashSet<u32>, from: u32) -> u32 {
    (from..).find(|n| !seen.contains(n)).unwrap_or(from)
}

/// Detect chapters from heading lines. An empty result means no usable
/// structure was found.
pub fn detect_chapters(text: &str, config: &SegmenterConfig) -> Vec<ParsedChapter> {
    let min_chars = config.min_chapter_chars;
    let mut chapters: Vec<ParsedChapter> = Vec::new();
    let mut current: Option<OpenChapter<'_>> = None;
    let mut seen: HashSet<u32> = HashSet::new();

    for raw in text.lines() {
        let line = raw.trim();

        if line.is_empty() {
            if let Some(open) = current.as_mut() {
                open.lines.push("");
            }
            continue;
        }

        if is_toc_noise(line) {
            continue;
        }

        // Explicit numbers already taken are plain content. Unparsable
        // numbers take the next free position; both share one number space.
        let heading = match_heading(line).and_then(|h| {
            let number = match h.number {
                0 => next_free(&seen, chapters.len() as u32 + 1),
                n if seen.contains(&n) => return None,
                n => n,
            };
            Some((number, h))
        });

        if let Some((number, heading)) = heading {
            debug!(
                pattern = heading.pattern,
                number,
                title = %heading.title,
                "heading matched"
            );
            seen.insert(number);
            if let Some(done) = current.take().and_then(|open| open.finish(min_chars)) {
                chapters.push(done);
            }
            current = Some(OpenChapter {
                number,
                title: heading.title,
                lines: Vec::new(),
            });
            continue;
        }

        match current.as_mut() {
            Some(open) => open.lines.push(line),
            None if chapters.is_empty() && char_len(line) > INTRO_MIN_LINE_CHARS => {
                current = Some(OpenChapter {
                    number: 0,
                    title: INTRODUCTION.to_string(),
                    lines: vec![line],
                });
            }
            None => {}
        }
    }

    if let Some(done) = current.and_then(|open| open.finish(min_chars)) {
        chapters.push(done);
    }

    debug!(count = chapters.len(), "heading detection finished");
    chapters
}
