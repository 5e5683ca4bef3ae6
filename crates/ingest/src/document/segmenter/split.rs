//! Size-based fallback splitting.
//!
//! Used when heading detection finds too little structure. The text is cut
//! into units (paragraphs, lines or sentences), greedily packed into roughly
//! equal sections, and oversized sections are bisected until the target
//! count is reached. Every unit keeps its trailing delimiter, so the
//! sections concatenate back to the exact input.

use std::sync::LazyLock;

use anyrpg_core::{ParsedChapter, SegmenterConfig};
use regex::Regex;
use tracing::debug;

use super::helpers::{bisect_point, char_len};

static RE_PARAGRAPH_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\n+").unwrap());

static RE_LINE_BREAK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n").unwrap());

static RE_SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]\s+").unwrap());

/// Split `text` after every match of `delimiter`; pieces keep their delimiter.
fn split_keeping_delimiters<'a>(text: &'a str, delimiter: &Regex) -> Vec<&'a str> {
    let mut pieces = Vec::new();
    let mut last = 0;
    for m in delimiter.find_iter(text) {
        if m.end() > last {
            pieces.push(&text[last..m.end()]);
            last = m.end();
        }
    }
    if last < text.len() {
        pieces.push(&text[last..]);
    }
    pieces
}

/// Units at the coarsest granularity that yields at least `target` of them:
/// paragraphs, then lines, then sentences (used regardless of count).
pub(crate) fn split_units(text: &str, target: usize) -> Vec<&str> {
    for delimiter in [&*RE_PARAGRAPH_BREAK, &*RE_LINE_BREAK] {
        let units = split_keeping_delimiters(text, delimiter);
        if units.len() >= target {
            return units;
        }
    }
    split_keeping_delimiters(text, &RE_SENTENCE_END)
}

fn section(number: usize, content: impl Into<String>) -> ParsedChapter {
    ParsedChapter::new(number as u32, format!("Section {number}"), content)
}

/// Split `text` into `target_chapters` sections of roughly equal size.
///
/// Fewer sections are returned only when the text is too short to split
/// further (below `min_split_chars` per section). Sections are numbered
/// `1..=n` and titled `Section N`.
pub fn split_by_size(
    text: &str,
    target_chapters: usize,
    config: &SegmenterConfig,
) -> Vec<ParsedChapter> {
    let total = char_len(text);
    if total < config.min_chapter_chars {
        return vec![section(1, text)];
    }

    let target = target_chapters.max(1);
    let target_size = total.div_ceil(target);
    let units = split_units(text, target);

    let mut chapters: Vec<ParsedChapter> = Vec::with_capacity(target);
    let mut current = String::new();
    let mut current_len = 0usize;

    for (i, unit) in units.iter().enumerate() {
        current.push_str(unit);
        current_len += char_len(unit);

        let is_last = i + 1 == units.len();
        let full = current_len >= target_size && chapters.len() + 1 < target;
        if full || is_last {
            let number = chapters.len() + 1;
            chapters.push(section(number, std::mem::take(&mut current)));
            current_len = 0;
        }
    }

    force_split(&mut chapters, target, config.min_split_chars);

    for (i, ch) in chapters.iter_mut().enumerate() {
        ch.chapter_number = i as u32 + 1;
        ch.title = format!("Section {}", i + 1);
    }

    debug!(
        target,
        produced = chapters.len(),
        units = units.len(),
        "size-based split finished"
    );
    chapters
}

/// Bisect the largest chapter until `target` is reached or the largest is
/// shorter than `min_chars`. Halves replace the original in place.
fn force_split(chapters: &mut Vec<ParsedChapter>, target: usize, min_chars: usize) {
    while chapters.len() < target {
        let Some((idx, len)) = largest(chapters) else {
            return;
        };
        if len < min_chars {
            return;
        }
        let Some(cut) = bisect_point(&chapters[idx].content) else {
            return;
        };

        let original = chapters.remove(idx);
        let (left, right) = original.content.split_at(cut);
        let number = original.chapter_number;
        let first = ParsedChapter::new(number, format!("{}a", original.title), left);
        let second = ParsedChapter::new(number, format!("{}b", original.title), right);
        chapters.insert(idx, second);
        chapters.insert(idx, first);
    }
}

/// Index and character length of the longest chapter; the earliest wins ties.
fn largest(chapters: &[ParsedChapter]) -> Option<(usize, usize)> {
    chapters
        .iter()
        .map(ParsedChapter::char_count)
        .enumerate()
        .fold(None, |best, (i, len)| match best {
            Some((_, best_len)) if best_len >= len => best,
            _ => Some((i, len)),
        })
}
