//! Document title and author resolution.

use std::sync::LazyLock;

use anyrpg_core::DocumentMetadata;
use regex::Regex;

use super::helpers::{char_len, normalize_whitespace};

const UNTITLED: &str = "Untitled Document";
const TITLE_SCAN_LINES: usize = 30;

static RE_PAGE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:--\s*\d+\s+of\s+\d+\s*--|page\s+\d+)").unwrap()
});

static RE_NUMBERED_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.").unwrap());

/// Prefix match only: "Particle Physics" counts as starting with "part".
static RE_STRUCTURAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:chapter|section|part|table|contents)").unwrap()
});

static RE_AUTHOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:by\s+)?[A-Z][a-z]+(?:\s+[A-Z][a-z]+)+$").unwrap()
});

static RE_BY_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^by\s+").unwrap());

/// A real extension: short and alphanumeric, so "Dr. Seuss Stories" keeps its words.
static RE_EXTENSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.[A-Za-z0-9]{1,5}$").unwrap());

/// Resolved title and optional author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTitle {
    pub title: String,
    pub author: Option<String>,
}

impl ResolvedTitle {
    fn untitled() -> Self {
        Self {
            title: UNTITLED.to_string(),
            author: None,
        }
    }
}

/// Resolve a title by priority: metadata, filename, first-lines scan, fallback.
pub fn extract_title(text: &str, metadata: &DocumentMetadata) -> ResolvedTitle {
    if let Some(title) = metadata.title.as_deref().map(str::trim) {
        if char_len(title) > 3 && !is_generic_title(title) {
            let author = metadata
                .author
                .as_deref()
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .map(str::to_string);
            return ResolvedTitle {
                title: title.to_string(),
                author,
            };
        }
    }

    if let Some(name) = metadata.filename.as_deref().map(clean_filename_title) {
        if char_len(&name) > 3 {
            return ResolvedTitle {
                title: name,
                author: None,
            };
        }
    }

    scan_leading_lines(text).unwrap_or_else(ResolvedTitle::untitled)
}

fn is_generic_title(title: &str) -> bool {
    let lower = title.to_lowercase();
    lower.contains("untitled") || lower.contains("microsoft word") || lower == "document"
}

/// Filename turned into a readable title: extension dropped, `_`/`-` as spaces.
fn clean_filename_title(filename: &str) -> String {
    let stem = RE_EXTENSION.replace(filename.trim(), "");
    normalize_whitespace(&stem.replace(['_', '-'], " "))
}

fn scan_leading_lines(text: &str) -> Option<ResolvedTitle> {
    let lines: Vec<&str> = text.lines().take(TITLE_SCAN_LINES + 1).collect();

    for (i, raw) in lines.iter().take(TITLE_SCAN_LINES).enumerate() {
        let line = raw.trim();
        if !is_title_candidate(line) {
            continue;
        }
        if !line.chars().next().is_some_and(char::is_uppercase) {
            continue;
        }

        let author = lines
            .get(i + 1)
            .map(|next| next.trim())
            .filter(|next| (4..=100).contains(&char_len(next)) && RE_AUTHOR.is_match(next))
            .map(|next| RE_BY_PREFIX.replace(next, "").into_owned());

        return Some(ResolvedTitle {
            title: line.to_string(),
            author,
        });
    }
    None
}

fn is_title_candidate(line: &str) -> bool {
    if line.is_empty() || RE_PAGE_MARKER.is_match(line) {
        return false;
    }
    let len = char_len(line);
    if !(5..=120).contains(&len) {
        return false;
    }
    if line.ends_with(['.', '!', '?']) {
        return false;
    }
    !RE_NUMBERED_ITEM.is_match(line) && !RE_STRUCTURAL.is_match(line)
}
