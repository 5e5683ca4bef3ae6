//! Character-based string utilities shared by the segmentation passes.
//!
//! All thresholds in the segmenter are measured in characters, never bytes,
//! so slicing always goes through these helpers to stay on char boundaries.

/// Length of `text` in characters.
pub(crate) fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// The first `max_chars` characters of `text`.
pub(crate) fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Collapse every whitespace run to a single space and trim.
pub(crate) fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Byte offset at which to bisect `text`: just after the space nearest the
/// character midpoint, or the midpoint itself when there is none.
/// Both halves are non-empty. Returns `None` for texts under two characters.
pub(crate) fn bisect_point(text: &str) -> Option<usize> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let len = chars.len();
    if len < 2 {
        return None;
    }
    let mid = len / 2;

    // A cut after the final character would leave the right half empty.
    let nearest_space = chars[..len - 1]
        .iter()
        .enumerate()
        .filter(|(_, (_, c))| *c == ' ')
        .min_by_key(|(pos, _)| pos.abs_diff(mid))
        .map(|(pos, _)| pos + 1);

    let cut = nearest_space.unwrap_or(mid);
    Some(chars[cut].0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn normalize_collapses_runs() {
        assert_eq!(normalize_whitespace("  a \t b\n\nc  "), "a b c");
    }

    #[test]
    fn bisect_prefers_space_near_middle() {
        let text = "aaaa bbbb cccc";
        let cut = bisect_point(text).unwrap();
        let (left, right) = text.split_at(cut);
        assert_eq!(left, "aaaa bbbb ");
        assert_eq!(right, "cccc");
    }

    #[test]
    fn bisect_falls_back_to_midpoint() {
        let text = "abcdefgh";
        let cut = bisect_point(text).unwrap();
        assert_eq!(text.split_at(cut), ("abcd", "efgh"));
    }

    #[test]
    fn bisect_only_considers_spaces() {
        let text = "abc\ndefgh";
        let cut = bisect_point(text).unwrap();
        assert_eq!(text.split_at(cut), ("abc\nd", "efgh"));
    }

    #[test]
    fn bisect_ignores_trailing_space() {
        let text = "abcdef ";
        let cut = bisect_point(text).unwrap();
        let (left, right) = text.split_at(cut);
        assert!(!left.is_empty() && !right.is_empty());
    }

    #[test]
    fn bisect_too_short() {
        assert_eq!(bisect_point("a"), None);
        assert_eq!(bisect_point(""), None);
    }
}
