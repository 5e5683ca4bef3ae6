//! Chapter-number normalization: number words, Roman numerals, digits.

/// Spelled-out numbers accepted in headings, index 0 = one.
pub(crate) const NUMBER_WORDS: [&str; 20] = [
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten", "eleven",
    "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen", "nineteen",
    "twenty",
];

/// Normalize a heading's number token. Returns 0 when unparsable.
pub fn parse_chapter_number(raw: &str) -> u32 {
    let token = raw.trim().to_lowercase();
    if token.is_empty() {
        return 0;
    }

    if let Some(pos) = NUMBER_WORDS.iter().position(|w| *w == token) {
        return pos as u32 + 1;
    }

    if token.chars().all(|c| "ivxlcdm".contains(c)) {
        return roman_to_int(&token).unwrap_or(0);
    }

    let digits: String = token.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

fn roman_value(c: char) -> Option<u32> {
    match c.to_ascii_lowercase() {
        'i' => Some(1),
        'v' => Some(5),
        'x' => Some(10),
        'l' => Some(50),
        'c' => Some(100),
        'd' => Some(500),
        'm' => Some(1000),
        _ => None,
    }
}

/// Subtractive Roman numeral decoding (`iv` = 4, `xc` = 90). Case-insensitive.
pub fn roman_to_int(numeral: &str) -> Option<u32> {
    let values = numeral
        .chars()
        .map(roman_value)
        .collect::<Option<Vec<u32>>>()?;
    if values.is_empty() {
        return None;
    }

    let mut total: u32 = 0;
    for (i, &v) in values.iter().enumerate() {
        match values.get(i + 1) {
            Some(&next) if next > v => total = total.saturating_sub(v),
            _ => total = total.saturating_add(v),
        }
    }
    Some(total)
}
