use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

// "emis-\nsions" style line-break hyphenation from justified PDF text.
static BROKEN_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<head>\w)-[ \t]*\r?\n[ \t]*(?P<tail>\w)").unwrap());

/// Normalizes one extracted page: NFKC so ligatures and full-width
/// forms compare equal, re-joins words hyphenated across line breaks,
/// and collapses whitespace runs into single spaces with blank lines
/// kept as paragraph breaks.
pub fn sanitize_page_text(raw: &str) -> String {
    let normalized: String = raw.nfkc().collect();
    let rejoined = BROKEN_WORD.replace_all(&normalized, "$head$tail");

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();

    for line in rejoined.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
            continue;
        }
        if !current.is_empty() {
            current.push(' ');
        }
        let mut last_was_space = false;
        for ch in trimmed.chars() {
            if ch.is_whitespace() {
                if !last_was_space {
                    current.push(' ');
                    last_was_space = true;
                }
            } else {
                current.push(ch);
                last_was_space = false;
            }
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs.join("\n\n")
}
