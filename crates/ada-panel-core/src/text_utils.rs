//! Text cleanup for speech synthesis.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static WHITESPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static UNSPEAKABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s.,!?;:]").expect("valid unspeakable regex"));

/// Reduce page text to something a synthesizer can read aloud.
///
/// Keeps word characters, whitespace and basic punctuation, collapses runs
/// of whitespace, and truncates to at most `max_chars` characters.
pub fn speakable_text(raw: &str, max_chars: usize) -> String {
    let normalized: String = raw.nfkc().collect();
    let collapsed = WHITESPACE_RE.replace_all(&normalized, " ");
    let stripped = UNSPEAKABLE_RE.replace_all(&collapsed, "");
    let recollapsed = WHITESPACE_RE.replace_all(&stripped, " ");
    truncate_chars(recollapsed.trim(), max_chars)
        .trim_end()
        .to_string()
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
