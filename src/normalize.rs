//! Canonical text keys for duplicate detection and loose matching.
//!
//! Store names, addresses, and zones arrive as free text typed by staff.
//! `normalize` maps superficially different spellings ("Al-Barsha  Branch",
//! "al barsha branch") onto one comparable key so the persistence layer can
//! enforce uniqueness and searches can match loosely.

use std::sync::LazyLock;

use regex::Regex;

/// English number words replaced by digits. Whole words only; "ninety" and
/// "lone" are left alone.
const NUMBER_WORDS: [(&str, &str); 10] = [
    ("zero", "0"),
    ("one", "1"),
    ("two", "2"),
    ("three", "3"),
    ("four", "4"),
    ("five", "5"),
    ("six", "6"),
    ("seven", "7"),
    ("eight", "8"),
    ("nine", "9"),
];

static NUMBER_WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(zero|one|two|three|four|five|six|seven|eight|nine)\b")
        .expect("number word pattern")
});

static NON_ALNUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s]").expect("non-alphanumeric pattern"));

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Normalizes free text into a canonical comparable key.
///
/// Lowercases, substitutes whole-word "zero".."nine" with digits, turns
/// everything outside `[a-z0-9]` and whitespace into a space, and collapses
/// whitespace runs. Punctuation becoming a space (rather than vanishing)
/// keeps "al-barsha" and "al barsha" on the same key. The result is
/// deterministic and idempotent. Non-ASCII letters are swallowed along with
/// punctuation, so keys stay within a fixed ASCII alphabet.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();

    let substituted = NUMBER_WORD_RE.replace_all(&lowered, |caps: &regex::Captures<'_>| {
        let word = &caps[0];
        NUMBER_WORDS
            .iter()
            .find(|(name, _)| *name == word)
            .map(|(_, digit)| *digit)
            .unwrap_or(word)
            .to_string()
    });

    let stripped = NON_ALNUM_RE.replace_all(&substituted, " ");
    WHITESPACE_RE.replace_all(&stripped, " ").trim().to_string()
}

/// Normalizes an optional field, passing `None` through untouched.
///
/// Optional record fields (category, zone) stay absent rather than becoming
/// an empty key.
pub fn normalize_opt(text: Option<&str>) -> Option<String> {
    text.map(normalize)
}
