// crates/geobucket-core/src/text.rs

//! # Normalizer
//!
//! Pure text transforms used on both sides of the matcher: at write time to
//! build index entries, at query time to normalize the search term.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};

/// Administrative tokens that carry no neighborhood information.
static STOPWORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["lagos", "nigeria", "ng", "lga", "state", "area"].into_iter().collect());

/// Whole-word abbreviation expansions.
static ABBREVIATIONS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("str", "street"),
        ("rd", "road"),
        ("ave", "avenue"),
        ("st", "street"),
    ]
    .into_iter()
    .collect()
});

/// Digraph substitutions applied by [`phonetic_code`], in order.
const DIGRAPHS: [(&str, &str); 4] = [("PH", "F"), ("CK", "K"), ("SH", "X"), ("CH", "X")];

/// Maximum length of a phonetic code.
pub const PHONETIC_CODE_LEN: usize = 10;

/// Convert a string into a folded key suitable for comparison.
///
/// This performs:
/// 1\) Transliterate Unicode → ASCII (e.g. `Ìkòyí` -> `Ikoyi`)
/// 2\) Normalize to lowercase
///
/// # Examples
///
/// ```rust
/// use geobucket_core::text::fold_key;
///
/// assert_eq!(fold_key("Ìkòyí"), "ikoyi");
/// assert_eq!(fold_key("LEKKI"), "lekki");
/// ```
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

/// Normalize a raw location name into its canonical key.
///
/// Steps:
/// - fold to lower-case ASCII ([`fold_key`])
/// - replace everything that is not alphanumeric or whitespace by a space
/// - collapse whitespace
/// - drop administrative stopwords (`lagos`, `state`, ...); if that leaves
///   nothing, keep the first two tokens instead
/// - expand whole-word abbreviations (`rd` -> `road`, `st` -> `street`, ...)
///
/// The function is total and idempotent: `normalize(normalize(x)) == normalize(x)`.
///
/// # Examples
///
/// ```rust
/// use geobucket_core::text::normalize;
///
/// assert_eq!(normalize("Sangotedo, Ajah"), "sangotedo ajah");
/// assert_eq!(normalize("sangotedo lagos"), "sangotedo");
/// assert_eq!(normalize("Lekki Phase 1, Lagos State"), "lekki phase 1");
/// assert_eq!(normalize("Lagos State"), "lagos state");
/// ```
pub fn normalize(raw: &str) -> String {
    let cleaned: String = fold_key(raw)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    let words: Vec<&str> = cleaned.split_whitespace().collect();
    let mut kept: Vec<&str> = words
        .iter()
        .copied()
        .filter(|w| !STOPWORDS.contains(w))
        .collect();
    if kept.is_empty() {
        kept = words.iter().take(2).copied().collect();
    }

    kept.into_iter()
        .map(|w| ABBREVIATIONS.get(w).copied().unwrap_or(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Overlapping 3-character substrings of `text` with whitespace removed.
///
/// Returns an empty vector when fewer than three characters remain.
///
/// ```rust
/// use geobucket_core::text::trigrams;
///
/// assert_eq!(trigrams("ajah"), vec!["aja", "jah"]);
/// assert!(trigrams("a b").is_empty());
/// ```
pub fn trigrams(text: &str) -> Vec<String> {
    let chars: Vec<char> = text
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    if chars.len() < 3 {
        return Vec::new();
    }
    chars.windows(3).map(|w| w.iter().collect()).collect()
}

fn trigram_set(text: &str) -> HashSet<String> {
    trigrams(text).into_iter().collect()
}

/// Coarse same-sound key: upper-case, keep the first character, drop vowels
/// from the rest, collapse runs of the same character, rewrite a few
/// digraphs and cut to [`PHONETIC_CODE_LEN`] characters.
///
/// This is an internal bucketing key, not Metaphone or Soundex.
///
/// ```rust
/// use geobucket_core::text::phonetic_code;
///
/// assert_eq!(phonetic_code("sangotedo"), "SNGTD");
/// assert_eq!(phonetic_code(""), "");
/// ```
pub fn phonetic_code(text: &str) -> String {
    let upper = text.to_uppercase();
    let mut chars = upper.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };

    let mut code = String::with_capacity(upper.len());
    let mut last = first;
    code.push(first);
    for c in chars.filter(|c| !matches!(c, 'A' | 'E' | 'I' | 'O' | 'U')) {
        if c != last {
            code.push(c);
            last = c;
        }
    }

    for (from, to) in DIGRAPHS {
        code = code.replace(from, to);
    }
    code.chars().take(PHONETIC_CODE_LEN).collect()
}

/// Jaccard index of the trigram sets of `a` and `b`, in `[0, 1]`.
///
/// Empty strings score 0.0. When either side is too short to produce a
/// trigram the score falls back to case-insensitive equality (1.0 or 0.0).
pub fn similarity(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let ta = trigram_set(a);
    let tb = trigram_set(b);
    if ta.is_empty() || tb.is_empty() {
        return if a.to_lowercase() == b.to_lowercase() {
            1.0
        } else {
            0.0
        };
    }
    let shared = ta.intersection(&tb).count();
    let union = ta.union(&tb).count();
    shared as f64 / union as f64
}

/// Levenshtein distance (single character insert / delete / substitute).
pub fn edit_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// `true` when the whitespace-separated words of `a` and `b` intersect.
pub fn word_overlap(a: &str, b: &str) -> bool {
    let words: HashSet<&str> = a.split_whitespace().collect();
    b.split_whitespace().any(|w| words.contains(w))
}
