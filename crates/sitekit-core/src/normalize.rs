//! Text normalization for search comparisons.
//!
//! Every comparison the engine makes goes through [`normalize`], so
//! matching is case-insensitive and diacritic-insensitive:
//!
//! - "São Paulo" → "sao paulo"
//! - "  Café  " → "cafe"
//! - "NAÏVE" → "naive"

use unicode_normalization::UnicodeNormalization;

/// Nonspacing marks from the combining diacritical blocks.
///
/// Spacing marks such as Devanagari vowel signs stay: they change the
/// letter rather than decorate it.
fn is_diacritic(c: char) -> bool {
    matches!(c,
        '\u{0300}'..='\u{036F}' |  // Combining Diacritical Marks
        '\u{1AB0}'..='\u{1AFF}' |  // Combining Diacritical Marks Extended
        '\u{1DC0}'..='\u{1DFF}' |  // Combining Diacritical Marks Supplement
        '\u{20D0}'..='\u{20FF}' |  // Combining Diacritical Marks for Symbols
        '\u{FE20}'..='\u{FE2F}'    // Combining Half Marks
    )
}

/// Normalize text for matching.
///
/// 1. Lowercase
/// 2. NFD normalize (split base characters from combining marks)
/// 3. Drop combining diacritical marks
/// 4. Trim leading and trailing whitespace
///
/// Lowercasing first keeps the result idempotent: some lowercase mappings
/// (`İ` → `i̇`) emit a combining mark of their own.
///
/// Interior whitespace is kept as-is; [`tokenize`] handles splitting.
pub fn normalize(value: &str) -> String {
    let stripped: String = value
        .to_lowercase()
        .nfd()
        .filter(|c| !is_diacritic(*c))
        .collect();
    stripped.trim().to_string()
}

/// Split a search string into normalized, non-empty tokens.
///
/// Empty or whitespace-only input yields no tokens.
pub fn tokenize(query: &str) -> Vec<String> {
    normalize(query)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
