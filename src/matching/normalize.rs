//! Artist name canonicalization.
//!
//! Steps run in a fixed order; later steps rely on the cleanup done by the
//! earlier ones (e.g. the comma swap must happen before punctuation is
//! stripped, diacritics go only after non-letters are gone).

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    // `[...]` may be empty, `(...)` needs at least one character. No nesting.
    static ref BRACKETED: Regex = Regex::new(r"\[[^\]]*\]|\([^)]+\)").unwrap();
    // Letter and mark general categories only; symbols and letter-like numerals go.
    static ref NOT_NAME_CHAR: Regex = Regex::new(r"[^\p{L}\p{M}0-9\s]").unwrap();
}

/// Canonicalize a raw artist credit into a comparable form.
///
/// Total: never fails, empty input gives an empty string. The result is
/// lowercase, single-spaced, with no punctuation, digits or diacritics.
///
/// ```
/// use cratedigger_server::matching::normalize_artist_name;
///
/// assert_eq!(normalize_artist_name("Lamar, Kendrick"), "kendrick lamar");
/// assert_eq!(normalize_artist_name("The Marías"), "the marias");
/// ```
pub fn normalize_artist_name(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }

    let lowered = raw.to_lowercase();
    let unbracketed = BRACKETED.replace_all(&lowered, " ");
    let swapped = swap_comma_parts(&unbracketed);

    let letters_only = NOT_NAME_CHAR.replace_all(&swapped, " ");

    let without_marks: String = letters_only.nfd().filter(|c| !is_combining_mark(*c)).collect();

    without_marks
        .split_whitespace()
        .filter(|token| !token.chars().any(|c| c.is_ascii_digit()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// "Last, First" becomes "First Last" when the part after the first comma is
/// a single word. Otherwise the comma just separates co-equal parts and the
/// order is kept.
///
/// Everything after the first comma is one part: "Davis, Miles, Quintet" keeps
/// "quintet" and, with a two-word tail, its order. Splitting on every comma and
/// keeping only the first two parts would silently drop credits.
fn swap_comma_parts(name: &str) -> String {
    let Some((first, second)) = name.split_once(',') else {
        return name.to_string();
    };
    let (first, second) = (first.trim(), second.trim());
    if first.is_empty() || second.is_empty() {
        return name.to_string();
    }

    if second.split_whitespace().count() == 1 {
        format!("{} {}", second, first)
    } else {
        format!("{} {}", first, second)
    }
}
