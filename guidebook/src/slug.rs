//! Stable URL fragments for guide headings.

use unicode_normalization::UnicodeNormalization;

/// Prefix added to slugs that would otherwise start with a digit.
pub const DIGIT_PREFIX: &str = "sec-";

/// Derive the URL slug of a heading.
///
/// Lowercases, decomposes (NFD) and drops combining diacritics, collapses
/// every run of characters outside `[a-z0-9]` into one hyphen, and trims
/// hyphens from both ends. A slug starting with a digit gets [`DIGIT_PREFIX`].
///
/// ```
/// use guidebook::slug::slugify;
///
/// assert_eq!(slugify("Numéro d'affaire"), "numero-d-affaire");
/// assert_eq!(slugify("2. Recherche"), "sec-2-recherche");
/// assert_eq!(slugify(""), "");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for ch in text.to_lowercase().nfd() {
        if is_combining_diacritic(ch) {
            continue;
        }
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch);
        } else {
            pending_hyphen = true;
        }
    }

    if slug.starts_with(|c: char| c.is_ascii_digit()) {
        slug.insert_str(0, DIGIT_PREFIX);
    }
    slug
}

/// Combining Diacritical Marks block, U+0300–U+036F.
fn is_combining_diacritic(ch: char) -> bool {
    ('\u{0300}'..='\u{036F}').contains(&ch)
}
