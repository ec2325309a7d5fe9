//! Term matching and relevance scoring
//!
//! Comparison happens on folded text: NFD-decomposed, combining marks
//! removed, lowercased. "Café" and "cafe" fold to the same string.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use super::entity::SearchableItem;

pub const SCORE_EXACT_TITLE: f64 = 1.0;
pub const SCORE_TITLE_PREFIX: f64 = 0.9;
pub const SCORE_TITLE_WORD_PREFIX: f64 = 0.75;
pub const SCORE_TITLE_CONTAINS: f64 = 0.6;
pub const SCORE_SUBTITLE_PREFIX: f64 = 0.45;
pub const SCORE_SUBTITLE_CONTAINS: f64 = 0.4;

/// Fold text for case- and accent-insensitive comparison
pub fn fold(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// A search term folded once and matched against many items
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldedTerm(String);

impl FoldedTerm {
    pub fn new(term: &str) -> Self {
        Self(fold(term.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Default scorer: substring match over title and subtitle
///
/// Returns `None` when neither field contains the term.
pub fn score(item: &SearchableItem, term: &FoldedTerm) -> Option<f64> {
    let needle = term.as_str();
    if needle.is_empty() {
        return None;
    }

    let title = fold(&item.title);
    if title == needle {
        return Some(SCORE_EXACT_TITLE);
    }
    if title.starts_with(needle) {
        return Some(SCORE_TITLE_PREFIX);
    }
    if title
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| !word.is_empty() && word.starts_with(needle))
    {
        return Some(SCORE_TITLE_WORD_PREFIX);
    }
    if title.contains(needle) {
        return Some(SCORE_TITLE_CONTAINS);
    }

    let subtitle = fold(item.subtitle.as_deref()?);
    if subtitle.starts_with(needle) {
        Some(SCORE_SUBTITLE_PREFIX)
    } else if subtitle.contains(needle) {
        Some(SCORE_SUBTITLE_CONTAINS)
    } else {
        None
    }
}
