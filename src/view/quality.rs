//! Round-trip translation quality.

use serde::Serialize;

/// How a reverse translation compares with the source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TranslationStatus {
    MissingTranslation,
    MissingReverse,
    Exact,
    Similar,
    Different,
}

/// Classifies a translation by translating it back and comparing with the source.
#[must_use]
pub fn classify(source: &str, translation: Option<&str>, reverse: Option<&str>) -> TranslationStatus {
    if translation.is_none() {
        return TranslationStatus::MissingTranslation;
    }
    let Some(reverse) = reverse else {
        return TranslationStatus::MissingReverse;
    };

    if reverse == source {
        TranslationStatus::Exact
    } else if reverse.to_uppercase() == source.to_uppercase() {
        TranslationStatus::Similar
    } else {
        TranslationStatus::Different
    }
}
