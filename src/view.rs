//! Filtered, searched and sorted projection of the edit tree for one language.
mod filter;
mod quality;
mod sort;

pub use filter::{
    Filter,
    QualityFilter,
    TranslatedFilter,
    Visibility,
};
pub use quality::{
    TranslationStatus,
    classify,
};
pub use sort::{
    SortDescriptor,
    SortKey,
    SortOrder,
    SortSpec,
};

use crate::document::Language;
use crate::item::EditItem;

/// Everything that determines which roots are visible and in what order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub language: Language,
    pub visibility: Visibility,
    pub filter: Filter,
    pub search_text: String,
    pub sort: SortSpec,
}

impl ViewQuery {
    #[must_use]
    pub fn for_language(language: Language) -> Self {
        Self { language, ..Self::default() }
    }
}

/// Roots of `forest` visible under `query`, in display order.
///
/// Children stay attached to their roots and are not filtered on their own.
#[must_use]
pub fn project<'a>(forest: &'a [EditItem], query: &ViewQuery) -> Vec<&'a EditItem> {
    let needle = query.search_text.to_lowercase();

    let mut items: Vec<&EditItem> = forest
        .iter()
        .filter(|root| root.is_root() && root.language == query.language)
        .filter(|root| !query.visibility.hides(root))
        .filter(|root| query.filter.matches(root))
        .filter(|root| needle.is_empty() || search_matches(root, &needle))
        .collect();

    query.sort.sort(&mut items);
    items
}

/// Case-insensitive match on the root's translation or source, or on any
/// child's translation. `needle` must already be lowercase.
fn search_matches(root: &EditItem, needle: &str) -> bool {
    let hit = |text: Option<&str>| text.is_some_and(|text| text.to_lowercase().contains(needle));

    hit(root.translation.as_deref())
        || hit(Some(root.source_string.as_str()))
        || root
            .children
            .iter()
            .flatten()
            .any(|child| hit(child.translation.as_deref()))
}
