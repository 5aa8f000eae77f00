//! Per-item filter predicates and global visibility toggles.

use serde::{
    Deserialize,
    Serialize,
};

use super::quality::{
    TranslationStatus,
    classify,
};
use crate::item::EditItem;

/// Items hidden regardless of the active filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Visibility {
    pub translate_later_hidden: bool,
    pub stale_hidden: bool,
    pub dont_translate_hidden: bool,
}

impl Visibility {
    #[must_use]
    pub const fn hides(&self, item: &EditItem) -> bool {
        (self.dont_translate_hidden && !item.should_translate)
            || (self.translate_later_hidden && item.translate_later)
            || (self.stale_hidden && item.is_stale)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TranslatedFilter {
    #[default]
    Any,
    /// Every leaf has a translation.
    Translated,
    /// No leaf has a translation.
    Untranslated,
}

/// Round-trip quality filter, evaluated on the root only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QualityFilter {
    #[default]
    Any,
    /// No reverse translation yet.
    Missing,
    Different,
    Similar,
    Exact,
}

/// Independently toggled criteria; every active one must hold.
///
/// Criteria on leaf properties hold for a root when the root is a matching
/// leaf or when any leaf below it matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Filter {
    pub new: bool,
    pub translated: TranslatedFilter,
    pub translation_quality: QualityFilter,
    pub modified: bool,
    pub needs_review: bool,
    pub needs_work: bool,
    pub translate_later: bool,
    pub source_equals_translation: bool,
}

impl Filter {
    /// Whether any criterion is active.
    #[must_use]
    pub fn has_on(&self) -> bool {
        *self != Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    #[must_use]
    pub fn matches(&self, root: &EditItem) -> bool {
        if self.new && !root.contains(|item| item.translation.is_none()) {
            return false;
        }

        match self.translated {
            TranslatedFilter::Any => {}
            TranslatedFilter::Translated => {
                if root.contains(|item| item.translation.is_none()) {
                    return false;
                }
            }
            TranslatedFilter::Untranslated => {
                if root.contains(|item| item.translation.is_some()) {
                    return false;
                }
            }
        }

        if !self.matches_quality(root) {
            return false;
        }

        let criteria: [(bool, fn(&EditItem) -> bool); 5] = [
            (self.modified, |item| item.is_modified),
            (self.needs_review, |item| item.needs_review),
            (self.needs_work, |item| item.needs_work),
            (self.translate_later, |item| item.translate_later),
            (self.source_equals_translation, |item| {
                item.translation.as_deref() == Some(item.source_string.as_str())
            }),
        ];

        criteria.into_iter().all(|(active, predicate)| !active || root.contains(predicate))
    }

    fn matches_quality(&self, root: &EditItem) -> bool {
        let status = || {
            classify(
                &root.source_string,
                root.translation.as_deref(),
                root.reverse_translation.as_deref(),
            )
        };

        match self.translation_quality {
            QualityFilter::Any => true,
            QualityFilter::Missing => root.reverse_translation.is_none(),
            QualityFilter::Different => status() == TranslationStatus::Different,
            QualityFilter::Similar => status() == TranslationStatus::Similar,
            QualityFilter::Exact => status() == TranslationStatus::Exact,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::document::{
        Language,
        PluralType,
    };
    use crate::item::ItemId;

    fn leaf(translation: Option<&str>) -> EditItem {
        let mut item = EditItem::new(ItemId::root("Hello", Language::French), "Hello", "Hello");
        item.translation = translation.map(str::to_string);
        item
    }

    fn plural(translations: &[(PluralType, Option<&str>)]) -> EditItem {
        let root_id = ItemId::root("%d apples", Language::French);
        let mut root = EditItem::new(root_id.clone(), "%d apples", "%d apples");
        root.children = Some(
            translations
                .iter()
                .map(|&(plural, translation)| {
                    let mut child =
                        EditItem::new(root_id.child(plural), plural.display_name(), "%d apples");
                    child.parent_id = Some(root_id.clone());
                    child.plural_type = Some(plural);
                    child.translation = translation.map(str::to_string);
                    child
                })
                .collect(),
        );
        root
    }

    /// filter.new: one untranslated plural slot is enough
    #[googletest::test]
    fn test_new_is_existential_over_children() {
        let root = plural(&[
            (PluralType::One, Some("%d pomme")),
            (PluralType::Many, None),
            (PluralType::Other, Some("%d pommes")),
        ]);
        let filter = Filter { new: true, ..Filter::default() };

        expect_that!(filter.matches(&root), eq(true));
    }

    #[rstest]
    #[case::all_translated(&[(PluralType::One, Some("a")), (PluralType::Other, Some("b"))], TranslatedFilter::Translated, true)]
    #[case::partly_translated(&[(PluralType::One, Some("a")), (PluralType::Other, None)], TranslatedFilter::Translated, false)]
    #[case::partly_untranslated(&[(PluralType::One, Some("a")), (PluralType::Other, None)], TranslatedFilter::Untranslated, false)]
    #[case::none_translated(&[(PluralType::One, None), (PluralType::Other, None)], TranslatedFilter::Untranslated, true)]
    fn test_translated_filter(
        #[case] translations: &[(PluralType, Option<&str>)],
        #[case] translated: TranslatedFilter,
        #[case] expected: bool,
    ) {
        let filter = Filter { translated, ..Filter::default() };

        assert_eq!(filter.matches(&plural(translations)), expected);
    }

    #[googletest::test]
    fn test_all_active_criteria_must_hold() {
        let mut item = leaf(Some("Hello"));
        item.is_modified = true;
        let filter =
            Filter { modified: true, source_equals_translation: true, ..Filter::default() };

        expect_that!(filter.matches(&item), eq(true));

        item.translation = Some("Bonjour".to_string());
        expect_that!(filter.matches(&item), eq(false));
    }

    /// filter.modified: a modified child selects its root
    #[googletest::test]
    fn test_modified_child_selects_parent() {
        let mut root = plural(&[(PluralType::One, Some("a")), (PluralType::Other, Some("b"))]);
        let filter = Filter { modified: true, ..Filter::default() };
        expect_that!(filter.matches(&root), eq(false));

        if let Some(children) = root.children.as_mut()
            && let Some(last) = children.last_mut()
        {
            last.is_modified = true;
        }
        expect_that!(filter.matches(&root), eq(true));
    }

    #[rstest]
    #[case::missing(None, QualityFilter::Missing, true)]
    #[case::exact(Some("Hello"), QualityFilter::Exact, true)]
    #[case::similar(Some("hello"), QualityFilter::Similar, true)]
    #[case::different(Some("Hi"), QualityFilter::Different, true)]
    #[case::exact_is_not_similar(Some("Hello"), QualityFilter::Similar, false)]
    fn test_quality_filter(
        #[case] reverse: Option<&str>,
        #[case] quality: QualityFilter,
        #[case] expected: bool,
    ) {
        let mut item = leaf(Some("Bonjour"));
        item.reverse_translation = reverse.map(str::to_string);
        let filter = Filter { translation_quality: quality, ..Filter::default() };

        assert_eq!(filter.matches(&item), expected);
    }

    #[googletest::test]
    fn test_has_on_and_reset() {
        let mut filter = Filter::default();
        expect_that!(filter.has_on(), eq(false));

        filter.translation_quality = QualityFilter::Exact;
        expect_that!(filter.has_on(), eq(true));

        filter.reset();
        expect_that!(filter, eq(Filter::default()));
    }

    #[googletest::test]
    fn test_visibility_hides() {
        let mut item = leaf(None);
        item.is_stale = true;

        expect_that!(Visibility::default().hides(&item), eq(false));
        expect_that!(Visibility { stale_hidden: true, ..Visibility::default() }.hides(&item), eq(true));
    }
}
