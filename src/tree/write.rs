//! Edit tree back to catalog.

use std::collections::BTreeMap;

use crate::document::{
    DeviceVariation,
    Document,
    Entry,
    Localization,
    PluralVariation,
    StringUnit,
    StringUnitState,
};
use crate::item::EditItem;

/// Folds the translation content of `items` into a copy of `document`.
///
/// Only localizations and `shouldTranslate` are written; comments and
/// extraction states are carried over from `document`. Roots whose key has no
/// entry are ignored.
#[must_use]
pub fn write(document: &Document, items: &[EditItem]) -> Document {
    let mut output = document.clone();

    for item in items.iter().filter(|item| item.is_root()) {
        let Some(entry) = output.entry_mut(&item.id.key) else {
            tracing::debug!(id = %item.id, "No catalog entry for item, skipping");
            continue;
        };

        write_should_translate(entry, item.should_translate);

        let language = item.language;
        let existing = entry.localizations.get(&language);
        let updated = match &item.children {
            None => item
                .translation
                .as_deref()
                .map(|translation| string_unit(existing, translation, item.needs_review)),
            Some(children) if children.is_empty() => existing.cloned(),
            Some(children) => derive_variation(existing, children),
        };

        match updated {
            Some(localization) => {
                entry.localizations.insert(language, localization);
            }
            None => {
                entry.localizations.remove(&language);
            }
        }
    }

    output
}

fn write_should_translate(entry: &mut Entry, should_translate: bool) {
    if entry.should_translate() != should_translate {
        entry.should_translate = (!should_translate).then_some(false);
    }
}

/// Keeps an existing unit when nothing visible to the editor changed, so that
/// states the editor does not model survive a round trip.
fn string_unit(existing: Option<&Localization>, translation: &str, needs_review: bool) -> Localization {
    if let Some(Localization::StringUnit(unit)) = existing
        && unit.value == translation
        && (unit.state == StringUnitState::NeedsReview) == needs_review
    {
        return Localization::StringUnit(unit.clone());
    }

    let state = if needs_review { StringUnitState::NeedsReview } else { StringUnitState::Translated };
    Localization::StringUnit(StringUnit::new(state, translation))
}

fn derive_variation(existing: Option<&Localization>, children: &[EditItem]) -> Option<Localization> {
    if children.iter().any(|child| child.device_type.is_some() && child.plural_type.is_none()) {
        let variation = device_variation(existing.and_then(Localization::as_device), children);
        (!variation.is_empty()).then_some(Localization::Device(variation))
    } else {
        let variation = plural_variation(existing.and_then(Localization::as_plural), children);
        (!variation.is_empty()).then_some(Localization::Plural(variation))
    }
}

/// Slots of `existing` with no node in the tree. The builder skips slots it
/// cannot represent; they are written back untouched.
fn skipped_slots<K>(
    existing: Option<&BTreeMap<K, Localization>>,
    has_node: impl Fn(K) -> bool,
) -> BTreeMap<K, Localization>
where
    K: Ord + Copy,
{
    existing
        .into_iter()
        .flatten()
        .filter(|&(&slot, _)| !has_node(slot))
        .map(|(&slot, localization)| (slot, localization.clone()))
        .collect()
}

fn plural_variation(existing: Option<&PluralVariation>, children: &[EditItem]) -> PluralVariation {
    let mut variation =
        skipped_slots(existing, |plural| children.iter().any(|c| c.plural_type == Some(plural)));
    variation.extend(children.iter().filter_map(|child| {
        let plural = child.plural_type?;
        let translation = child.translation.as_deref()?;
        let previous = existing.and_then(|variation| variation.get(&plural));
        Some((plural, string_unit(previous, translation, child.needs_review)))
    }));
    variation
}

fn device_variation(existing: Option<&DeviceVariation>, children: &[EditItem]) -> DeviceVariation {
    let mut variation =
        skipped_slots(existing, |device| children.iter().any(|c| c.device_type == Some(device)));
    variation.extend(children.iter().filter_map(|child| {
        let device = child.device_type?;
        let previous = existing.and_then(|variation| variation.get(&device));
        let localization = match &child.children {
            None => string_unit(previous, child.translation.as_deref()?, child.needs_review),
            Some(plurals) if plurals.is_empty() => previous?.clone(),
            Some(plurals) => {
                let slots = plural_variation(previous.and_then(Localization::as_plural), plurals);
                if slots.is_empty() {
                    return None;
                }
                Localization::Plural(slots)
            }
        };
        Some((device, localization))
    }));
    variation
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::document::{
        DeviceType,
        Language,
        PluralType,
    };
    use crate::overlay::Overlay;
    use crate::tree::build;

    fn document(value: serde_json::Value) -> Document {
        serde_json::from_value(value).unwrap()
    }

    fn catalog() -> Document {
        document(json!({
            "sourceLanguage": "en",
            "version": "1.0",
            "strings": {
                "Hello": {
                    "comment": "Greeting",
                    "localizations": {
                        "en": {"stringUnit": {"state": "translated", "value": "Hello"}},
                        "fr": {"stringUnit": {"state": "new", "value": "Bonjour"}}
                    }
                },
                "%d files": {"localizations": {
                    "en": {"variations": {"plural": {
                        "one": {"stringUnit": {"state": "translated", "value": "%d file"}},
                        "other": {"stringUnit": {"state": "translated", "value": "%d files"}}
                    }}},
                    "fr": {"variations": {"plural": {
                        "one": {"stringUnit": {"state": "needs_review", "value": "%d fichier"}},
                        "other": {"stringUnit": {"state": "translated", "value": "%d fichiers"}}
                    }}}
                }},
                "Tap": {"shouldTranslate": false, "localizations": {"fr": {"variations": {"device": {
                    "mac": {"stringUnit": {"state": "translated", "value": "Cliquer"}},
                    "iphone": {"variations": {"plural": {
                        "other": {"stringUnit": {"state": "translated", "value": "Toucher"}}
                    }}}
                }}}}},
                "Unused": {"extractionState": "stale"}
            }
        }))
    }

    #[test]
    fn test_round_trip_is_identity() {
        let doc = catalog();
        let forest = build(&doc, &Overlay::default(), &[Language::English, Language::French]);

        assert_eq!(write(&doc, &forest), doc);
    }

    #[googletest::test]
    fn test_clearing_translation_removes_localization() {
        let doc = catalog();
        let mut forest = build(&doc, &Overlay::default(), &[Language::French]);
        let hello = forest.iter_mut().find(|i| i.id.key == "Hello").unwrap();
        hello.translation = None;

        let output = write(&doc, &forest);

        expect_that!(
            output.entry("Hello").unwrap().localizations.contains_key(&Language::French),
            eq(false)
        );
        expect_that!(output.entry("Hello").unwrap().comment.as_deref(), some(eq("Greeting")));
    }

    #[googletest::test]
    fn test_changed_leaf_is_written_with_review_state() {
        let doc = catalog();
        let mut forest = build(&doc, &Overlay::default(), &[Language::French]);
        let hello = forest.iter_mut().find(|i| i.id.key == "Hello").unwrap();
        hello.translation = Some("Salut".to_string());
        hello.needs_review = true;

        let output = write(&doc, &forest);

        expect_that!(
            output.entry("Hello").unwrap().localizations.get(&Language::French),
            some(eq(&Localization::StringUnit(StringUnit::new(
                StringUnitState::NeedsReview,
                "Salut"
            ))))
        );
    }

    /// A slot without translation is dropped, not written empty.
    #[googletest::test]
    fn test_untranslated_plural_slot_is_omitted() {
        let doc = catalog();
        let mut forest = build(&doc, &Overlay::default(), &[Language::French]);
        let files = forest.iter_mut().find(|i| i.id.key == "%d files").unwrap();
        let other = files
            .children
            .as_mut()
            .unwrap()
            .iter_mut()
            .find(|c| c.plural_type == Some(PluralType::Other))
            .unwrap();
        other.translation = None;

        let output = write(&doc, &forest);
        let plural =
            output.entry("%d files").unwrap().localizations[&Language::French].as_plural().unwrap();

        expect_that!(plural.len(), eq(1));
        expect_that!(plural.contains_key(&PluralType::Other), eq(false));
    }

    #[googletest::test]
    fn test_fully_untranslated_variation_is_removed() {
        let doc = catalog();
        let mut forest = build(&doc, &Overlay::default(), &[Language::French]);
        let tap = forest.iter_mut().find(|i| i.id.key == "Tap").unwrap();
        tap.walk_mut(|item| item.translation = None);

        let output = write(&doc, &forest);

        expect_that!(output.entry("Tap").unwrap().localizations.is_empty(), eq(true));
    }

    #[googletest::test]
    fn test_should_translate_written_only_when_changed() {
        let doc = catalog();
        let mut forest = build(&doc, &Overlay::default(), &[Language::French]);
        for root in forest.iter_mut() {
            root.should_translate = root.id.key != "Hello";
        }

        let output = write(&doc, &forest);

        expect_that!(output.entry("Hello").unwrap().should_translate, some(eq(false)));
        expect_that!(output.entry("Tap").unwrap().should_translate, none());
        expect_that!(output.entry("Unused").unwrap().should_translate, none());
    }

    /// A plural slot inside a device slot that the tree cannot show survives
    /// an edit of its sibling.
    #[googletest::test]
    fn test_skipped_slot_under_device_is_kept() {
        let doc = document(json!({
            "sourceLanguage": "en",
            "version": "1.0",
            "strings": {"Tap": {"localizations": {"fr": {"variations": {"device": {
                "iphone": {"variations": {"plural": {
                    "one": {"stringUnit": {"state": "translated", "value": "Touche"}},
                    "other": {"variations": {"plural": {
                        "one": {"stringUnit": {"state": "translated", "value": "x"}}
                    }}}
                }}}
            }}}}}}
        }));
        let mut forest = build(&doc, &Overlay::default(), &[Language::French]);
        forest[0].walk_mut(|item| {
            if item.plural_type == Some(PluralType::One) {
                item.translation = Some("Touchez".to_string());
            }
        });

        let output = write(&doc, &forest);
        let device = output.entry("Tap").unwrap().localizations[&Language::French].as_device().unwrap();
        let plural = device[&DeviceType::Iphone].as_plural().unwrap();

        expect_that!(
            plural.get(&PluralType::One),
            some(eq(&Localization::StringUnit(StringUnit::translated("Touchez"))))
        );
        expect_that!(plural.get(&PluralType::Other).and_then(Localization::as_plural), some(anything()));
    }
}
