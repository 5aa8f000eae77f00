//! Catalog to edit tree.

use crate::document::{
    DeviceType,
    DeviceVariation,
    Document,
    Entry,
    Language,
    Localization,
    PluralType,
    PluralVariation,
    StringUnit,
    StringUnitState,
};
use crate::item::{
    EditItem,
    ItemId,
};
use crate::overlay::Overlay;

/// Flags shared by every node of one root's subtree.
#[derive(Debug, Clone, Copy)]
struct Inherited {
    is_stale: bool,
    should_translate: bool,
    translate_later: bool,
    needs_work: bool,
}

impl Inherited {
    fn apply(self, item: &mut EditItem) {
        item.is_stale = self.is_stale;
        item.should_translate = self.should_translate;
        item.translate_later = self.translate_later;
        item.needs_work = self.needs_work;
    }
}

/// Read-only inputs while expanding one entry.
struct EntryContext<'a> {
    entry: &'a Entry,
    /// Localization in the document's source language, if any.
    source: Option<&'a Localization>,
    source_string: String,
    inherited: Inherited,
}

/// Builds one root item per `(entry, language)` pair, entries in key order.
///
/// Overlay flags are looked up by root id and copied onto every descendant.
/// Localizations with an unexpected shape become parents with no children.
#[must_use]
pub fn build(document: &Document, overlay: &Overlay, languages: &[Language]) -> Vec<EditItem> {
    let mut forest = Vec::with_capacity(document.strings.len() * languages.len());

    for (key, entry) in &document.strings {
        let source = entry.localizations.get(&document.source_language);
        let source_string = non_empty_unit(source).unwrap_or(key).to_string();

        for &language in languages {
            let root_id = ItemId::root(key.clone(), language);
            let context = EntryContext {
                entry,
                source,
                source_string: source_string.clone(),
                inherited: Inherited {
                    is_stale: entry.is_stale(),
                    should_translate: entry.should_translate(),
                    translate_later: overlay.is_translate_later(&root_id),
                    needs_work: overlay.is_needs_work(&root_id),
                },
            };

            let mut root = EditItem::new(root_id, key.clone(), context.source_string.clone());
            root.comment.clone_from(&entry.comment);
            context.inherited.apply(&mut root);

            match entry.localizations.get(&language) {
                None => {}
                Some(Localization::StringUnit(unit)) => fill_leaf(&mut root, unit),
                Some(Localization::Plural(variation)) => {
                    let source_plural = source.and_then(Localization::as_plural);
                    root.children = Some(plural_children(&context, &root, variation, source_plural));
                }
                Some(Localization::Device(variation)) => {
                    root.children = Some(device_children(&context, &root, variation));
                }
            }

            forest.push(root);
        }
    }

    tracing::debug!(
        entries = document.strings.len(),
        languages = languages.len(),
        items = forest.len(),
        "Built edit tree"
    );
    forest
}

fn non_empty_unit(localization: Option<&Localization>) -> Option<&str> {
    localization
        .and_then(Localization::as_string_unit)
        .map(|unit| unit.value.as_str())
        .filter(|value| !value.is_empty())
}

fn fill_leaf(item: &mut EditItem, unit: &StringUnit) {
    item.translation = Some(unit.value.clone());
    item.needs_review = unit.state == StringUnitState::NeedsReview;
}

fn child_of(context: &EntryContext<'_>, parent: &EditItem, id: ItemId, key: &str, source: &str) -> EditItem {
    let mut child = EditItem::new(id, key, source);
    child.parent_id = Some(parent.id.clone());
    context.inherited.apply(&mut child);
    child
}

fn plural_children(
    context: &EntryContext<'_>,
    parent: &EditItem,
    variation: &PluralVariation,
    source_plural: Option<&PluralVariation>,
) -> Vec<EditItem> {
    let mut children: Vec<EditItem> = variation
        .iter()
        .filter_map(|(&plural, localization)| {
            let Some(unit) = localization.as_string_unit() else {
                tracing::debug!(
                    key = %context.entry.key,
                    id = %parent.id,
                    plural = %plural,
                    "Skipping plural slot that is not a string unit"
                );
                return None;
            };

            let source = non_empty_unit(source_plural.and_then(|p| p.get(&plural)))
                .unwrap_or(&context.source_string);
            let mut child =
                child_of(context, parent, parent.id.child(plural), plural.display_name(), source);
            child.plural_type = Some(plural);
            child.device_type = parent.device_type;
            fill_leaf(&mut child, unit);
            Some(child)
        })
        .collect();

    children.sort_by_key(|child| child.plural_type.map(PluralType::sort_index));
    children
}

fn device_children(
    context: &EntryContext<'_>,
    parent: &EditItem,
    variation: &DeviceVariation,
) -> Vec<EditItem> {
    let source_device = context.source.and_then(Localization::as_device);

    let mut children: Vec<EditItem> = variation
        .iter()
        .filter_map(|(&device, localization)| {
            let source_slot = source_device.and_then(|d| d.get(&device));
            let source = non_empty_unit(source_slot).unwrap_or(&context.source_string);
            let mut child =
                child_of(context, parent, parent.id.child(device), device.display_name(), source);
            child.device_type = Some(device);

            match localization {
                Localization::StringUnit(unit) => fill_leaf(&mut child, unit),
                Localization::Plural(plural) => {
                    let source_plural = source_slot
                        .and_then(Localization::as_plural)
                        .or_else(|| context.source.and_then(Localization::as_plural));
                    child.children = Some(plural_children(context, &child, plural, source_plural));
                }
                Localization::Device(_) => {
                    tracing::debug!(
                        key = %context.entry.key,
                        device = %device,
                        "Skipping device variation nested in a device variation"
                    );
                    return None;
                }
            }
            Some(child)
        })
        .collect();

    children.sort_by_key(|child| child.device_type.map(DeviceType::sort_index));
    children
}
