//! Edits applied to the tree.
//!
//! Every operation tolerates ids that no longer resolve; they are skipped.
//! Operations taking `Option<&[ItemId]>` fall back to the selection on `None`.

use super::Editor;
use crate::item::ItemId;

impl Editor {
    /// Sets the translation of one leaf.
    ///
    /// Unchanged text is a no-op, and so is empty text on an item that has no
    /// translation yet. Empty text otherwise clears the translation. A
    /// non-empty update also stores `reverse` when given and lifts the
    /// "translate later" mark of the item's root.
    pub fn update_translation(&mut self, id: &ItemId, text: &str, reverse: Option<&str>) -> bool {
        let Some(item) = self.item_mut(id) else {
            return false;
        };
        if item.translation.as_deref() == Some(text) || (text.is_empty() && item.translation.is_none())
        {
            return false;
        }

        item.translation = (!text.is_empty()).then(|| text.to_string());
        item.is_modified = true;
        item.needs_review = false;
        if !text.is_empty()
            && let Some(reverse) = reverse
        {
            item.reverse_translation = Some(reverse.to_string());
        }
        self.is_modified = true;

        if !text.is_empty() {
            self.apply_translate_later(&id.base(), false);
        }
        true
    }

    /// Stores a reverse translation without touching the catalog.
    pub fn set_reverse_translation(&mut self, id: &ItemId, reverse: Option<&str>) -> bool {
        let Some(item) = self.item_mut(id) else {
            return false;
        };
        let reverse = reverse.map(str::to_string);
        if item.reverse_translation == reverse {
            return false;
        }
        item.reverse_translation = reverse;
        true
    }

    /// Explicit revert: drops translation and reverse translation of the
    /// subtree and clears its modified marks.
    pub fn clear_translation(&mut self, ids: Option<&[ItemId]>) {
        let mut changed = false;
        for id in self.targets(ids) {
            let Some(item) = self.item_mut(&id) else {
                continue;
            };
            item.walk_mut(|node| {
                changed |= node.translation.take().is_some();
                node.reverse_translation = None;
                node.is_modified = false;
            });
        }
        if changed {
            self.is_modified = true;
        }
    }

    /// Sets the review flag of roots and their descendants.
    pub fn set_needs_review(&mut self, ids: Option<&[ItemId]>, value: bool) {
        let mut changed = false;
        for id in self.roots_of(ids) {
            if let Some(root) = self.item_mut(&id) {
                root.walk_mut(|node| {
                    changed |= node.needs_review != value;
                    node.needs_review = value;
                });
            }
        }
        if changed {
            self.is_modified = true;
        }
    }

    /// Clears the review flag.
    pub fn mark_reviewed(&mut self, ids: Option<&[ItemId]>) {
        self.set_needs_review(ids, false);
    }

    /// Sets `shouldTranslate` on the entry behind each root.
    ///
    /// The flag belongs to the entry, so roots of every open language for the
    /// same key change together.
    pub fn set_should_translate(&mut self, ids: Option<&[ItemId]>, value: bool) {
        let mut changed = false;
        for id in self.roots_of(ids) {
            for sibling in self.language_siblings(&id) {
                if let Some(root) = self.item_mut(&sibling) {
                    root.walk_mut(|node| {
                        changed |= node.should_translate != value;
                        node.should_translate = value;
                    });
                }
            }
        }
        if changed {
            self.is_modified = true;
        }
    }

    /// Marks roots to translate later. Setting the mark on a root that
    /// already has a translation does nothing.
    pub fn set_translate_later(&mut self, ids: Option<&[ItemId]>, value: bool) {
        for id in self.roots_of(ids) {
            self.apply_translate_later(&id, value);
        }
    }

    /// Marks roots as needing work, optionally in every open language.
    pub fn set_needs_work(&mut self, ids: Option<&[ItemId]>, value: bool, all_languages: bool) {
        for id in self.roots_of(ids) {
            if all_languages {
                for sibling in self.language_siblings(&id) {
                    self.apply_needs_work(&sibling, value);
                }
            } else {
                self.apply_needs_work(&id, value);
            }
        }
    }

    /// Removes every "needs work" mark in the current language, or in all
    /// languages.
    pub fn clear_needs_work(&mut self, all_languages: bool) {
        let marked: Vec<ItemId> = self
            .forest
            .iter()
            .filter(|root| all_languages || root.language == self.current_language)
            .filter(|root| root.needs_work)
            .map(|root| root.id.clone())
            .collect();

        for id in marked {
            self.apply_needs_work(&id, false);
        }
    }

    /// Copies the source string into each leaf below the given items.
    pub fn copy_from_source(&mut self, ids: Option<&[ItemId]>) {
        let leaves: Vec<(ItemId, String)> = self
            .target_leaves(ids)
            .into_iter()
            .map(|leaf| (leaf.id.clone(), leaf.source_string.clone()))
            .collect();

        for (id, source) in leaves {
            self.update_translation(&id, &source, None);
        }
    }

    /// Clears every per-item modified mark, e.g. after a save.
    pub fn clear_modified_marks(&mut self) {
        for root in &mut self.forest {
            root.walk_mut(|node| node.is_modified = false);
        }
    }

    /// Root ids among the targets; sub-item ids are ignored.
    fn roots_of(&self, ids: Option<&[ItemId]>) -> Vec<ItemId> {
        self.targets(ids)
            .into_iter()
            .filter(|id| {
                let is_root = id.is_root();
                if !is_root {
                    tracing::debug!(%id, "Ignoring sub-item for a root-only operation");
                }
                is_root
            })
            .collect()
    }

    /// `id` in every open language, including its own.
    fn language_siblings(&self, id: &ItemId) -> Vec<ItemId> {
        self.languages.iter().map(|&language| id.with_language(language)).collect()
    }

    fn apply_translate_later(&mut self, root_id: &ItemId, value: bool) -> bool {
        let Some(root) = self.item_mut(root_id) else {
            return false;
        };
        if value && root.translation.is_some() {
            tracing::debug!(id = %root_id, "Already translated, not marking translate later");
            return false;
        }
        root.walk_mut(|node| node.translate_later = value);
        if self.overlay.set_translate_later(root_id, value) {
            self.overlay_dirty = true;
        }
        true
    }

    fn apply_needs_work(&mut self, root_id: &ItemId, value: bool) -> bool {
        let Some(root) = self.item_mut(root_id) else {
            return false;
        };
        root.walk_mut(|node| node.needs_work = value);
        if self.overlay.set_needs_work(root_id, value) {
            self.overlay_dirty = true;
        }
        true
    }
}
