//! Editable item tree built from a catalog.
mod id;

use std::fmt;

pub use id::{
    ID_DIVIDER,
    ItemId,
    ItemIdError,
    VariantKey,
};
use serde::Serialize;

use crate::document::{
    DeviceType,
    Language,
    PluralType,
};

/// Derived review status of an item.
///
/// The declaration order is the default sort order: items that need the most
/// attention come first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum State {
    New,
    NeedsWork,
    NeedsReview,
    TranslateLater,
    DontTranslate,
    Stale,
    Translated,
}

impl State {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::NeedsWork => "needsWork",
            Self::NeedsReview => "needsReview",
            Self::TranslateLater => "translateLater",
            Self::DontTranslate => "dontTranslate",
            Self::Stale => "stale",
            Self::Translated => "translated",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One node of the edit tree.
///
/// A node either has `children` or is a leaf that may carry a translation.
/// Root nodes represent one `(key, language)` pair; sub-items represent
/// plural or device variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditItem {
    pub id: ItemId,
    pub parent_id: Option<ItemId>,
    /// Entry key for roots, variant display name for sub-items.
    pub key: String,
    pub source_string: String,
    pub comment: Option<String>,
    pub language: Language,
    pub translation: Option<String>,
    pub reverse_translation: Option<String>,
    pub plural_type: Option<PluralType>,
    pub device_type: Option<DeviceType>,
    pub is_stale: bool,
    pub needs_review: bool,
    pub translate_later: bool,
    pub needs_work: bool,
    pub should_translate: bool,
    pub is_modified: bool,
    pub children: Option<Vec<EditItem>>,
}

impl EditItem {
    /// Creates an untranslated leaf with default flags.
    #[must_use]
    pub fn new(id: ItemId, key: impl Into<String>, source_string: impl Into<String>) -> Self {
        let language = id.language;
        Self {
            id,
            parent_id: None,
            key: key.into(),
            source_string: source_string.into(),
            comment: None,
            language,
            translation: None,
            reverse_translation: None,
            plural_type: None,
            device_type: None,
            is_stale: false,
            needs_review: false,
            translate_later: false,
            needs_work: false,
            should_translate: true,
            is_modified: false,
            children: None,
        }
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    #[must_use]
    pub fn state(&self) -> State {
        if !self.should_translate {
            State::DontTranslate
        } else if self.translate_later {
            State::TranslateLater
        } else if self.needs_work {
            State::NeedsWork
        } else if self.is_stale {
            State::Stale
        } else if self.needs_review {
            State::NeedsReview
        } else if self.contains(|item| item.translation.is_none()) {
            State::New
        } else {
            State::Translated
        }
    }

    /// Whether this leaf, or any leaf below this parent, satisfies `predicate`.
    ///
    /// A parent whose children list is empty matches nothing.
    pub fn contains<F>(&self, predicate: F) -> bool
    where
        F: Fn(&Self) -> bool,
    {
        self.contains_by(&predicate)
    }

    fn contains_by(&self, predicate: &dyn Fn(&Self) -> bool) -> bool {
        match &self.children {
            None => predicate(self),
            Some(children) => children.iter().any(|child| child.contains_by(predicate)),
        }
    }

    /// Finds this item or a descendant by id.
    #[must_use]
    pub fn find(&self, id: &ItemId) -> Option<&Self> {
        if self.id == *id {
            return Some(self);
        }
        self.children.as_deref()?.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &ItemId) -> Option<&mut Self> {
        if self.id == *id {
            return Some(self);
        }
        self.children.as_deref_mut()?.iter_mut().find_map(|child| child.find_mut(id))
    }

    /// Applies `visit` to this item and then every descendant, depth first.
    pub fn walk_mut<F>(&mut self, mut visit: F)
    where
        F: FnMut(&mut Self),
    {
        self.walk_mut_by(&mut visit);
    }

    fn walk_mut_by(&mut self, visit: &mut dyn FnMut(&mut Self)) {
        visit(self);
        if let Some(children) = &mut self.children {
            for child in children {
                child.walk_mut_by(visit);
            }
        }
    }

    /// Leaf items of this subtree in display order.
    #[must_use]
    pub fn leaves(&self) -> Vec<&Self> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a Self>) {
        match &self.children {
            None => leaves.push(self),
            Some(children) => {
                for child in children {
                    child.collect_leaves(leaves);
                }
            }
        }
    }

    /// Ids of the leaves of this subtree.
    #[must_use]
    pub fn leaf_ids(&self) -> Vec<ItemId> {
        self.leaves().into_iter().map(|leaf| leaf.id.clone()).collect()
    }
}

/// Finds an item anywhere in a forest.
#[must_use]
pub fn find<'a>(forest: &'a [EditItem], id: &ItemId) -> Option<&'a EditItem> {
    forest.iter().find_map(|root| root.find(id))
}

pub fn find_mut<'a>(forest: &'a mut [EditItem], id: &ItemId) -> Option<&'a mut EditItem> {
    forest.iter_mut().find_map(|root| root.find_mut(id))
}
