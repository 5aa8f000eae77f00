//! The in-memory editing state of one open catalog.
mod clipboard;
mod mutation;
mod session;

use std::collections::BTreeSet;

pub use session::{
    Session,
    SessionError,
};

use crate::document::{
    Document,
    Language,
};
use crate::item::{
    self,
    EditItem,
    ItemId,
};
use crate::overlay::Overlay;
use crate::tree;
use crate::view::{
    self,
    ViewQuery,
};

/// Owns a catalog, its edit tree and its overlay.
///
/// All edits go through the tree; the catalog itself is only replaced when
/// the tree is folded back in with [`Editor::snapshot`] and saved.
#[derive(Debug, Clone)]
pub struct Editor {
    document: Document,
    forest: Vec<EditItem>,
    overlay: Overlay,
    languages: Vec<Language>,
    current_language: Language,
    selection: BTreeSet<ItemId>,
    is_modified: bool,
    overlay_dirty: bool,
}

impl Editor {
    /// Opens `document` with the languages it already contains.
    #[must_use]
    pub fn new(document: Document, overlay: Overlay) -> Self {
        let languages = document.languages();
        Self::with_languages(document, overlay, languages)
    }

    /// Opens `document` showing exactly `languages`, sorted by display name.
    ///
    /// The current language is the overlay's last language when it is one of
    /// `languages`, otherwise the first one.
    #[must_use]
    pub fn with_languages(document: Document, overlay: Overlay, mut languages: Vec<Language>) -> Self {
        languages.sort_by_key(|language| language.display_name());
        languages.dedup();
        if languages.is_empty() {
            languages.push(document.source_language);
        }

        let forest = tree::build(&document, &overlay, &languages);
        let current_language = if languages.contains(&overlay.last_language) {
            overlay.last_language
        } else {
            languages.first().copied().unwrap_or(document.source_language)
        };

        let mut editor = Self {
            document,
            forest,
            overlay,
            languages,
            current_language,
            selection: BTreeSet::new(),
            is_modified: false,
            overlay_dirty: false,
        };
        editor.remember_language();
        tracing::info!(
            entries = editor.document.strings.len(),
            languages = editor.languages.len(),
            current = %editor.current_language,
            "Opened catalog"
        );
        editor
    }

    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }

    /// Every root item, all languages.
    #[must_use]
    pub fn items(&self) -> &[EditItem] {
        &self.forest
    }

    #[must_use]
    pub const fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    #[must_use]
    pub fn languages(&self) -> &[Language] {
        &self.languages
    }

    #[must_use]
    pub const fn current_language(&self) -> Language {
        self.current_language
    }

    /// Whether the tree holds changes not yet saved to the catalog.
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.is_modified
    }

    /// Whether the overlay changed since it was last persisted.
    #[must_use]
    pub const fn overlay_dirty(&self) -> bool {
        self.overlay_dirty
    }

    pub fn mark_overlay_saved(&mut self) {
        self.overlay_dirty = false;
    }

    /// Switches the active language. Unknown languages are ignored.
    pub fn set_current_language(&mut self, language: Language) -> bool {
        if !self.languages.contains(&language) {
            tracing::debug!(%language, "Language not open in this catalog");
            return false;
        }
        self.current_language = language;
        self.remember_language();
        true
    }

    fn remember_language(&mut self) {
        if self.overlay.last_language != self.current_language {
            self.overlay.last_language = self.current_language;
            self.overlay_dirty = true;
        }
    }

    /// Adds an untranslated column for `language`. Returns `false` if it is
    /// already open.
    pub fn add_language(&mut self, language: Language) -> bool {
        if self.languages.contains(&language) {
            return false;
        }
        self.forest.extend(tree::build(&self.document, &self.overlay, &[language]));
        self.languages.push(language);
        self.languages.sort_by_key(|language| language.display_name());
        tracing::debug!(%language, "Added language");
        true
    }

    #[must_use]
    pub const fn selection(&self) -> &BTreeSet<ItemId> {
        &self.selection
    }

    pub fn select<I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = ItemId>,
    {
        self.selection = ids.into_iter().collect();
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Explicit ids, or the selection when none are given.
    fn targets(&self, ids: Option<&[ItemId]>) -> Vec<ItemId> {
        ids.map_or_else(|| self.selection.iter().cloned().collect(), <[ItemId]>::to_vec)
    }

    #[must_use]
    pub fn item(&self, id: &ItemId) -> Option<&EditItem> {
        item::find(&self.forest, id)
    }

    /// Items for the ids that resolve, in the given order.
    #[must_use]
    pub fn items_with(&self, ids: &[ItemId]) -> Vec<&EditItem> {
        ids.iter().filter_map(|id| self.item(id)).collect()
    }

    /// Leaves below the given items, or below the selection.
    ///
    /// A leaf reached through more than one target is listed once.
    #[must_use]
    pub fn target_leaves(&self, ids: Option<&[ItemId]>) -> Vec<&EditItem> {
        let mut seen = BTreeSet::new();
        self.targets(ids)
            .iter()
            .filter_map(|id| self.item(id))
            .flat_map(EditItem::leaves)
            .filter(|leaf| seen.insert(leaf.id.clone()))
            .collect()
    }

    fn item_mut(&mut self, id: &ItemId) -> Option<&mut EditItem> {
        let found = item::find_mut(&mut self.forest, id);
        if found.is_none() {
            tracing::debug!(%id, "Skipping unknown item");
        }
        found
    }

    /// Visible roots of the current language under `query`.
    ///
    /// The query's own language is replaced by the current language.
    #[must_use]
    pub fn view(&self, query: &ViewQuery) -> Vec<&EditItem> {
        if query.language == self.current_language {
            return view::project(&self.forest, query);
        }
        let query = ViewQuery { language: self.current_language, ..query.clone() };
        view::project(&self.forest, &query)
    }

    /// The catalog with the tree's current content folded in.
    #[must_use]
    pub fn snapshot(&self) -> Document {
        tree::write(&self.document, &self.forest)
    }

    /// Records that `document` (a [`snapshot`](Self::snapshot)) was saved.
    pub fn mark_saved(&mut self, document: Document) {
        self.document = document;
        self.is_modified = false;
        self.clear_modified_marks();
    }
}
