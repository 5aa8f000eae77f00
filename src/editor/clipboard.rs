//! Plain-text exports of the selected items.

use super::Editor;
use crate::item::{
    EditItem,
    ItemId,
};

impl Editor {
    /// Source strings, one per line. Empty sources are skipped.
    #[must_use]
    pub fn source_text(&self, ids: Option<&[ItemId]>) -> String {
        self.lines(ids, |item| (!item.source_string.is_empty()).then(|| item.source_string.clone()))
    }

    /// Translations, one per line. Untranslated items are skipped.
    #[must_use]
    pub fn translation_text(&self, ids: Option<&[ItemId]>) -> String {
        self.lines(ids, |item| item.translation.clone())
    }

    /// `source = translation` pairs, one per line.
    #[must_use]
    pub fn source_and_translation_text(&self, ids: Option<&[ItemId]>) -> String {
        self.lines(ids, |item| {
            item.translation.as_ref().map(|translation| format!("{} = {translation}", item.source_string))
        })
    }

    fn lines<F>(&self, ids: Option<&[ItemId]>, line: F) -> String
    where
        F: Fn(&EditItem) -> Option<String>,
    {
        self.items_with(&self.targets(ids)).into_iter().filter_map(line).collect::<Vec<_>>().join("\n")
    }
}
