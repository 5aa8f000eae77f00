//! An editor bound to a catalog file and its overlay store.

use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;

use super::Editor;
use crate::document::{
    self,
    DocumentError,
    Language,
};
use crate::overlay::{
    OverlayError,
    OverlayStore,
};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Overlay(#[from] OverlayError),
}

/// Open catalog file.
#[derive(Debug)]
pub struct Session {
    path: PathBuf,
    store: OverlayStore,
    editor: Editor,
}

impl Session {
    /// Reads the catalog at `path` and its overlay.
    ///
    /// # Errors
    /// Returns an error if the catalog cannot be read or parsed. A missing or
    /// unreadable overlay is not an error.
    pub fn open(path: impl Into<PathBuf>, store: OverlayStore) -> Result<Self, SessionError> {
        let path = path.into();
        let document = document::read_document(&path)?;
        let overlay = store.load(&path);
        let editor = Editor::new(document, overlay);
        Ok(Self { path, store, editor })
    }

    /// Like [`Session::open`], showing exactly `languages`.
    ///
    /// # Errors
    /// Returns an error if the catalog cannot be read or parsed.
    pub fn open_with_languages(
        path: impl Into<PathBuf>,
        store: OverlayStore,
        languages: Vec<Language>,
    ) -> Result<Self, SessionError> {
        let path = path.into();
        let document = document::read_document(&path)?;
        let overlay = store.load(&path);
        let editor = Editor::with_languages(document, overlay, languages);
        Ok(Self { path, store, editor })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub const fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    /// Writes pending catalog and overlay changes.
    ///
    /// The catalog is only rewritten when the tree has unsaved edits. Returns
    /// whether the catalog was written.
    ///
    /// # Errors
    /// Returns an error if either file cannot be written. On error the
    /// in-memory state keeps its unsaved marks.
    pub fn save(&mut self) -> Result<bool, SessionError> {
        let wrote = if self.editor.is_modified() {
            let snapshot = self.editor.snapshot();
            document::write_document(&self.path, &snapshot)?;
            self.editor.mark_saved(snapshot);
            true
        } else {
            false
        };

        self.save_overlay()?;
        Ok(wrote)
    }

    /// Persists the overlay if it changed.
    ///
    /// # Errors
    /// Returns an error if the overlay cannot be written.
    pub fn save_overlay(&mut self) -> Result<(), SessionError> {
        if self.editor.overlay_dirty() {
            self.store.save(&self.path, self.editor.overlay())?;
            self.editor.mark_overlay_saved();
        }
        Ok(())
    }

    /// Rewrites the catalog in canonical layout without changing content.
    ///
    /// # Errors
    /// Returns an error if the catalog cannot be written.
    pub fn normalize(&self) -> Result<(), SessionError> {
        document::write_document(&self.path, self.editor.document())?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use tempfile::TempDir;

    use super::*;
    use crate::document::StringUnitState;
    use crate::item::ItemId;
    use crate::test_utils::{
        hello_document,
        root,
    };

    fn setup() -> (TempDir, PathBuf, OverlayStore) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("Localizable.xcstrings");
        document::write_document(&path, &hello_document()).unwrap();
        let store = OverlayStore::new(temp_dir.path().join("store"));
        (temp_dir, path, store)
    }

    #[googletest::test]
    fn test_translate_and_save() {
        let (_temp_dir, path, store) = setup();
        let mut session =
            Session::open_with_languages(&path, store, vec![Language::English, Language::French])
                .unwrap();

        session.editor_mut().update_translation(&root("Hello", Language::French), "Bonjour", None);
        expect_that!(session.save().unwrap(), eq(true));

        let saved = document::read_document(&path).unwrap();
        let unit = saved.entry("Hello").unwrap().localizations[&Language::French]
            .as_string_unit()
            .cloned()
            .unwrap();
        expect_that!(unit.value, eq("Bonjour"));
        expect_that!(unit.state, eq(StringUnitState::Translated));
        expect_that!(session.editor().is_modified(), eq(false));
        expect_that!(
            session.editor().item(&root("Hello", Language::French)).map(|i| i.is_modified),
            some(eq(false))
        );
    }

    /// save: an unmodified catalog is not rewritten
    #[googletest::test]
    fn test_save_without_edits_leaves_catalog_alone() {
        let (_temp_dir, path, store) = setup();
        let before = std::fs::read_to_string(&path).unwrap();
        let mut session = Session::open(&path, store).unwrap();

        expect_that!(session.save().unwrap(), eq(false));
        expect_that!(std::fs::read_to_string(&path).unwrap(), eq(&before));
    }

    /// Overlay flags come back when the same file is opened again.
    #[googletest::test]
    fn test_overlay_survives_reopen() {
        let (temp_dir, path, store) = setup();
        let fr = root("Hello", Language::French);
        let mut session =
            Session::open_with_languages(&path, store, vec![Language::English, Language::French])
                .unwrap();
        session.editor_mut().set_current_language(Language::French);
        session.editor_mut().set_translate_later(Some(&[fr.clone()]), true);
        session.save().unwrap();

        let reopened = Session::open_with_languages(
            &path,
            OverlayStore::new(temp_dir.path().join("store")),
            vec![Language::English, Language::French],
        )
        .unwrap();

        expect_that!(reopened.editor().current_language(), eq(Language::French));
        expect_that!(reopened.editor().item(&fr).map(|i| i.translate_later), some(eq(true)));
        expect_that!(
            reopened.editor().item(&ItemId::root("Hello", Language::English)).map(|i| i.translate_later),
            some(eq(false))
        );
    }

    #[googletest::test]
    fn test_open_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();

        let result = Session::open(temp_dir.path().join("nope.xcstrings"), OverlayStore::new(temp_dir.path()));

        expect_that!(matches!(result, Err(SessionError::Document(DocumentError::Io(_)))), eq(true));
    }

    #[googletest::test]
    fn test_normalize_rewrites_layout() {
        let (_temp_dir, path, store) = setup();
        std::fs::write(&path, r#"{"sourceLanguage":"en","strings":{},"version":"1.0"}"#).unwrap();
        let session = Session::open(&path, store).unwrap();

        session.normalize().unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        expect_that!(text, eq("{\n  \"sourceLanguage\" : \"en\",\n  \"strings\" : {},\n  \"version\" : \"1.0\"\n}"));
    }
}
