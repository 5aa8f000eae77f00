//! Location and persistence of overlay files.

use std::collections::BTreeMap;
use std::io;
use std::path::{
    Path,
    PathBuf,
};

use thiserror::Error;
use uuid::Uuid;

use super::Overlay;

/// Name of the index mapping absolute document paths to overlay file ids.
const FILE_IDS: &str = "file_ids.json";
/// Sub-directory holding one overlay file per document.
const OVERLAY_DIR: &str = "FileSettings";

#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("Failed to access overlay storage: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to encode overlay: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No data directory available for overlay storage")]
    NoDataDir,
}

/// Stores overlays under a directory, one file per document.
///
/// Each document gets a random id the first time it is seen; the id is cached
/// by absolute path in `file_ids.json` so overlay files keep stable names.
#[derive(Debug, Clone)]
pub struct OverlayStore {
    dir: PathBuf,
}

impl OverlayStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store in the platform data directory (e.g. `~/.local/share/xcstrings-editor`).
    ///
    /// # Errors
    /// Returns [`OverlayError::NoDataDir`] if the platform has no data directory.
    pub fn in_data_dir() -> Result<Self, OverlayError> {
        let base = dirs::data_dir().ok_or(OverlayError::NoDataDir)?;
        Ok(Self::new(base.join("xcstrings-editor")))
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the id assigned to `document`, assigning a new one if needed.
    ///
    /// # Errors
    /// Returns an error if the index cannot be read or written.
    pub fn file_id(&self, document: &Path) -> Result<String, OverlayError> {
        let key = std::path::absolute(document)?.to_string_lossy().into_owned();
        let index_path = self.dir.join(FILE_IDS);

        let mut ids: BTreeMap<String, String> = match std::fs::read_to_string(&index_path) {
            Ok(text) => serde_json::from_str(&text).unwrap_or_else(|err| {
                tracing::warn!(path = %index_path.display(), %err, "Resetting unreadable overlay index");
                BTreeMap::new()
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };

        if let Some(id) = ids.get(&key) {
            return Ok(id.clone());
        }

        let id = Uuid::new_v4().to_string().to_uppercase();
        ids.insert(key, id.clone());
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(&index_path, serde_json::to_string_pretty(&ids)?)?;
        tracing::debug!(document = %document.display(), %id, "Assigned overlay id");
        Ok(id)
    }

    /// Path of the overlay file for `document`.
    ///
    /// # Errors
    /// Returns an error if the document id cannot be resolved.
    pub fn overlay_path(&self, document: &Path) -> Result<PathBuf, OverlayError> {
        let id = self.file_id(document)?;
        Ok(self.dir.join(OVERLAY_DIR).join(format!("{id}.json")))
    }

    /// Loads the overlay for `document`.
    ///
    /// Overlays are annotations, so any failure yields an empty overlay.
    #[must_use]
    pub fn load(&self, document: &Path) -> Overlay {
        match self.try_load(document) {
            Ok(overlay) => overlay,
            Err(err) => {
                tracing::warn!(document = %document.display(), %err, "Using empty overlay");
                Overlay::default()
            }
        }
    }

    fn try_load(&self, document: &Path) -> Result<Overlay, OverlayError> {
        let path = self.overlay_path(document)?;
        match std::fs::read_to_string(&path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Overlay::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Writes the overlay for `document`.
    ///
    /// # Errors
    /// Returns an error if the overlay cannot be encoded or written.
    pub fn save(&self, document: &Path, overlay: &Overlay) -> Result<(), OverlayError> {
        let path = self.overlay_path(document)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, serde_json::to_string_pretty(overlay)?)?;
        tracing::debug!(path = %path.display(), "Saved overlay");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use tempfile::TempDir;

    use super::*;
    use crate::document::Language;
    use crate::item::ItemId;

    /// file_id: same path, same id; another path, another id
    #[googletest::test]
    fn test_file_id_is_stable_per_path() {
        let temp_dir = TempDir::new().unwrap();
        let store = OverlayStore::new(temp_dir.path().join("store"));
        let a = temp_dir.path().join("a.xcstrings");
        let b = temp_dir.path().join("b.xcstrings");

        let first = store.file_id(&a).unwrap();

        expect_that!(store.file_id(&a).unwrap(), eq(&first));
        expect_that!(store.file_id(&b).unwrap(), not(eq(&first)));
        expect_that!(OverlayStore::new(temp_dir.path().join("store")).file_id(&a).unwrap(), eq(&first));
    }

    #[googletest::test]
    fn test_save_then_load() {
        let temp_dir = TempDir::new().unwrap();
        let store = OverlayStore::new(temp_dir.path());
        let document = temp_dir.path().join("Localizable.xcstrings");
        let mut overlay = Overlay { last_language: Language::Korean, ..Overlay::default() };
        overlay.set_translate_later(&ItemId::root("Hello", Language::Korean), true);

        store.save(&document, &overlay).unwrap();

        expect_that!(store.load(&document), eq(&overlay));
        expect_that!(store.overlay_path(&document).unwrap().exists(), eq(true));
    }

    #[googletest::test]
    fn test_load_missing_is_default() {
        let temp_dir = TempDir::new().unwrap();
        let store = OverlayStore::new(temp_dir.path());

        expect_that!(store.load(&temp_dir.path().join("new.xcstrings")), eq(&Overlay::default()));
    }

    /// A corrupt overlay file reads as an empty overlay.
    #[googletest::test]
    fn test_load_corrupt_degrades_to_default() {
        let temp_dir = TempDir::new().unwrap();
        let store = OverlayStore::new(temp_dir.path());
        let document = temp_dir.path().join("Localizable.xcstrings");
        let path = store.overlay_path(&document).unwrap();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();

        expect_that!(store.load(&document), eq(&Overlay::default()));
    }
}
