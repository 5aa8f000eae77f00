//! Validated settings of one workspace.

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    EditorSettings,
    loader,
};
use crate::overlay::{
    OverlayError,
    OverlayStore,
};

/// Owns the settings in effect. Only settings that pass
/// [`EditorSettings::validate`] are ever stored.
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    current_settings: EditorSettings,

    workspace_root: Option<PathBuf>,
}

impl ConfigManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches to `workspace_root`, reading its settings file if there is one.
    ///
    /// On error nothing changes, including the workspace root.
    ///
    /// # Errors
    /// Returns the read, parse or validation error of the settings file.
    pub fn load_settings(&mut self, workspace_root: Option<PathBuf>) -> Result<(), ConfigError> {
        let settings = match &workspace_root {
            Some(root) => loader::load_from_workspace(root)?.unwrap_or_default(),
            None => EditorSettings::default(),
        };
        settings.validate().map_err(ConfigError::Invalid)?;

        tracing::info!(
            root = ?workspace_root,
            document_pattern = %settings.document_pattern,
            "Settings loaded"
        );
        self.current_settings = settings;
        self.workspace_root = workspace_root;
        Ok(())
    }

    /// Replaces the settings if they validate.
    ///
    /// # Errors
    /// Returns the validation errors; the current settings stay in place.
    pub fn update_settings(&mut self, new_settings: EditorSettings) -> Result<(), ConfigError> {
        new_settings.validate().map_err(ConfigError::Invalid)?;
        self.current_settings = new_settings;
        Ok(())
    }

    #[must_use]
    pub const fn get_settings(&self) -> &EditorSettings {
        &self.current_settings
    }

    #[must_use]
    pub fn workspace_root(&self) -> Option<&Path> {
        self.workspace_root.as_deref()
    }

    /// Overlay store for the configured directory.
    ///
    /// A relative `overlayDir` is resolved against the workspace root.
    ///
    /// # Errors
    /// Returns [`OverlayError::NoDataDir`] when no directory is configured and
    /// the platform has no data directory.
    pub fn overlay_store(&self) -> Result<OverlayStore, OverlayError> {
        match (&self.current_settings.overlay_dir, &self.workspace_root) {
            (Some(dir), Some(root)) if dir.is_relative() => Ok(OverlayStore::new(root.join(dir))),
            (Some(dir), _) => Ok(OverlayStore::new(dir.clone())),
            (None, _) => OverlayStore::in_data_dir(),
        }
    }
}
