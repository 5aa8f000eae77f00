//! Reading `.xcstrings-editor.json`.

use std::io;
use std::path::Path;

use super::{
    ConfigError,
    EditorSettings,
};

/// Name of the settings file in the workspace root.
pub const CONFIG_FILE: &str = ".xcstrings-editor.json";

/// Settings from the workspace's [`CONFIG_FILE`], or `None` when there is no
/// such file. Missing fields take their defaults; nothing is validated here.
///
/// # Errors
/// Returns [`ConfigError::Read`] if the file exists but cannot be read and
/// [`ConfigError::Parse`] if it is not a settings object.
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<EditorSettings>, ConfigError> {
    let path = workspace_root.join(CONFIG_FILE);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "No settings file, using defaults");
            return Ok(None);
        }
        Err(err) => return Err(err.into()),
    };

    let settings = serde_json::from_str(&content)?;
    tracing::debug!(path = %path.display(), ?settings, "Read settings file");
    Ok(Some(settings))
}
