//! Locating catalogs on disk.

use std::path::{
    Path,
    PathBuf,
};
use std::sync::Mutex;

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};
use ignore::{
    WalkBuilder,
    WalkState,
};
use thiserror::Error;

use crate::config::EditorSettings;

/// Parent directories searched for an Xcode project.
const PROJECT_SEARCH_DEPTH: usize = 5;
const PROJECT_EXTENSION: &str = ".xcodeproj";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Workspace root does not exist: {0}")]
    MissingRoot(PathBuf),
}

fn glob_set(patterns: &[String]) -> Result<GlobSet, ScanError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|source| ScanError::Pattern { pattern: pattern.clone(), source })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ScanError::Pattern { pattern: String::new(), source })
}

/// Catalogs under `root` matching the settings, sorted by path.
///
/// `.gitignore` rules are honoured. Patterns match paths relative to `root`.
///
/// # Errors
/// Returns an error if `root` does not exist or a pattern is invalid.
pub fn find_documents(root: &Path, settings: &EditorSettings) -> Result<Vec<PathBuf>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::MissingRoot(root.to_path_buf()));
    }
    let include_set = glob_set(std::slice::from_ref(&settings.document_pattern))?;
    let exclude_set = glob_set(&settings.exclude_patterns)?;
    let threads = settings.scan.effective_threads();
    tracing::debug!(root = %root.display(), threads, "Scanning for catalogs");

    let found = Mutex::new(Vec::new());
    WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .follow_links(false)
        .threads(threads)
        .build_parallel()
        .run(|| {
            let found = &found;
            let include_set = &include_set;
            let exclude_set = &exclude_set;
            Box::new(move |result| {
                let entry = match result {
                    Ok(entry) => entry,
                    Err(err) => {
                        tracing::debug!(?err, "Failed to read directory entry");
                        return WalkState::Continue;
                    }
                };
                if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                    return WalkState::Continue;
                }

                let path = entry.path();
                let Ok(relative_path) = path.strip_prefix(root) else {
                    return WalkState::Continue;
                };
                if include_set.is_match(relative_path) && !exclude_set.is_match(relative_path)
                    && let Ok(mut found) = found.lock()
                {
                    found.push(path.to_path_buf());
                }
                WalkState::Continue
            })
        });

    let mut documents = found.into_inner().unwrap_or_else(std::sync::PoisonError::into_inner);
    documents.sort();
    tracing::info!(root = %root.display(), count = documents.len(), "Found catalogs");
    Ok(documents)
}

/// Name of the nearest Xcode project above `document`.
///
/// Looks for a `*.xcodeproj` in the document's directory and up to four of
/// its ancestors.
#[must_use]
pub fn project_name(document: &Path) -> Option<String> {
    document.ancestors().skip(1).take(PROJECT_SEARCH_DEPTH).find_map(|dir| {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .ok()?
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.ends_with(PROJECT_EXTENSION))
            .collect();
        names.sort();
        names.into_iter().next().and_then(|name| name.strip_suffix(PROJECT_EXTENSION).map(str::to_string))
    })
}

/// Display title: `"{project}/{file stem}"`, or the stem alone.
#[must_use]
pub fn title(document: &Path) -> String {
    let stem = document.file_stem().map(|stem| stem.to_string_lossy().into_owned()).unwrap_or_default();
    match project_name(document) {
        Some(project) => format!("{project}/{stem}"),
        None => stem,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use tempfile::TempDir;

    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "{}").unwrap();
    }

    #[googletest::test]
    fn test_find_documents_applies_patterns() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        touch(&root.join("App/Localizable.xcstrings"));
        touch(&root.join("App/InfoPlist.xcstrings"));
        touch(&root.join("App/notes.json"));
        touch(&root.join("DerivedData/Build/Localizable.xcstrings"));

        let found = find_documents(root, &EditorSettings::default()).unwrap();

        expect_that!(
            found,
            elements_are![
                eq(&root.join("App/InfoPlist.xcstrings")),
                eq(&root.join("App/Localizable.xcstrings"))
            ]
        );
    }

    #[googletest::test]
    fn test_find_documents_honours_gitignore() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir(root.join(".git")).unwrap();
        fs::write(root.join(".gitignore"), "Vendor/\n").unwrap();
        touch(&root.join("Vendor/Lib.xcstrings"));
        touch(&root.join("Main.xcstrings"));

        let found = find_documents(root, &EditorSettings::default()).unwrap();

        expect_that!(found, elements_are![eq(&root.join("Main.xcstrings"))]);
    }

    #[googletest::test]
    fn test_find_documents_missing_root() {
        let temp_dir = TempDir::new().unwrap();

        let result = find_documents(&temp_dir.path().join("nope"), &EditorSettings::default());

        expect_that!(matches!(result, Err(ScanError::MissingRoot(_))), eq(true));
    }

    #[googletest::test]
    fn test_project_name_and_title() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        fs::create_dir_all(root.join("Demo.xcodeproj")).unwrap();
        let document = root.join("Demo/Resources/Localizable.xcstrings");
        touch(&document);

        expect_that!(project_name(&document).as_deref(), some(eq("Demo")));
        expect_that!(title(&document), eq("Demo/Localizable"));
    }

    /// A project more than five levels up is not found.
    #[googletest::test]
    fn test_title_without_project() {
        let temp_dir = TempDir::new().unwrap();
        let document = temp_dir.path().join("a/b/c/d/e/f/Localizable.xcstrings");
        touch(&document);
        fs::create_dir_all(temp_dir.path().join("Far.xcodeproj")).unwrap();

        expect_that!(title(&document), eq("Localizable"));
    }
}
