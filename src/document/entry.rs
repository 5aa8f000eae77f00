//! Catalog entries and the top-level document.

use std::collections::{
    BTreeMap,
    BTreeSet,
};

use serde::{
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
};

use super::language::Language;
use super::localization::Localization;

/// How the entry's key was extracted from source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExtractionState {
    #[default]
    None,
    Stale,
    Manual,
}

impl ExtractionState {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Stale => "stale",
            Self::Manual => "manual",
        }
    }

    /// Used to omit the field from the catalog when it carries no information.
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

impl Serialize for ExtractionState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ExtractionState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        match raw.as_str() {
            "" | "none" => Ok(Self::None),
            "stale" => Ok(Self::Stale),
            "manual" => Ok(Self::Manual),
            other => Err(serde::de::Error::unknown_variant(other, &["none", "stale", "manual"])),
        }
    }
}

/// One translatable unit of the catalog.
///
/// Fields are declared in the order their JSON names sort so the derived
/// serializer emits sorted keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Copy of the map key in [`Document::strings`]. Kept equal by the document.
    #[serde(skip)]
    pub key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default, skip_serializing_if = "ExtractionState::is_none")]
    pub extraction_state: ExtractionState,

    /// Absence of a language means it has not been localized yet.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub localizations: BTreeMap<Language, Localization>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub should_translate: Option<bool>,
}

impl Entry {
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into(), ..Self::default() }
    }

    /// `shouldTranslate` with its catalog default applied.
    #[must_use]
    pub fn should_translate(&self) -> bool {
        self.should_translate.unwrap_or(true)
    }

    #[must_use]
    pub const fn is_stale(&self) -> bool {
        matches!(self.extraction_state, ExtractionState::Stale)
    }
}

/// A whole string catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "DocumentRepr")]
pub struct Document {
    pub source_language: Language,
    pub strings: BTreeMap<String, Entry>,
    pub version: String,
}

/// Wire shape of the document before entry keys are denormalized.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentRepr {
    /// `sourceLanguage`
    source_language: Language,
    /// `strings`
    #[serde(default)]
    strings: BTreeMap<String, Entry>,
    /// `version`
    version: String,
}

impl From<DocumentRepr> for Document {
    fn from(repr: DocumentRepr) -> Self {
        let mut document = Self {
            source_language: repr.source_language,
            strings: repr.strings,
            version: repr.version,
        };
        document.sync_entry_keys();
        document
    }
}

impl Document {
    /// Catalog format version written by current toolchains.
    pub const DEFAULT_VERSION: &'static str = "1.0";

    #[must_use]
    pub fn new(source_language: Language) -> Self {
        Self {
            source_language,
            strings: BTreeMap::new(),
            version: Self::DEFAULT_VERSION.to_string(),
        }
    }

    /// Inserts an entry under its own key, replacing any previous one.
    pub fn insert(&mut self, entry: Entry) -> Option<Entry> {
        self.strings.insert(entry.key.clone(), entry)
    }

    #[must_use]
    pub fn entry(&self, key: &str) -> Option<&Entry> {
        self.strings.get(key)
    }

    pub fn entry_mut(&mut self, key: &str) -> Option<&mut Entry> {
        self.strings.get_mut(key)
    }

    /// Languages present in any entry, sorted by display name.
    ///
    /// Falls back to the source language when nothing is localized yet.
    #[must_use]
    pub fn languages(&self) -> Vec<Language> {
        let found: BTreeSet<Language> =
            self.strings.values().flat_map(|entry| entry.localizations.keys().copied()).collect();

        if found.is_empty() {
            return vec![self.source_language];
        }

        let mut languages: Vec<Language> = found.into_iter().collect();
        languages.sort_by_key(|language| language.display_name());
        languages
    }

    /// Re-establishes `entry.key == map key` for every entry.
    pub fn sync_entry_keys(&mut self) {
        for (key, entry) in &mut self.strings {
            if entry.key != *key {
                entry.key.clone_from(key);
            }
        }
    }
}
