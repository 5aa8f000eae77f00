//! Structured identifiers for edit items.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{
    Hash,
    Hasher,
};
use std::str::FromStr;

use serde::{
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
};
use thiserror::Error;

use crate::document::{
    DeviceType,
    Language,
    PluralType,
    UnknownLanguage,
    UnknownVariant,
};

/// Separates the entry key from the language part of a serialized id.
pub const ID_DIVIDER: &str = "|XCSTRINGEDITORDIVIDER|";

/// Longest variant path a catalog can express (device, then plural).
const MAX_VARIANT_DEPTH: usize = 2;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ItemIdError {
    #[error("Item id '{0}' has no language part")]
    MissingDivider(String),

    #[error(transparent)]
    Language(#[from] UnknownLanguage),

    #[error(transparent)]
    Variant(#[from] UnknownVariant),

    #[error("Item id '{0}' has more than two variant segments")]
    TooDeep(String),
}

/// One step below a root item.
///
/// Equality, ordering and hashing use the variant name only, so that a
/// device `other` and a plural `other` segment read back from text compare
/// equal to the one they were written from.
#[derive(Debug, Clone, Copy)]
pub enum VariantKey {
    Plural(PluralType),
    Device(DeviceType),
}

impl VariantKey {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plural(plural) => plural.as_str(),
            Self::Device(device) => device.as_str(),
        }
    }

    /// Parses a segment, preferring the plural reading.
    fn parse_segment(segment: &str, prefer_device: bool) -> Result<Self, UnknownVariant> {
        if prefer_device && let Ok(device) = segment.parse::<DeviceType>() {
            return Ok(Self::Device(device));
        }
        if let Ok(plural) = segment.parse::<PluralType>() {
            return Ok(Self::Plural(plural));
        }
        segment.parse::<DeviceType>().map(Self::Device)
    }
}

impl PartialEq for VariantKey {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for VariantKey {}

impl Hash for VariantKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state);
    }
}

impl PartialOrd for VariantKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VariantKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl From<PluralType> for VariantKey {
    fn from(plural: PluralType) -> Self {
        Self::Plural(plural)
    }
}

impl From<DeviceType> for VariantKey {
    fn from(device: DeviceType) -> Self {
        Self::Device(device)
    }
}

/// Identifies one edit item: `{key}|XCSTRINGEDITORDIVIDER|{lang}[/{variant}[/{variant}]]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId {
    pub key: String,
    pub language: Language,
    pub variant_path: Vec<VariantKey>,
}

impl ItemId {
    /// Id of the root item for `(key, language)`.
    #[must_use]
    pub fn root(key: impl Into<String>, language: Language) -> Self {
        Self { key: key.into(), language, variant_path: Vec::new() }
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.variant_path.is_empty()
    }

    /// The id of the root this item belongs to.
    #[must_use]
    pub fn base(&self) -> Self {
        Self::root(self.key.clone(), self.language)
    }

    /// Same key and variant path in another language.
    #[must_use]
    pub fn with_language(&self, language: Language) -> Self {
        Self { key: self.key.clone(), language, variant_path: self.variant_path.clone() }
    }

    /// Id of a sub-item one level below this one.
    #[must_use]
    pub fn child(&self, variant: impl Into<VariantKey>) -> Self {
        let mut variant_path = self.variant_path.clone();
        variant_path.push(variant.into());
        Self { key: self.key.clone(), language: self.language, variant_path }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{ID_DIVIDER}{}", self.key, self.language)?;
        for variant in &self.variant_path {
            write!(f, "/{}", variant.as_str())?;
        }
        Ok(())
    }
}

impl FromStr for ItemId {
    type Err = ItemIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (key, rest) =
            s.split_once(ID_DIVIDER).ok_or_else(|| ItemIdError::MissingDivider(s.to_string()))?;

        let mut segments = rest.split('/');
        let language: Language = segments.next().unwrap_or_default().parse()?;
        let variants: Vec<&str> = segments.collect();
        if variants.len() > MAX_VARIANT_DEPTH {
            return Err(ItemIdError::TooDeep(s.to_string()));
        }

        let prefer_device = variants.len() == MAX_VARIANT_DEPTH;
        let mut variant_path = Vec::with_capacity(variants.len());
        for (depth, segment) in variants.into_iter().enumerate() {
            variant_path.push(VariantKey::parse_segment(segment, prefer_device && depth == 0)?);
        }

        Ok(Self { key: key.to_string(), language, variant_path })
    }
}

impl Serialize for ItemId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
