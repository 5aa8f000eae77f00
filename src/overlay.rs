//! Per-document flags kept outside the catalog.
mod store;

use std::collections::BTreeSet;

use serde::{
    Deserialize,
    Serialize,
};
pub use store::{
    OverlayError,
    OverlayStore,
};

use crate::document::Language;
use crate::item::ItemId;

/// "Translate later" and "needs work" marks plus the last viewed language.
///
/// Ids are root ids. The catalog never sees these flags, so this is the only
/// place they persist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "OverlayRepr")]
pub struct Overlay {
    pub last_language: Language,
    pub translate_later: BTreeSet<ItemId>,
    pub needs_work: BTreeSet<ItemId>,
}

impl Overlay {
    #[must_use]
    pub fn is_translate_later(&self, id: &ItemId) -> bool {
        self.translate_later.contains(id)
    }

    #[must_use]
    pub fn is_needs_work(&self, id: &ItemId) -> bool {
        self.needs_work.contains(id)
    }

    /// Returns whether the set changed.
    pub fn set_translate_later(&mut self, id: &ItemId, value: bool) -> bool {
        toggle(&mut self.translate_later, id, value)
    }

    /// Returns whether the set changed.
    pub fn set_needs_work(&mut self, id: &ItemId, value: bool) -> bool {
        toggle(&mut self.needs_work, id, value)
    }
}

fn toggle(set: &mut BTreeSet<ItemId>, id: &ItemId, value: bool) -> bool {
    if value { set.insert(id.clone()) } else { set.remove(id) }
}

/// Lenient wire shape. Bad entries are dropped rather than failing the load.
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct OverlayRepr {
    /// `lastLanguage`
    last_language: Option<String>,
    /// `translateLater`
    translate_later: Vec<String>,
    /// `needsWork`
    needs_work: Vec<String>,
}

impl From<OverlayRepr> for Overlay {
    fn from(repr: OverlayRepr) -> Self {
        let last_language = repr
            .last_language
            .and_then(|code| {
                let language = Language::from_code(&code);
                if language.is_none() {
                    tracing::warn!(code = %code, "Ignoring unsupported last language in overlay");
                }
                language
            })
            .unwrap_or_default();

        Self {
            last_language,
            translate_later: parse_ids(repr.translate_later, "translateLater"),
            needs_work: parse_ids(repr.needs_work, "needsWork"),
        }
    }
}

fn parse_ids(raw: Vec<String>, field: &'static str) -> BTreeSet<ItemId> {
    raw.into_iter()
        .filter_map(|text| match text.parse::<ItemId>() {
            Ok(id) => Some(id),
            Err(err) => {
                tracing::warn!(field, id = %text, %err, "Dropping unreadable overlay id");
                None
            }
        })
        .collect()
}
