//! Typed model of `.xcstrings` string catalogs.
mod codec;
mod entry;
mod language;
mod localization;

pub use codec::{
    CatalogFormatter,
    DocumentError,
    parse,
    read_document,
    to_catalog_string,
    to_pretty_string,
    write_document,
};
pub use entry::{
    Document,
    Entry,
    ExtractionState,
};
pub use language::{
    Language,
    UnknownLanguage,
};
pub use localization::{
    DeviceType,
    DeviceVariation,
    Localization,
    LocalizationShapeError,
    PluralType,
    PluralVariation,
    StringUnit,
    StringUnitState,
    UnknownVariant,
};
