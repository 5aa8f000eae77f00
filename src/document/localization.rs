//! Per-language localization values: string units and plural/device variations.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeMap;
use serde::{
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
};
use thiserror::Error;

/// Review state stored inside a string unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StringUnitState {
    #[default]
    New,
    Translated,
    NeedsReview,
}

impl StringUnitState {
    /// Value written to the catalog.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Translated => "translated",
            Self::NeedsReview => "needs_review",
        }
    }
}

impl Serialize for StringUnitState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StringUnitState {
    /// Unrecognized states are read as `new`.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "translated" => Self::Translated,
            "needs_review" => Self::NeedsReview,
            "new" => Self::New,
            other => {
                tracing::debug!(state = other, "Unknown string unit state, reading as 'new'");
                Self::New
            }
        })
    }
}

/// A plain translated string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringUnit {
    pub state: StringUnitState,
    pub value: String,
}

impl StringUnit {
    #[must_use]
    pub fn new(state: StringUnitState, value: impl Into<String>) -> Self {
        Self { state, value: value.into() }
    }

    #[must_use]
    pub fn translated(value: impl Into<String>) -> Self {
        Self::new(StringUnitState::Translated, value)
    }
}

/// Error for a variant name that is not part of a closed variant set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown {kind} variant: '{name}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub name: String,
}

/// Declares a closed variant enum with its catalog name, display name and
/// fixed display order.
macro_rules! variant_enum {
    (
        $(#[$meta:meta])*
        $ty:ident, $kind:literal {
            $($variant:ident => $name:literal, $display:literal;)*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $ty {
            $($variant,)*
        }

        impl $ty {
            /// All variants in display order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            /// Name used in the catalog and in item ids.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// Human readable label shown for variant sub-items.
            #[must_use]
            pub const fn display_name(self) -> &'static str {
                match self {
                    $(Self::$variant => $display,)*
                }
            }

            /// Position in the fixed display order.
            #[must_use]
            pub const fn sort_index(self) -> usize {
                self as usize
            }
        }

        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Self::$variant),)*
                    _ => Err(UnknownVariant { kind: $kind, name: s.to_string() }),
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl PartialOrd for $ty {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        /// Orders by catalog name so variation maps serialize with sorted keys.
        /// Use [`Self::sort_index`] for display order.
        impl Ord for $ty {
            fn cmp(&self, other: &Self) -> Ordering {
                self.as_str().cmp(other.as_str())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

variant_enum! {
    /// Grammatical plural category.
    PluralType, "plural" {
        Zero => "zero", "Zero";
        One => "one", "One";
        Few => "few", "Few";
        Many => "many", "Many";
        Other => "other", "Other";
    }
}

variant_enum! {
    /// Device family a device-specific variant targets.
    DeviceType, "device" {
        Iphone => "iphone", "iPhone";
        Ipod => "ipod", "iPod";
        Ipad => "ipad", "iPad";
        AppleWatch => "applewatch", "Apple Watch";
        AppleTv => "appletv", "Apple TV";
        AppleVision => "applevision", "Apple Vision";
        Mac => "mac", "Mac";
        Other => "other", "Other";
    }
}

pub type PluralVariation = BTreeMap<PluralType, Localization>;
pub type DeviceVariation = BTreeMap<DeviceType, Localization>;

/// The value of one entry for one language.
///
/// Exactly one shape is populated. Plural variations bottom out at string
/// units; device variations may hold string units or plural variations.
/// Deeper nesting decodes but is treated as a structural mismatch by the
/// tree builder.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "LocalizationRepr")]
pub enum Localization {
    StringUnit(StringUnit),
    Plural(PluralVariation),
    Device(DeviceVariation),
}

impl Localization {
    #[must_use]
    pub const fn as_string_unit(&self) -> Option<&StringUnit> {
        match self {
            Self::StringUnit(unit) => Some(unit),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_plural(&self) -> Option<&PluralVariation> {
        match self {
            Self::Plural(variation) => Some(variation),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_device(&self) -> Option<&DeviceVariation> {
        match self {
            Self::Device(variation) => Some(variation),
            _ => None,
        }
    }
}

/// Shape errors found while decoding a localization object.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalizationShapeError {
    #[error("localization has neither 'stringUnit' nor 'variations'")]
    Empty,
    #[error("localization has both 'stringUnit' and 'variations'")]
    StringUnitWithVariations,
    #[error("variations must contain exactly one of 'plural' or 'device'")]
    AmbiguousVariations,
}

/// Wire shape of a localization object.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocalizationRepr {
    /// `{"stringUnit": {...}}`
    string_unit: Option<StringUnit>,
    /// `{"variations": {...}}`
    variations: Option<VariationsRepr>,
}

/// Wire shape of the `variations` object.
#[derive(Deserialize)]
struct VariationsRepr {
    /// `{"plural": {...}}`
    plural: Option<PluralVariation>,
    /// `{"device": {...}}`
    device: Option<DeviceVariation>,
}

impl TryFrom<LocalizationRepr> for Localization {
    type Error = LocalizationShapeError;

    fn try_from(repr: LocalizationRepr) -> Result<Self, Self::Error> {
        match (repr.string_unit, repr.variations) {
            (Some(unit), None) => Ok(Self::StringUnit(unit)),
            (Some(_), Some(_)) => Err(LocalizationShapeError::StringUnitWithVariations),
            (None, None) => Err(LocalizationShapeError::Empty),
            (None, Some(variations)) => match (variations.plural, variations.device) {
                (Some(plural), None) => Ok(Self::Plural(plural)),
                (None, Some(device)) => Ok(Self::Device(device)),
                _ => Err(LocalizationShapeError::AmbiguousVariations),
            },
        }
    }
}

/// Outgoing `variations` object.
#[derive(Serialize)]
#[serde(rename_all = "lowercase")]
enum VariationsOut<'a> {
    /// `{"device": {...}}`
    Device(&'a DeviceVariation),
    /// `{"plural": {...}}`
    Plural(&'a PluralVariation),
}

impl Serialize for Localization {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        match self {
            Self::StringUnit(unit) => map.serialize_entry("stringUnit", unit)?,
            Self::Plural(variation) => {
                map.serialize_entry("variations", &VariationsOut::Plural(variation))?;
            }
            Self::Device(variation) => {
                map.serialize_entry("variations", &VariationsOut::Device(variation))?;
            }
        }
        map.end()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[googletest::test]
    fn test_decode_string_unit() {
        let value = json!({"stringUnit": {"state": "needs_review", "value": "Hola"}});

        let localization: Localization = serde_json::from_value(value).unwrap();

        expect_that!(
            localization,
            eq(&Localization::StringUnit(StringUnit::new(StringUnitState::NeedsReview, "Hola")))
        );
    }

    /// States Xcode may add later read as `new`.
    #[googletest::test]
    fn test_decode_unknown_state_reads_as_new() {
        let value = json!({"stringUnit": {"state": "stale", "value": "x"}});

        let localization: Localization = serde_json::from_value(value).unwrap();

        expect_that!(
            localization.as_string_unit().map(|u| u.state),
            some(eq(StringUnitState::New))
        );
    }

    #[googletest::test]
    fn test_decode_device_with_nested_plural() {
        let value = json!({
            "variations": {
                "device": {
                    "mac": {"stringUnit": {"state": "translated", "value": "Click"}},
                    "iphone": {
                        "variations": {
                            "plural": {
                                "one": {"stringUnit": {"state": "translated", "value": "%d tap"}},
                                "other": {"stringUnit": {"state": "translated", "value": "%d taps"}}
                            }
                        }
                    }
                }
            }
        });

        let localization: Localization = serde_json::from_value(value).unwrap();
        let device = localization.as_device().unwrap();

        expect_that!(device.len(), eq(2));
        expect_that!(
            device.get(&DeviceType::Iphone).and_then(Localization::as_plural).map(BTreeMap::len),
            some(eq(2))
        );
    }

    #[rstest]
    #[case::empty(json!({}))]
    #[case::both(json!({
        "stringUnit": {"state": "new", "value": ""},
        "variations": {"plural": {}}
    }))]
    #[case::empty_variations(json!({"variations": {}}))]
    #[case::plural_and_device(json!({"variations": {"plural": {}, "device": {}}}))]
    #[case::unknown_plural(json!({"variations": {"plural": {
        "two": {"stringUnit": {"state": "new", "value": ""}}
    }}}))]
    fn test_decode_rejects_malformed(#[case] value: serde_json::Value) {
        let result: std::result::Result<Localization, _> = serde_json::from_value(value);
        assert!(result.is_err());
    }

    #[googletest::test]
    fn test_encode_plural_sorted_by_name() {
        let mut variation = PluralVariation::new();
        variation.insert(PluralType::Other, Localization::StringUnit(StringUnit::translated("b")));
        variation.insert(PluralType::One, Localization::StringUnit(StringUnit::translated("a")));
        variation.insert(PluralType::Few, Localization::StringUnit(StringUnit::translated("c")));

        let text = serde_json::to_string(&Localization::Plural(variation)).unwrap();

        expect_that!(
            text,
            eq(concat!(
                r#"{"variations":{"plural":{"#,
                r#""few":{"stringUnit":{"state":"translated","value":"c"}},"#,
                r#""one":{"stringUnit":{"state":"translated","value":"a"}},"#,
                r#""other":{"stringUnit":{"state":"translated","value":"b"}}}}}"#
            ))
        );
    }

    /// Catalog order is by name, display order is by category.
    #[googletest::test]
    fn test_display_order_differs_from_name_order() {
        let mut by_name = PluralType::ALL.to_vec();
        by_name.sort();
        let mut by_display = by_name.clone();
        by_display.sort_by_key(|p| p.sort_index());

        expect_that!(
            by_display,
            elements_are![
                eq(&PluralType::Zero),
                eq(&PluralType::One),
                eq(&PluralType::Few),
                eq(&PluralType::Many),
                eq(&PluralType::Other)
            ]
        );
        expect_that!(by_name.first(), some(eq(&PluralType::Few)));
        expect_that!(DeviceType::AppleWatch.display_name(), eq("Apple Watch"));
        expect_that!(DeviceType::Mac.sort_index(), eq(6));
    }
}
