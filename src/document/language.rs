//! Supported catalog languages.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{
    Deserialize,
    Deserializer,
    Serialize,
    Serializer,
};
use thiserror::Error;

/// Error returned when a language code is not part of the supported set.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unsupported language code: '{0}'")]
pub struct UnknownLanguage(pub String);

/// Declares the closed language set together with its codes and display names.
macro_rules! languages {
    ($($variant:ident => $code:literal, $name:literal;)*) => {
        /// A language supported by the editor.
        ///
        /// Equality, hashing and ordering are by code, so two values are
        /// interchangeable exactly when their codes match.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Language {
            $(
                #[doc = $name]
                $variant,
            )*
        }

        impl Language {
            /// Every supported language, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)*];

            /// BCP-47-like code used in the catalog (e.g. `zh-Hans`).
            #[must_use]
            pub const fn code(self) -> &'static str {
                match self {
                    $(Self::$variant => $code,)*
                }
            }

            /// English display name.
            #[must_use]
            pub const fn display_name(self) -> &'static str {
                match self {
                    $(Self::$variant => $name,)*
                }
            }

            /// Resolves a catalog code, returning `None` for unsupported codes.
            #[must_use]
            pub fn from_code(code: &str) -> Option<Self> {
                match code {
                    $($code => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }
    };
}

languages! {
    Arabic => "ar", "Arabic";
    Catalan => "ca", "Catalan";
    ChineseHongKong => "zh-HK", "Chinese (Hong Kong)";
    ChineseSimplified => "zh-Hans", "Chinese (Simplified)";
    ChineseTraditional => "zh-Hant", "Chinese (Traditional)";
    Croatian => "hr", "Croatian";
    Czech => "cs", "Czech";
    Danish => "da", "Danish";
    Dutch => "nl", "Dutch";
    English => "en", "English";
    EnglishAustralia => "en-AU", "English (Australia)";
    EnglishIndia => "en-IN", "English (India)";
    EnglishUnitedKingdom => "en-GB", "English (United Kingdom)";
    Finnish => "fi", "Finnish";
    French => "fr", "French";
    FrenchCanada => "fr-CA", "French (Canada)";
    German => "de", "German";
    Greek => "el", "Greek";
    Hebrew => "he", "Hebrew";
    Hindi => "hi", "Hindi";
    Hungarian => "hu", "Hungarian";
    Indonesian => "id", "Indonesian";
    Italian => "it", "Italian";
    Japanese => "ja", "Japanese";
    Korean => "ko", "Korean";
    Malay => "ms", "Malay";
    NorwegianBokmal => "nb", "Norwegian Bokmål";
    Polish => "pl", "Polish";
    PortugueseBrazil => "pt-BR", "Portuguese (Brazil)";
    PortuguesePortugal => "pt-PT", "Portuguese (Portugal)";
    Romanian => "ro", "Romanian";
    Russian => "ru", "Russian";
    Slovak => "sk", "Slovak";
    Spanish => "es", "Spanish";
    SpanishLatinAmerica => "es-419", "Spanish (Latin America)";
    Swedish => "sv", "Swedish";
    Thai => "th", "Thai";
    Turkish => "tr", "Turkish";
    Ukrainian => "uk", "Ukrainian";
    Vietnamese => "vi", "Vietnamese";
}

impl Default for Language {
    fn default() -> Self {
        Self::English
    }
}

impl PartialOrd for Language {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Language {
    /// Orders by code so that maps keyed by language serialize in sorted order.
    fn cmp(&self, other: &Self) -> Ordering {
        self.code().cmp(other.code())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| UnknownLanguage(s.to_string()))
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Language {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}
