//! Boundary to machine translation providers.
//!
//! Providers implement [`Translator`]; [`translate_items`] and friends drive them
//! over editor items and feed results back through the editor.
mod batch;
mod pseudo;

use std::future::Future;

use thiserror::Error;

pub use batch::{
    BatchReport,
    detect_language,
    reverse_translate,
    translate_items,
};

pub use pseudo::PseudoTranslator;

use crate::document::Language;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TranslatorError {
    #[error("Translation provider is not configured (missing or invalid API key)")]
    InvalidApi,

    #[error("Invalid input for translation")]
    InvalidInput,

    #[error("Translation provider returned an error: {0}")]
    Response(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Not supported by this provider")]
    NotImplemented,
}

impl TranslatorError {
    /// Whether retrying cannot help until the provider is configured.
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(self, Self::InvalidApi)
    }
}

/// One candidate returned by language detection.
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Provider language code, not necessarily one of [`Language`].
    pub language: String,
    pub is_reliable: bool,
    pub confidence: f32,
}

/// A machine translation provider.
pub trait Translator {
    /// Translates `text` from `source` to `target`.
    fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> impl Future<Output = Result<String, TranslatorError>> + Send;

    /// Candidate languages for `text`, most likely first.
    fn detect(&self, text: &str) -> impl Future<Output = Result<Vec<Detection>, TranslatorError>> + Send;
}
