//! Shared fixtures for unit tests.
#![cfg(test)]

use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};

use serde_json::json;

use crate::document::{
    Document,
    Language,
};
use crate::item::ItemId;
use crate::translate::{
    Detection,
    Translator,
    TranslatorError,
};

/// English catalog with a single translated "Hello".
pub(crate) fn hello_document() -> Document {
    document(json!({
        "sourceLanguage": "en",
        "version": "1.0",
        "strings": {
            "Hello": {"localizations": {
                "en": {"stringUnit": {"state": "translated", "value": "Hello"}}
            }}
        }
    }))
}

/// "%d files" with English and French plural variations (one, other).
pub(crate) fn plural_document() -> Document {
    document(json!({
        "sourceLanguage": "en",
        "version": "1.0",
        "strings": {
            "%d files": {"localizations": {
                "en": {"variations": {"plural": {
                    "one": {"stringUnit": {"state": "translated", "value": "%d file"}},
                    "other": {"stringUnit": {"state": "translated", "value": "%d files"}}
                }}},
                "fr": {"variations": {"plural": {
                    "one": {"stringUnit": {"state": "translated", "value": "%d fichier"}},
                    "other": {"stringUnit": {"state": "translated", "value": "%d fichiers"}}
                }}}
            }}
        }
    }))
}

#[allow(clippy::expect_used)]
fn document(value: serde_json::Value) -> Document {
    serde_json::from_value(value).expect("fixture is a valid catalog")
}

pub(crate) fn root(key: &str, language: Language) -> ItemId {
    ItemId::root(key, language)
}

/// Translator answering `"[{target}] {text}"`, or failing every call.
#[derive(Debug, Default)]
pub(crate) struct MockTranslator {
    failure: Option<TranslatorError>,
    calls: AtomicUsize,
}

impl MockTranslator {
    pub(crate) fn failing(err: TranslatorError) -> Self {
        Self { failure: Some(err), calls: AtomicUsize::new(0) }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn respond<T>(&self, value: T) -> Result<T, TranslatorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.failure.clone().map_or(Ok(value), Err)
    }
}

impl Translator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        _source: Language,
        target: Language,
    ) -> Result<String, TranslatorError> {
        tokio::task::yield_now().await;
        self.respond(format!("[{}] {text}", target.code()))
    }

    async fn detect(&self, _text: &str) -> Result<Vec<Detection>, TranslatorError> {
        self.respond(vec![
            Detection { language: "fr".to_string(), is_reliable: true, confidence: 0.9 },
            Detection { language: "en".to_string(), is_reliable: false, confidence: 0.1 },
        ])
    }
}
