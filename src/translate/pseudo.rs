//! Offline pseudo-localization.
//!
//! Produces visibly "translated" text that keeps the source readable, so
//! layouts and untranslated strings can be spotted without a provider.

use std::iter::Peekable;
use std::str::Chars;

use super::{
    Detection,
    Translator,
    TranslatorError,
};
use crate::document::Language;

const ACCENTED: [(char, char); 13] = [
    ('a', 'á'),
    ('e', 'é'),
    ('i', 'í'),
    ('o', 'ó'),
    ('u', 'ú'),
    ('c', 'ç'),
    ('n', 'ñ'),
    ('y', 'ý'),
    ('A', 'Á'),
    ('E', 'É'),
    ('I', 'Í'),
    ('O', 'Ó'),
    ('U', 'Ú'),
];

/// Flags, width, precision, positional index and length modifiers of a
/// printf-style specifier.
const SPEC_PREFIX: &str = "0123456789$.-+ #'lhqLzjt";

/// Translator that accents letters and brackets the result.
///
/// Format specifiers such as `%d`, `%@` or `%1$lld` are left untouched.
/// Bracketed input is taken to be pseudo text and is translated back.
#[derive(Debug, Clone, Copy, Default)]
pub struct PseudoTranslator;

impl PseudoTranslator {
    #[must_use]
    pub fn localize(text: &str) -> String {
        format!("[{}]", map_letters(text, |c| accent(c).unwrap_or(c)))
    }

    #[must_use]
    pub fn delocalize(text: &str) -> String {
        let inner = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')).unwrap_or(text);
        map_letters(inner, |c| unaccent(c).unwrap_or(c))
    }
}

fn accent(c: char) -> Option<char> {
    ACCENTED.iter().find(|(plain, _)| *plain == c).map(|&(_, accented)| accented)
}

fn unaccent(c: char) -> Option<char> {
    ACCENTED.iter().find(|(_, accented)| *accented == c).map(|&(plain, _)| plain)
}

fn map_letters(text: &str, map: impl Fn(char) -> char) -> String {
    let mut out = String::with_capacity(text.len() * 2);
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '%' {
            out.push(c);
            copy_specifier(&mut chars, &mut out);
        } else {
            out.push(map(c));
        }
    }
    out
}

fn copy_specifier(chars: &mut Peekable<Chars<'_>>, out: &mut String) {
    while let Some(&c) = chars.peek() {
        out.push(c);
        chars.next();
        if !SPEC_PREFIX.contains(c) {
            break;
        }
    }
}

impl Translator for PseudoTranslator {
    async fn translate(
        &self,
        text: &str,
        _source: Language,
        target: Language,
    ) -> Result<String, TranslatorError> {
        if text.is_empty() {
            return Err(TranslatorError::InvalidInput);
        }
        tracing::trace!(%target, "Pseudo-localizing");
        if text.starts_with('[') && text.ends_with(']') {
            return Ok(Self::delocalize(text));
        }
        Ok(Self::localize(text))
    }

    async fn detect(&self, _text: &str) -> Result<Vec<Detection>, TranslatorError> {
        Err(TranslatorError::NotImplemented)
    }
}
