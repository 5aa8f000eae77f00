//! Reading and writing catalogs in the format the Xcode toolchain expects.

use std::io;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::Formatter;
use thiserror::Error;

use super::entry::Document;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to access catalog: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Pretty printer matching Xcode's catalog output.
///
/// Two-space indentation and `" : "` between keys and values. Slashes are
/// never escaped by `serde_json`, so nothing special is needed for them.
#[derive(Debug, Clone, Copy, Default)]
pub struct CatalogFormatter {
    current_indent: usize,
    has_value: bool,
}

impl CatalogFormatter {
    const INDENT: &'static [u8] = b"  ";

    fn indent<W>(&self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        for _ in 0..self.current_indent {
            writer.write_all(Self::INDENT)?;
        }
        Ok(())
    }

    fn open<W>(&mut self, writer: &mut W, bracket: &[u8]) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.current_indent += 1;
        self.has_value = false;
        writer.write_all(bracket)
    }

    fn close<W>(&mut self, writer: &mut W, bracket: &[u8]) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.current_indent = self.current_indent.saturating_sub(1);
        if self.has_value {
            writer.write_all(b"\n")?;
            self.indent(writer)?;
        }
        writer.write_all(bracket)
    }

    fn next_item<W>(&self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(if first { b"\n" } else { b",\n" })?;
        self.indent(writer)
    }
}

impl Formatter for CatalogFormatter {
    fn begin_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.open(writer, b"[")
    }

    fn end_array<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.close(writer, b"]")
    }

    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.next_item(writer, first)
    }

    fn end_array_value<W>(&mut self, _writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.has_value = true;
        Ok(())
    }

    fn begin_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.open(writer, b"{")
    }

    fn end_object<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.close(writer, b"}")
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.next_item(writer, first)
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b" : ")
    }

    fn end_object_value<W>(&mut self, _writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        self.has_value = true;
        Ok(())
    }
}

/// Parses catalog text. Fails as a whole on any malformed entry.
///
/// # Errors
/// Returns [`DocumentError::Parse`] for malformed JSON, unsupported language
/// codes, unknown variant names or localizations with an invalid shape.
pub fn parse(text: &str) -> Result<Document, DocumentError> {
    Ok(serde_json::from_str(text)?)
}

/// Encodes any value with [`CatalogFormatter`].
///
/// # Errors
/// Returns an error if the value cannot be serialized.
pub fn to_catalog_string<T: Serialize + ?Sized>(value: &T) -> Result<String, DocumentError> {
    let mut buffer = Vec::with_capacity(4096);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, CatalogFormatter::default());
    value.serialize(&mut serializer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

/// Encodes a document with sorted keys and Xcode's pretty layout.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn to_pretty_string(document: &Document) -> Result<String, DocumentError> {
    to_catalog_string(document)
}

/// Reads and parses the catalog at `path`.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_document(path: &Path) -> Result<Document, DocumentError> {
    tracing::debug!(path = %path.display(), "Reading catalog");
    let text = std::fs::read_to_string(path)?;
    parse(&text)
}

/// Writes the catalog to `path` through a temporary file and a rename.
///
/// # Errors
/// Returns an error if encoding or any file operation fails. The original file
/// is left untouched in that case.
pub fn write_document(path: &Path, document: &Document) -> Result<(), DocumentError> {
    let text = to_pretty_string(document)?;

    let temp = path.with_extension("xcstrings.tmp");
    std::fs::write(&temp, text)?;
    if let Err(e) = std::fs::rename(&temp, path) {
        let _ = std::fs::remove_file(&temp);
        return Err(e.into());
    }

    tracing::info!(path = %path.display(), entries = document.strings.len(), "Saved catalog");
    Ok(())
}
