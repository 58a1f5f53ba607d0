//! Public API for DOCX import/export
//!
//! This module provides the main entry points for working with DOCX files.

use crate::error::{DocxResult, PackageError};
use crate::options::{BuildOptions, ReadOptions};
use crate::parser::DocxParser;
use crate::writer::DocxWriter;
use doc_model::Document;
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Write};
use std::path::Path;

/// Terminal operations on a finished [`Document`]
pub trait BuildDocx {
    /// Serialize into `.docx` package bytes with default options
    fn build(&self) -> DocxResult<Vec<u8>>;

    fn build_with(&self, options: &BuildOptions) -> DocxResult<Vec<u8>>;
}

impl BuildDocx for Document {
    fn build(&self) -> DocxResult<Vec<u8>> {
        build(self)
    }

    fn build_with(&self, options: &BuildOptions) -> DocxResult<Vec<u8>> {
        build_with(self, options)
    }
}

/// Serialize a document into `.docx` bytes
///
/// # Example
///
/// ```ignore
/// use doc_model::{Document, Paragraph, Run};
///
/// let doc = Document::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text("Hello")));
/// let bytes = docx_io::build(&doc)?;
/// ```
pub fn build(doc: &Document) -> DocxResult<Vec<u8>> {
    build_with(doc, &BuildOptions::default())
}

/// Serialize a document with explicit options.
/// A document with broken cross-references yields `DocxError::Validation`.
pub fn build_with(doc: &Document, options: &BuildOptions) -> DocxResult<Vec<u8>> {
    let writer = DocxWriter::new(Cursor::new(Vec::new()), options.clone());
    let cursor = writer.write(doc)?;
    Ok(cursor.into_inner())
}

/// Canonical JSON view of the model, the same shape [`read_json`] returns
pub fn json(doc: &Document) -> DocxResult<serde_json::Value> {
    Ok(doc.json()?)
}

/// Read `.docx` bytes back into a document
pub fn read(bytes: &[u8]) -> DocxResult<Document> {
    read_with(bytes, &ReadOptions::default())
}

pub fn read_with(bytes: &[u8], options: &ReadOptions) -> DocxResult<Document> {
    DocxParser::new(options.clone()).parse(Cursor::new(bytes))
}

/// Read `.docx` bytes straight into the JSON view
pub fn read_json(bytes: &[u8]) -> DocxResult<serde_json::Value> {
    json(&read(bytes)?)
}

/// Import a DOCX file from disk
pub fn import_docx(path: &Path) -> DocxResult<Document> {
    let file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PackageError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            ))
        } else {
            PackageError::Io(e)
        }
    })?;

    tracing::debug!(path = %path.display(), "importing docx");
    DocxParser::new(ReadOptions::default()).parse(BufReader::new(file))
}

/// Export a document to a DOCX file on disk, creating parent directories
pub fn export_docx(doc: &Document, path: &Path) -> DocxResult<()> {
    let bytes = build(doc)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "exported docx");
    Ok(())
}
