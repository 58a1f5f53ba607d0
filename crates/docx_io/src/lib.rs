//! DOCX Import/Export
//!
//! Writes a [`doc_model::Document`] into an Office Open XML package and reads
//! such a package back into the same model.
//!
//! ## Structure
//!
//! A DOCX file is a ZIP archive containing XML parts:
//! - `[Content_Types].xml` - Content type declarations for every part
//! - `_rels/.rels` - Root relationships (main document, core/custom properties)
//! - `docProps/core.xml`, `docProps/custom.xml` - Document metadata
//! - `word/document.xml` - Main document content
//! - `word/_rels/document.xml.rels` - Document relationships
//! - `word/styles.xml`, `word/settings.xml` - Always present
//! - `word/numbering.xml` - Only when lists are defined
//! - `word/comments.xml`, `word/commentsExtended.xml` - Only when comments are anchored
//! - `word/webextensions/*` - Only when task-pane add-ins are attached
//! - `customXml/item{N}.xml` - One triplet of parts per custom XML item

mod error;
mod options;
mod reader;
mod content_types;
mod relationships;
mod plan;
mod properties_writer;
mod document_writer;
mod tables_writer;
mod styles_writer;
mod numbering_writer;
mod comments_io;
mod props_io;
mod extensions_io;
mod writer;
mod properties;
mod document;
mod styles;
mod lists;
mod parser;
mod api;

pub use api::{
    build, build_with, export_docx, import_docx, json, read, read_json, read_with, BuildDocx,
};
pub use content_types::ContentTypes;
pub use error::{DocxError, DocxResult, PackageError};
pub use options::{BuildOptions, Compression, ReadOptions};
pub use parser::DocxParser;
pub use relationships::{Relationship, Relationships};
pub use writer::DocxWriter;

/// XML namespaces used in DOCX files
pub mod namespaces {
    /// Main WordprocessingML namespace
    pub const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
    /// Relationships namespace
    pub const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
    /// Word 2010 extensions (paragraph ids)
    pub const W14: &str = "http://schemas.microsoft.com/office/word/2010/wordml";
    /// Word 2012 extensions (extended comments, document id)
    pub const W15: &str = "http://schemas.microsoft.com/office/word/2012/wordml";
    /// Markup compatibility
    pub const MC: &str = "http://schemas.openxmlformats.org/markup-compatibility/2006";
    /// Package relationships namespace
    pub const PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
    /// Content types namespace
    pub const CT: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
    /// Core properties
    pub const CP: &str =
        "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";
    pub const DC: &str = "http://purl.org/dc/elements/1.1/";
    pub const DCTERMS: &str = "http://purl.org/dc/terms/";
    pub const DCMITYPE: &str = "http://purl.org/dc/dcmitype/";
    pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
    /// Custom properties
    pub const CUSTOM_PROPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/custom-properties";
    pub const VT: &str = "http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes";
    /// Web extension task panes
    pub const WETP: &str = "http://schemas.microsoft.com/office/webextensions/taskpanes/2010/11";
    /// Web extension manifest
    pub const WE: &str = "http://schemas.microsoft.com/office/webextensions/webextension/2010/11";
    /// Custom XML data store
    pub const DS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/customXml";
}

/// Relationship types used in DOCX
pub mod relationship_types {
    pub const DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const CUSTOM_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/custom-properties";
    pub const STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const SETTINGS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings";
    pub const NUMBERING: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/numbering";
    pub const COMMENTS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/comments";
    pub const COMMENTS_EXTENDED: &str =
        "http://schemas.microsoft.com/office/2011/relationships/commentsExtended";
    pub const WEB_EXTENSION_TASKPANES: &str =
        "http://schemas.microsoft.com/office/2011/relationships/webextensiontaskpanes";
    pub const WEB_EXTENSION: &str =
        "http://schemas.microsoft.com/office/2011/relationships/webextension";
    pub const CUSTOM_XML: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/customXml";
    pub const CUSTOM_XML_PROPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/customXmlProps";
}

/// Content types for DOCX parts
pub mod content_type_values {
    pub const DOCUMENT: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
    pub const STYLES: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
    pub const NUMBERING: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml";
    pub const SETTINGS: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml";
    pub const COMMENTS: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.comments+xml";
    pub const COMMENTS_EXTENDED: &str =
        "application/vnd.openxmlformats-officedocument.wordprocessingml.commentsExtended+xml";
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
    pub const CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";
    pub const CUSTOM_PROPERTIES: &str =
        "application/vnd.openxmlformats-officedocument.custom-properties+xml";
    pub const WEB_EXTENSION_TASKPANES: &str = "application/vnd.ms-office.webextensiontaskpanes+xml";
    pub const WEB_EXTENSION: &str = "application/vnd.ms-office.webextension+xml";
    pub const CUSTOM_XML_PROPERTIES: &str =
        "application/vnd.openxmlformats-officedocument.customXmlProperties+xml";
}

/// Conventional part names
pub mod part_names {
    pub const CONTENT_TYPES: &str = "[Content_Types].xml";
    pub const ROOT_RELS: &str = "_rels/.rels";
    pub const CORE: &str = "docProps/core.xml";
    pub const CUSTOM: &str = "docProps/custom.xml";
    pub const DOCUMENT: &str = "word/document.xml";
    pub const DOCUMENT_RELS: &str = "word/_rels/document.xml.rels";
    pub const STYLES: &str = "word/styles.xml";
    pub const SETTINGS: &str = "word/settings.xml";
    pub const NUMBERING: &str = "word/numbering.xml";
    pub const COMMENTS: &str = "word/comments.xml";
    pub const COMMENTS_EXTENDED: &str = "word/commentsExtended.xml";
    pub const TASKPANES: &str = "word/webextensions/taskpanes.xml";
    pub const TASKPANES_RELS: &str = "word/webextensions/_rels/taskpanes.xml.rels";

    pub fn web_extension(index: usize) -> String {
        format!("word/webextensions/webextension{}.xml", index)
    }

    pub fn custom_item(index: usize) -> String {
        format!("customXml/item{}.xml", index)
    }

    pub fn custom_item_props(index: usize) -> String {
        format!("customXml/item{}Props/core.xml", index)
    }

    pub fn custom_item_rels(index: usize) -> String {
        format!("customXml/_rels/item{}.xml.rels", index)
    }
}
