//! DOCX Writer Infrastructure
//!
//! Renders every part of a document into memory in a fixed order, derives
//! `[Content_Types].xml` from the rendered list and then streams the ZIP.
//! Entry timestamps are pinned so identical input gives identical bytes.

use crate::comments_io::{write_comments, write_comments_extended};
use crate::content_types::ContentTypes;
use crate::document_writer::DocumentWriter;
use crate::error::DocxResult;
use crate::extensions_io::{
    write_custom_item, write_custom_item_props, write_taskpanes, write_web_extension,
};
use crate::numbering_writer::write_numbering;
use crate::options::BuildOptions;
use crate::plan::PackagePlan;
use crate::props_io::{write_core_props, write_custom_props, write_settings};
use crate::styles_writer::write_styles;
use crate::{content_type_values, part_names};
use doc_model::Document;
use std::io::{Seek, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

/// A rendered part waiting to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Part {
    pub name: String,
    /// Override declared in the manifest; `None` falls back to the extension default
    pub content_type: Option<&'static str>,
    pub content: String,
}

impl Part {
    fn new(name: impl Into<String>, content_type: Option<&'static str>, content: String) -> Self {
        Self {
            name: name.into(),
            content_type,
            content,
        }
    }
}

/// Main DOCX writer
pub struct DocxWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
    options: BuildOptions,
}

impl<W: Write + Seek> DocxWriter<W> {
    /// Create a new DOCX writer
    pub fn new(writer: W, options: BuildOptions) -> Self {
        Self {
            zip: ZipWriter::new(writer),
            options,
        }
    }

    /// Write a complete package and hand back the underlying writer.
    /// Nothing is written when the document fails validation.
    pub fn write(mut self, doc: &Document) -> DocxResult<W> {
        let plan = PackagePlan::new(doc)?;
        let parts = render_parts(&plan, &self.options);

        let manifest = content_types_for(&parts);
        self.write_file(part_names::CONTENT_TYPES, &manifest.to_xml())?;
        for part in &parts {
            self.write_file(&part.name, &part.content)?;
        }

        tracing::debug!(parts = parts.len() + 1, "package written");
        Ok(self.zip.finish()?)
    }

    /// Write a file to the ZIP archive
    fn write_file(&mut self, path: &str, content: &str) -> DocxResult<()> {
        let options = SimpleFileOptions::default()
            .compression_method(self.options.compression.method())
            .last_modified_time(zip::DateTime::default());

        tracing::debug!(part = path, bytes = content.len(), "writing part");
        self.zip.start_file(path, options)?;
        self.zip.write_all(content.as_bytes())?;

        Ok(())
    }
}

/// Render every part of the package, manifest excluded, in storage order
pub(crate) fn render_parts(plan: &PackagePlan, options: &BuildOptions) -> Vec<Part> {
    let doc = plan.doc;
    let mut parts = Vec::new();

    parts.push(Part::new(part_names::ROOT_RELS, None, plan.root_rels.to_xml()));
    parts.push(Part::new(
        part_names::CORE,
        Some(content_type_values::CORE_PROPERTIES),
        write_core_props(&doc.doc_props, options),
    ));
    if plan.features.custom_properties {
        parts.push(Part::new(
            part_names::CUSTOM,
            Some(content_type_values::CUSTOM_PROPERTIES),
            write_custom_props(&doc.doc_props.custom_properties),
        ));
    }

    parts.push(Part::new(part_names::DOCUMENT_RELS, None, plan.doc_rels.to_xml()));

    // Body and comments share one writer so revision ids never repeat
    let mut writer = DocumentWriter::new(plan, options);
    parts.push(Part::new(
        part_names::DOCUMENT,
        Some(content_type_values::DOCUMENT),
        writer.write(doc),
    ));
    parts.push(Part::new(
        part_names::STYLES,
        Some(content_type_values::STYLES),
        write_styles(&doc.styles),
    ));
    parts.push(Part::new(
        part_names::SETTINGS,
        Some(content_type_values::SETTINGS),
        write_settings(&doc.settings),
    ));
    if plan.features.numbering {
        parts.push(Part::new(
            part_names::NUMBERING,
            Some(content_type_values::NUMBERING),
            write_numbering(&doc.abstract_numberings, &doc.numberings),
        ));
    }
    if plan.features.comments {
        parts.push(Part::new(
            part_names::COMMENTS,
            Some(content_type_values::COMMENTS),
            write_comments(plan, &mut writer),
        ));
        parts.push(Part::new(
            part_names::COMMENTS_EXTENDED,
            Some(content_type_values::COMMENTS_EXTENDED),
            write_comments_extended(plan),
        ));
    }

    if plan.features.web_extensions {
        parts.push(Part::new(
            part_names::TASKPANES,
            Some(content_type_values::WEB_EXTENSION_TASKPANES),
            write_taskpanes(&plan.web_extension_rel_ids),
        ));
        parts.push(Part::new(
            part_names::TASKPANES_RELS,
            None,
            plan.taskpane_rels.to_xml(),
        ));
        for (index, extension) in doc.web_extensions.iter().enumerate() {
            parts.push(Part::new(
                part_names::web_extension(index + 1),
                Some(content_type_values::WEB_EXTENSION),
                write_web_extension(extension),
            ));
        }
    }

    for (index, (item, rels)) in doc.custom_items.iter().zip(&plan.custom_item_rels).enumerate() {
        let number = index + 1;
        parts.push(Part::new(
            part_names::custom_item(number),
            None,
            write_custom_item(item),
        ));
        parts.push(Part::new(
            part_names::custom_item_props(number),
            Some(content_type_values::CUSTOM_XML_PROPERTIES),
            write_custom_item_props(item),
        ));
        parts.push(Part::new(part_names::custom_item_rels(number), None, rels.to_xml()));
    }

    parts
}

/// Manifest declaring exactly the rendered parts
pub(crate) fn content_types_for(parts: &[Part]) -> ContentTypes {
    let mut content_types = ContentTypes::new();
    for part in parts {
        if let Some(content_type) = part.content_type {
            content_types.add_override(&part.name, content_type);
        }
    }
    content_types
}
