//! Main DOCX parsing logic
//!
//! This module coordinates parsing of all DOCX parts and builds the Document.
//! Parts are located through the relationship files; when a relationship is
//! missing the conventional part name is tried instead. Only the main
//! document part is required.

use crate::comments_io::{apply_extended, attach_comments, CommentsParser};
use crate::content_types::ContentTypes;
use crate::document::DocumentParser;
use crate::error::{DocxResult, PackageError, XmlResult};
use crate::extensions_io::{custom_item_payload, ExtensionsParser};
use crate::lists::NumberingParser;
use crate::options::ReadOptions;
use crate::props_io::PropsParser;
use crate::reader::DocxReader;
use crate::relationships::{rels_path_for, resolve_target, Relationships};
use crate::styles::StylesParser;
use crate::{content_type_values, part_names, relationship_types};
use doc_model::{CustomItem, Document};
use std::io::{Read, Seek};

/// Main parser for DOCX files
pub struct DocxParser {
    options: ReadOptions,
}

impl DocxParser {
    pub fn new(options: ReadOptions) -> Self {
        Self { options }
    }

    /// Parse a DOCX package into a Document
    pub fn parse<R: Read + Seek>(&self, reader: R) -> DocxResult<Document> {
        let mut docx = DocxReader::new(reader)?;

        let root_rels = self
            .read_optional(&mut docx, Some(part_names::ROOT_RELS.to_string()), Relationships::parse)?
            .unwrap_or_default();
        let document_path = self.locate_document(&mut docx, &root_rels)?;

        let content = docx.read_file_as_string(&document_path)?;
        tracing::debug!(part = %document_path, bytes = content.len(), "parsing main document");
        let body = DocumentParser::new()
            .parse(&content)
            .map_err(|e| e.in_part(&document_path))?;

        let mut document = Document::new();
        document.children = body.children;
        document.section_property = body.section_property;

        let doc_rels = self
            .read_optional(&mut docx, Some(rels_path_for(&document_path)), Relationships::parse)?
            .unwrap_or_default();
        let locate = |docx: &DocxReader<R>, rel_type: &str, conventional: &str| {
            locate_part(docx, &doc_rels, &document_path, rel_type, conventional)
        };

        let styles_path = locate(&docx, relationship_types::STYLES, part_names::STYLES);
        if let Some(styles) = self.read_optional(&mut docx, styles_path, |c| StylesParser::new().parse(c))? {
            document.styles = styles;
        }

        let settings_path = locate(&docx, relationship_types::SETTINGS, part_names::SETTINGS);
        if let Some(settings) = self.read_optional(&mut docx, settings_path, |c| PropsParser::new().parse_settings(c))? {
            document.settings = settings;
        }

        let numbering_path = locate(&docx, relationship_types::NUMBERING, part_names::NUMBERING);
        if let Some((abstract_nums, nums)) =
            self.read_optional(&mut docx, numbering_path, |c| NumberingParser::new().parse(c))?
        {
            document.abstract_numberings = abstract_nums;
            document.numberings = nums;
        }

        let comments_parser = CommentsParser::new();
        let comments_path = locate(&docx, relationship_types::COMMENTS, part_names::COMMENTS);
        if let Some(mut comments) =
            self.read_optional(&mut docx, comments_path, |c| comments_parser.parse_comments(c))?
        {
            let extended_path = locate(
                &docx,
                relationship_types::COMMENTS_EXTENDED,
                part_names::COMMENTS_EXTENDED,
            );
            if let Some(extended) = self.read_optional(&mut docx, extended_path, |c| {
                comments_parser.parse_comments_extended(c)
            })? {
                apply_extended(&mut comments, &extended);
            }
            attach_comments(
                &mut document.children,
                comments.into_iter().map(|c| c.comment).collect(),
            );
        }

        let taskpanes_path = locate(
            &docx,
            relationship_types::WEB_EXTENSION_TASKPANES,
            part_names::TASKPANES,
        );
        document.web_extensions = self.read_web_extensions(&mut docx, taskpanes_path)?;
        document.custom_items = self.read_custom_items(&mut docx, &doc_rels, &document_path)?;

        let core_path = locate_part(
            &docx,
            &root_rels,
            "",
            relationship_types::CORE_PROPERTIES,
            part_names::CORE,
        );
        if let Some(props) = self.read_optional(&mut docx, core_path, |c| PropsParser::new().parse_core(c))? {
            document.doc_props = props;
        }
        let custom_path = locate_part(
            &docx,
            &root_rels,
            "",
            relationship_types::CUSTOM_PROPERTIES,
            part_names::CUSTOM,
        );
        if let Some(custom) = self.read_optional(&mut docx, custom_path, |c| PropsParser::new().parse_custom(c))? {
            document.doc_props.custom_properties = custom;
        }

        Ok(document)
    }

    /// Main document part: the officeDocument relationship, then the
    /// manifest's main-document override, then the conventional name
    fn locate_document<R: Read + Seek>(
        &self,
        docx: &mut DocxReader<R>,
        root_rels: &Relationships,
    ) -> DocxResult<String> {
        if let Some(rel) = root_rels.get_by_type(relationship_types::DOCUMENT) {
            return Ok(resolve_target("", &rel.target));
        }

        let manifest = self.read_optional(
            docx,
            Some(part_names::CONTENT_TYPES.to_string()),
            ContentTypes::parse,
        )?;
        let declared = manifest.and_then(|ct| {
            ct.overrides
                .iter()
                .find(|(_, content_type)| content_type == content_type_values::DOCUMENT)
                .map(|(part, _)| resolve_target("", part))
        });

        let path = declared.unwrap_or_else(|| part_names::DOCUMENT.to_string());
        if docx.file_exists(&path) {
            Ok(path)
        } else {
            Err(PackageError::MissingPart(path).into())
        }
    }

    fn read_web_extensions<R: Read + Seek>(
        &self,
        docx: &mut DocxReader<R>,
        taskpanes_path: Option<String>,
    ) -> DocxResult<Vec<doc_model::WebExtension>> {
        let parser = ExtensionsParser::new();
        let Some(taskpanes_path) = taskpanes_path else {
            return Ok(Vec::new());
        };
        let Some(rel_ids) =
            self.read_optional(docx, Some(taskpanes_path.clone()), |c| parser.parse_taskpanes(c))?
        else {
            return Ok(Vec::new());
        };

        let rels = self
            .read_optional(docx, Some(rels_path_for(&taskpanes_path)), Relationships::parse)?
            .unwrap_or_default();

        let mut extensions = Vec::new();
        for (index, rel_id) in rel_ids.iter().enumerate() {
            let path = match rels.get(rel_id) {
                Some(rel) => resolve_target(&taskpanes_path, &rel.target),
                None => part_names::web_extension(index + 1),
            };
            if let Some(extension) =
                self.read_optional(docx, Some(path), |c| parser.parse_web_extension(c))?
            {
                extensions.push(extension);
            }
        }

        Ok(extensions)
    }

    fn read_custom_items<R: Read + Seek>(
        &self,
        docx: &mut DocxReader<R>,
        doc_rels: &Relationships,
        document_path: &str,
    ) -> DocxResult<Vec<CustomItem>> {
        let mut paths: Vec<String> = doc_rels
            .get_all_by_type(relationship_types::CUSTOM_XML)
            .into_iter()
            .map(|rel| resolve_target(document_path, &rel.target))
            .collect();
        if paths.is_empty() {
            paths = conventional_custom_items(docx);
        }

        let parser = ExtensionsParser::new();
        let mut items = Vec::new();
        for path in paths {
            let Some(payload) = self.read_optional(docx, Some(path.clone()), |c| Ok(custom_item_payload(c)))?
            else {
                continue;
            };

            let props_path = self
                .read_optional(docx, Some(rels_path_for(&path)), Relationships::parse)?
                .and_then(|rels| {
                    rels.get_by_type(relationship_types::CUSTOM_XML_PROPS)
                        .map(|rel| resolve_target(&path, &rel.target))
                });
            let id = self
                .read_optional(docx, props_path, |c| parser.parse_custom_item_id(c))?
                .flatten();
            let id = id.unwrap_or_else(|| {
                tracing::warn!(part = %path, "custom XML item has no datastore id");
                String::new()
            });

            items.push(CustomItem::new(id, payload));
        }

        Ok(items)
    }

    /// Read and parse an optional part. A missing part is `None`; an unreadable
    /// one is an error in strict mode and skipped otherwise.
    fn read_optional<R: Read + Seek, T>(
        &self,
        docx: &mut DocxReader<R>,
        path: Option<String>,
        parse: impl FnOnce(&str) -> XmlResult<T>,
    ) -> DocxResult<Option<T>> {
        let Some(path) = path else {
            return Ok(None);
        };
        if !docx.file_exists(&path) {
            return Ok(None);
        }

        let parsed = docx.read_file_as_string(&path).and_then(|content| {
            tracing::debug!(part = %path, bytes = content.len(), "parsing part");
            parse(&content).map_err(|e| e.in_part(&path))
        });

        match parsed {
            Ok(value) => Ok(Some(value)),
            Err(err) if self.options.strict_optional_parts => Err(err.into()),
            Err(err) => {
                tracing::warn!(part = %path, error = %err, "skipping unreadable optional part");
                Ok(None)
            }
        }
    }
}

/// Resolve a relationship of `rel_type` owned by `source`, or fall back to the
/// conventional name when the package has it
fn locate_part<R: Read + Seek>(
    docx: &DocxReader<R>,
    rels: &Relationships,
    source: &str,
    rel_type: &str,
    conventional: &str,
) -> Option<String> {
    match rels.get_by_type(rel_type) {
        Some(rel) => Some(resolve_target(source, &rel.target)),
        None if docx.file_exists(conventional) => Some(conventional.to_string()),
        None => None,
    }
}

/// `customXml/item{N}.xml` entries ordered by N
fn conventional_custom_items<R: Read + Seek>(docx: &DocxReader<R>) -> Vec<String> {
    let mut numbered: Vec<(usize, String)> = docx
        .file_names()
        .into_iter()
        .filter_map(|name| {
            let number = name
                .strip_prefix("customXml/item")?
                .strip_suffix(".xml")?
                .parse()
                .ok()?;
            Some((number, name.to_string()))
        })
        .collect();
    numbered.sort();
    numbered.into_iter().map(|(_, name)| name).collect()
}
