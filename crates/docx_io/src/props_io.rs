//! Document metadata and settings parts
//!
//! `docProps/core.xml`, `docProps/custom.xml` and `word/settings.xml`.

use crate::document_writer::escape_xml;
use crate::error::XmlResult;
use crate::namespaces;
use crate::options::BuildOptions;
use crate::reader::{read_root, unexpected_eof, XmlParser};
use doc_model::{CustomProperty, DocProps, DocVar, Settings};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Format id shared by all user-defined custom properties
const CUSTOM_PROPERTY_FMTID: &str = "{D5CDD505-2E9C-101B-9397-08002B2CF9AE}";

/// Property ids 0 and 1 are reserved by OLE
const FIRST_CUSTOM_PROPERTY_PID: usize = 2;

// =============================================================================
// Writers
// =============================================================================

/// Generate docProps/core.xml; unset timestamps take the build clock
pub(crate) fn write_core_props(props: &DocProps, options: &BuildOptions) -> String {
    let now = options.timestamp_string();
    let created = props.created.as_deref().unwrap_or(&now);
    let updated = props.updated.as_deref().unwrap_or(&now);

    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(&format!(
        r#"<cp:coreProperties xmlns:cp="{}" xmlns:dc="{}" xmlns:dcterms="{}" xmlns:dcmitype="{}" xmlns:xsi="{}">"#,
        namespaces::CP,
        namespaces::DC,
        namespaces::DCTERMS,
        namespaces::DCMITYPE,
        namespaces::XSI,
    ));

    xml.push_str(&format!(
        r#"<dcterms:created xsi:type="dcterms:W3CDTF">{}</dcterms:created>"#,
        escape_xml(created)
    ));
    if let Some(ref creator) = props.creator {
        xml.push_str(&format!("<dc:creator>{}</dc:creator>", escape_xml(creator)));
    }
    if let Some(ref name) = props.last_modified_by {
        xml.push_str(&format!(
            "<cp:lastModifiedBy>{}</cp:lastModifiedBy>",
            escape_xml(name)
        ));
    }
    xml.push_str(&format!(
        r#"<dcterms:modified xsi:type="dcterms:W3CDTF">{}</dcterms:modified>"#,
        escape_xml(updated)
    ));
    if let Some(revision) = props.revision {
        xml.push_str(&format!("<cp:revision>{}</cp:revision>", revision));
    }

    xml.push_str("</cp:coreProperties>");
    xml
}

/// Generate docProps/custom.xml
pub(crate) fn write_custom_props(properties: &[CustomProperty]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(&format!(
        r#"<Properties xmlns="{}" xmlns:vt="{}">"#,
        namespaces::CUSTOM_PROPS,
        namespaces::VT
    ));

    for (index, property) in properties.iter().enumerate() {
        xml.push_str(&format!(
            r#"<property fmtid="{}" pid="{}" name="{}"><vt:lpwstr>{}</vt:lpwstr></property>"#,
            CUSTOM_PROPERTY_FMTID,
            FIRST_CUSTOM_PROPERTY_PID + index,
            escape_xml(&property.name),
            escape_xml(&property.value),
        ));
    }

    xml.push_str("</Properties>");
    xml
}

/// Generate word/settings.xml
pub(crate) fn write_settings(settings: &Settings) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(&format!(
        r#"<w:settings xmlns:w="{}" xmlns:w14="{}" xmlns:w15="{}" xmlns:mc="{}" mc:Ignorable="w14 w15">"#,
        namespaces::W,
        namespaces::W14,
        namespaces::W15,
        namespaces::MC,
    ));

    xml.push_str(&format!(r#"<w:zoom w:percent="{}"/>"#, settings.zoom));
    xml.push_str(&format!(
        r#"<w:defaultTabStop w:val="{}"/>"#,
        settings.default_tab_stop
    ));
    xml.push_str(concat!(
        "<w:compat>",
        r#"<w:compatSetting w:name="compatibilityMode" w:uri="http://schemas.microsoft.com/office/word" w:val="15"/>"#,
        "</w:compat>"
    ));

    if !settings.doc_vars.is_empty() {
        xml.push_str("<w:docVars>");
        for var in &settings.doc_vars {
            xml.push_str(&format!(
                r#"<w:docVar w:name="{}" w:val="{}"/>"#,
                escape_xml(&var.name),
                escape_xml(&var.val)
            ));
        }
        xml.push_str("</w:docVars>");
    }

    if let Some(ref doc_id) = settings.doc_id {
        xml.push_str(&format!(r#"<w15:docId w15:val="{}"/>"#, escape_xml(doc_id)));
    }

    xml.push_str("</w:settings>");
    xml
}

// =============================================================================
// Parsers
// =============================================================================

/// Parser for the metadata and settings parts
pub(crate) struct PropsParser;

impl PropsParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse docProps/core.xml; custom properties are left empty
    pub fn parse_core(&self, content: &str) -> XmlResult<DocProps> {
        let mut props = DocProps::default();
        let mut reader = XmlParser::from_content(content);
        let (root, open) = read_root(&mut reader, "coreProperties")?;
        if !open {
            return Ok(props);
        }

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = e.name();
                    let name_ref = name.as_ref();

                    if XmlParser::matches_element(name_ref, "created") {
                        props.created = Some(XmlParser::read_text(&mut reader, &e)?.trim().to_string());
                    } else if XmlParser::matches_element(name_ref, "modified") {
                        props.updated = Some(XmlParser::read_text(&mut reader, &e)?.trim().to_string());
                    } else if XmlParser::matches_element(name_ref, "creator") {
                        props.creator = Some(XmlParser::read_text(&mut reader, &e)?);
                    } else if XmlParser::matches_element(name_ref, "lastModifiedBy") {
                        props.last_modified_by = Some(XmlParser::read_text(&mut reader, &e)?);
                    } else if XmlParser::matches_element(name_ref, "revision") {
                        props.revision = XmlParser::read_text(&mut reader, &e)?.trim().parse().ok();
                    } else {
                        XmlParser::skip(&mut reader, &e)?;
                    }
                }
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(&root)),
                _ => {}
            }
        }

        Ok(props)
    }

    /// Parse docProps/custom.xml; every value type is read as text
    pub fn parse_custom(&self, content: &str) -> XmlResult<Vec<CustomProperty>> {
        let mut properties = Vec::new();
        let mut reader = XmlParser::from_content(content);
        let (root, open) = read_root(&mut reader, "Properties")?;
        if !open {
            return Ok(properties);
        }

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    if XmlParser::matches_element(e.name().as_ref(), "property") {
                        let name = XmlParser::get_attribute(&e, b"name").unwrap_or_default();
                        let value = self.parse_property_value(&mut reader, &e)?;
                        properties.push(CustomProperty { name, value });
                    } else {
                        XmlParser::skip(&mut reader, &e)?;
                    }
                }
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(&root)),
                _ => {}
            }
        }

        Ok(properties)
    }

    fn parse_property_value(&self, reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<String> {
        let mut value = String::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => value = XmlParser::read_text(reader, &e)?,
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(start)),
                _ => {}
            }
        }

        Ok(value)
    }

    /// Parse word/settings.xml; absent values keep their defaults
    pub fn parse_settings(&self, content: &str) -> XmlResult<Settings> {
        let mut settings = Settings::default();
        let mut reader = XmlParser::from_string(content);
        let (root, open) = read_root(&mut reader, "settings")?;
        if !open {
            return Ok(settings);
        }

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    if XmlParser::matches_element(e.name().as_ref(), "docVars") {
                        settings.doc_vars = self.parse_doc_vars(&mut reader, &e)?;
                    } else {
                        apply_settings_element(&e, &mut settings);
                        XmlParser::skip(&mut reader, &e)?;
                    }
                }
                Event::Empty(e) => apply_settings_element(&e, &mut settings),
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(&root)),
                _ => {}
            }
        }

        Ok(settings)
    }

    fn parse_doc_vars(&self, reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<Vec<DocVar>> {
        let mut vars = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Empty(e) => {
                    if XmlParser::matches_element(e.name().as_ref(), "docVar") {
                        if let Some(name) = XmlParser::get_w_attribute(&e, "name") {
                            let val = XmlParser::get_w_attribute(&e, "val").unwrap_or_default();
                            vars.push(DocVar { name, val });
                        }
                    }
                }
                Event::Start(e) => XmlParser::skip(reader, &e)?,
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(start)),
                _ => {}
            }
        }

        Ok(vars)
    }
}

fn apply_settings_element(e: &BytesStart, settings: &mut Settings) {
    let name = e.name();
    let name_ref = name.as_ref();

    if XmlParser::matches_element(name_ref, "zoom") {
        if let Some(percent) = XmlParser::get_w_number(e, "percent") {
            settings.zoom = percent;
        }
    } else if XmlParser::matches_element(name_ref, "defaultTabStop") {
        if let Some(tab_stop) = XmlParser::get_w_number(e, "val") {
            settings.default_tab_stop = tab_stop;
        }
    } else if name_ref == b"w15:docId" {
        settings.doc_id = XmlParser::get_prefixed_attribute(e, "w15", "val");
    }
}
