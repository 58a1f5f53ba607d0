//! [Content_Types].xml parsing and generation
//!
//! Entries keep insertion order so the manifest is byte-stable between builds.

use crate::content_type_values;
use crate::error::XmlResult;
use crate::reader::XmlParser;
use quick_xml::events::Event;

/// Represents the content types in a DOCX package
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentTypes {
    /// Default content types by extension (e.g., "xml" -> "application/xml")
    pub defaults: Vec<(String, String)>,
    /// Override content types by part name (e.g., "/word/document.xml" -> "...")
    pub overrides: Vec<(String, String)>,
}

impl ContentTypes {
    /// Create a new ContentTypes with the `rels` and `xml` defaults
    pub fn new() -> Self {
        let mut ct = Self::default();
        ct.add_default("rels", content_type_values::RELATIONSHIPS);
        ct.add_default("xml", content_type_values::XML);
        ct
    }

    /// Parse [Content_Types].xml from its content
    pub(crate) fn parse(content: &str) -> XmlResult<Self> {
        let mut result = Self::default();
        let mut reader = XmlParser::from_string(content);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Empty(ref e) | Event::Start(ref e) => {
                    let name = e.name();
                    if XmlParser::matches_element(name.as_ref(), "Default") {
                        if let (Some(ext), Some(ct)) = (
                            XmlParser::get_attribute(e, b"Extension"),
                            XmlParser::get_attribute(e, b"ContentType"),
                        ) {
                            result.add_default(&ext, &ct);
                        }
                    } else if XmlParser::matches_element(name.as_ref(), "Override") {
                        if let (Some(part), Some(ct)) = (
                            XmlParser::get_attribute(e, b"PartName"),
                            XmlParser::get_attribute(e, b"ContentType"),
                        ) {
                            result.add_override(&part, &ct);
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(result)
    }

    /// Parse a manifest from outside the crate, e.g. to audit a built package
    pub fn from_xml(content: &str) -> Result<Self, crate::PackageError> {
        Self::parse(content).map_err(|e| e.in_part(crate::part_names::CONTENT_TYPES))
    }

    /// Get the content type for a given path
    pub fn get_content_type(&self, path: &str) -> Option<&str> {
        let normalized = normalize_part_name(path);
        if let Some((_, ct)) = self.overrides.iter().find(|(p, _)| *p == normalized) {
            return Some(ct);
        }

        let ext = path.rsplit('.').next()?;
        self.defaults
            .iter()
            .find(|(e, _)| e.eq_ignore_ascii_case(ext))
            .map(|(_, ct)| ct.as_str())
    }

    /// Add a default for an extension; an existing entry is replaced in place
    pub fn add_default(&mut self, extension: &str, content_type: &str) {
        match self.defaults.iter_mut().find(|(e, _)| e == extension) {
            Some(entry) => entry.1 = content_type.to_string(),
            None => self
                .defaults
                .push((extension.to_string(), content_type.to_string())),
        }
    }

    /// Add an override for a specific part
    pub fn add_override(&mut self, part_name: &str, content_type: &str) {
        let normalized = normalize_part_name(part_name);
        match self.overrides.iter_mut().find(|(p, _)| *p == normalized) {
            Some(entry) => entry.1 = content_type.to_string(),
            None => self.overrides.push((normalized, content_type.to_string())),
        }
    }

    /// Generate XML content for [Content_Types].xml
    pub fn to_xml(&self) -> String {
        let mut xml = String::new();
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(&format!(r#"<Types xmlns="{}">"#, crate::namespaces::CT));

        for (ext, ct) in &self.defaults {
            xml.push_str(&format!(
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                ext, ct
            ));
        }

        for (part, ct) in &self.overrides {
            xml.push_str(&format!(
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                part, ct
            ));
        }

        xml.push_str("</Types>");
        xml
    }
}

fn normalize_part_name(part_name: &str) -> String {
    if part_name.starts_with('/') {
        part_name.to_string()
    } else {
        format!("/{}", part_name)
    }
}
