//! ZIP archive reading and XML parsing utilities

use crate::error::{PackageError, XmlError, XmlResult};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// A wrapper around a ZIP archive for reading DOCX files
pub struct DocxReader<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> DocxReader<R> {
    /// Create a new DOCX reader from a source that implements Read + Seek
    pub fn new(reader: R) -> Result<Self, PackageError> {
        let archive = ZipArchive::new(reader)?;
        Ok(Self { archive })
    }

    /// Read a file from the archive as a string
    pub fn read_file_as_string(&mut self, path: &str) -> Result<String, PackageError> {
        let mut file = self.archive.by_name(path).map_err(|e| {
            if matches!(e, zip::result::ZipError::FileNotFound) {
                PackageError::MissingPart(path.to_string())
            } else {
                PackageError::from(e)
            }
        })?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;
        String::from_utf8(bytes).map_err(|e| PackageError::MalformedXml {
            part: path.to_string(),
            message: e.to_string(),
        })
    }

    /// Check if a file exists in the archive
    pub fn file_exists(&self, path: &str) -> bool {
        self.archive.file_names().any(|name| name == path)
    }

    /// Get a list of all files in the archive
    pub fn file_names(&self) -> Vec<&str> {
        self.archive.file_names().collect()
    }
}

/// XML reader utilities for parsing DOCX XML content
pub struct XmlParser;

impl XmlParser {
    /// Reader for structural parts; whitespace-only text is dropped
    pub fn from_string(content: &str) -> Reader<&[u8]> {
        let mut reader = Reader::from_str(content);
        reader.config_mut().trim_text(true);
        reader
    }

    /// Reader for content parts; text is kept exactly as written
    pub fn from_content(content: &str) -> Reader<&[u8]> {
        Reader::from_str(strip_bom(content))
    }

    /// Get an attribute value from an event
    pub fn get_attribute(event: &BytesStart, name: &[u8]) -> Option<String> {
        event
            .attributes()
            .filter_map(|a| a.ok())
            .find(|a| a.key.as_ref() == name)
            .map(|a| match a.unescape_value() {
                Ok(value) => value.into_owned(),
                Err(_) => String::from_utf8_lossy(&a.value).to_string(),
            })
    }

    /// Get an attribute value with a namespace prefix
    pub fn get_prefixed_attribute(event: &BytesStart, prefix: &str, local: &str) -> Option<String> {
        let key = format!("{}:{}", prefix, local);
        Self::get_attribute(event, key.as_bytes())
    }

    /// Get a w: namespaced attribute (most common in DOCX)
    pub fn get_w_attribute(event: &BytesStart, name: &str) -> Option<String> {
        Self::get_prefixed_attribute(event, "w", name)
            .or_else(|| Self::get_attribute(event, name.as_bytes()))
    }

    /// Get a r: namespaced attribute
    pub fn get_r_attribute(event: &BytesStart, name: &str) -> Option<String> {
        Self::get_prefixed_attribute(event, "r", name)
    }

    /// Parse a numeric w: attribute; malformed numbers count as absent
    pub fn get_w_number<T: std::str::FromStr>(event: &BytesStart, name: &str) -> Option<T> {
        Self::get_w_attribute(event, name).and_then(|v| v.trim().parse().ok())
    }

    /// Parse an on/off toggle element; a missing `w:val` means on
    pub fn get_w_toggle(event: &BytesStart) -> bool {
        Self::get_w_attribute(event, "val")
            .map(|v| Self::parse_bool(&v))
            .unwrap_or(true)
    }

    /// Parse a boolean value (0/1, true/false, on/off)
    pub fn parse_bool(value: &str) -> bool {
        matches!(
            value.to_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        )
    }

    /// Check if an element name matches with optional namespace prefix
    pub fn matches_element(name: &[u8], expected: &str) -> bool {
        let name_str = std::str::from_utf8(name).unwrap_or("");
        name_str == expected || name_str.ends_with(&format!(":{}", expected))
    }

    /// Consume everything up to and including the end of `start`
    pub fn skip(reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<()> {
        reader.read_to_end(start.name())?;
        Ok(())
    }

    /// Collect the text content of `start`, consuming its end tag
    pub fn read_text(reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<String> {
        let mut text = String::new();
        loop {
            match reader.read_event()? {
                Event::Text(t) => {
                    let value = t.unescape().map_err(|e| XmlError::new(e.to_string()))?;
                    text.push_str(&value);
                }
                Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c.into_inner())),
                Event::Start(e) => Self::skip(reader, &e)?,
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(start)),
                _ => {}
            }
        }
        Ok(text)
    }
}

/// Advance to the root element and check its local name. The flag is false
/// for an empty root (`<w:styles/>`), which has no end tag to read up to.
pub(crate) fn read_root<'a>(
    reader: &mut Reader<&'a [u8]>,
    expected: &str,
) -> XmlResult<(BytesStart<'a>, bool)> {
    let (root, has_children) = loop {
        match reader.read_event()? {
            Event::Start(e) => break (e, true),
            Event::Empty(e) => break (e, false),
            Event::Eof => return Err(XmlError::new("missing root element")),
            _ => {}
        }
    };
    if !XmlParser::matches_element(root.name().as_ref(), expected) {
        return Err(XmlError::new(format!(
            "unexpected root element <{}>, expected {}",
            String::from_utf8_lossy(root.name().as_ref()),
            expected
        )));
    }
    Ok((root, has_children))
}

/// Error for a document that ends inside `start`
pub(crate) fn unexpected_eof(start: &BytesStart) -> XmlError {
    XmlError::new(format!(
        "unexpected end of document inside <{}>",
        String::from_utf8_lossy(start.name().as_ref())
    ))
}

fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool() {
        assert!(XmlParser::parse_bool("1"));
        assert!(XmlParser::parse_bool("true"));
        assert!(XmlParser::parse_bool("on"));
        assert!(!XmlParser::parse_bool("0"));
        assert!(!XmlParser::parse_bool("false"));
    }

    #[test]
    fn test_matches_element() {
        assert!(XmlParser::matches_element(b"p", "p"));
        assert!(XmlParser::matches_element(b"w:p", "p"));
        assert!(!XmlParser::matches_element(b"w:r", "p"));
    }

    #[test]
    fn test_attribute_values_are_unescaped() {
        let mut reader = XmlParser::from_string(r#"<w:comment w:author="A &amp; B"/>"#);
        match reader.read_event().unwrap() {
            Event::Empty(e) => {
                assert_eq!(XmlParser::get_w_attribute(&e, "author").as_deref(), Some("A & B"));
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_content_reader_keeps_whitespace() {
        let mut reader = XmlParser::from_content(r#"<w:t xml:space="preserve">  two  </w:t>"#);
        let start = match reader.read_event().unwrap() {
            Event::Start(e) => e,
            other => panic!("unexpected event {:?}", other),
        };
        let text = XmlParser::read_text(&mut reader, &start).unwrap();
        assert_eq!(text, "  two  ");
    }

    #[test]
    fn test_read_text_reports_truncation() {
        let mut reader = XmlParser::from_content("<w:t>abc");
        let start = match reader.read_event().unwrap() {
            Event::Start(e) => e,
            other => panic!("unexpected event {:?}", other),
        };
        assert!(XmlParser::read_text(&mut reader, &start).is_err());
    }

    #[test]
    fn test_toggle() {
        let mut reader = XmlParser::from_string(r#"<a><w:b/><w:i w:val="0"/></a>"#);
        let mut toggles = Vec::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Empty(e) => toggles.push(XmlParser::get_w_toggle(&e)),
                Event::Eof => break,
                _ => {}
            }
        }
        assert_eq!(toggles, vec![true, false]);
    }
}
