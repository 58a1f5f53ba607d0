//! Web extension task panes and custom XML items
//!
//! Task panes list one `wetp:taskpane` per add-in, each pointing through the
//! task pane rels at a `we:webextension` manifest. Custom XML items are
//! opaque payloads; only their datastore id is interpreted.

use crate::document_writer::escape_xml;
use crate::error::XmlResult;
use crate::namespaces;
use crate::reader::{read_root, unexpected_eof, XmlParser};
use doc_model::{strip_xml_declaration, CustomItem, WebExtension, WebExtensionProperty};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

// =============================================================================
// Writers
// =============================================================================

/// Generate word/webextensions/taskpanes.xml from the task pane rel ids
pub(crate) fn write_taskpanes(rel_ids: &[String]) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECLARATION);
    xml.push('\n');
    xml.push_str(&format!(r#"<wetp:taskpanes xmlns:wetp="{}">"#, namespaces::WETP));

    for (index, rel_id) in rel_ids.iter().enumerate() {
        xml.push_str(&format!(
            r#"<wetp:taskpane dockstate="right" visibility="0" width="350" row="{}">"#,
            index + 1
        ));
        xml.push_str(&format!(
            r#"<wetp:webextensionref xmlns:r="{}" r:id="{}"/>"#,
            namespaces::R,
            rel_id
        ));
        xml.push_str("</wetp:taskpane>");
    }

    xml.push_str("</wetp:taskpanes>");
    xml
}

/// Generate one word/webextensions/webextension{N}.xml
pub(crate) fn write_web_extension(extension: &WebExtension) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECLARATION);
    xml.push('\n');
    xml.push_str(&format!(
        r#"<we:webextension xmlns:we="{}" id="{}">"#,
        namespaces::WE,
        escape_xml(&extension.id)
    ));
    xml.push_str(&format!(
        r#"<we:reference id="{}" version="{}" store="{}" storeType="{}"/>"#,
        escape_xml(&extension.reference_id),
        escape_xml(&extension.version),
        escape_xml(&extension.store),
        escape_xml(&extension.store_type),
    ));
    xml.push_str("<we:alternateReferences/>");

    xml.push_str("<we:properties>");
    for property in &extension.properties {
        xml.push_str(&format!(
            r#"<we:property name="{}" value="{}"/>"#,
            escape_xml(&property.name),
            escape_xml(&property.value)
        ));
    }
    xml.push_str("</we:properties>");

    xml.push_str("<we:bindings/>");
    xml.push_str(&format!(r#"<we:snapshot xmlns:r="{}"/>"#, namespaces::R));
    xml.push_str("</we:webextension>");
    xml
}

/// The payload of customXml/item{N}.xml under the package's own declaration
pub(crate) fn write_custom_item(item: &CustomItem) -> String {
    format!("{}\n{}", XML_DECLARATION, strip_xml_declaration(&item.xml))
}

/// Generate customXml/item{N}Props/core.xml
pub(crate) fn write_custom_item_props(item: &CustomItem) -> String {
    let mut xml = String::new();
    xml.push_str(XML_DECLARATION);
    xml.push('\n');
    xml.push_str(&format!(
        r#"<ds:datastoreItem ds:itemID="{}" xmlns:ds="{}"><ds:schemaRefs/></ds:datastoreItem>"#,
        escape_xml(&item.id),
        namespaces::DS
    ));
    xml
}

// =============================================================================
// Parsers
// =============================================================================

/// Parser for the task pane and custom XML parts
pub(crate) struct ExtensionsParser;

impl ExtensionsParser {
    pub fn new() -> Self {
        Self
    }

    /// Relationship ids of the task panes, in pane order
    pub fn parse_taskpanes(&self, content: &str) -> XmlResult<Vec<String>> {
        let mut rel_ids = Vec::new();
        let mut reader = XmlParser::from_string(content);
        let (root, open) = read_root(&mut reader, "taskpanes")?;
        if !open {
            return Ok(rel_ids);
        }

        // webextensionref sits one level down inside each taskpane
        loop {
            match reader.read_event()? {
                Event::Start(e) | Event::Empty(e) => {
                    if XmlParser::matches_element(e.name().as_ref(), "webextensionref") {
                        if let Some(id) = XmlParser::get_r_attribute(&e, "id") {
                            rel_ids.push(id);
                        }
                    }
                }
                Event::Eof => return Err(unexpected_eof(&root)),
                Event::End(e) => {
                    if e.name() == root.name() {
                        break;
                    }
                }
                _ => {}
            }
        }

        Ok(rel_ids)
    }

    pub fn parse_web_extension(&self, content: &str) -> XmlResult<WebExtension> {
        let mut reader = XmlParser::from_string(content);
        let (root, open) = read_root(&mut reader, "webextension")?;
        let id = XmlParser::get_attribute(&root, b"id").unwrap_or_default();
        let mut extension = WebExtension::new(id, "", "", "", "");
        if !open {
            return Ok(extension);
        }

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = e.name();
                    if XmlParser::matches_element(name.as_ref(), "properties") {
                        extension.properties = self.parse_properties(&mut reader, &e)?;
                    } else {
                        apply_reference(&e, &mut extension);
                        XmlParser::skip(&mut reader, &e)?;
                    }
                }
                Event::Empty(e) => apply_reference(&e, &mut extension),
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(&root)),
                _ => {}
            }
        }

        Ok(extension)
    }

    fn parse_properties(&self, reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<Vec<WebExtensionProperty>> {
        let mut properties = Vec::new();

        let mut collect = |e: &BytesStart| {
            if XmlParser::matches_element(e.name().as_ref(), "property") {
                properties.push(WebExtensionProperty {
                    name: XmlParser::get_attribute(e, b"name").unwrap_or_default(),
                    value: XmlParser::get_attribute(e, b"value").unwrap_or_default(),
                });
            }
        };

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    collect(&e);
                    XmlParser::skip(reader, &e)?;
                }
                Event::Empty(e) => collect(&e),
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(start)),
                _ => {}
            }
        }

        Ok(properties)
    }

    /// Datastore id from customXml/item{N}Props/core.xml
    pub fn parse_custom_item_id(&self, content: &str) -> XmlResult<Option<String>> {
        let mut reader = XmlParser::from_string(content);
        let (root, _) = read_root(&mut reader, "datastoreItem")?;
        Ok(item_id(&root))
    }
}

fn apply_reference(e: &BytesStart, extension: &mut WebExtension) {
    if XmlParser::matches_element(e.name().as_ref(), "reference") {
        extension.reference_id = XmlParser::get_attribute(e, b"id").unwrap_or_default();
        extension.version = XmlParser::get_attribute(e, b"version").unwrap_or_default();
        extension.store = XmlParser::get_attribute(e, b"store").unwrap_or_default();
        extension.store_type = XmlParser::get_attribute(e, b"storeType").unwrap_or_default();
    }
}

fn item_id(e: &BytesStart) -> Option<String> {
    XmlParser::get_prefixed_attribute(e, "ds", "itemID")
        .or_else(|| XmlParser::get_attribute(e, b"itemID"))
}

/// The stored payload of a custom XML item, without BOM or declaration
pub(crate) fn custom_item_payload(content: &str) -> String {
    strip_xml_declaration(content).to_string()
}
