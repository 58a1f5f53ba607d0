//! Document root - body content plus the document-wide parts

use crate::{
    AbstractNumbering, BookmarkEnd, BookmarkStart, CustomItem, Numbering, Paragraph,
    SectionProperty, Styles, Table, WebExtension,
};
use serde::{Deserialize, Serialize};

/// Top-level body content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum DocumentChild {
    Paragraph(Box<Paragraph>),
    Table(Box<Table>),
    BookmarkStart(BookmarkStart),
    BookmarkEnd(BookmarkEnd),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomProperty {
    pub name: String,
    pub value: String,
}

/// Core and custom document properties (`docProps/`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocProps {
    /// W3CDTF timestamp; the build clock is used when unset
    pub created: Option<String>,
    /// W3CDTF timestamp; the build clock is used when unset
    pub updated: Option<String>,
    pub creator: Option<String>,
    pub last_modified_by: Option<String>,
    pub revision: Option<u32>,
    pub custom_properties: Vec<CustomProperty>,
}

impl DocProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_created(mut self, timestamp: impl Into<String>) -> Self {
        self.created = Some(timestamp.into());
        self
    }

    pub fn with_updated(mut self, timestamp: impl Into<String>) -> Self {
        self.updated = Some(timestamp.into());
        self
    }

    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    pub fn with_last_modified_by(mut self, name: impl Into<String>) -> Self {
        self.last_modified_by = Some(name.into());
        self
    }

    pub fn with_revision(mut self, revision: u32) -> Self {
        self.revision = Some(revision);
        self
    }

    /// Setting an existing name replaces its value in place
    pub fn with_custom_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.custom_properties.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.value = value,
            None => self.custom_properties.push(CustomProperty { name, value }),
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocVar {
    pub name: String,
    pub val: String,
}

/// Document settings (`word/settings.xml`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub doc_id: Option<String>,
    /// Twips
    pub default_tab_stop: usize,
    pub zoom: usize,
    pub doc_vars: Vec<DocVar>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            doc_id: None,
            default_tab_stop: 840,
            zoom: 100,
            doc_vars: Vec::new(),
        }
    }
}

impl Settings {
    pub fn with_doc_id(mut self, id: impl Into<String>) -> Self {
        self.doc_id = Some(id.into());
        self
    }

    pub fn with_default_tab_stop(mut self, twips: usize) -> Self {
        self.default_tab_stop = twips;
        self
    }

    pub fn with_zoom(mut self, percent: usize) -> Self {
        self.zoom = percent;
        self
    }

    pub fn add_doc_var(mut self, name: impl Into<String>, val: impl Into<String>) -> Self {
        self.doc_vars.push(DocVar {
            name: name.into(),
            val: val.into(),
        });
        self
    }
}

/// Root of the document tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub children: Vec<DocumentChild>,
    pub abstract_numberings: Vec<AbstractNumbering>,
    pub numberings: Vec<Numbering>,
    pub settings: Settings,
    pub doc_props: DocProps,
    pub section_property: SectionProperty,
    pub styles: Styles,
    pub web_extensions: Vec<WebExtension>,
    pub custom_items: Vec<CustomItem>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_paragraph(mut self, paragraph: Paragraph) -> Self {
        self.children
            .push(DocumentChild::Paragraph(Box::new(paragraph)));
        self
    }

    pub fn add_table(mut self, table: Table) -> Self {
        self.children.push(DocumentChild::Table(Box::new(table)));
        self
    }

    pub fn add_bookmark_start(mut self, id: usize, name: impl Into<String>) -> Self {
        self.children
            .push(DocumentChild::BookmarkStart(BookmarkStart::new(id, name)));
        self
    }

    pub fn add_bookmark_end(mut self, id: usize) -> Self {
        self.children
            .push(DocumentChild::BookmarkEnd(BookmarkEnd::new(id)));
        self
    }

    pub fn add_abstract_numbering(mut self, abstract_num: AbstractNumbering) -> Self {
        self.abstract_numberings.push(abstract_num);
        self
    }

    pub fn add_numbering(mut self, numbering: Numbering) -> Self {
        self.numberings.push(numbering);
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_doc_props(mut self, props: DocProps) -> Self {
        self.doc_props = props;
        self
    }

    pub fn with_section_property(mut self, section: SectionProperty) -> Self {
        self.section_property = section;
        self
    }

    pub fn with_page_size(mut self, w: u32, h: u32) -> Self {
        self.section_property.page_size.w = w;
        self.section_property.page_size.h = h;
        self
    }

    pub fn with_page_orient(mut self, orient: crate::PageOrientationType) -> Self {
        self.section_property.page_size.orient = Some(orient);
        self
    }

    pub fn with_page_margin(mut self, margin: crate::PageMargin) -> Self {
        self.section_property.page_margin = margin;
        self
    }

    pub fn with_doc_grid(mut self, grid: crate::DocGrid) -> Self {
        self.section_property.doc_grid = grid;
        self
    }

    pub fn with_styles(mut self, styles: Styles) -> Self {
        self.styles = styles;
        self
    }

    pub fn with_custom_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.doc_props = self.doc_props.with_custom_property(name, value);
        self
    }

    pub fn add_web_extension(mut self, extension: WebExtension) -> Self {
        self.web_extensions.push(extension);
        self
    }

    pub fn add_custom_item(mut self, id: impl Into<String>, xml: impl Into<String>) -> Self {
        self.custom_items.push(CustomItem::new(id, xml));
        self
    }

    pub fn find_abstract_numbering(&self, id: usize) -> Option<&AbstractNumbering> {
        self.abstract_numberings.iter().find(|a| a.id == id)
    }

    pub fn find_numbering(&self, id: usize) -> Option<&Numbering> {
        self.numberings.iter().find(|n| n.id == id)
    }

    /// Canonical JSON view of the model
    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    /// Rebuild a model from its JSON view
    pub fn from_json(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PageOrientationType, Run};

    #[test]
    fn test_document_defaults() {
        let doc = Document::new();
        assert!(doc.children.is_empty());
        assert_eq!(doc.settings.default_tab_stop, 840);
        assert_eq!(doc.section_property.page_size.w, 11906);
    }

    #[test]
    fn test_page_setup_is_literal() {
        let doc = Document::new()
            .with_page_size(16838, 11906)
            .with_page_orient(PageOrientationType::Landscape);
        assert_eq!(doc.section_property.page_size.w, 16838);
        assert_eq!(doc.section_property.page_size.h, 11906);
    }

    #[test]
    fn test_json_roundtrip() {
        let doc = Document::new()
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Hello world!!")))
            .with_custom_property("client", "ACME");
        let json = doc.json().unwrap();
        assert_eq!(json["children"][0]["type"], "paragraph");
        assert_eq!(json["docProps"]["customProperties"][0]["name"], "client");

        let back = Document::from_json(json).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn test_custom_property_replaced_in_place() {
        let props = DocProps::new()
            .with_custom_property("a", "1")
            .with_custom_property("a", "2");
        assert_eq!(props.custom_properties.len(), 1);
        assert_eq!(props.custom_properties[0].value, "2");
    }
}
