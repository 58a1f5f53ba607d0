//! Style system - Style definitions, document defaults and `basedOn` chains
//!
//! Styles and document defaults are held behind `Arc` so one definition can
//! feed any number of nodes or documents without being copied. Shared
//! definitions must not be mutated once handed to another document.

use crate::{ParagraphProperty, RunProperty};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;

literal_enum! {
    /// The type of style
    pub enum StyleType fallback Paragraph {
        Paragraph => "paragraph",
        Character => "character",
        Table => "table",
        Numbering => "numbering",
    }
}

/// A named style definition (`w:style`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    pub style_id: String,
    pub name: String,
    pub style_type: StyleType,
    pub based_on: Option<String>,
    pub run_property: RunProperty,
    pub paragraph_property: ParagraphProperty,
}

impl Style {
    pub fn new(style_id: impl Into<String>, style_type: StyleType) -> Self {
        let style_id = style_id.into();
        Self {
            name: style_id.clone(),
            style_id,
            style_type,
            based_on: None,
            run_property: RunProperty::default(),
            paragraph_property: ParagraphProperty::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_based_on(mut self, base: impl Into<String>) -> Self {
        self.based_on = Some(base.into());
        self
    }

    pub fn with_run_property(mut self, property: RunProperty) -> Self {
        self.run_property = property;
        self
    }

    pub fn with_paragraph_property(mut self, property: ParagraphProperty) -> Self {
        self.paragraph_property = property;
        self
    }
}

/// Document-wide defaults (`w:docDefaults`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocDefaults {
    pub run_property: RunProperty,
    pub paragraph_property: ParagraphProperty,
}

impl DocDefaults {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_run_property(mut self, property: RunProperty) -> Self {
        self.run_property = property;
        self
    }

    pub fn with_paragraph_property(mut self, property: ParagraphProperty) -> Self {
        self.paragraph_property = property;
        self
    }
}

/// Style sheet of a document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Styles {
    pub doc_defaults: Arc<DocDefaults>,
    pub styles: Vec<Arc<Style>>,
}

impl Styles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts an owned style or one already shared with other documents
    pub fn add_style(mut self, style: impl Into<Arc<Style>>) -> Self {
        self.styles.push(style.into());
        self
    }

    pub fn with_doc_defaults(mut self, defaults: impl Into<Arc<DocDefaults>>) -> Self {
        self.doc_defaults = defaults.into();
        self
    }

    pub fn find(&self, style_id: &str) -> Option<&Style> {
        self.styles
            .iter()
            .find(|s| s.style_id == style_id)
            .map(|s| s.as_ref())
    }

    /// The style and its ancestors, nearest first.
    /// Stops at a missing id or a cycle.
    pub fn chain(&self, style_id: &str) -> Vec<&Style> {
        let mut chain = Vec::new();
        let mut visited = HashSet::new();
        let mut current = Some(style_id);

        while let Some(id) = current {
            if !visited.insert(id) {
                break; // Circular reference protection
            }
            match self.find(id) {
                Some(style) => {
                    chain.push(style);
                    current = style.based_on.as_deref();
                }
                None => break,
            }
        }

        chain
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty() && self.doc_defaults.as_ref() == &DocDefaults::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet() -> Styles {
        Styles::new()
            .add_style(Style::new("Normal", StyleType::Paragraph))
            .add_style(Style::new("Heading1", StyleType::Paragraph).with_based_on("Normal"))
            .add_style(Style::new("Title", StyleType::Paragraph).with_based_on("Heading1"))
    }

    #[test]
    fn test_style_inheritance_chain() {
        let styles = sheet();
        let ids: Vec<_> = styles.chain("Title").iter().map(|s| s.style_id.as_str()).collect();
        assert_eq!(ids, vec!["Title", "Heading1", "Normal"]);
    }

    #[test]
    fn test_circular_reference_protection() {
        let styles = Styles::new()
            .add_style(Style::new("A", StyleType::Paragraph).with_based_on("B"))
            .add_style(Style::new("B", StyleType::Paragraph).with_based_on("A"));
        assert_eq!(styles.chain("A").len(), 2);
    }

    #[test]
    fn test_missing_style_yields_empty_chain() {
        assert!(sheet().chain("Nope").is_empty());
    }

    #[test]
    fn test_shared_style_is_not_copied() {
        let shared = Arc::new(Style::new("Quote", StyleType::Paragraph));
        let a = Styles::new().add_style(shared.clone());
        let b = Styles::new().add_style(shared.clone());
        assert!(Arc::ptr_eq(&a.styles[0], &b.styles[0]));
        assert_eq!(Arc::strong_count(&shared), 3);
    }
}
