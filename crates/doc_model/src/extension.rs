//! Package-level extensions: task-pane web extensions and custom XML items

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebExtensionProperty {
    pub name: String,
    pub value: String,
}

/// An add-in shown in a task pane (`we:webextension`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebExtension {
    pub id: String,
    pub reference_id: String,
    pub version: String,
    pub store: String,
    pub store_type: String,
    pub properties: Vec<WebExtensionProperty>,
}

impl WebExtension {
    pub fn new(
        id: impl Into<String>,
        reference_id: impl Into<String>,
        version: impl Into<String>,
        store: impl Into<String>,
        store_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            reference_id: reference_id.into(),
            version: version.into(),
            store: store.into(),
            store_type: store_type.into(),
            properties: Vec::new(),
        }
    }

    /// Properties keep insertion order; setting an existing name replaces its value
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.properties.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.value = value,
            None => self.properties.push(WebExtensionProperty { name, value }),
        }
        self
    }
}

/// Arbitrary custom XML part addressable by its datastore id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomItem {
    /// Datastore item id, conventionally a braced GUID
    pub id: String,
    /// Well-formed XML payload without declaration
    pub xml: String,
}

impl CustomItem {
    /// A leading byte order mark or XML declaration on `xml` is dropped
    pub fn new(id: impl Into<String>, xml: impl Into<String>) -> Self {
        let xml = xml.into();
        Self {
            id: id.into(),
            xml: strip_xml_declaration(&xml).to_string(),
        }
    }
}

/// The payload of an XML text without byte order mark, leading whitespace
/// or `<?xml ...?>` declaration
pub fn strip_xml_declaration(xml: &str) -> &str {
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml).trim_start();
    let is_declaration = xml
        .strip_prefix("<?xml")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_whitespace() || c == '?');
    if is_declaration {
        if let Some(end) = xml.find("?>") {
            return xml[end + 2..].trim_start();
        }
    }
    xml
}
