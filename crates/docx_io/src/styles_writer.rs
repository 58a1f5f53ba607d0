//! styles.xml writer

use crate::document_writer::escape_xml;
use crate::namespaces;
use crate::properties_writer::{write_paragraph_property, write_run_property};
use doc_model::{Style, Styles};

/// Generate styles.xml content. The part is always written, docDefaults included.
pub(crate) fn write_styles(styles: &Styles) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(&format!(r#"<w:styles xmlns:w="{}">"#, namespaces::W));

    let defaults = &styles.doc_defaults;
    xml.push_str("<w:docDefaults>");
    xml.push_str("<w:rPrDefault>");
    write_run_property(&mut xml, &defaults.run_property);
    xml.push_str("</w:rPrDefault>");
    xml.push_str("<w:pPrDefault>");
    write_paragraph_property(&mut xml, &defaults.paragraph_property);
    xml.push_str("</w:pPrDefault>");
    xml.push_str("</w:docDefaults>");

    for style in &styles.styles {
        write_style(&mut xml, style);
    }

    xml.push_str("</w:styles>");
    xml
}

fn write_style(xml: &mut String, style: &Style) {
    xml.push_str(&format!(
        r#"<w:style w:type="{}" w:styleId="{}">"#,
        style.style_type.as_str(),
        escape_xml(&style.style_id)
    ));
    xml.push_str(&format!(r#"<w:name w:val="{}"/>"#, escape_xml(&style.name)));
    if let Some(ref base) = style.based_on {
        xml.push_str(&format!(r#"<w:basedOn w:val="{}"/>"#, escape_xml(base)));
    }
    write_paragraph_property(xml, &style.paragraph_property);
    write_run_property(xml, &style.run_property);
    xml.push_str("</w:style>");
}
