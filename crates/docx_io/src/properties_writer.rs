//! `w:rPr` / `w:pPr` writers shared by every part that carries formatting

use crate::document_writer::escape_xml;
use doc_model::{Border, ParagraphProperty, RunProperty, Shading, SpecialIndent};

/// Write a `w:rPr` element; nothing is written for an empty property set
pub(crate) fn write_run_property(xml: &mut String, props: &RunProperty) {
    if props.is_empty() {
        return;
    }
    xml.push_str("<w:rPr>");
    write_run_property_inner(xml, props);
    xml.push_str("</w:rPr>");
}

/// Children of `w:rPr` in schema order
pub(crate) fn write_run_property_inner(xml: &mut String, props: &RunProperty) {
    if let Some(ref style) = props.style {
        xml.push_str(&format!(r#"<w:rStyle w:val="{}"/>"#, escape_xml(style)));
    }

    if let Some(ref fonts) = props.fonts {
        if !fonts.is_empty() {
            xml.push_str("<w:rFonts");
            let slots = [
                ("ascii", &fonts.ascii),
                ("hAnsi", &fonts.hi_ansi),
                ("eastAsia", &fonts.east_asia),
                ("cs", &fonts.cs),
            ];
            for (attr, value) in slots {
                if let Some(name) = value {
                    xml.push_str(&format!(r#" w:{}="{}""#, attr, escape_xml(name)));
                }
            }
            xml.push_str("/>");
        }
    }

    write_toggle(xml, "b", props.bold);
    write_toggle(xml, "i", props.italic);
    write_toggle(xml, "vanish", props.vanish);

    if let Some(ref color) = props.color {
        xml.push_str(&format!(r#"<w:color w:val="{}"/>"#, escape_xml(color)));
    }

    if let Some(spacing) = props.spacing {
        xml.push_str(&format!(r#"<w:spacing w:val="{}"/>"#, spacing));
    }

    if let Some(size) = props.size {
        xml.push_str(&format!(r#"<w:sz w:val="{}"/>"#, size));
        xml.push_str(&format!(r#"<w:szCs w:val="{}"/>"#, size));
    }

    if let Some(ref highlight) = props.highlight {
        xml.push_str(&format!(r#"<w:highlight w:val="{}"/>"#, escape_xml(highlight)));
    }

    if let Some(ref underline) = props.underline {
        xml.push_str(&format!(r#"<w:u w:val="{}"/>"#, escape_xml(underline)));
    }

    if let Some(ref border) = props.text_border {
        write_border(xml, "bdr", border);
    }

    if let Some(vert_align) = props.vert_align {
        xml.push_str(&format!(r#"<w:vertAlign w:val="{}"/>"#, vert_align.as_str()));
    }
}

/// Write a `w:pPr` element; nothing is written for an empty property set
pub(crate) fn write_paragraph_property(xml: &mut String, props: &ParagraphProperty) {
    if props.is_empty() {
        return;
    }
    xml.push_str("<w:pPr>");
    write_paragraph_property_inner(xml, props);
    xml.push_str("</w:pPr>");
}

/// Children of `w:pPr` in schema order
pub(crate) fn write_paragraph_property_inner(xml: &mut String, props: &ParagraphProperty) {
    if let Some(ref style) = props.style {
        xml.push_str(&format!(r#"<w:pStyle w:val="{}"/>"#, escape_xml(style)));
    }

    write_toggle(xml, "keepNext", props.keep_next);
    write_toggle(xml, "keepLines", props.keep_lines);
    write_toggle(xml, "pageBreakBefore", props.page_break_before);
    write_toggle(xml, "widowControl", props.widow_control);

    if let Some(numbering) = props.numbering {
        xml.push_str(&format!(
            r#"<w:numPr><w:ilvl w:val="{}"/><w:numId w:val="{}"/></w:numPr>"#,
            numbering.level, numbering.id
        ));
    }

    if let Some(spacing) = props.line_spacing {
        xml.push_str("<w:spacing");
        if let Some(before) = spacing.before {
            xml.push_str(&format!(r#" w:before="{}""#, before));
        }
        if let Some(after) = spacing.after {
            xml.push_str(&format!(r#" w:after="{}""#, after));
        }
        if let Some(line) = spacing.line {
            xml.push_str(&format!(r#" w:line="{}""#, line));
        }
        if let Some(rule) = spacing.rule {
            xml.push_str(&format!(r#" w:lineRule="{}""#, rule.as_str()));
        }
        xml.push_str("/>");
    }

    if let Some(indent) = props.indent {
        xml.push_str("<w:ind");
        if let Some(left) = indent.left {
            xml.push_str(&format!(r#" w:left="{}""#, left));
        }
        if let Some(right) = indent.right {
            xml.push_str(&format!(r#" w:right="{}""#, right));
        }
        match indent.special {
            Some(SpecialIndent::FirstLine(v)) => {
                xml.push_str(&format!(r#" w:firstLine="{}""#, v))
            }
            Some(SpecialIndent::Hanging(v)) => xml.push_str(&format!(r#" w:hanging="{}""#, v)),
            None => {}
        }
        xml.push_str("/>");
    }

    if let Some(alignment) = props.alignment {
        xml.push_str(&format!(r#"<w:jc w:val="{}"/>"#, alignment.as_str()));
    }

    write_run_property(xml, &props.run_property);
}

/// On/off element: `<w:b/>` for on, `<w:b w:val="false"/>` for an explicit off
fn write_toggle(xml: &mut String, name: &str, value: Option<bool>) {
    match value {
        Some(true) => xml.push_str(&format!("<w:{}/>", name)),
        Some(false) => xml.push_str(&format!(r#"<w:{} w:val="false"/>"#, name)),
        None => {}
    }
}

/// A border edge element such as `w:top`, `w:tl2br` or `w:bdr`
pub(crate) fn write_border(xml: &mut String, element: &str, border: &Border) {
    xml.push_str(&format!(
        r#"<w:{} w:val="{}" w:sz="{}" w:space="{}" w:color="{}"/>"#,
        element,
        border.border_type.as_str(),
        border.size,
        border.space,
        escape_xml(&border.color)
    ));
}

pub(crate) fn write_shading(xml: &mut String, shading: &Shading) {
    xml.push_str(&format!(
        r#"<w:shd w:val="{}" w:color="{}" w:fill="{}"/>"#,
        shading.shd_type.as_str(),
        escape_xml(&shading.color),
        escape_xml(&shading.fill)
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{AlignmentType, BorderType, Indent, LineSpacing, RunFonts};

    #[test]
    fn test_empty_properties_write_nothing() {
        let mut xml = String::new();
        write_run_property(&mut xml, &RunProperty::new());
        write_paragraph_property(&mut xml, &ParagraphProperty::new());
        assert!(xml.is_empty());
    }

    #[test]
    fn test_run_property_schema_order() {
        let props = RunProperty::new()
            .with_style("Emphasis")
            .with_size(28)
            .with_bold()
            .with_fonts(RunFonts::new().with_ascii("Arial"))
            .with_vert_align(doc_model::VertAlignType::Superscript);
        let mut xml = String::new();
        write_run_property(&mut xml, &props);

        let pos = |needle: &str| xml.find(needle).unwrap();
        assert!(pos("w:rStyle") < pos("w:rFonts"));
        assert!(pos("w:rFonts") < pos("<w:b/>"));
        assert!(pos("<w:b/>") < pos("w:sz "));
        assert!(pos("w:sz ") < pos("w:vertAlign"));
        assert!(xml.contains(r#"<w:rFonts w:ascii="Arial"/>"#));
    }

    #[test]
    fn test_explicit_false_toggle() {
        let props = RunProperty {
            italic: Some(false),
            ..Default::default()
        };
        let mut xml = String::new();
        write_run_property(&mut xml, &props);
        assert_eq!(xml, r#"<w:rPr><w:i w:val="false"/></w:rPr>"#);
    }

    #[test]
    fn test_paragraph_property() {
        let props = ParagraphProperty {
            style: Some("Heading1".into()),
            alignment: Some(AlignmentType::Center),
            indent: Some(Indent::new(Some(720), Some(SpecialIndent::Hanging(360)), None)),
            line_spacing: Some(LineSpacing::new().with_after(120)),
            keep_next: Some(true),
            ..Default::default()
        };
        let mut xml = String::new();
        write_paragraph_property(&mut xml, &props);
        assert!(xml.starts_with(r#"<w:pPr><w:pStyle w:val="Heading1"/><w:keepNext/>"#));
        assert!(xml.contains(r#"<w:spacing w:after="120"/>"#));
        assert!(xml.contains(r#"<w:ind w:left="720" w:hanging="360"/>"#));
        assert!(xml.ends_with(r#"<w:jc w:val="center"/></w:pPr>"#));
    }

    #[test]
    fn test_border_element() {
        let mut xml = String::new();
        write_border(&mut xml, "tl2br", &Border::new(BorderType::Double).with_size(8));
        assert_eq!(
            xml,
            r#"<w:tl2br w:val="double" w:sz="8" w:space="0" w:color="auto"/>"#
        );
    }
}
