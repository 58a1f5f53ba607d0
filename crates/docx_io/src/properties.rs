//! `w:rPr` / `w:pPr` parsing shared by document, styles, numbering and comments
//!
//! Each function is entered right after the opening tag and consumes the
//! matching end tag. Unknown children are skipped.

use crate::error::XmlResult;
use crate::reader::{unexpected_eof, XmlParser};
use doc_model::{
    AlignmentType, Border, BorderType, Indent, LineSpacing, LineSpacingType, NumberingProperty,
    ParagraphProperty, RunFonts, RunProperty, Shading, ShdType, SpecialIndent, VertAlignType,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Parse the children of a `w:rPr` element
pub(crate) fn parse_run_property(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart,
) -> XmlResult<RunProperty> {
    let mut props = RunProperty::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                apply_run_element(&e, &mut props);
                XmlParser::skip(reader, &e)?;
            }
            Event::Empty(e) => apply_run_element(&e, &mut props),
            Event::End(_) => break,
            Event::Eof => return Err(unexpected_eof(start)),
            _ => {}
        }
    }

    Ok(props)
}

fn apply_run_element(e: &BytesStart, props: &mut RunProperty) {
    let name = e.name();
    let name_ref = name.as_ref();

    if XmlParser::matches_element(name_ref, "rStyle") {
        props.style = XmlParser::get_w_attribute(e, "val");
    } else if XmlParser::matches_element(name_ref, "rFonts") {
        let fonts = RunFonts {
            ascii: XmlParser::get_w_attribute(e, "ascii"),
            hi_ansi: XmlParser::get_w_attribute(e, "hAnsi"),
            east_asia: XmlParser::get_w_attribute(e, "eastAsia"),
            cs: XmlParser::get_w_attribute(e, "cs"),
        };
        if !fonts.is_empty() {
            props.fonts = Some(fonts);
        }
    } else if XmlParser::matches_element(name_ref, "b") {
        props.bold = Some(XmlParser::get_w_toggle(e));
    } else if XmlParser::matches_element(name_ref, "i") {
        props.italic = Some(XmlParser::get_w_toggle(e));
    } else if XmlParser::matches_element(name_ref, "vanish") {
        props.vanish = Some(XmlParser::get_w_toggle(e));
    } else if XmlParser::matches_element(name_ref, "color") {
        props.color = XmlParser::get_w_attribute(e, "val");
    } else if XmlParser::matches_element(name_ref, "spacing") {
        props.spacing = XmlParser::get_w_number(e, "val");
    } else if XmlParser::matches_element(name_ref, "sz") {
        props.size = XmlParser::get_w_number(e, "val");
    } else if XmlParser::matches_element(name_ref, "highlight") {
        props.highlight = XmlParser::get_w_attribute(e, "val");
    } else if XmlParser::matches_element(name_ref, "u") {
        props.underline = XmlParser::get_w_attribute(e, "val");
    } else if XmlParser::matches_element(name_ref, "bdr") {
        props.text_border = Some(parse_border(e));
    } else if XmlParser::matches_element(name_ref, "vertAlign") {
        props.vert_align = XmlParser::get_w_attribute(e, "val")
            .map(|v| VertAlignType::from_literal(&v));
    }
}

/// Parse the children of a `w:pPr` element
pub(crate) fn parse_paragraph_property(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart,
) -> XmlResult<ParagraphProperty> {
    let mut props = ParagraphProperty::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let name = e.name();
                if XmlParser::matches_element(name.as_ref(), "rPr") {
                    props.run_property = parse_run_property(reader, &e)?;
                } else if XmlParser::matches_element(name.as_ref(), "numPr") {
                    props.numbering = parse_numbering_reference(reader, &e)?;
                } else {
                    apply_paragraph_element(&e, &mut props);
                    XmlParser::skip(reader, &e)?;
                }
            }
            Event::Empty(e) => apply_paragraph_element(&e, &mut props),
            Event::End(_) => break,
            Event::Eof => return Err(unexpected_eof(start)),
            _ => {}
        }
    }

    Ok(props)
}

fn apply_paragraph_element(e: &BytesStart, props: &mut ParagraphProperty) {
    let name = e.name();
    let name_ref = name.as_ref();

    if XmlParser::matches_element(name_ref, "pStyle") {
        props.style = XmlParser::get_w_attribute(e, "val");
    } else if XmlParser::matches_element(name_ref, "keepNext") {
        props.keep_next = Some(XmlParser::get_w_toggle(e));
    } else if XmlParser::matches_element(name_ref, "keepLines") {
        props.keep_lines = Some(XmlParser::get_w_toggle(e));
    } else if XmlParser::matches_element(name_ref, "pageBreakBefore") {
        props.page_break_before = Some(XmlParser::get_w_toggle(e));
    } else if XmlParser::matches_element(name_ref, "widowControl") {
        props.widow_control = Some(XmlParser::get_w_toggle(e));
    } else if XmlParser::matches_element(name_ref, "spacing") {
        props.line_spacing = Some(LineSpacing {
            before: XmlParser::get_w_number(e, "before"),
            after: XmlParser::get_w_number(e, "after"),
            line: XmlParser::get_w_number(e, "line"),
            rule: XmlParser::get_w_attribute(e, "lineRule")
                .map(|v| LineSpacingType::from_literal(&v)),
        });
    } else if XmlParser::matches_element(name_ref, "ind") {
        props.indent = Some(parse_indent(e));
    } else if XmlParser::matches_element(name_ref, "jc") {
        props.alignment = XmlParser::get_w_attribute(e, "val")
            .map(|v| AlignmentType::from_literal(&v));
    }
}

/// `w:start`/`w:end` are the bidi-aware spellings of left/right
fn parse_indent(e: &BytesStart) -> Indent {
    let left = XmlParser::get_w_number(e, "left").or_else(|| XmlParser::get_w_number(e, "start"));
    let right = XmlParser::get_w_number(e, "right").or_else(|| XmlParser::get_w_number(e, "end"));
    let special = match (
        XmlParser::get_w_number(e, "firstLine"),
        XmlParser::get_w_number(e, "hanging"),
    ) {
        (_, Some(hanging)) => Some(SpecialIndent::Hanging(hanging)),
        (Some(first), None) => Some(SpecialIndent::FirstLine(first)),
        (None, None) => None,
    };
    Indent::new(left, special, right)
}

/// `w:numPr`; a reference without `w:numId` is dropped
fn parse_numbering_reference(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart,
) -> XmlResult<Option<NumberingProperty>> {
    let mut id = None;
    let mut level = 0;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                apply_numbering_element(&e, &mut id, &mut level);
                XmlParser::skip(reader, &e)?;
            }
            Event::Empty(e) => apply_numbering_element(&e, &mut id, &mut level),
            Event::End(_) => break,
            Event::Eof => return Err(unexpected_eof(start)),
            _ => {}
        }
    }

    Ok(id.map(|id| NumberingProperty { id, level }))
}

fn apply_numbering_element(e: &BytesStart, id: &mut Option<usize>, level: &mut usize) {
    let name = e.name();
    if XmlParser::matches_element(name.as_ref(), "numId") {
        *id = XmlParser::get_w_number(e, "val");
    } else if XmlParser::matches_element(name.as_ref(), "ilvl") {
        *level = XmlParser::get_w_number(e, "val").unwrap_or(0);
    }
}

/// Any border edge element; missing attributes take the border defaults
pub(crate) fn parse_border(e: &BytesStart) -> Border {
    let defaults = Border::default();
    Border {
        border_type: XmlParser::get_w_attribute(e, "val")
            .map(|v| BorderType::from_literal(&v))
            .unwrap_or(defaults.border_type),
        size: XmlParser::get_w_number(e, "sz").unwrap_or(defaults.size),
        color: XmlParser::get_w_attribute(e, "color").unwrap_or(defaults.color),
        space: XmlParser::get_w_number(e, "space").unwrap_or(defaults.space),
    }
}

pub(crate) fn parse_shading(e: &BytesStart) -> Shading {
    let defaults = Shading::default();
    Shading {
        shd_type: XmlParser::get_w_attribute(e, "val")
            .map(|v| ShdType::from_literal(&v))
            .unwrap_or(defaults.shd_type),
        color: XmlParser::get_w_attribute(e, "color").unwrap_or(defaults.color),
        fill: XmlParser::get_w_attribute(e, "fill").unwrap_or(defaults.fill),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties_writer::{write_paragraph_property, write_run_property};

    fn open(xml: &str) -> (Reader<&[u8]>, BytesStart<'_>) {
        let mut reader = XmlParser::from_content(xml);
        match reader.read_event().unwrap() {
            Event::Start(e) => (reader, e.into_owned()),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_run_property() {
        let (mut reader, start) = open(
            r#"<w:rPr><w:rFonts w:ascii="Arial" w:eastAsia="MS Mincho"/><w:b/><w:i w:val="0"/><w:sz w:val="28"/><w:szCs w:val="28"/><w:u w:val="double"/><w:vertAlign w:val="superscript"/><w:lang w:val="en-US"/></w:rPr>"#,
        );
        let props = parse_run_property(&mut reader, &start).unwrap();
        assert_eq!(props.bold, Some(true));
        assert_eq!(props.italic, Some(false));
        assert_eq!(props.size, Some(28));
        assert_eq!(props.underline.as_deref(), Some("double"));
        assert_eq!(props.vert_align, Some(VertAlignType::Superscript));
        let fonts = props.fonts.unwrap();
        assert_eq!(fonts.ascii.as_deref(), Some("Arial"));
        assert_eq!(fonts.east_asia.as_deref(), Some("MS Mincho"));
        assert_eq!(fonts.cs, None);
    }

    #[test]
    fn test_paragraph_property_with_nested_elements() {
        let (mut reader, start) = open(
            r#"<w:pPr><w:pStyle w:val="List"/><w:numPr><w:ilvl w:val="1"/><w:numId w:val="4"/></w:numPr><w:tabs><w:tab w:val="left" w:pos="720"/></w:tabs><w:ind w:start="360" w:firstLine="240"/><w:jc w:val="both"/><w:rPr><w:b/></w:rPr></w:pPr><w:r/>"#,
        );
        let props = parse_paragraph_property(&mut reader, &start).unwrap();
        assert_eq!(props.style.as_deref(), Some("List"));
        assert_eq!(props.numbering, Some(NumberingProperty { id: 4, level: 1 }));
        assert_eq!(
            props.indent,
            Some(Indent::new(Some(360), Some(SpecialIndent::FirstLine(240)), None))
        );
        assert_eq!(props.alignment, Some(AlignmentType::from_literal("both")));
        assert_eq!(props.run_property.bold, Some(true));
        // The reader is left right after </w:pPr>
        assert!(matches!(reader.read_event().unwrap(), Event::Empty(_)));
    }

    #[test]
    fn test_unknown_literals_fall_back() {
        let (mut reader, start) =
            open(r#"<w:rPr><w:bdr w:val="sparkles" w:sz="4"/></w:rPr>"#);
        let props = parse_run_property(&mut reader, &start).unwrap();
        assert_eq!(props.text_border.unwrap().border_type, BorderType::Single);
    }

    #[test]
    fn test_written_properties_read_back() {
        let run = RunProperty::new()
            .with_style("Strong")
            .with_size(24)
            .with_color("FF0000")
            .with_spacing(-20)
            .with_vanish()
            .with_text_border(Border::new(BorderType::Dotted).with_color("00FF00"));
        let para = ParagraphProperty {
            keep_lines: Some(true),
            widow_control: Some(false),
            line_spacing: Some(LineSpacing::new().with_line(360).with_rule(LineSpacingType::Exact)),
            run_property: run.clone(),
            ..Default::default()
        };

        let mut xml = String::new();
        write_paragraph_property(&mut xml, &para);
        let (mut reader, start) = open(&xml);
        assert_eq!(parse_paragraph_property(&mut reader, &start).unwrap(), para);

        let mut xml = String::new();
        write_run_property(&mut xml, &run);
        let (mut reader, start) = open(&xml);
        assert_eq!(parse_run_property(&mut reader, &start).unwrap(), run);
    }

    #[test]
    fn test_truncated_property_is_an_error() {
        let (mut reader, start) = open("<w:rPr><w:b/>");
        assert!(parse_run_property(&mut reader, &start).is_err());
    }
}
