//! Styles.xml parser
//!
//! Reads document defaults and style definitions back into [`Styles`].
//! Latent styles, table style conditions and other definitions the model
//! does not carry are skipped.

use crate::error::XmlResult;
use crate::properties::{parse_paragraph_property, parse_run_property};
use crate::reader::{read_root, unexpected_eof, XmlParser};
use doc_model::{DocDefaults, Style, StyleType, Styles};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Parser for styles.xml
pub(crate) struct StylesParser;

impl StylesParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, content: &str) -> XmlResult<Styles> {
        let mut reader = XmlParser::from_content(content);
        let mut styles = Styles::new();

        let (root, open) = read_root(&mut reader, "styles")?;
        if !open {
            return Ok(styles);
        }

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = e.name();
                    let name_ref = name.as_ref();

                    if XmlParser::matches_element(name_ref, "docDefaults") {
                        styles = styles.with_doc_defaults(self.parse_doc_defaults(&mut reader, &e)?);
                    } else if XmlParser::matches_element(name_ref, "style") {
                        styles = styles.add_style(self.parse_style(&mut reader, &e)?);
                    } else {
                        XmlParser::skip(&mut reader, &e)?;
                    }
                }
                Event::Empty(e) => {
                    if XmlParser::matches_element(e.name().as_ref(), "style") {
                        styles = styles.add_style(style_header(&e));
                    }
                }
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(&root)),
                _ => {}
            }
        }

        Ok(styles)
    }

    fn parse_doc_defaults(&self, reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<DocDefaults> {
        let mut defaults = DocDefaults::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = e.name();
                    let name_ref = name.as_ref();

                    if XmlParser::matches_element(name_ref, "rPrDefault") {
                        if let Some(run_property) =
                            self.parse_wrapped(reader, &e, "rPr", parse_run_property)?
                        {
                            defaults.run_property = run_property;
                        }
                    } else if XmlParser::matches_element(name_ref, "pPrDefault") {
                        if let Some(paragraph_property) =
                            self.parse_wrapped(reader, &e, "pPr", parse_paragraph_property)?
                        {
                            defaults.paragraph_property = paragraph_property;
                        }
                    } else {
                        XmlParser::skip(reader, &e)?;
                    }
                }
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(start)),
                _ => {}
            }
        }

        Ok(defaults)
    }

    /// Parse the single property element inside `rPrDefault` / `pPrDefault`
    fn parse_wrapped<T>(
        &self,
        reader: &mut Reader<&[u8]>,
        start: &BytesStart,
        inner: &str,
        parse: fn(&mut Reader<&[u8]>, &BytesStart) -> XmlResult<T>,
    ) -> XmlResult<Option<T>> {
        let mut value = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    if XmlParser::matches_element(e.name().as_ref(), inner) {
                        value = Some(parse(reader, &e)?);
                    } else {
                        XmlParser::skip(reader, &e)?;
                    }
                }
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(start)),
                _ => {}
            }
        }

        Ok(value)
    }

    fn parse_style(&self, reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<Style> {
        let mut style = style_header(start);

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = e.name();
                    let name_ref = name.as_ref();

                    if XmlParser::matches_element(name_ref, "pPr") {
                        style.paragraph_property = parse_paragraph_property(reader, &e)?;
                    } else if XmlParser::matches_element(name_ref, "rPr") {
                        style.run_property = parse_run_property(reader, &e)?;
                    } else {
                        apply_style_element(&e, &mut style);
                        XmlParser::skip(reader, &e)?;
                    }
                }
                Event::Empty(e) => apply_style_element(&e, &mut style),
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(start)),
                _ => {}
            }
        }

        Ok(style)
    }
}

fn style_header(e: &BytesStart) -> Style {
    let style_type = XmlParser::get_w_attribute(e, "type")
        .map(|v| StyleType::from_literal(&v))
        .unwrap_or_default();
    let style_id = XmlParser::get_w_attribute(e, "styleId").unwrap_or_default();
    Style::new(style_id, style_type)
}

fn apply_style_element(e: &BytesStart, style: &mut Style) {
    let name = e.name();
    let name_ref = name.as_ref();

    if XmlParser::matches_element(name_ref, "name") {
        if let Some(value) = XmlParser::get_w_attribute(e, "val") {
            style.name = value;
        }
    } else if XmlParser::matches_element(name_ref, "basedOn") {
        style.based_on = XmlParser::get_w_attribute(e, "val");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::styles_writer::write_styles;
    use doc_model::{AlignmentType, ParagraphProperty, RunFonts, RunProperty};

    #[test]
    fn test_parse_defaults_and_styles() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:docDefaults>
    <w:rPrDefault><w:rPr><w:rFonts w:ascii="Century"/><w:sz w:val="21"/></w:rPr></w:rPrDefault>
    <w:pPrDefault/>
  </w:docDefaults>
  <w:latentStyles w:defLockedState="0"><w:lsdException w:name="Normal"/></w:latentStyles>
  <w:style w:type="paragraph" w:default="1" w:styleId="Normal">
    <w:name w:val="Normal"/>
    <w:qFormat/>
    <w:pPr><w:jc w:val="both"/></w:pPr>
  </w:style>
  <w:style w:type="character" w:styleId="Strong">
    <w:name w:val="Strong"/>
    <w:basedOn w:val="DefaultParagraphFont"/>
    <w:rPr><w:b/></w:rPr>
  </w:style>
</w:styles>"#;
        let styles = StylesParser::new().parse(xml).unwrap();

        assert_eq!(styles.doc_defaults.run_property.size, Some(21));
        assert_eq!(styles.styles.len(), 2);
        let normal = styles.find("Normal").unwrap();
        assert_eq!(normal.style_type, StyleType::Paragraph);
        assert_eq!(normal.paragraph_property.alignment, Some(AlignmentType::Both));
        let strong = styles.find("Strong").unwrap();
        assert_eq!(strong.style_type, StyleType::Character);
        assert_eq!(strong.based_on.as_deref(), Some("DefaultParagraphFont"));
        assert_eq!(strong.run_property.bold, Some(true));
    }

    #[test]
    fn test_written_styles_read_back() {
        let styles = Styles::new()
            .with_doc_defaults(
                DocDefaults::new()
                    .with_run_property(RunProperty::new().with_fonts(RunFonts::all("Calibri")))
                    .with_paragraph_property(ParagraphProperty {
                        keep_lines: Some(true),
                        ..Default::default()
                    }),
            )
            .add_style(Style::new("Title", StyleType::Paragraph).with_name("Title & Co"))
            .add_style(
                Style::new("Emphasis", StyleType::Character)
                    .with_based_on("Title")
                    .with_run_property(RunProperty::new().with_italic()),
            );

        let parsed = StylesParser::new().parse(&write_styles(&styles)).unwrap();
        assert_eq!(parsed, styles);
    }

    #[test]
    fn test_empty_root() {
        let styles = StylesParser::new().parse("<w:styles/>").unwrap();
        assert!(styles.is_empty());
    }

    #[test]
    fn test_wrong_root_is_rejected() {
        assert!(StylesParser::new().parse("<w:numbering/>").is_err());
    }
}
