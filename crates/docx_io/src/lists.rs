//! Numbering.xml parser for list definitions
//!
//! Handles abstract numbering definitions and numbering instances.

use crate::error::XmlResult;
use crate::properties::{parse_paragraph_property, parse_run_property};
use crate::reader::{read_root, unexpected_eof, XmlParser};
use doc_model::{
    AbstractNumbering, Level, LevelJc, LevelOverride, LevelSuffix, NumberFormat, Numbering,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Abstract definitions and instances, in document order
pub(crate) type ParsedNumbering = (Vec<AbstractNumbering>, Vec<Numbering>);

/// Parser for numbering.xml
pub(crate) struct NumberingParser;

impl NumberingParser {
    pub fn new() -> Self {
        Self
    }

    pub fn parse(&self, content: &str) -> XmlResult<ParsedNumbering> {
        let mut abstract_nums = Vec::new();
        let mut nums = Vec::new();

        let mut reader = XmlParser::from_content(content);
        let (root, open) = read_root(&mut reader, "numbering")?;
        if !open {
            return Ok((abstract_nums, nums));
        }

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = e.name();
                    let name_ref = name.as_ref();

                    if XmlParser::matches_element(name_ref, "abstractNum") {
                        abstract_nums.push(self.parse_abstract_num(&mut reader, &e)?);
                    } else if XmlParser::matches_element(name_ref, "num") {
                        if let Some(num) = self.parse_num(&mut reader, &e)? {
                            nums.push(num);
                        }
                    } else {
                        XmlParser::skip(&mut reader, &e)?;
                    }
                }
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(&root)),
                _ => {}
            }
        }

        Ok((abstract_nums, nums))
    }

    fn parse_abstract_num(&self, reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<AbstractNumbering> {
        let id = XmlParser::get_w_number(start, "abstractNumId").unwrap_or(0);
        let mut abstract_num = AbstractNumbering::new(id);

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    if XmlParser::matches_element(e.name().as_ref(), "lvl") {
                        abstract_num.levels.push(self.parse_level(reader, &e)?);
                    } else {
                        XmlParser::skip(reader, &e)?;
                    }
                }
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(start)),
                _ => {}
            }
        }

        Ok(abstract_num)
    }

    /// Parse a `w:num`; an instance without `w:abstractNumId` is dropped
    fn parse_num(&self, reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<Option<Numbering>> {
        let id = XmlParser::get_w_number(start, "numId").unwrap_or(0);
        let mut abstract_num_id = None;
        let mut overrides = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = e.name();
                    let name_ref = name.as_ref();

                    if XmlParser::matches_element(name_ref, "lvlOverride") {
                        overrides.push(self.parse_level_override(reader, &e)?);
                    } else {
                        if XmlParser::matches_element(name_ref, "abstractNumId") {
                            abstract_num_id = XmlParser::get_w_number(&e, "val");
                        }
                        XmlParser::skip(reader, &e)?;
                    }
                }
                Event::Empty(e) => {
                    let name = e.name();
                    let name_ref = name.as_ref();

                    if XmlParser::matches_element(name_ref, "abstractNumId") {
                        abstract_num_id = XmlParser::get_w_number(&e, "val");
                    } else if XmlParser::matches_element(name_ref, "lvlOverride") {
                        let level = XmlParser::get_w_number(&e, "ilvl").unwrap_or(0);
                        overrides.push(LevelOverride::new(level));
                    }
                }
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(start)),
                _ => {}
            }
        }

        Ok(abstract_num_id.map(|abstract_num_id| Numbering {
            id,
            abstract_num_id,
            level_overrides: overrides,
        }))
    }

    fn parse_level_override(&self, reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<LevelOverride> {
        let mut level_override = LevelOverride::new(XmlParser::get_w_number(start, "ilvl").unwrap_or(0));

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = e.name();
                    let name_ref = name.as_ref();

                    if XmlParser::matches_element(name_ref, "lvl") {
                        level_override.override_level = Some(self.parse_level(reader, &e)?);
                    } else {
                        if XmlParser::matches_element(name_ref, "startOverride") {
                            level_override.override_start = XmlParser::get_w_number(&e, "val");
                        }
                        XmlParser::skip(reader, &e)?;
                    }
                }
                Event::Empty(e) => {
                    if XmlParser::matches_element(e.name().as_ref(), "startOverride") {
                        level_override.override_start = XmlParser::get_w_number(&e, "val");
                    }
                }
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(start)),
                _ => {}
            }
        }

        Ok(level_override)
    }

    fn parse_level(&self, reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<Level> {
        let index = XmlParser::get_w_number(start, "ilvl").unwrap_or(0);
        let mut level = Level::new(index, 0, NumberFormat::Decimal, "", LevelJc::Left);

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = e.name();
                    let name_ref = name.as_ref();

                    if XmlParser::matches_element(name_ref, "pPr") {
                        level.paragraph_property = parse_paragraph_property(reader, &e)?;
                    } else if XmlParser::matches_element(name_ref, "rPr") {
                        level.run_property = parse_run_property(reader, &e)?;
                    } else {
                        apply_level_element(&e, &mut level);
                        XmlParser::skip(reader, &e)?;
                    }
                }
                Event::Empty(e) => apply_level_element(&e, &mut level),
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(start)),
                _ => {}
            }
        }

        Ok(level)
    }
}

fn apply_level_element(e: &BytesStart, level: &mut Level) {
    let name = e.name();
    let name_ref = name.as_ref();

    if XmlParser::matches_element(name_ref, "start") {
        level.start = XmlParser::get_w_number(e, "val").unwrap_or(0);
    } else if XmlParser::matches_element(name_ref, "numFmt") {
        level.format = XmlParser::get_w_attribute(e, "val")
            .map(|v| NumberFormat::from_literal(&v))
            .unwrap_or_default();
    } else if XmlParser::matches_element(name_ref, "suff") {
        level.suffix = XmlParser::get_w_attribute(e, "val").map(|v| LevelSuffix::from_literal(&v));
    } else if XmlParser::matches_element(name_ref, "lvlText") {
        level.text = XmlParser::get_w_attribute(e, "val").unwrap_or_default();
    } else if XmlParser::matches_element(name_ref, "lvlJc") {
        level.jc = XmlParser::get_w_attribute(e, "val")
            .map(|v| LevelJc::from_literal(&v))
            .unwrap_or_default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numbering_writer::write_numbering;
    use doc_model::{RunProperty, SpecialIndent};

    #[test]
    fn test_parse_foreign_numbering() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:abstractNum w:abstractNumId="0">
    <w:nsid w:val="1A2B3C4D"/>
    <w:multiLevelType w:val="hybridMultilevel"/>
    <w:lvl w:ilvl="0" w:tplc="04090001">
      <w:start w:val="1"/>
      <w:numFmt w:val="bullet"/>
      <w:lvlText w:val="&#xF0B7;"/>
      <w:lvlJc w:val="left"/>
      <w:pPr><w:ind w:left="720" w:hanging="360"/></w:pPr>
      <w:rPr><w:rFonts w:ascii="Symbol" w:hAnsi="Symbol"/></w:rPr>
    </w:lvl>
  </w:abstractNum>
  <w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>
  <w:num w:numId="2"/>
</w:numbering>"#;
        let (abstract_nums, nums) = NumberingParser::new().parse(xml).unwrap();

        assert_eq!(abstract_nums.len(), 1);
        let level = abstract_nums[0].level(0).unwrap();
        assert_eq!(level.format, NumberFormat::Bullet);
        assert_eq!(level.text, "\u{F0B7}");
        assert_eq!(
            level.paragraph_property.indent.and_then(|i| i.special),
            Some(SpecialIndent::Hanging(360))
        );
        assert_eq!(
            level.run_property.fonts.as_ref().and_then(|f| f.ascii.as_deref()),
            Some("Symbol")
        );
        // numId 2 has no abstract definition reference
        assert_eq!(nums, vec![Numbering::new(1, 0)]);
    }

    #[test]
    fn test_written_numbering_reads_back() {
        let abstract_num = AbstractNumbering::new(3)
            .add_level(
                Level::new(0, 1, NumberFormat::LowerLetter, "(%1)", LevelJc::Left)
                    .with_suffix(LevelSuffix::Nothing)
                    .with_indent(Some(420), Some(SpecialIndent::FirstLine(100)), None),
            )
            .add_level(
                Level::new(1, 5, NumberFormat::UpperRoman, "%1.%2", LevelJc::Right)
                    .with_run_property(RunProperty::new().with_bold()),
            );
        let num = Numbering::new(7, 3).add_override(
            LevelOverride::new(1)
                .with_override_start(3)
                .with_override_level(Level::new(1, 3, NumberFormat::Decimal, "%2", LevelJc::Center)),
        );

        let xml = write_numbering(&[abstract_num.clone()], &[num.clone()]);
        let (abstract_nums, nums) = NumberingParser::new().parse(&xml).unwrap();
        assert_eq!(abstract_nums, vec![abstract_num]);
        assert_eq!(nums, vec![num]);
    }

    #[test]
    fn test_start_override_only() {
        let xml = r#"<w:numbering><w:num w:numId="4"><w:abstractNumId w:val="1"/><w:lvlOverride w:ilvl="0"><w:startOverride w:val="10"/></w:lvlOverride></w:num></w:numbering>"#;
        let (_, nums) = NumberingParser::new().parse(xml).unwrap();
        assert_eq!(
            nums,
            vec![Numbering::new(4, 1).add_override(LevelOverride::new(0).with_override_start(10))]
        );
    }
}
