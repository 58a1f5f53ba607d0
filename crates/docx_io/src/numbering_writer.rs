//! numbering.xml writer
//!
//! All `w:abstractNum` entries come before the `w:num` instances, as the
//! schema requires.

use crate::document_writer::escape_xml;
use crate::namespaces;
use crate::properties_writer::{write_paragraph_property, write_run_property};
use doc_model::{AbstractNumbering, Level, Numbering};

pub(crate) fn write_numbering(abstract_nums: &[AbstractNumbering], nums: &[Numbering]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(&format!(r#"<w:numbering xmlns:w="{}">"#, namespaces::W));

    for abstract_num in abstract_nums {
        xml.push_str(&format!(
            r#"<w:abstractNum w:abstractNumId="{}">"#,
            abstract_num.id
        ));
        for level in &abstract_num.levels {
            write_level(&mut xml, level);
        }
        xml.push_str("</w:abstractNum>");
    }

    for num in nums {
        xml.push_str(&format!(r#"<w:num w:numId="{}">"#, num.id));
        xml.push_str(&format!(
            r#"<w:abstractNumId w:val="{}"/>"#,
            num.abstract_num_id
        ));
        for level_override in &num.level_overrides {
            xml.push_str(&format!(
                r#"<w:lvlOverride w:ilvl="{}">"#,
                level_override.level
            ));
            if let Some(start) = level_override.override_start {
                xml.push_str(&format!(r#"<w:startOverride w:val="{}"/>"#, start));
            }
            if let Some(ref level) = level_override.override_level {
                write_level(&mut xml, level);
            }
            xml.push_str("</w:lvlOverride>");
        }
        xml.push_str("</w:num>");
    }

    xml.push_str("</w:numbering>");
    xml
}

fn write_level(xml: &mut String, level: &Level) {
    xml.push_str(&format!(r#"<w:lvl w:ilvl="{}">"#, level.level));
    xml.push_str(&format!(r#"<w:start w:val="{}"/>"#, level.start));
    xml.push_str(&format!(r#"<w:numFmt w:val="{}"/>"#, level.format.as_str()));
    if let Some(suffix) = level.suffix {
        xml.push_str(&format!(r#"<w:suff w:val="{}"/>"#, suffix.as_str()));
    }
    xml.push_str(&format!(r#"<w:lvlText w:val="{}"/>"#, escape_xml(&level.text)));
    xml.push_str(&format!(r#"<w:lvlJc w:val="{}"/>"#, level.jc.as_str()));
    write_paragraph_property(xml, &level.paragraph_property);
    write_run_property(xml, &level.run_property);
    xml.push_str("</w:lvl>");
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::{LevelJc, LevelOverride, LevelSuffix, NumberFormat, SpecialIndent};

    #[test]
    fn test_abstract_before_instances() {
        let abstract_num = AbstractNumbering::new(2).add_level(
            Level::new(0, 1, NumberFormat::Decimal, "%1.", LevelJc::Left)
                .with_suffix(LevelSuffix::Space)
                .with_indent(Some(420), Some(SpecialIndent::Hanging(420)), None),
        );
        let xml = write_numbering(&[abstract_num], &[Numbering::new(1, 2)]);
        assert!(xml.find("<w:abstractNum ").unwrap() < xml.find("<w:num ").unwrap());
        assert!(xml.contains(
            r#"<w:lvl w:ilvl="0"><w:start w:val="1"/><w:numFmt w:val="decimal"/><w:suff w:val="space"/><w:lvlText w:val="%1."/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="420" w:hanging="420"/></w:pPr></w:lvl>"#
        ));
        assert!(xml.contains(r#"<w:num w:numId="1"><w:abstractNumId w:val="2"/></w:num>"#));
    }

    #[test]
    fn test_level_override_replaces_definition() {
        let abstract_num = AbstractNumbering::new(0).add_level(Level::new(
            0,
            1,
            NumberFormat::UpperRoman,
            "%1)",
            LevelJc::Right,
        ));
        let num = Numbering::new(0, 0).add_override(
            LevelOverride::new(0)
                .with_override_start(3)
                .with_override_level(Level::new(0, 3, NumberFormat::Decimal, "%1", LevelJc::Left)),
        );
        let xml = write_numbering(&[abstract_num], &[num]);
        let instance = &xml[xml.find("<w:num ").unwrap()..];
        assert!(instance.contains(r#"<w:startOverride w:val="3"/>"#));
        assert!(instance.contains(r#"<w:start w:val="3"/><w:numFmt w:val="decimal"/>"#));
        assert!(instance.contains(r#"<w:lvlText w:val="%1"/><w:lvlJc w:val="left"/>"#));
    }
}
