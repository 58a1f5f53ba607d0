//! List and numbering system for document paragraphs
//!
//! This module implements OOXML-compatible list definitions with:
//! - Abstract numbering definitions (templates of up to 9 levels)
//! - Numbering instances (concrete uses of templates)
//! - Level overrides replacing the start value and/or the whole level

use crate::{ParagraphProperty, RunProperty, SpecialIndent, Indent};
use serde::{Deserialize, Serialize};

literal_enum! {
    /// Number format types for list items (`w:numFmt`)
    pub enum NumberFormat fallback Decimal {
        Decimal => "decimal",
        DecimalZero => "decimalZero",
        LowerLetter => "lowerLetter",
        UpperLetter => "upperLetter",
        LowerRoman => "lowerRoman",
        UpperRoman => "upperRoman",
        Bullet => "bullet",
        Ordinal => "ordinal",
        CardinalText => "cardinalText",
        OrdinalText => "ordinalText",
        None => "none",
    }
}

literal_enum! {
    /// Alignment of the number itself (`w:lvlJc`)
    pub enum LevelJc fallback Left {
        Left => "left",
        Center => "center",
        Right => "right",
        Start => "start",
        End => "end",
    }
}

literal_enum! {
    /// What follows the number (`w:suff`)
    pub enum LevelSuffix fallback Tab {
        Tab => "tab",
        Space => "space",
        Nothing => "nothing",
    }
}

/// A single list level definition (`w:lvl`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    /// Level index (0-8)
    pub level: usize,
    pub start: usize,
    pub format: NumberFormat,
    /// Level text pattern, e.g. "%1." or "%1.%2"
    pub text: String,
    pub jc: LevelJc,
    pub suffix: Option<LevelSuffix>,
    pub paragraph_property: ParagraphProperty,
    pub run_property: RunProperty,
}

impl Level {
    pub fn new(
        level: usize,
        start: usize,
        format: NumberFormat,
        text: impl Into<String>,
        jc: LevelJc,
    ) -> Self {
        Self {
            level,
            start,
            format,
            text: text.into(),
            jc,
            suffix: None,
            paragraph_property: ParagraphProperty::default(),
            run_property: RunProperty::default(),
        }
    }

    pub fn with_suffix(mut self, suffix: LevelSuffix) -> Self {
        self.suffix = Some(suffix);
        self
    }

    pub fn with_indent(
        mut self,
        left: Option<i32>,
        special: Option<SpecialIndent>,
        right: Option<i32>,
    ) -> Self {
        self.paragraph_property.indent = Some(Indent::new(left, special, right));
        self
    }

    pub fn with_paragraph_property(mut self, property: ParagraphProperty) -> Self {
        self.paragraph_property = property;
        self
    }

    pub fn with_run_property(mut self, property: RunProperty) -> Self {
        self.run_property = property;
        self
    }
}

/// Template shared by numbering instances (`w:abstractNum`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbstractNumbering {
    pub id: usize,
    pub levels: Vec<Level>,
}

impl AbstractNumbering {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            levels: Vec::new(),
        }
    }

    pub fn add_level(mut self, level: Level) -> Self {
        self.levels.push(level);
        self
    }

    pub fn level(&self, index: usize) -> Option<&Level> {
        self.levels.iter().find(|l| l.level == index)
    }
}

/// Per-instance replacement of one level (`w:lvlOverride`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelOverride {
    pub level: usize,
    pub override_start: Option<usize>,
    pub override_level: Option<Level>,
}

impl LevelOverride {
    pub fn new(level: usize) -> Self {
        Self {
            level,
            override_start: None,
            override_level: None,
        }
    }

    pub fn with_override_start(mut self, start: usize) -> Self {
        self.override_start = Some(start);
        self
    }

    pub fn with_override_level(mut self, level: Level) -> Self {
        self.override_level = Some(level);
        self
    }
}

/// Numbering instance referenced from paragraphs (`w:num`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Numbering {
    pub id: usize,
    pub abstract_num_id: usize,
    pub level_overrides: Vec<LevelOverride>,
}

impl Numbering {
    pub fn new(id: usize, abstract_num_id: usize) -> Self {
        Self {
            id,
            abstract_num_id,
            level_overrides: Vec::new(),
        }
    }

    pub fn add_override(mut self, level_override: LevelOverride) -> Self {
        self.level_overrides.push(level_override);
        self
    }

    /// Level definition in effect for this instance: the override's level
    /// replaces the abstract one, then the start override is applied.
    pub fn effective_level(&self, abstract_num: &AbstractNumbering, index: usize) -> Option<Level> {
        let ov = self.level_overrides.iter().find(|o| o.level == index);
        let mut level = ov
            .and_then(|o| o.override_level.clone())
            .or_else(|| abstract_num.level(index).cloned())?;
        if let Some(start) = ov.and_then(|o| o.override_start) {
            level.start = start;
        }
        Some(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abstract_num() -> AbstractNumbering {
        AbstractNumbering::new(0)
            .add_level(Level::new(0, 1, NumberFormat::UpperRoman, "%1.", LevelJc::Left))
            .add_level(Level::new(1, 1, NumberFormat::LowerLetter, "%2)", LevelJc::Left))
    }

    #[test]
    fn test_override_level_replaces_definition() {
        let num = Numbering::new(0, 0).add_override(
            LevelOverride::new(0)
                .with_override_level(Level::new(0, 3, NumberFormat::Decimal, "%1", LevelJc::Left)),
        );
        let level = num.effective_level(&abstract_num(), 0).unwrap();
        assert_eq!(level.start, 3);
        assert_eq!(level.format, NumberFormat::Decimal);
        assert_eq!(level.text, "%1");
    }

    #[test]
    fn test_start_override_only() {
        let num = Numbering::new(1, 0).add_override(LevelOverride::new(1).with_override_start(5));
        let level = num.effective_level(&abstract_num(), 1).unwrap();
        assert_eq!(level.start, 5);
        assert_eq!(level.format, NumberFormat::LowerLetter);
    }

    #[test]
    fn test_untouched_level_and_missing_level() {
        let num = Numbering::new(1, 0);
        assert_eq!(num.effective_level(&abstract_num(), 0).unwrap().start, 1);
        assert!(num.effective_level(&abstract_num(), 7).is_none());
    }

    #[test]
    fn test_unknown_number_format() {
        assert_eq!(NumberFormat::from_literal("klingon"), NumberFormat::Decimal);
        assert_eq!(NumberFormat::from_literal("none"), NumberFormat::None);
    }
}
