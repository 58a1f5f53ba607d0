//! Paragraph - block of inline content with paragraph-level formatting

use crate::{
    BookmarkEnd, BookmarkStart, Comment, CommentRangeEnd, CommentRangeStart, Run, RunFonts,
    RunProperty,
};
use serde::{Deserialize, Serialize};

literal_enum! {
    /// Paragraph justification (`w:jc`)
    pub enum AlignmentType fallback Left {
        Left => "left",
        Center => "center",
        Right => "right",
        /// Justified
        Both => "both",
        Distribute => "distribute",
        Start => "start",
        End => "end",
    }
}

literal_enum! {
    /// How `line` in `w:spacing` is interpreted
    pub enum LineSpacingType fallback Auto {
        Auto => "auto",
        AtLeast => "atLeast",
        Exact => "exact",
    }
}

/// First-line or hanging indentation in twips
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "val", rename_all = "camelCase")]
pub enum SpecialIndent {
    FirstLine(i32),
    Hanging(i32),
}

/// Paragraph indentation (`w:ind`), twips
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Indent {
    pub left: Option<i32>,
    pub right: Option<i32>,
    pub special: Option<SpecialIndent>,
}

impl Indent {
    pub fn new(left: Option<i32>, special: Option<SpecialIndent>, right: Option<i32>) -> Self {
        Self {
            left,
            right,
            special,
        }
    }

    pub fn merge(&self, other: &Indent) -> Indent {
        Indent {
            left: other.left.or(self.left),
            right: other.right.or(self.right),
            special: other.special.or(self.special),
        }
    }
}

/// Paragraph spacing (`w:spacing`), twips
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSpacing {
    pub before: Option<u32>,
    pub after: Option<u32>,
    pub line: Option<u32>,
    pub rule: Option<LineSpacingType>,
}

impl LineSpacing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_before(mut self, before: u32) -> Self {
        self.before = Some(before);
        self
    }

    pub fn with_after(mut self, after: u32) -> Self {
        self.after = Some(after);
        self
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_rule(mut self, rule: LineSpacingType) -> Self {
        self.rule = Some(rule);
        self
    }

    pub fn merge(&self, other: &LineSpacing) -> LineSpacing {
        LineSpacing {
            before: other.before.or(self.before),
            after: other.after.or(self.after),
            line: other.line.or(self.line),
            rule: other.rule.or(self.rule),
        }
    }
}

/// Reference to a numbering instance and level (`w:numPr`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberingProperty {
    pub id: usize,
    pub level: usize,
}

/// Paragraph formatting (`w:pPr`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParagraphProperty {
    /// Paragraph style id
    pub style: Option<String>,
    pub alignment: Option<AlignmentType>,
    pub indent: Option<Indent>,
    pub numbering: Option<NumberingProperty>,
    pub line_spacing: Option<LineSpacing>,
    /// Formatting of the paragraph mark
    pub run_property: RunProperty,
    pub keep_next: Option<bool>,
    pub keep_lines: Option<bool>,
    pub page_break_before: Option<bool>,
    pub widow_control: Option<bool>,
}

impl ParagraphProperty {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another set of properties on top of this one.
    /// Properties from `other` override properties from `self` when present.
    pub fn merge(&self, other: &ParagraphProperty) -> ParagraphProperty {
        let indent = match (&self.indent, &other.indent) {
            (Some(base), Some(top)) => Some(base.merge(top)),
            (base, top) => top.or(*base),
        };
        let line_spacing = match (&self.line_spacing, &other.line_spacing) {
            (Some(base), Some(top)) => Some(base.merge(top)),
            (base, top) => top.or(*base),
        };
        ParagraphProperty {
            style: other.style.clone().or_else(|| self.style.clone()),
            alignment: other.alignment.or(self.alignment),
            indent,
            numbering: other.numbering.or(self.numbering),
            line_spacing,
            run_property: self.run_property.merge(&other.run_property),
            keep_next: other.keep_next.or(self.keep_next),
            keep_lines: other.keep_lines.or(self.keep_lines),
            page_break_before: other.page_break_before.or(self.page_break_before),
            widow_control: other.widow_control.or(self.widow_control),
        }
    }

    /// Check if all properties are None
    pub fn is_empty(&self) -> bool {
        self.style.is_none()
            && self.alignment.is_none()
            && self.indent.is_none()
            && self.numbering.is_none()
            && self.line_spacing.is_none()
            && self.run_property.is_empty()
            && self.keep_next.is_none()
            && self.keep_lines.is_none()
            && self.page_break_before.is_none()
            && self.widow_control.is_none()
    }
}

/// Tracked insertion (`w:ins`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insert {
    pub children: Vec<Run>,
    pub author: String,
    pub date: String,
}

impl Insert {
    pub fn new(run: Run) -> Self {
        Self {
            children: vec![run],
            ..Default::default()
        }
    }

    pub fn add_run(mut self, run: Run) -> Self {
        self.children.push(run);
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }
}

/// Tracked deletion (`w:del`); its runs carry `DeleteText`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delete {
    pub children: Vec<Run>,
    pub author: String,
    pub date: String,
}

impl Delete {
    pub fn new(run: Run) -> Self {
        Self {
            children: vec![run],
            ..Default::default()
        }
    }

    pub fn add_run(mut self, run: Run) -> Self {
        self.children.push(run);
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }
}

/// Inline content of a paragraph, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ParagraphChild {
    Run(Box<Run>),
    Insert(Insert),
    Delete(Delete),
    BookmarkStart(BookmarkStart),
    BookmarkEnd(BookmarkEnd),
    CommentStart(Box<CommentRangeStart>),
    CommentEnd(CommentRangeEnd),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub children: Vec<ParagraphChild>,
    pub property: ParagraphProperty,
}

impl Paragraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_run(mut self, run: Run) -> Self {
        self.children.push(ParagraphChild::Run(Box::new(run)));
        self
    }

    pub fn add_insert(mut self, insert: Insert) -> Self {
        self.children.push(ParagraphChild::Insert(insert));
        self
    }

    pub fn add_delete(mut self, delete: Delete) -> Self {
        self.children.push(ParagraphChild::Delete(delete));
        self
    }

    pub fn add_bookmark_start(mut self, id: usize, name: impl Into<String>) -> Self {
        self.children
            .push(ParagraphChild::BookmarkStart(BookmarkStart::new(id, name)));
        self
    }

    pub fn add_bookmark_end(mut self, id: usize) -> Self {
        self.children
            .push(ParagraphChild::BookmarkEnd(BookmarkEnd::new(id)));
        self
    }

    pub fn add_comment_start(mut self, comment: Comment) -> Self {
        self.children.push(ParagraphChild::CommentStart(Box::new(
            CommentRangeStart::new(comment),
        )));
        self
    }

    pub fn add_comment_end(mut self, id: usize) -> Self {
        self.children
            .push(ParagraphChild::CommentEnd(CommentRangeEnd::new(id)));
        self
    }

    pub fn with_property(mut self, property: ParagraphProperty) -> Self {
        self.property = property;
        self
    }

    pub fn with_style(mut self, style_id: impl Into<String>) -> Self {
        self.property.style = Some(style_id.into());
        self
    }

    pub fn with_alignment(mut self, alignment: AlignmentType) -> Self {
        self.property.alignment = Some(alignment);
        self
    }

    pub fn with_indent(
        mut self,
        left: Option<i32>,
        special: Option<SpecialIndent>,
        right: Option<i32>,
    ) -> Self {
        self.property.indent = Some(Indent::new(left, special, right));
        self
    }

    pub fn with_numbering(mut self, id: usize, level: usize) -> Self {
        self.property.numbering = Some(NumberingProperty { id, level });
        self
    }

    pub fn with_line_spacing(mut self, spacing: LineSpacing) -> Self {
        self.property.line_spacing = Some(spacing);
        self
    }

    /// Paragraph mark font size in half-points
    pub fn with_size(mut self, half_points: u32) -> Self {
        self.property.run_property = self.property.run_property.with_size(half_points);
        self
    }

    pub fn with_bold(mut self) -> Self {
        self.property.run_property = self.property.run_property.with_bold();
        self
    }

    pub fn with_italic(mut self) -> Self {
        self.property.run_property = self.property.run_property.with_italic();
        self
    }

    pub fn with_fonts(mut self, fonts: RunFonts) -> Self {
        self.property.run_property = self.property.run_property.with_fonts(fonts);
        self
    }

    pub fn with_keep_next(mut self, keep: bool) -> Self {
        self.property.keep_next = Some(keep);
        self
    }

    pub fn with_keep_lines(mut self, keep: bool) -> Self {
        self.property.keep_lines = Some(keep);
        self
    }

    pub fn with_page_break_before(mut self, page_break: bool) -> Self {
        self.property.page_break_before = Some(page_break);
        self
    }

    pub fn with_widow_control(mut self, control: bool) -> Self {
        self.property.widow_control = Some(control);
        self
    }

    /// Plain text of all runs, inserted and deleted runs included
    pub fn raw_text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                ParagraphChild::Run(run) => out.push_str(&run.text()),
                ParagraphChild::Insert(ins) => {
                    ins.children.iter().for_each(|r| out.push_str(&r.text()))
                }
                ParagraphChild::Delete(del) => {
                    del.children.iter().for_each(|r| out.push_str(&r.text()))
                }
                _ => {}
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_children_in_order() {
        let para = Paragraph::new()
            .add_bookmark_start(1, "intro")
            .add_run(Run::new().add_text("Hello"))
            .add_bookmark_end(1);
        assert!(matches!(para.children[0], ParagraphChild::BookmarkStart(_)));
        assert!(matches!(para.children[1], ParagraphChild::Run(_)));
        assert!(matches!(para.children[2], ParagraphChild::BookmarkEnd(_)));
    }

    #[test]
    fn test_paragraph_property_merge_keeps_partial_indent() {
        let base = ParagraphProperty {
            indent: Some(Indent::new(Some(720), None, Some(100))),
            ..Default::default()
        };
        let top = ParagraphProperty {
            indent: Some(Indent::new(None, Some(SpecialIndent::Hanging(360)), None)),
            ..Default::default()
        };
        let merged = base.merge(&top).indent.unwrap();
        assert_eq!(merged.left, Some(720));
        assert_eq!(merged.right, Some(100));
        assert_eq!(merged.special, Some(SpecialIndent::Hanging(360)));
    }

    #[test]
    fn test_raw_text_includes_revisions() {
        let para = Paragraph::new()
            .add_run(Run::new().add_text("a"))
            .add_insert(Insert::new(Run::new().add_text("b")))
            .add_delete(Delete::new(Run::new().add_delete_text("c")));
        assert_eq!(para.raw_text(), "abc");
    }

    #[test]
    fn test_unknown_alignment_falls_back_to_left() {
        assert_eq!(AlignmentType::from_literal("justify-ish"), AlignmentType::Left);
        assert_eq!(AlignmentType::from_literal("both"), AlignmentType::Both);
    }

    #[test]
    fn test_empty_property() {
        assert!(ParagraphProperty::new().is_empty());
        assert!(!Paragraph::new().with_keep_next(true).property.is_empty());
    }
}
