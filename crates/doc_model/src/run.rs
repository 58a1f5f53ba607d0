//! Run - a span of text sharing one set of character properties

use crate::Border;
use serde::{Deserialize, Serialize};

literal_enum! {
    /// Superscript / subscript positioning
    pub enum VertAlignType fallback Baseline {
        Baseline => "baseline",
        Superscript => "superscript",
        Subscript => "subscript",
    }
}

literal_enum! {
    /// Kind of `w:br`
    pub enum BreakType fallback TextWrapping {
        Page => "page",
        Column => "column",
        TextWrapping => "textWrapping",
    }
}

/// Font slots of `w:rFonts`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunFonts {
    pub ascii: Option<String>,
    pub hi_ansi: Option<String>,
    pub east_asia: Option<String>,
    pub cs: Option<String>,
}

impl RunFonts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Same family for every script slot
    pub fn all(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            ascii: Some(name.clone()),
            hi_ansi: Some(name.clone()),
            east_asia: Some(name.clone()),
            cs: Some(name),
        }
    }

    pub fn with_ascii(mut self, name: impl Into<String>) -> Self {
        self.ascii = Some(name.into());
        self
    }

    pub fn with_hi_ansi(mut self, name: impl Into<String>) -> Self {
        self.hi_ansi = Some(name.into());
        self
    }

    pub fn with_east_asia(mut self, name: impl Into<String>) -> Self {
        self.east_asia = Some(name.into());
        self
    }

    pub fn with_cs(mut self, name: impl Into<String>) -> Self {
        self.cs = Some(name.into());
        self
    }

    /// Slot-wise merge, `other` wins where set
    pub fn merge(&self, other: &RunFonts) -> RunFonts {
        RunFonts {
            ascii: other.ascii.clone().or_else(|| self.ascii.clone()),
            hi_ansi: other.hi_ansi.clone().or_else(|| self.hi_ansi.clone()),
            east_asia: other.east_asia.clone().or_else(|| self.east_asia.clone()),
            cs: other.cs.clone().or_else(|| self.cs.clone()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ascii.is_none() && self.hi_ansi.is_none() && self.east_asia.is_none() && self.cs.is_none()
    }
}

/// Character formatting (`w:rPr`)
///
/// Every field is optional; an absent field defers to the style cascade.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunProperty {
    /// Character style id
    pub style: Option<String>,
    /// Font size in half-points
    pub size: Option<u32>,
    pub color: Option<String>,
    pub highlight: Option<String>,
    pub vert_align: Option<VertAlignType>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    /// Underline literal (`single`, `double`, `wave`, ...)
    pub underline: Option<String>,
    pub vanish: Option<bool>,
    /// Character spacing in twips
    pub spacing: Option<i32>,
    pub text_border: Option<Border>,
    pub fonts: Option<RunFonts>,
}

impl RunProperty {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge another set of properties on top of this one.
    /// Properties from `other` override properties from `self` when present.
    pub fn merge(&self, other: &RunProperty) -> RunProperty {
        let fonts = match (&self.fonts, &other.fonts) {
            (Some(base), Some(top)) => Some(base.merge(top)),
            (base, top) => top.clone().or_else(|| base.clone()),
        };
        RunProperty {
            style: other.style.clone().or_else(|| self.style.clone()),
            size: other.size.or(self.size),
            color: other.color.clone().or_else(|| self.color.clone()),
            highlight: other.highlight.clone().or_else(|| self.highlight.clone()),
            vert_align: other.vert_align.or(self.vert_align),
            bold: other.bold.or(self.bold),
            italic: other.italic.or(self.italic),
            underline: other.underline.clone().or_else(|| self.underline.clone()),
            vanish: other.vanish.or(self.vanish),
            spacing: other.spacing.or(self.spacing),
            text_border: other.text_border.clone().or_else(|| self.text_border.clone()),
            fonts,
        }
    }

    /// Check if all properties are None
    pub fn is_empty(&self) -> bool {
        self.style.is_none()
            && self.size.is_none()
            && self.color.is_none()
            && self.highlight.is_none()
            && self.vert_align.is_none()
            && self.bold.is_none()
            && self.italic.is_none()
            && self.underline.is_none()
            && self.vanish.is_none()
            && self.spacing.is_none()
            && self.text_border.is_none()
            && self.fonts.as_ref().map_or(true, RunFonts::is_empty)
    }

    pub fn with_style(mut self, style_id: impl Into<String>) -> Self {
        self.style = Some(style_id.into());
        self
    }

    pub fn with_size(mut self, half_points: u32) -> Self {
        self.size = Some(half_points);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_highlight(mut self, color: impl Into<String>) -> Self {
        self.highlight = Some(color.into());
        self
    }

    pub fn with_vert_align(mut self, align: VertAlignType) -> Self {
        self.vert_align = Some(align);
        self
    }

    pub fn with_bold(mut self) -> Self {
        self.bold = Some(true);
        self
    }

    pub fn with_italic(mut self) -> Self {
        self.italic = Some(true);
        self
    }

    pub fn with_underline(mut self, line_type: impl Into<String>) -> Self {
        self.underline = Some(line_type.into());
        self
    }

    pub fn with_vanish(mut self) -> Self {
        self.vanish = Some(true);
        self
    }

    pub fn with_spacing(mut self, twips: i32) -> Self {
        self.spacing = Some(twips);
        self
    }

    pub fn with_text_border(mut self, border: Border) -> Self {
        self.text_border = Some(border);
        self
    }

    pub fn with_fonts(mut self, fonts: RunFonts) -> Self {
        self.fonts = Some(fonts);
        self
    }
}

/// `w:t` content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    pub text: String,
}

/// `w:delText` content, only meaningful inside a deletion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteText {
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Break {
    pub break_type: BreakType,
}

/// Content of a run, in order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum RunChild {
    Text(Text),
    DeleteText(DeleteText),
    Tab,
    Break(Break),
}

/// A run of text with uniform formatting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub children: Vec<RunChild>,
    pub property: RunProperty,
}

impl Run {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(RunChild::Text(Text { text: text.into() }));
        self
    }

    pub fn add_delete_text(mut self, text: impl Into<String>) -> Self {
        self.children
            .push(RunChild::DeleteText(DeleteText { text: text.into() }));
        self
    }

    pub fn add_tab(mut self) -> Self {
        self.children.push(RunChild::Tab);
        self
    }

    pub fn add_break(mut self, break_type: BreakType) -> Self {
        self.children.push(RunChild::Break(Break { break_type }));
        self
    }

    pub fn with_property(mut self, property: RunProperty) -> Self {
        self.property = property;
        self
    }

    pub fn with_style(mut self, style_id: impl Into<String>) -> Self {
        self.property = self.property.with_style(style_id);
        self
    }

    pub fn with_size(mut self, half_points: u32) -> Self {
        self.property = self.property.with_size(half_points);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.property = self.property.with_color(color);
        self
    }

    pub fn with_highlight(mut self, color: impl Into<String>) -> Self {
        self.property = self.property.with_highlight(color);
        self
    }

    pub fn with_vert_align(mut self, align: VertAlignType) -> Self {
        self.property = self.property.with_vert_align(align);
        self
    }

    pub fn with_bold(mut self) -> Self {
        self.property = self.property.with_bold();
        self
    }

    pub fn with_italic(mut self) -> Self {
        self.property = self.property.with_italic();
        self
    }

    pub fn with_underline(mut self, line_type: impl Into<String>) -> Self {
        self.property = self.property.with_underline(line_type);
        self
    }

    pub fn with_vanish(mut self) -> Self {
        self.property = self.property.with_vanish();
        self
    }

    pub fn with_spacing(mut self, twips: i32) -> Self {
        self.property = self.property.with_spacing(twips);
        self
    }

    pub fn with_text_border(mut self, border: Border) -> Self {
        self.property = self.property.with_text_border(border);
        self
    }

    pub fn with_fonts(mut self, fonts: RunFonts) -> Self {
        self.property = self.property.with_fonts(fonts);
        self
    }

    /// Visible text of the run; tabs and breaks become `\t` and `\n`
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                RunChild::Text(t) => out.push_str(&t.text),
                RunChild::DeleteText(t) => out.push_str(&t.text),
                RunChild::Tab => out.push('\t'),
                RunChild::Break(_) => out.push('\n'),
            }
        }
        out
    }
}
