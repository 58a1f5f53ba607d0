//! Section Model - Page size, margins and document grid (`w:sectPr`)
//!
//! Dimensions are stored exactly as given, in twips. Orientation is a flag
//! only; width and height are never swapped to match it.

use serde::{Deserialize, Serialize};

literal_enum! {
    pub enum PageOrientationType fallback Portrait {
        Portrait => "portrait",
        Landscape => "landscape",
    }
}

literal_enum! {
    pub enum DocGridType fallback Default {
        Default => "default",
        Lines => "lines",
        LinesAndChars => "linesAndChars",
        SnapToChars => "snapToChars",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSize {
    pub w: u32,
    pub h: u32,
    pub orient: Option<PageOrientationType>,
}

impl Default for PageSize {
    /// A4 portrait
    fn default() -> Self {
        Self {
            w: 11906,
            h: 16838,
            orient: None,
        }
    }
}

impl PageSize {
    pub fn new(w: u32, h: u32) -> Self {
        Self { w, h, orient: None }
    }

    pub fn with_orient(mut self, orient: PageOrientationType) -> Self {
        self.orient = Some(orient);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMargin {
    pub top: i32,
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
    pub header: i32,
    pub footer: i32,
    pub gutter: i32,
}

impl Default for PageMargin {
    fn default() -> Self {
        Self {
            top: 1985,
            left: 1701,
            bottom: 1701,
            right: 1701,
            header: 851,
            footer: 992,
            gutter: 0,
        }
    }
}

impl PageMargin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_top(mut self, v: i32) -> Self {
        self.top = v;
        self
    }

    pub fn with_left(mut self, v: i32) -> Self {
        self.left = v;
        self
    }

    pub fn with_bottom(mut self, v: i32) -> Self {
        self.bottom = v;
        self
    }

    pub fn with_right(mut self, v: i32) -> Self {
        self.right = v;
        self
    }

    pub fn with_header(mut self, v: i32) -> Self {
        self.header = v;
        self
    }

    pub fn with_footer(mut self, v: i32) -> Self {
        self.footer = v;
        self
    }

    pub fn with_gutter(mut self, v: i32) -> Self {
        self.gutter = v;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocGrid {
    pub grid_type: DocGridType,
    pub line_pitch: Option<usize>,
    pub char_space: Option<isize>,
}

impl Default for DocGrid {
    fn default() -> Self {
        Self {
            grid_type: DocGridType::Lines,
            line_pitch: Some(360),
            char_space: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionProperty {
    pub page_size: PageSize,
    pub page_margin: PageMargin,
    pub doc_grid: DocGrid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_keeps_given_dimensions() {
        let size = PageSize::new(16838, 11906).with_orient(PageOrientationType::Landscape);
        assert_eq!(size.w, 16838);
        assert_eq!(size.h, 11906);
        assert_eq!(size.orient, Some(PageOrientationType::Landscape));
    }

    #[test]
    fn test_margin_builder() {
        let margin = PageMargin::new().with_top(100).with_gutter(20);
        assert_eq!(margin.top, 100);
        assert_eq!(margin.gutter, 20);
        assert_eq!(margin.left, 1701);
    }
}
