//! Table model - Tables, rows, cells, and grid definitions
//!
//! A table owns its grid (ordered column widths in twips) and its rows.
//! Cells hold block content, so tables nest to arbitrary depth. Column
//! coverage of a row is `grid_before + sum(grid_span) + grid_after`.

use crate::{Border, Paragraph, Shading};
use serde::{Deserialize, Serialize};

// =============================================================================
// Literal enums
// =============================================================================

literal_enum! {
    /// Unit of a width value (`w:type`)
    pub enum WidthType fallback Dxa {
        /// Twentieths of a point
        Dxa => "dxa",
        Auto => "auto",
        /// Fiftieths of a percent
        Pct => "pct",
        Nil => "nil",
    }
}

literal_enum! {
    /// Table placement on the page (`w:tblPr/w:jc`)
    pub enum TableAlignmentType fallback Left {
        Left => "left",
        Center => "center",
        Right => "right",
    }
}

literal_enum! {
    pub enum TableLayoutType fallback Autofit {
        Autofit => "autofit",
        Fixed => "fixed",
    }
}

literal_enum! {
    /// Row height rule (`w:trHeight/@w:hRule`)
    pub enum HeightRule fallback AtLeast {
        Auto => "auto",
        AtLeast => "atLeast",
        Exact => "exact",
    }
}

literal_enum! {
    /// Vertical merge state; a bare `<w:vMerge/>` means continue
    pub enum VMergeType fallback Continue {
        Restart => "restart",
        Continue => "continue",
    }
}

literal_enum! {
    pub enum VAlignType fallback Top {
        Top => "top",
        Center => "center",
        Bottom => "bottom",
    }
}

literal_enum! {
    /// Text flow inside a cell
    pub enum TextDirectionType fallback LrTb {
        LrTb => "lrTb",
        TbRl => "tbRl",
        BtLr => "btLr",
        LrTbV => "lrTbV",
        TbRlV => "tbRlV",
        TbLrV => "tbLrV",
    }
}

// =============================================================================
// Widths and margins
// =============================================================================

/// A width value with its unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableWidth {
    pub width: usize,
    pub width_type: WidthType,
}

impl TableWidth {
    pub fn new(width: usize, width_type: WidthType) -> Self {
        Self { width, width_type }
    }

    pub fn dxa(width: usize) -> Self {
        Self::new(width, WidthType::Dxa)
    }
}

/// Default cell margins of a table (`w:tblCellMar`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellMargins {
    pub top: Option<TableWidth>,
    pub left: Option<TableWidth>,
    pub bottom: Option<TableWidth>,
    pub right: Option<TableWidth>,
}

impl CellMargins {
    /// Same dxa margin on every edge
    pub fn uniform(value: usize) -> Self {
        let w = Some(TableWidth::dxa(value));
        Self {
            top: w,
            left: w,
            bottom: w,
            right: w,
        }
    }
}

// =============================================================================
// Borders
// =============================================================================

/// Table-level borders (`w:tblBorders`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableBorders {
    pub top: Option<Border>,
    pub left: Option<Border>,
    pub bottom: Option<Border>,
    pub right: Option<Border>,
    pub inside_h: Option<Border>,
    pub inside_v: Option<Border>,
}

impl TableBorders {
    /// Single-line borders on every edge, inner lines included
    pub fn with_all(border: Border) -> Self {
        Self {
            top: Some(border.clone()),
            left: Some(border.clone()),
            bottom: Some(border.clone()),
            right: Some(border.clone()),
            inside_h: Some(border.clone()),
            inside_v: Some(border),
        }
    }
}

/// Edge slot of a cell border
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CellBorderPosition {
    Top,
    Left,
    Bottom,
    Right,
    InsideH,
    InsideV,
    /// Diagonal from top-left to bottom-right
    Tl2br,
    /// Diagonal from top-right to bottom-left
    Tr2bl,
}

/// Per-edge cell borders (`w:tcBorders`); every slot is independent
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableCellBorders {
    pub top: Option<Border>,
    pub left: Option<Border>,
    pub bottom: Option<Border>,
    pub right: Option<Border>,
    pub inside_h: Option<Border>,
    pub inside_v: Option<Border>,
    pub tl2br: Option<Border>,
    pub tr2bl: Option<Border>,
}

impl TableCellBorders {
    fn slot_mut(&mut self, position: CellBorderPosition) -> &mut Option<Border> {
        match position {
            CellBorderPosition::Top => &mut self.top,
            CellBorderPosition::Left => &mut self.left,
            CellBorderPosition::Bottom => &mut self.bottom,
            CellBorderPosition::Right => &mut self.right,
            CellBorderPosition::InsideH => &mut self.inside_h,
            CellBorderPosition::InsideV => &mut self.inside_v,
            CellBorderPosition::Tl2br => &mut self.tl2br,
            CellBorderPosition::Tr2bl => &mut self.tr2bl,
        }
    }

    pub fn get(&self, position: CellBorderPosition) -> Option<&Border> {
        match position {
            CellBorderPosition::Top => self.top.as_ref(),
            CellBorderPosition::Left => self.left.as_ref(),
            CellBorderPosition::Bottom => self.bottom.as_ref(),
            CellBorderPosition::Right => self.right.as_ref(),
            CellBorderPosition::InsideH => self.inside_h.as_ref(),
            CellBorderPosition::InsideV => self.inside_v.as_ref(),
            CellBorderPosition::Tl2br => self.tl2br.as_ref(),
            CellBorderPosition::Tr2bl => self.tr2bl.as_ref(),
        }
    }

    pub fn set(&mut self, position: CellBorderPosition, border: Border) {
        *self.slot_mut(position) = Some(border);
    }

    pub fn clear(&mut self, position: CellBorderPosition) {
        *self.slot_mut(position) = None;
    }

    /// Occupied slots in XML order
    pub fn iter(&self) -> impl Iterator<Item = (CellBorderPosition, &Border)> {
        [
            CellBorderPosition::Top,
            CellBorderPosition::Left,
            CellBorderPosition::Bottom,
            CellBorderPosition::Right,
            CellBorderPosition::InsideH,
            CellBorderPosition::InsideV,
            CellBorderPosition::Tl2br,
            CellBorderPosition::Tr2bl,
        ]
        .into_iter()
        .filter_map(move |pos| self.get(pos).map(|b| (pos, b)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

// =============================================================================
// Properties
// =============================================================================

/// Table formatting (`w:tblPr`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableProperty {
    pub style: Option<String>,
    pub width: Option<TableWidth>,
    pub alignment: Option<TableAlignmentType>,
    /// Leading indent in twips
    pub indent: Option<i32>,
    pub cell_margins: Option<CellMargins>,
    pub layout: Option<TableLayoutType>,
    pub borders: Option<TableBorders>,
}

/// Row formatting (`w:trPr`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRowProperty {
    /// Twips
    pub height: Option<u32>,
    pub height_rule: Option<HeightRule>,
    /// Grid columns skipped before the first cell
    pub grid_before: Option<usize>,
    /// Grid columns left empty after the last cell
    pub grid_after: Option<usize>,
    pub width_before: Option<TableWidth>,
    pub width_after: Option<TableWidth>,
}

/// Cell formatting (`w:tcPr`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellProperty {
    pub width: Option<TableWidth>,
    pub borders: Option<TableCellBorders>,
    pub grid_span: Option<usize>,
    pub vertical_merge: Option<VMergeType>,
    pub vertical_align: Option<VAlignType>,
    pub text_direction: Option<TextDirectionType>,
    pub shading: Option<Shading>,
}

// =============================================================================
// Nodes
// =============================================================================

/// Block content of a cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum TableCellContent {
    Paragraph(Box<Paragraph>),
    Table(Box<Table>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableCell {
    pub children: Vec<TableCellContent>,
    pub property: CellProperty,
}

impl TableCell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_paragraph(mut self, paragraph: Paragraph) -> Self {
        self.children
            .push(TableCellContent::Paragraph(Box::new(paragraph)));
        self
    }

    pub fn add_table(mut self, table: Table) -> Self {
        self.children.push(TableCellContent::Table(Box::new(table)));
        self
    }

    pub fn with_width(mut self, width: usize, width_type: WidthType) -> Self {
        self.property.width = Some(TableWidth::new(width, width_type));
        self
    }

    pub fn with_grid_span(mut self, span: usize) -> Self {
        self.property.grid_span = Some(span);
        self
    }

    pub fn with_vertical_merge(mut self, merge: VMergeType) -> Self {
        self.property.vertical_merge = Some(merge);
        self
    }

    pub fn with_vertical_align(mut self, align: VAlignType) -> Self {
        self.property.vertical_align = Some(align);
        self
    }

    pub fn with_text_direction(mut self, direction: TextDirectionType) -> Self {
        self.property.text_direction = Some(direction);
        self
    }

    pub fn with_shading(mut self, shading: Shading) -> Self {
        self.property.shading = Some(shading);
        self
    }

    /// Set one border slot; other slots are left untouched
    pub fn with_border(mut self, position: CellBorderPosition, border: Border) -> Self {
        self.property
            .borders
            .get_or_insert_with(TableCellBorders::default)
            .set(position, border);
        self
    }

    pub fn with_borders(mut self, borders: TableCellBorders) -> Self {
        self.property.borders = Some(borders);
        self
    }

    /// Grid columns this cell occupies
    pub fn span(&self) -> usize {
        self.property.grid_span.unwrap_or(1).max(1)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<TableCell>,
    pub property: TableRowProperty,
}

impl TableRow {
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            property: TableRowProperty::default(),
        }
    }

    pub fn with_height(mut self, height: u32, rule: HeightRule) -> Self {
        self.property.height = Some(height);
        self.property.height_rule = Some(rule);
        self
    }

    pub fn with_grid_before(mut self, columns: usize) -> Self {
        self.property.grid_before = Some(columns);
        self
    }

    pub fn with_grid_after(mut self, columns: usize) -> Self {
        self.property.grid_after = Some(columns);
        self
    }

    pub fn with_width_before(mut self, width: TableWidth) -> Self {
        self.property.width_before = Some(width);
        self
    }

    pub fn with_width_after(mut self, width: TableWidth) -> Self {
        self.property.width_after = Some(width);
        self
    }

    /// Columns covered by cells alone
    pub fn cell_span_total(&self) -> usize {
        self.cells.iter().map(TableCell::span).sum()
    }

    /// Columns covered including grid-before and grid-after
    pub fn span_total(&self) -> usize {
        self.property.grid_before.unwrap_or(0)
            + self.cell_span_total()
            + self.property.grid_after.unwrap_or(0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub rows: Vec<TableRow>,
    /// Column widths in twips
    pub grid: Vec<usize>,
    pub property: TableProperty,
}

impl Table {
    pub fn new(rows: Vec<TableRow>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    pub fn add_row(mut self, row: TableRow) -> Self {
        self.rows.push(row);
        self
    }

    pub fn with_grid(mut self, grid: Vec<usize>) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_style(mut self, style_id: impl Into<String>) -> Self {
        self.property.style = Some(style_id.into());
        self
    }

    pub fn with_width(mut self, width: usize, width_type: WidthType) -> Self {
        self.property.width = Some(TableWidth::new(width, width_type));
        self
    }

    pub fn with_alignment(mut self, alignment: TableAlignmentType) -> Self {
        self.property.alignment = Some(alignment);
        self
    }

    pub fn with_indent(mut self, indent: i32) -> Self {
        self.property.indent = Some(indent);
        self
    }

    pub fn with_cell_margins(mut self, margins: CellMargins) -> Self {
        self.property.cell_margins = Some(margins);
        self
    }

    pub fn with_layout(mut self, layout: TableLayoutType) -> Self {
        self.property.layout = Some(layout);
        self
    }

    pub fn with_borders(mut self, borders: TableBorders) -> Self {
        self.property.borders = Some(borders);
        self
    }

    /// Logical column count implied by the rows
    pub fn column_count_from_rows(&self) -> usize {
        self.rows.iter().map(TableRow::span_total).max().unwrap_or(0)
    }

    /// True when the grid has exactly as many columns as the widest row
    pub fn is_grid_consistent(&self) -> bool {
        self.grid.len() == self.column_count_from_rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BorderType;

    #[test]
    fn test_diagonal_borders_are_independent() {
        let cell = TableCell::new()
            .with_border(CellBorderPosition::Tr2bl, Border::new(BorderType::Single))
            .with_border(CellBorderPosition::Tl2br, Border::new(BorderType::Double));
        let borders = cell.property.borders.unwrap();

        assert_eq!(borders.tr2bl.unwrap().border_type, BorderType::Single);
        assert_eq!(borders.tl2br.unwrap().border_type, BorderType::Double);
    }

    #[test]
    fn test_border_iteration_order() {
        let mut borders = TableCellBorders::default();
        borders.set(CellBorderPosition::Tr2bl, Border::default());
        borders.set(CellBorderPosition::Top, Border::default());
        let order: Vec<_> = borders.iter().map(|(p, _)| p).collect();
        assert_eq!(order, vec![CellBorderPosition::Top, CellBorderPosition::Tr2bl]);

        borders.clear(CellBorderPosition::Top);
        assert_eq!(borders.iter().count(), 1);
    }

    #[test]
    fn test_row_span_total_counts_phantom_columns() {
        let row = TableRow::new(vec![TableCell::new().with_grid_span(2), TableCell::new()])
            .with_grid_before(1)
            .with_grid_after(2);
        assert_eq!(row.cell_span_total(), 3);
        assert_eq!(row.span_total(), 6);
    }

    #[test]
    fn test_grid_consistency() {
        let table = Table::new(vec![
            TableRow::new(vec![TableCell::new(), TableCell::new()]),
            TableRow::new(vec![TableCell::new().with_grid_span(2)]),
        ])
        .with_grid(vec![1000, 2000]);
        assert_eq!(table.column_count_from_rows(), 2);
        assert!(table.is_grid_consistent());

        let short = table.clone().with_grid(vec![1000]);
        assert!(!short.is_grid_consistent());
    }

    #[test]
    fn test_zero_span_counts_as_one() {
        let cell = TableCell::new().with_grid_span(0);
        assert_eq!(cell.span(), 1);
    }

    #[test]
    fn test_unknown_width_type_falls_back_to_dxa() {
        assert_eq!(WidthType::from_literal("percent"), WidthType::Dxa);
        assert_eq!(WidthType::from_literal("pct"), WidthType::Pct);
    }

    #[test]
    fn test_bare_vmerge_is_continue() {
        assert_eq!(VMergeType::from_literal(""), VMergeType::Continue);
    }
}
