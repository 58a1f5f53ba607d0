//! Table serialization and grid reconciliation
//!
//! The written `w:tblGrid` always has as many columns as the widest row
//! (gridBefore + cell spans + gridAfter). Short grids are padded, short rows
//! get an implicit gridAfter and an orphan merge continuation restarts the
//! merge. Every repair is logged at `warn`.

use crate::document_writer::{escape_xml, DocumentWriter};
use crate::properties_writer::{write_border, write_shading};
use doc_model::{
    CellMargins, CellProperty, Table, TableBorders, TableCell, TableCellContent, TableProperty,
    TableRow, TableWidth, VMergeType, WidthType,
};
use tracing::warn;

/// Width of a padded grid column when nothing in the table suggests one
const FALLBACK_COLUMN_WIDTH: usize = 2000;

/// Column layout of one table after reconciliation
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GridLayout {
    pub widths: Vec<usize>,
    /// Extra gridAfter columns per row
    pub implicit_grid_after: Vec<usize>,
    /// (row, cell) positions whose `continue` merge has nothing above it
    pub orphan_merges: Vec<(usize, usize)>,
}

impl GridLayout {
    pub fn reconcile(table: &Table) -> Self {
        let columns = table.grid.len().max(table.column_count_from_rows());

        let mut widths = table.grid.clone();
        if widths.len() < columns {
            warn!(
                grid = table.grid.len(),
                columns, "padding table grid to the widest row"
            );
            let even_share = match table.property.width {
                Some(TableWidth {
                    width,
                    width_type: WidthType::Dxa,
                }) if table.grid.is_empty() && width > 0 => Some(width / columns),
                _ => None,
            };
            for column in widths.len()..columns {
                let width = single_column_width(table, column)
                    .or(even_share)
                    .unwrap_or(FALLBACK_COLUMN_WIDTH);
                widths.push(width);
            }
        }

        let implicit_grid_after = table
            .rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let missing = columns - row.span_total();
                if missing > 0 {
                    warn!(row = index, missing, "row is short of the grid, adding gridAfter");
                }
                missing
            })
            .collect();

        Self {
            widths,
            implicit_grid_after,
            orphan_merges: find_orphan_merges(&table.rows),
        }
    }

    fn is_orphan(&self, row: usize, cell: usize) -> bool {
        self.orphan_merges.contains(&(row, cell))
    }
}

/// Width of a single-span dxa cell starting at `column`, if any row has one
fn single_column_width(table: &Table, column: usize) -> Option<usize> {
    table.rows.iter().find_map(|row| {
        let mut start = row.property.grid_before.unwrap_or(0);
        for cell in &row.cells {
            if start == column && cell.span() == 1 {
                if let Some(TableWidth {
                    width,
                    width_type: WidthType::Dxa,
                }) = cell.property.width
                {
                    return Some(width);
                }
            }
            start += cell.span();
        }
        None
    })
}

/// Start column of every cell in a row
fn cell_starts(row: &TableRow) -> Vec<usize> {
    let mut start = row.property.grid_before.unwrap_or(0);
    row.cells
        .iter()
        .map(|cell| {
            let current = start;
            start += cell.span();
            current
        })
        .collect()
}

fn find_orphan_merges(rows: &[TableRow]) -> Vec<(usize, usize)> {
    let mut orphans = Vec::new();
    // Start columns of merged cells in the row above
    let mut merged_above: Vec<usize> = Vec::new();

    for (row_index, row) in rows.iter().enumerate() {
        let mut merged_here = Vec::new();
        for (cell_index, (cell, start)) in row.cells.iter().zip(cell_starts(row)).enumerate() {
            match cell.property.vertical_merge {
                Some(VMergeType::Continue) if !merged_above.contains(&start) => {
                    warn!(
                        row = row_index,
                        column = start,
                        "vertical merge continuation without a cell above, restarting"
                    );
                    orphans.push((row_index, cell_index));
                    merged_here.push(start);
                }
                Some(_) => merged_here.push(start),
                None => {}
            }
        }
        merged_above = merged_here;
    }

    orphans
}

impl<'a> DocumentWriter<'a> {
    /// Write a table element; nested tables recurse through their cells
    pub(crate) fn write_table(&mut self, xml: &mut String, table: &Table) {
        let layout = GridLayout::reconcile(table);

        xml.push_str("<w:tbl>");
        write_table_property(xml, &table.property);

        xml.push_str("<w:tblGrid>");
        for width in &layout.widths {
            xml.push_str(&format!(r#"<w:gridCol w:w="{}"/>"#, width));
        }
        xml.push_str("</w:tblGrid>");

        for (row_index, row) in table.rows.iter().enumerate() {
            self.write_row(xml, row, row_index, &layout);
        }

        xml.push_str("</w:tbl>");
    }

    fn write_row(&mut self, xml: &mut String, row: &TableRow, row_index: usize, layout: &GridLayout) {
        xml.push_str("<w:tr>");

        let props = &row.property;
        let grid_after = props.grid_after.unwrap_or(0) + layout.implicit_grid_after[row_index];
        let mut tr_pr = String::new();
        if let Some(before) = props.grid_before {
            tr_pr.push_str(&format!(r#"<w:gridBefore w:val="{}"/>"#, before));
        }
        if grid_after > 0 {
            tr_pr.push_str(&format!(r#"<w:gridAfter w:val="{}"/>"#, grid_after));
        }
        if let Some(ref width) = props.width_before {
            write_width(&mut tr_pr, "wBefore", width);
        }
        if let Some(ref width) = props.width_after {
            write_width(&mut tr_pr, "wAfter", width);
        }
        if let Some(height) = props.height {
            tr_pr.push_str(&format!(r#"<w:trHeight w:val="{}""#, height));
            if let Some(rule) = props.height_rule {
                tr_pr.push_str(&format!(r#" w:hRule="{}""#, rule.as_str()));
            }
            tr_pr.push_str("/>");
        }
        if !tr_pr.is_empty() {
            xml.push_str("<w:trPr>");
            xml.push_str(&tr_pr);
            xml.push_str("</w:trPr>");
        }

        for (cell_index, cell) in row.cells.iter().enumerate() {
            let orphan = layout.is_orphan(row_index, cell_index);
            self.write_cell(xml, cell, orphan);
        }

        xml.push_str("</w:tr>");
    }

    fn write_cell(&mut self, xml: &mut String, cell: &TableCell, orphan_merge: bool) {
        xml.push_str("<w:tc>");
        write_cell_property(xml, &cell.property, orphan_merge);

        if cell.children.is_empty() {
            warn!("table cell without content, writing an empty paragraph");
            xml.push_str("<w:p/>");
        }
        for content in &cell.children {
            match content {
                TableCellContent::Paragraph(p) => self.write_paragraph(xml, p, None),
                TableCellContent::Table(t) => self.write_table(xml, t),
            }
        }

        xml.push_str("</w:tc>");
    }
}

fn write_width(xml: &mut String, element: &str, width: &TableWidth) {
    xml.push_str(&format!(
        r#"<w:{} w:w="{}" w:type="{}"/>"#,
        element,
        width.width,
        width.width_type.as_str()
    ));
}

/// `w:tblPr` is always written, even when empty
fn write_table_property(xml: &mut String, props: &TableProperty) {
    xml.push_str("<w:tblPr>");

    if let Some(ref style) = props.style {
        xml.push_str(&format!(r#"<w:tblStyle w:val="{}"/>"#, escape_xml(style)));
    }
    if let Some(ref width) = props.width {
        write_width(xml, "tblW", width);
    }
    if let Some(alignment) = props.alignment {
        xml.push_str(&format!(r#"<w:jc w:val="{}"/>"#, alignment.as_str()));
    }
    if let Some(indent) = props.indent {
        xml.push_str(&format!(r#"<w:tblInd w:w="{}" w:type="dxa"/>"#, indent));
    }
    if let Some(ref borders) = props.borders {
        write_table_borders(xml, borders);
    }
    if let Some(layout) = props.layout {
        xml.push_str(&format!(r#"<w:tblLayout w:type="{}"/>"#, layout.as_str()));
    }
    if let Some(ref margins) = props.cell_margins {
        write_cell_margins(xml, margins);
    }

    xml.push_str("</w:tblPr>");
}

fn write_table_borders(xml: &mut String, borders: &TableBorders) {
    xml.push_str("<w:tblBorders>");
    let edges = [
        ("top", &borders.top),
        ("left", &borders.left),
        ("bottom", &borders.bottom),
        ("right", &borders.right),
        ("insideH", &borders.inside_h),
        ("insideV", &borders.inside_v),
    ];
    for (element, border) in edges {
        if let Some(border) = border {
            write_border(xml, element, border);
        }
    }
    xml.push_str("</w:tblBorders>");
}

fn write_cell_margins(xml: &mut String, margins: &CellMargins) {
    xml.push_str("<w:tblCellMar>");
    let edges = [
        ("top", &margins.top),
        ("left", &margins.left),
        ("bottom", &margins.bottom),
        ("right", &margins.right),
    ];
    for (element, width) in edges {
        if let Some(width) = width {
            write_width(xml, element, width);
        }
    }
    xml.push_str("</w:tblCellMar>");
}

fn write_cell_property(xml: &mut String, props: &CellProperty, orphan_merge: bool) {
    let mut tc_pr = String::new();

    if let Some(ref width) = props.width {
        write_width(&mut tc_pr, "tcW", width);
    }
    if let Some(span) = props.grid_span {
        tc_pr.push_str(&format!(r#"<w:gridSpan w:val="{}"/>"#, span));
    }
    let merge = if orphan_merge {
        Some(VMergeType::Restart)
    } else {
        props.vertical_merge
    };
    if let Some(merge) = merge {
        tc_pr.push_str(&format!(r#"<w:vMerge w:val="{}"/>"#, merge.as_str()));
    }
    if let Some(ref borders) = props.borders {
        if !borders.is_empty() {
            tc_pr.push_str("<w:tcBorders>");
            for (position, border) in borders.iter() {
                write_border(&mut tc_pr, cell_border_element(position), border);
            }
            tc_pr.push_str("</w:tcBorders>");
        }
    }
    if let Some(ref shading) = props.shading {
        write_shading(&mut tc_pr, shading);
    }
    if let Some(direction) = props.text_direction {
        tc_pr.push_str(&format!(r#"<w:textDirection w:val="{}"/>"#, direction.as_str()));
    }
    if let Some(align) = props.vertical_align {
        tc_pr.push_str(&format!(r#"<w:vAlign w:val="{}"/>"#, align.as_str()));
    }

    if !tc_pr.is_empty() {
        xml.push_str("<w:tcPr>");
        xml.push_str(&tc_pr);
        xml.push_str("</w:tcPr>");
    }
}

pub(crate) fn cell_border_element(position: doc_model::CellBorderPosition) -> &'static str {
    use doc_model::CellBorderPosition::*;
    match position {
        Top => "top",
        Left => "left",
        Bottom => "bottom",
        Right => "right",
        InsideH => "insideH",
        InsideV => "insideV",
        Tl2br => "tl2br",
        Tr2bl => "tr2bl",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::BuildOptions;
    use crate::plan::PackagePlan;
    use doc_model::*;
    use proptest::prelude::*;

    fn cell(text: &str) -> TableCell {
        TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text(text)))
    }

    fn render(doc: &Document) -> String {
        let plan = PackagePlan::new(doc).unwrap();
        DocumentWriter::new(&plan, &BuildOptions::default()).write(doc)
    }

    #[test]
    fn test_consistent_grid_is_kept() {
        let table = Table::new(vec![TableRow::new(vec![cell("a"), cell("b")])])
            .with_grid(vec![1000, 3000]);
        let layout = GridLayout::reconcile(&table);
        assert_eq!(layout.widths, vec![1000, 3000]);
        assert_eq!(layout.implicit_grid_after, vec![0]);
        assert!(layout.orphan_merges.is_empty());
    }

    #[test]
    fn test_short_grid_is_padded_from_cell_widths() {
        let table = Table::new(vec![TableRow::new(vec![
            cell("a"),
            cell("b").with_width(1500, WidthType::Dxa),
        ])])
        .with_grid(vec![1000]);
        let layout = GridLayout::reconcile(&table);
        assert_eq!(layout.widths, vec![1000, 1500]);
    }

    #[test]
    fn test_missing_grid_uses_table_width() {
        let table = Table::new(vec![TableRow::new(vec![cell("a"), cell("b")])])
            .with_width(6000, WidthType::Dxa);
        let layout = GridLayout::reconcile(&table);
        assert_eq!(layout.widths, vec![3000, 3000]);
    }

    #[test]
    fn test_short_rows_get_grid_after() {
        let table = Table::new(vec![
            TableRow::new(vec![cell("a"), cell("b"), cell("c")]),
            TableRow::new(vec![cell("a")]).with_grid_before(1),
        ])
        .with_grid(vec![1000, 1000, 1000]);
        let layout = GridLayout::reconcile(&table);
        assert_eq!(layout.implicit_grid_after, vec![0, 1]);

        let xml = render(&Document::new().add_table(table));
        assert!(xml.contains(r#"<w:trPr><w:gridBefore w:val="1"/><w:gridAfter w:val="1"/></w:trPr>"#));
    }

    #[test]
    fn test_orphan_merge_is_restarted() {
        let table = Table::new(vec![
            TableRow::new(vec![cell("a"), cell("b")]),
            TableRow::new(vec![
                cell("c").with_vertical_merge(VMergeType::Continue),
                cell("d"),
            ]),
        ]);
        let layout = GridLayout::reconcile(&table);
        assert_eq!(layout.orphan_merges, vec![(1, 0)]);

        let xml = render(&Document::new().add_table(table));
        assert!(xml.contains(r#"<w:vMerge w:val="restart"/>"#));
        assert!(!xml.contains(r#"<w:vMerge w:val="continue"/>"#));
    }

    #[test]
    fn test_merge_chain_is_kept() {
        let table = Table::new(vec![
            TableRow::new(vec![cell("a").with_vertical_merge(VMergeType::Restart), cell("b")]),
            TableRow::new(vec![cell("").with_vertical_merge(VMergeType::Continue), cell("d")]),
            TableRow::new(vec![cell("").with_vertical_merge(VMergeType::Continue), cell("f")]),
        ]);
        assert!(GridLayout::reconcile(&table).orphan_merges.is_empty());
    }

    #[test]
    fn test_both_diagonal_borders_are_written() {
        let table = Table::new(vec![TableRow::new(vec![cell("x")
            .with_border(CellBorderPosition::Tr2bl, Border::new(BorderType::Single))
            .with_border(CellBorderPosition::Tl2br, Border::new(BorderType::Double))])]);
        let xml = render(&Document::new().add_table(table));
        let tl = xml.find("<w:tl2br").unwrap();
        let tr = xml.find("<w:tr2bl").unwrap();
        assert!(tl < tr);
        assert!(xml.contains(r#"<w:tl2br w:val="double""#));
    }

    #[test]
    fn test_nested_table_depth() {
        let inner = Table::new(vec![TableRow::new(vec![cell("inner")])]).with_grid(vec![500]);
        let outer = Table::new(vec![TableRow::new(vec![TableCell::new().add_table(inner)])])
            .with_grid(vec![4000]);
        let xml = render(&Document::new().add_table(outer));
        assert!(xml.contains(
            r#"<w:tc><w:tbl><w:tblPr></w:tblPr><w:tblGrid><w:gridCol w:w="500"/></w:tblGrid>"#
        ));
        assert!(xml.contains(r#"</w:tbl></w:tc></w:tr></w:tbl>"#));
        assert_eq!(xml.matches(r#"<w:gridCol w:w="4000"/>"#).count(), 1);
    }

    #[test]
    fn test_table_property_order() {
        let table = Table::new(vec![TableRow::new(vec![cell("x")])])
            .with_style("Grid")
            .with_width(5000, WidthType::Pct)
            .with_alignment(TableAlignmentType::Center)
            .with_indent(120)
            .with_layout(TableLayoutType::Fixed)
            .with_cell_margins(CellMargins::uniform(80));
        let mut xml = String::new();
        write_table_property(&mut xml, &table.property);
        assert!(xml.starts_with(r#"<w:tblPr><w:tblStyle w:val="Grid"/><w:tblW w:w="5000" w:type="pct"/><w:jc w:val="center"/><w:tblInd w:w="120" w:type="dxa"/><w:tblLayout w:type="fixed"/><w:tblCellMar>"#));
    }

    #[test]
    fn test_empty_cell_gets_paragraph() {
        let table = Table::new(vec![TableRow::new(vec![TableCell::new()])]);
        let xml = render(&Document::new().add_table(table));
        assert!(xml.contains("<w:tc><w:p/></w:tc>"));
    }

    proptest! {
        #[test]
        fn reconciled_grid_matches_every_row(
            spans in prop::collection::vec(prop::collection::vec(1usize..4, 1..5), 1..6),
            grid_len in 0usize..8,
        ) {
            let rows = spans
                .iter()
                .map(|row| TableRow::new(row.iter().map(|s| cell("x").with_grid_span(*s)).collect()))
                .collect();
            let table = Table::new(rows).with_grid(vec![1000; grid_len]);
            let layout = GridLayout::reconcile(&table);
            for (row, extra) in table.rows.iter().zip(&layout.implicit_grid_after) {
                prop_assert_eq!(row.span_total() + extra, layout.widths.len());
            }
        }
    }
}
