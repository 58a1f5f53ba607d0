//! Document.xml parser
//!
//! Recursive descent over the body: every `parse_*` method is entered right
//! after the element's start tag and returns after consuming its end tag, so
//! tables nest to any depth. Elements the model has no place for are skipped.

use crate::error::{XmlError, XmlResult};
use crate::properties::{
    parse_border, parse_paragraph_property, parse_run_property, parse_shading,
};
use crate::reader::{read_root, unexpected_eof, XmlParser};
use doc_model::{
    BookmarkEnd, BookmarkStart, Border, Break, BreakType, CellBorderPosition, CellMargins,
    CellProperty, Comment, CommentRangeEnd, CommentRangeStart, Delete, DeleteText, DocGrid,
    DocGridType, DocumentChild, Insert, PageOrientationType, PageSize, Paragraph, ParagraphChild,
    Run, RunChild, SectionProperty, Table, TableAlignmentType, TableBorders, TableCell,
    TableCellContent, TableLayoutType, TableProperty, TableRow, TableRowProperty, TableWidth,
    Text, TextDirectionType, VAlignType, VMergeType, WidthType, HeightRule,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// Body content and final section of document.xml
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct ParsedBody {
    pub children: Vec<DocumentChild>,
    pub section_property: SectionProperty,
}

/// Parser for document.xml and for the block content of comments
pub(crate) struct DocumentParser;

impl DocumentParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse document.xml; the part must have a `w:document` root with a `w:body`
    pub fn parse(&self, content: &str) -> XmlResult<ParsedBody> {
        let mut reader = XmlParser::from_content(content);
        let (root, open) = read_root(&mut reader, "document")?;
        if !open {
            return Err(XmlError::new("document has no body"));
        }

        let mut body = None;
        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    if body.is_none() && XmlParser::matches_element(e.name().as_ref(), "body") {
                        body = Some(self.parse_body(&mut reader, &e)?);
                    } else {
                        XmlParser::skip(&mut reader, &e)?;
                    }
                }
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(&root)),
                _ => {}
            }
        }

        body.ok_or_else(|| XmlError::new("document has no body"))
    }

    fn parse_body(&self, reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<ParsedBody> {
        let mut parsed = ParsedBody::default();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = e.name();
                    let name_ref = name.as_ref();

                    if XmlParser::matches_element(name_ref, "p") {
                        let paragraph = self.parse_paragraph(reader, &e)?;
                        parsed.children.push(DocumentChild::Paragraph(Box::new(paragraph)));
                    } else if XmlParser::matches_element(name_ref, "tbl") {
                        let table = self.parse_table(reader, &e)?;
                        parsed.children.push(DocumentChild::Table(Box::new(table)));
                    } else if XmlParser::matches_element(name_ref, "sectPr") {
                        parsed.section_property = self.parse_section(reader, &e)?;
                    } else {
                        if let Some(child) = body_marker(&e) {
                            parsed.children.push(child);
                        }
                        XmlParser::skip(reader, &e)?;
                    }
                }
                Event::Empty(e) => {
                    if XmlParser::matches_element(e.name().as_ref(), "p") {
                        parsed.children.push(DocumentChild::Paragraph(Box::default()));
                    } else if let Some(child) = body_marker(&e) {
                        parsed.children.push(child);
                    }
                }
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(start)),
                _ => {}
            }
        }

        Ok(parsed)
    }

    /// Parse a `w:p` element
    pub fn parse_paragraph(&self, reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<Paragraph> {
        let mut paragraph = Paragraph::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = e.name();
                    let name_ref = name.as_ref();

                    if XmlParser::matches_element(name_ref, "pPr") {
                        paragraph.property = parse_paragraph_property(reader, &e)?;
                    } else if XmlParser::matches_element(name_ref, "r") {
                        if let Some(run) = self.parse_run(reader, &e)? {
                            paragraph.children.push(ParagraphChild::Run(Box::new(run)));
                        }
                    } else if XmlParser::matches_element(name_ref, "ins") {
                        let insert = Insert {
                            author: XmlParser::get_w_attribute(&e, "author").unwrap_or_default(),
                            date: XmlParser::get_w_attribute(&e, "date").unwrap_or_default(),
                            children: self.parse_revision_runs(reader, &e)?,
                        };
                        paragraph.children.push(ParagraphChild::Insert(insert));
                    } else if XmlParser::matches_element(name_ref, "del") {
                        let delete = Delete {
                            author: XmlParser::get_w_attribute(&e, "author").unwrap_or_default(),
                            date: XmlParser::get_w_attribute(&e, "date").unwrap_or_default(),
                            children: self.parse_revision_runs(reader, &e)?,
                        };
                        paragraph.children.push(ParagraphChild::Delete(delete));
                    } else {
                        if let Some(child) = paragraph_marker(&e) {
                            paragraph.children.push(child);
                        }
                        XmlParser::skip(reader, &e)?;
                    }
                }
                Event::Empty(e) => {
                    let name = e.name();
                    let name_ref = name.as_ref();

                    if XmlParser::matches_element(name_ref, "r") {
                        paragraph.children.push(ParagraphChild::Run(Box::default()));
                    } else if XmlParser::matches_element(name_ref, "ins") {
                        paragraph.children.push(ParagraphChild::Insert(Insert {
                            author: XmlParser::get_w_attribute(&e, "author").unwrap_or_default(),
                            date: XmlParser::get_w_attribute(&e, "date").unwrap_or_default(),
                            children: Vec::new(),
                        }));
                    } else if XmlParser::matches_element(name_ref, "del") {
                        paragraph.children.push(ParagraphChild::Delete(Delete {
                            author: XmlParser::get_w_attribute(&e, "author").unwrap_or_default(),
                            date: XmlParser::get_w_attribute(&e, "date").unwrap_or_default(),
                            children: Vec::new(),
                        }));
                    } else if let Some(child) = paragraph_marker(&e) {
                        paragraph.children.push(child);
                    }
                }
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(start)),
                _ => {}
            }
        }

        Ok(paragraph)
    }

    /// Parse a `w:r` element. A run that holds nothing but a comment
    /// reference is writer bookkeeping and yields `None`.
    fn parse_run(&self, reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<Option<Run>> {
        let mut run = Run::new();
        let mut has_comment_reference = false;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = e.name();
                    let name_ref = name.as_ref();

                    if XmlParser::matches_element(name_ref, "rPr") {
                        run.property = parse_run_property(reader, &e)?;
                    } else if XmlParser::matches_element(name_ref, "t") {
                        let text = XmlParser::read_text(reader, &e)?;
                        run.children.push(RunChild::Text(Text { text }));
                    } else if XmlParser::matches_element(name_ref, "delText") {
                        let text = XmlParser::read_text(reader, &e)?;
                        run.children.push(RunChild::DeleteText(DeleteText { text }));
                    } else {
                        if let Some(child) = run_marker(&e) {
                            run.children.push(child);
                        }
                        has_comment_reference |=
                            XmlParser::matches_element(name_ref, "commentReference");
                        XmlParser::skip(reader, &e)?;
                    }
                }
                Event::Empty(e) => {
                    let name = e.name();
                    let name_ref = name.as_ref();

                    if XmlParser::matches_element(name_ref, "t") {
                        run.children.push(RunChild::Text(Text::default()));
                    } else if XmlParser::matches_element(name_ref, "delText") {
                        run.children.push(RunChild::DeleteText(DeleteText::default()));
                    } else if XmlParser::matches_element(name_ref, "commentReference") {
                        has_comment_reference = true;
                    } else if let Some(child) = run_marker(&e) {
                        run.children.push(child);
                    }
                }
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(start)),
                _ => {}
            }
        }

        if has_comment_reference && run.children.is_empty() {
            return Ok(None);
        }
        Ok(Some(run))
    }

    /// Runs inside `w:ins` / `w:del`
    fn parse_revision_runs(&self, reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<Vec<Run>> {
        let mut runs = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    if XmlParser::matches_element(e.name().as_ref(), "r") {
                        if let Some(run) = self.parse_run(reader, &e)? {
                            runs.push(run);
                        }
                    } else {
                        XmlParser::skip(reader, &e)?;
                    }
                }
                Event::Empty(e) => {
                    if XmlParser::matches_element(e.name().as_ref(), "r") {
                        runs.push(Run::new());
                    }
                }
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(start)),
                _ => {}
            }
        }

        Ok(runs)
    }

    // =========================================================================
    // Tables
    // =========================================================================

    /// Parse a `w:tbl` element, nested tables included
    pub fn parse_table(&self, reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<Table> {
        let mut table = Table::default();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = e.name();
                    let name_ref = name.as_ref();

                    if XmlParser::matches_element(name_ref, "tblPr") {
                        table.property = self.parse_table_property(reader, &e)?;
                    } else if XmlParser::matches_element(name_ref, "tblGrid") {
                        table.grid = self.parse_grid(reader, &e)?;
                    } else if XmlParser::matches_element(name_ref, "tr") {
                        table.rows.push(self.parse_row(reader, &e)?);
                    } else {
                        XmlParser::skip(reader, &e)?;
                    }
                }
                Event::Empty(e) => {
                    if XmlParser::matches_element(e.name().as_ref(), "tr") {
                        table.rows.push(TableRow::default());
                    }
                }
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(start)),
                _ => {}
            }
        }

        Ok(table)
    }

    fn parse_table_property(&self, reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<TableProperty> {
        let mut props = TableProperty::default();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = e.name();
                    let name_ref = name.as_ref();

                    if XmlParser::matches_element(name_ref, "tblBorders") {
                        props.borders = Some(parse_table_borders(reader, &e)?);
                    } else if XmlParser::matches_element(name_ref, "tblCellMar") {
                        props.cell_margins = Some(parse_cell_margins(reader, &e)?);
                    } else {
                        apply_table_element(&e, &mut props);
                        XmlParser::skip(reader, &e)?;
                    }
                }
                Event::Empty(e) => apply_table_element(&e, &mut props),
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(start)),
                _ => {}
            }
        }

        Ok(props)
    }

    fn parse_grid(&self, reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<Vec<usize>> {
        let mut grid = Vec::new();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    if XmlParser::matches_element(e.name().as_ref(), "gridCol") {
                        grid.push(XmlParser::get_w_number(&e, "w").unwrap_or(0));
                    }
                    XmlParser::skip(reader, &e)?;
                }
                Event::Empty(e) => {
                    if XmlParser::matches_element(e.name().as_ref(), "gridCol") {
                        grid.push(XmlParser::get_w_number(&e, "w").unwrap_or(0));
                    }
                }
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(start)),
                _ => {}
            }
        }

        Ok(grid)
    }

    fn parse_row(&self, reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<TableRow> {
        let mut row = TableRow::default();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = e.name();
                    let name_ref = name.as_ref();

                    if XmlParser::matches_element(name_ref, "trPr") {
                        row.property = parse_row_property(reader, &e)?;
                    } else if XmlParser::matches_element(name_ref, "tc") {
                        row.cells.push(self.parse_cell(reader, &e)?);
                    } else {
                        XmlParser::skip(reader, &e)?;
                    }
                }
                Event::Empty(e) => {
                    if XmlParser::matches_element(e.name().as_ref(), "tc") {
                        row.cells.push(TableCell::new());
                    }
                }
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(start)),
                _ => {}
            }
        }

        Ok(row)
    }

    fn parse_cell(&self, reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<TableCell> {
        let mut cell = TableCell::new();
        let mut self_closing = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = e.name();
                    let name_ref = name.as_ref();

                    if XmlParser::matches_element(name_ref, "tcPr") {
                        cell.property = parse_cell_property(reader, &e)?;
                    } else if XmlParser::matches_element(name_ref, "p") {
                        let paragraph = self.parse_paragraph(reader, &e)?;
                        cell.children.push(TableCellContent::Paragraph(Box::new(paragraph)));
                    } else if XmlParser::matches_element(name_ref, "tbl") {
                        let table = self.parse_table(reader, &e)?;
                        cell.children.push(TableCellContent::Table(Box::new(table)));
                    } else {
                        XmlParser::skip(reader, &e)?;
                    }
                }
                Event::Empty(e) => {
                    if XmlParser::matches_element(e.name().as_ref(), "p") {
                        self_closing = Some(cell.children.len());
                        cell.children.push(TableCellContent::Paragraph(Box::default()));
                    }
                }
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(start)),
                _ => {}
            }
        }

        // A cell holding only `<w:p/>` reads as an empty cell
        if cell.children.len() == 1 && self_closing == Some(0) {
            cell.children.clear();
        }

        Ok(cell)
    }

    // =========================================================================
    // Section
    // =========================================================================

    fn parse_section(&self, reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<SectionProperty> {
        let mut section = SectionProperty::default();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    apply_section_element(&e, &mut section);
                    XmlParser::skip(reader, &e)?;
                }
                Event::Empty(e) => apply_section_element(&e, &mut section),
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(start)),
                _ => {}
            }
        }

        Ok(section)
    }
}

// =============================================================================
// Leaf elements
// =============================================================================

fn bookmark_start(e: &BytesStart) -> Option<BookmarkStart> {
    let id = XmlParser::get_w_number(e, "id")?;
    let name = XmlParser::get_w_attribute(e, "name").unwrap_or_default();
    Some(BookmarkStart::new(id, name))
}

fn bookmark_end(e: &BytesStart) -> Option<BookmarkEnd> {
    XmlParser::get_w_number(e, "id").map(BookmarkEnd::new)
}

fn body_marker(e: &BytesStart) -> Option<DocumentChild> {
    let name = e.name();
    if XmlParser::matches_element(name.as_ref(), "bookmarkStart") {
        bookmark_start(e).map(DocumentChild::BookmarkStart)
    } else if XmlParser::matches_element(name.as_ref(), "bookmarkEnd") {
        bookmark_end(e).map(DocumentChild::BookmarkEnd)
    } else {
        None
    }
}

/// Bookmark and comment range markers inside a paragraph. The comment body is
/// filled in later from the comments part.
fn paragraph_marker(e: &BytesStart) -> Option<ParagraphChild> {
    let name = e.name();
    let name_ref = name.as_ref();

    if XmlParser::matches_element(name_ref, "bookmarkStart") {
        bookmark_start(e).map(ParagraphChild::BookmarkStart)
    } else if XmlParser::matches_element(name_ref, "bookmarkEnd") {
        bookmark_end(e).map(ParagraphChild::BookmarkEnd)
    } else if XmlParser::matches_element(name_ref, "commentRangeStart") {
        XmlParser::get_w_number(e, "id").map(|id| {
            ParagraphChild::CommentStart(Box::new(CommentRangeStart::new(Comment::new(id))))
        })
    } else if XmlParser::matches_element(name_ref, "commentRangeEnd") {
        XmlParser::get_w_number(e, "id").map(|id| ParagraphChild::CommentEnd(CommentRangeEnd::new(id)))
    } else {
        None
    }
}

fn run_marker(e: &BytesStart) -> Option<RunChild> {
    let name = e.name();
    let name_ref = name.as_ref();

    if XmlParser::matches_element(name_ref, "tab") {
        Some(RunChild::Tab)
    } else if XmlParser::matches_element(name_ref, "br") {
        let break_type = XmlParser::get_w_attribute(e, "type")
            .map(|v| BreakType::from_literal(&v))
            .unwrap_or_default();
        Some(RunChild::Break(Break { break_type }))
    } else if XmlParser::matches_element(name_ref, "cr") {
        Some(RunChild::Break(Break::default()))
    } else {
        None
    }
}

fn parse_width(e: &BytesStart) -> TableWidth {
    TableWidth::new(
        XmlParser::get_w_number(e, "w").unwrap_or(0),
        XmlParser::get_w_attribute(e, "type")
            .map(|v| WidthType::from_literal(&v))
            .unwrap_or_default(),
    )
}

fn apply_table_element(e: &BytesStart, props: &mut TableProperty) {
    let name = e.name();
    let name_ref = name.as_ref();

    if XmlParser::matches_element(name_ref, "tblStyle") {
        props.style = XmlParser::get_w_attribute(e, "val");
    } else if XmlParser::matches_element(name_ref, "tblW") {
        props.width = Some(parse_width(e));
    } else if XmlParser::matches_element(name_ref, "jc") {
        props.alignment = XmlParser::get_w_attribute(e, "val")
            .map(|v| TableAlignmentType::from_literal(&v));
    } else if XmlParser::matches_element(name_ref, "tblInd") {
        props.indent = XmlParser::get_w_number(e, "w");
    } else if XmlParser::matches_element(name_ref, "tblLayout") {
        props.layout = XmlParser::get_w_attribute(e, "type")
            .map(|v| TableLayoutType::from_literal(&v));
    }
}

/// Border position of a cell or table edge element; `start`/`end` are the
/// bidi spellings of left/right
fn border_position(name: &[u8]) -> Option<CellBorderPosition> {
    let position = match name.rsplit(|b| *b == b':').next()? {
        b"top" => CellBorderPosition::Top,
        b"left" | b"start" => CellBorderPosition::Left,
        b"bottom" => CellBorderPosition::Bottom,
        b"right" | b"end" => CellBorderPosition::Right,
        b"insideH" => CellBorderPosition::InsideH,
        b"insideV" => CellBorderPosition::InsideV,
        b"tl2br" => CellBorderPosition::Tl2br,
        b"tr2bl" => CellBorderPosition::Tr2bl,
        _ => return None,
    };
    Some(position)
}

/// Collect `(position, element)` pairs of a border container
fn parse_edges<T>(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart,
    mut read: impl FnMut(&BytesStart) -> T,
) -> XmlResult<Vec<(CellBorderPosition, T)>> {
    let mut edges = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if let Some(position) = border_position(e.name().as_ref()) {
                    edges.push((position, read(&e)));
                }
                XmlParser::skip(reader, &e)?;
            }
            Event::Empty(e) => {
                if let Some(position) = border_position(e.name().as_ref()) {
                    edges.push((position, read(&e)));
                }
            }
            Event::End(_) => break,
            Event::Eof => return Err(unexpected_eof(start)),
            _ => {}
        }
    }

    Ok(edges)
}

fn parse_table_borders(reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<TableBorders> {
    let mut borders = TableBorders::default();
    for (position, border) in parse_edges(reader, start, parse_border)? {
        let slot: &mut Option<Border> = match position {
            CellBorderPosition::Top => &mut borders.top,
            CellBorderPosition::Left => &mut borders.left,
            CellBorderPosition::Bottom => &mut borders.bottom,
            CellBorderPosition::Right => &mut borders.right,
            CellBorderPosition::InsideH => &mut borders.inside_h,
            CellBorderPosition::InsideV => &mut borders.inside_v,
            // Diagonals exist only on cells
            CellBorderPosition::Tl2br | CellBorderPosition::Tr2bl => continue,
        };
        *slot = Some(border);
    }
    Ok(borders)
}

fn parse_cell_margins(reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<CellMargins> {
    let mut margins = CellMargins::default();
    for (position, width) in parse_edges(reader, start, parse_width)? {
        match position {
            CellBorderPosition::Top => margins.top = Some(width),
            CellBorderPosition::Left => margins.left = Some(width),
            CellBorderPosition::Bottom => margins.bottom = Some(width),
            CellBorderPosition::Right => margins.right = Some(width),
            _ => {}
        }
    }
    Ok(margins)
}

fn parse_row_property(reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<TableRowProperty> {
    let mut props = TableRowProperty::default();

    let mut apply = |e: &BytesStart| {
        let name = e.name();
        let name_ref = name.as_ref();

        if XmlParser::matches_element(name_ref, "gridBefore") {
            props.grid_before = XmlParser::get_w_number(e, "val");
        } else if XmlParser::matches_element(name_ref, "gridAfter") {
            props.grid_after = XmlParser::get_w_number(e, "val");
        } else if XmlParser::matches_element(name_ref, "wBefore") {
            props.width_before = Some(parse_width(e));
        } else if XmlParser::matches_element(name_ref, "wAfter") {
            props.width_after = Some(parse_width(e));
        } else if XmlParser::matches_element(name_ref, "trHeight") {
            props.height = XmlParser::get_w_number(e, "val");
            props.height_rule = XmlParser::get_w_attribute(e, "hRule")
                .map(|v| HeightRule::from_literal(&v));
        }
    };

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                apply(&e);
                XmlParser::skip(reader, &e)?;
            }
            Event::Empty(e) => apply(&e),
            Event::End(_) => break,
            Event::Eof => return Err(unexpected_eof(start)),
            _ => {}
        }
    }

    Ok(props)
}

fn parse_cell_property(reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<CellProperty> {
    let mut props = CellProperty::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if XmlParser::matches_element(e.name().as_ref(), "tcBorders") {
                    let mut borders = doc_model::TableCellBorders::default();
                    for (position, border) in parse_edges(reader, &e, parse_border)? {
                        borders.set(position, border);
                    }
                    props.borders = Some(borders);
                } else {
                    apply_cell_element(&e, &mut props);
                    XmlParser::skip(reader, &e)?;
                }
            }
            Event::Empty(e) => apply_cell_element(&e, &mut props),
            Event::End(_) => break,
            Event::Eof => return Err(unexpected_eof(start)),
            _ => {}
        }
    }

    Ok(props)
}

fn apply_cell_element(e: &BytesStart, props: &mut CellProperty) {
    let name = e.name();
    let name_ref = name.as_ref();

    if XmlParser::matches_element(name_ref, "tcW") {
        props.width = Some(parse_width(e));
    } else if XmlParser::matches_element(name_ref, "gridSpan") {
        props.grid_span = XmlParser::get_w_number(e, "val");
    } else if XmlParser::matches_element(name_ref, "vMerge") {
        // A bare <w:vMerge/> continues the merge above
        props.vertical_merge = Some(
            XmlParser::get_w_attribute(e, "val")
                .map(|v| VMergeType::from_literal(&v))
                .unwrap_or(VMergeType::Continue),
        );
    } else if XmlParser::matches_element(name_ref, "shd") {
        props.shading = Some(parse_shading(e));
    } else if XmlParser::matches_element(name_ref, "textDirection") {
        props.text_direction = XmlParser::get_w_attribute(e, "val")
            .map(|v| TextDirectionType::from_literal(&v));
    } else if XmlParser::matches_element(name_ref, "vAlign") {
        props.vertical_align = XmlParser::get_w_attribute(e, "val")
            .map(|v| VAlignType::from_literal(&v));
    }
}

fn apply_section_element(e: &BytesStart, section: &mut SectionProperty) {
    let name = e.name();
    let name_ref = name.as_ref();

    if XmlParser::matches_element(name_ref, "pgSz") {
        let defaults = PageSize::default();
        section.page_size = PageSize {
            w: XmlParser::get_w_number(e, "w").unwrap_or(defaults.w),
            h: XmlParser::get_w_number(e, "h").unwrap_or(defaults.h),
            orient: XmlParser::get_w_attribute(e, "orient")
                .map(|v| PageOrientationType::from_literal(&v)),
        };
    } else if XmlParser::matches_element(name_ref, "pgMar") {
        let margin = &mut section.page_margin;
        let fields = [
            ("top", &mut margin.top),
            ("left", &mut margin.left),
            ("bottom", &mut margin.bottom),
            ("right", &mut margin.right),
            ("header", &mut margin.header),
            ("footer", &mut margin.footer),
            ("gutter", &mut margin.gutter),
        ];
        for (attr, field) in fields {
            if let Some(value) = XmlParser::get_w_number(e, attr) {
                *field = value;
            }
        }
    } else if XmlParser::matches_element(name_ref, "docGrid") {
        section.doc_grid = DocGrid {
            grid_type: XmlParser::get_w_attribute(e, "type")
                .map(|v| DocGridType::from_literal(&v))
                .unwrap_or_default(),
            line_pitch: XmlParser::get_w_number(e, "linePitch"),
            char_space: XmlParser::get_w_number(e, "charSpace"),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#;

    fn parse(body: &str) -> ParsedBody {
        let xml = format!("{}<w:body>{}</w:body></w:document>", HEADER, body);
        DocumentParser::new().parse(&xml).unwrap()
    }

    fn first_paragraph(parsed: &ParsedBody) -> &Paragraph {
        match &parsed.children[0] {
            DocumentChild::Paragraph(p) => p,
            other => panic!("expected paragraph, got {:?}", other),
        }
    }

    #[test]
    fn test_simple_paragraph() {
        let parsed = parse(r#"<w:p><w:r><w:t xml:space="preserve">Hello world!!</w:t></w:r></w:p>"#);
        assert_eq!(first_paragraph(&parsed).raw_text(), "Hello world!!");
    }

    #[test]
    fn test_whitespace_is_preserved() {
        let parsed = parse(r#"<w:p><w:r><w:t xml:space="preserve">  a  b </w:t></w:r></w:p>"#);
        assert_eq!(first_paragraph(&parsed).raw_text(), "  a  b ");
    }

    #[test]
    fn test_comment_reference_run_is_dropped() {
        let parsed = parse(
            r#"<w:p><w:commentRangeStart w:id="1"/><w:r><w:t>x</w:t></w:r><w:commentRangeEnd w:id="1"/><w:r><w:rPr><w:rStyle w:val="CommentReference"/></w:rPr><w:commentReference w:id="1"/></w:r></w:p>"#,
        );
        let para = first_paragraph(&parsed);
        assert_eq!(para.children.len(), 3);
        assert!(matches!(para.children[0], ParagraphChild::CommentStart(ref s) if s.id == 1));
        assert!(matches!(para.children[2], ParagraphChild::CommentEnd(CommentRangeEnd { id: 1 })));
    }

    #[test]
    fn test_revisions_ignore_ids() {
        let parsed = parse(
            r#"<w:p><w:ins w:id="7" w:author="ann" w:date="2024-01-01T00:00:00Z"><w:r><w:t>new</w:t></w:r></w:ins><w:del w:id="8" w:author="bob" w:date=""><w:r><w:delText>old</w:delText></w:r></w:del></w:p>"#,
        );
        let para = first_paragraph(&parsed);
        assert_eq!(
            para.children[0],
            ParagraphChild::Insert(
                Insert::new(Run::new().add_text("new"))
                    .with_author("ann")
                    .with_date("2024-01-01T00:00:00Z")
            )
        );
        assert_eq!(
            para.children[1],
            ParagraphChild::Delete(Delete::new(Run::new().add_delete_text("old")).with_author("bob"))
        );
    }

    #[test]
    fn test_nested_table() {
        let parsed = parse(
            r#"<w:tbl><w:tblPr/><w:tblGrid><w:gridCol w:w="4000"/></w:tblGrid><w:tr><w:tc><w:tbl><w:tblGrid><w:gridCol w:w="100"/><w:gridCol w:w="200"/></w:tblGrid><w:tr><w:tc><w:p/></w:tc><w:tc><w:p/></w:tc></w:tr></w:tbl></w:tc></w:tr></w:tbl><w:p/>"#,
        );
        assert_eq!(parsed.children.len(), 2);
        let outer = match &parsed.children[0] {
            DocumentChild::Table(t) => t,
            other => panic!("expected table, got {:?}", other),
        };
        assert_eq!(outer.grid, vec![4000]);
        assert_eq!(outer.rows.len(), 1);
        match &outer.rows[0].cells[0].children[0] {
            TableCellContent::Table(inner) => {
                assert_eq!(inner.grid, vec![100, 200]);
                assert_eq!(inner.rows[0].cells.len(), 2);
            }
            other => panic!("expected nested table, got {:?}", other),
        }
    }

    #[test]
    fn test_cell_properties() {
        let parsed = parse(
            r#"<w:tbl><w:tr><w:trPr><w:gridAfter w:val="1"/><w:trHeight w:val="400" w:hRule="exact"/></w:trPr><w:tc><w:tcPr><w:gridSpan w:val="2"/><w:vMerge/><w:tcBorders><w:tl2br w:val="single"/><w:tr2bl w:val="double"/></w:tcBorders><w:textDirection w:val="btLr"/></w:tcPr><w:p/></w:tc></w:tr></w:tbl>"#,
        );
        let table = match &parsed.children[0] {
            DocumentChild::Table(t) => t,
            other => panic!("expected table, got {:?}", other),
        };
        let row = &table.rows[0];
        assert_eq!(row.property.grid_after, Some(1));
        assert_eq!(row.property.height, Some(400));
        assert_eq!(row.property.height_rule, Some(HeightRule::Exact));
        let cell = &row.cells[0].property;
        assert_eq!(cell.grid_span, Some(2));
        assert_eq!(cell.vertical_merge, Some(VMergeType::Continue));
        assert_eq!(cell.text_direction, Some(TextDirectionType::BtLr));
        let borders = cell.borders.as_ref().unwrap();
        assert!(borders.get(CellBorderPosition::Tl2br).is_some());
        assert!(borders.get(CellBorderPosition::Tr2bl).is_some());
    }

    #[test]
    fn test_lone_self_closing_paragraph_makes_empty_cell() {
        let parsed = parse(
            r#"<w:tbl><w:tr><w:tc><w:p/></w:tc><w:tc><w:p></w:p></w:tc><w:tc><w:p/><w:p/></w:tc></w:tr></w:tbl>"#,
        );
        let DocumentChild::Table(table) = &parsed.children[0] else {
            panic!("expected table");
        };
        let cells = &table.rows[0].cells;
        assert!(cells[0].children.is_empty());
        assert_eq!(cells[1].children.len(), 1);
        assert_eq!(cells[2].children.len(), 2);
    }

    #[test]
    fn test_section_landscape() {
        let parsed = parse(
            r#"<w:sectPr><w:pgSz w:w="16838" w:h="11906" w:orient="landscape"/><w:pgMar w:top="720" w:right="720" w:bottom="720" w:left="720" w:header="0" w:footer="0" w:gutter="0"/><w:cols w:space="425"/></w:sectPr>"#,
        );
        let size = parsed.section_property.page_size;
        assert_eq!((size.w, size.h), (16838, 11906));
        assert_eq!(size.orient, Some(PageOrientationType::Landscape));
        assert_eq!(parsed.section_property.page_margin.top, 720);
    }

    #[test]
    fn test_unknown_elements_are_skipped() {
        let parsed = parse(
            r#"<w:p><w:proofErr w:type="spellStart"/><w:hyperlink r:id="rId9"><w:r><w:t>link</w:t></w:r></w:hyperlink><w:r><w:t>kept</w:t></w:r></w:p><w:sdt><w:sdtContent><w:p/></w:sdtContent></w:sdt>"#,
        );
        assert_eq!(parsed.children.len(), 1);
        assert_eq!(first_paragraph(&parsed).raw_text(), "kept");
    }

    #[test]
    fn test_missing_body_is_an_error() {
        let xml = format!("{}</w:document>", HEADER);
        assert!(DocumentParser::new().parse(&xml).is_err());
        assert!(DocumentParser::new().parse("<w:styles/>").is_err());
        assert!(DocumentParser::new().parse("").is_err());
    }

    #[test]
    fn test_truncated_document_is_an_error() {
        let xml = format!("{}<w:body><w:p><w:r><w:t>cut", HEADER);
        assert!(DocumentParser::new().parse(&xml).is_err());
    }
}
