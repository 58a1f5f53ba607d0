//! Comments Import/Export for DOCX
//!
//! Comment bodies live in word/comments.xml; threading and the resolved flag
//! live in word/commentsExtended.xml, keyed by the `w14:paraId` of the
//! comment's last paragraph. In the tree a comment travels with its
//! `CommentRangeStart`, so reading ends by attaching each parsed comment to
//! the placeholder anchor left by the body parser.

use crate::document::DocumentParser;
use crate::document_writer::{escape_xml, DocumentWriter};
use crate::error::XmlResult;
use crate::namespaces;
use crate::plan::PackagePlan;
use crate::reader::{read_root, unexpected_eof, XmlParser};
use doc_model::{
    Comment, CommentChild, DocumentChild, Paragraph, ParagraphChild, Table, TableCellContent,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::HashMap;

// =============================================================================
// Comments Parser
// =============================================================================

/// A comment from comments.xml with the paragraph ids of its body
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ParsedComment {
    pub comment: Comment,
    pub para_ids: Vec<String>,
}

/// One `w15:commentEx` entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommentExtended {
    pub para_id: String,
    pub parent_para_id: Option<String>,
    pub done: bool,
}

/// Parser for comments.xml and commentsExtended.xml
pub(crate) struct CommentsParser {
    body: DocumentParser,
}

impl CommentsParser {
    pub fn new() -> Self {
        Self {
            body: DocumentParser::new(),
        }
    }

    /// Parse word/comments.xml
    pub fn parse_comments(&self, content: &str) -> XmlResult<Vec<ParsedComment>> {
        let mut comments = Vec::new();
        let mut reader = XmlParser::from_content(content);
        let (root, open) = read_root(&mut reader, "comments")?;
        if !open {
            return Ok(comments);
        }

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    if XmlParser::matches_element(e.name().as_ref(), "comment") {
                        comments.push(self.parse_comment(&mut reader, &e)?);
                    } else {
                        XmlParser::skip(&mut reader, &e)?;
                    }
                }
                Event::Empty(e) => {
                    if XmlParser::matches_element(e.name().as_ref(), "comment") {
                        comments.push(ParsedComment {
                            comment: comment_header(&e),
                            para_ids: Vec::new(),
                        });
                    }
                }
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(&root)),
                _ => {}
            }
        }

        Ok(comments)
    }

    fn parse_comment(&self, reader: &mut Reader<&[u8]>, start: &BytesStart) -> XmlResult<ParsedComment> {
        let mut comment = comment_header(start);
        let mut para_ids = Vec::new();
        let mut self_closing = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = e.name();
                    let name_ref = name.as_ref();

                    if XmlParser::matches_element(name_ref, "p") {
                        if let Some(id) = para_id(&e) {
                            para_ids.push(id);
                        }
                        let paragraph = self.body.parse_paragraph(reader, &e)?;
                        comment.children.push(CommentChild::Paragraph(Box::new(paragraph)));
                    } else if XmlParser::matches_element(name_ref, "tbl") {
                        let table = self.body.parse_table(reader, &e)?;
                        comment.children.push(CommentChild::Table(Box::new(table)));
                    } else {
                        XmlParser::skip(reader, &e)?;
                    }
                }
                Event::Empty(e) => {
                    if XmlParser::matches_element(e.name().as_ref(), "p") {
                        if let Some(id) = para_id(&e) {
                            para_ids.push(id);
                        }
                        self_closing = Some(comment.children.len());
                        comment.children.push(CommentChild::Paragraph(Box::default()));
                    }
                }
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(start)),
                _ => {}
            }
        }

        // A lone trailing `<w:p/>` is the filler written for a comment
        // without paragraphs. Its paraId stays so commentsExtended still maps.
        let paragraphs = comment
            .children
            .iter()
            .filter(|c| matches!(c, CommentChild::Paragraph(_)))
            .count();
        if paragraphs == 1 && self_closing == comment.children.len().checked_sub(1) {
            comment.children.pop();
        }

        Ok(ParsedComment { comment, para_ids })
    }

    /// Parse word/commentsExtended.xml
    pub fn parse_comments_extended(&self, content: &str) -> XmlResult<Vec<CommentExtended>> {
        let mut entries = Vec::new();
        let mut reader = XmlParser::from_string(content);
        let (root, open) = read_root(&mut reader, "commentsEx")?;
        if !open {
            return Ok(entries);
        }

        let mut collect = |e: &BytesStart| {
            if !XmlParser::matches_element(e.name().as_ref(), "commentEx") {
                return;
            }
            if let Some(para_id) = XmlParser::get_prefixed_attribute(e, "w15", "paraId") {
                entries.push(CommentExtended {
                    para_id,
                    parent_para_id: XmlParser::get_prefixed_attribute(e, "w15", "paraIdParent"),
                    done: XmlParser::get_prefixed_attribute(e, "w15", "done")
                        .map(|v| XmlParser::parse_bool(&v))
                        .unwrap_or(false),
                });
            }
        };

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    collect(&e);
                    XmlParser::skip(&mut reader, &e)?;
                }
                Event::Empty(e) => collect(&e),
                Event::End(_) => break,
                Event::Eof => return Err(unexpected_eof(&root)),
                _ => {}
            }
        }

        Ok(entries)
    }
}

fn comment_header(e: &BytesStart) -> Comment {
    Comment {
        id: XmlParser::get_w_number(e, "id").unwrap_or(0),
        author: XmlParser::get_w_attribute(e, "author").unwrap_or_default(),
        initials: XmlParser::get_w_attribute(e, "initials"),
        date: XmlParser::get_w_attribute(e, "date").unwrap_or_default(),
        ..Default::default()
    }
}

fn para_id(e: &BytesStart) -> Option<String> {
    XmlParser::get_prefixed_attribute(e, "w14", "paraId")
}

/// Fold threading and resolved state into the parsed comments. An entry may
/// name any paragraph of its comment; a parent that cannot be found is dropped.
pub(crate) fn apply_extended(comments: &mut [ParsedComment], extended: &[CommentExtended]) {
    let owners: HashMap<&str, usize> = comments
        .iter()
        .flat_map(|c| c.para_ids.iter().map(move |id| (id.as_str(), c.comment.id)))
        .collect();

    let mut updates = Vec::new();
    for entry in extended {
        let Some(&owner) = owners.get(entry.para_id.as_str()) else {
            tracing::debug!(para_id = %entry.para_id, "commentEx does not match any comment");
            continue;
        };
        let parent = entry
            .parent_para_id
            .as_deref()
            .and_then(|parent| owners.get(parent).copied());
        if entry.parent_para_id.is_some() && parent.is_none() {
            tracing::warn!(comment = owner, "reply parent not found in comments part");
        }
        updates.push((owner, parent, entry.done));
    }

    for (owner, parent, done) in updates {
        if let Some(parsed) = comments.iter_mut().find(|c| c.comment.id == owner) {
            parsed.comment.done = done;
            if parent.is_some() {
                parsed.comment.parent_comment_id = parent;
            }
        }
    }
}

/// Replace the placeholder comment on every range start with the parsed body.
/// Comments that nothing in the body anchors are dropped.
pub(crate) fn attach_comments(children: &mut [DocumentChild], comments: Vec<Comment>) {
    let mut by_id: HashMap<usize, Comment> = comments.into_iter().map(|c| (c.id, c)).collect();

    for child in children.iter_mut() {
        match child {
            DocumentChild::Paragraph(p) => attach_in_paragraph(p, &mut by_id),
            DocumentChild::Table(t) => attach_in_table(t, &mut by_id),
            DocumentChild::BookmarkStart(_) | DocumentChild::BookmarkEnd(_) => {}
        }
    }

    if !by_id.is_empty() {
        let mut orphaned: Vec<_> = by_id.into_keys().collect();
        orphaned.sort_unstable();
        tracing::debug!(?orphaned, "comments without a range in the document body");
    }
}

fn attach_in_paragraph(paragraph: &mut Paragraph, by_id: &mut HashMap<usize, Comment>) {
    for child in paragraph.children.iter_mut() {
        if let ParagraphChild::CommentStart(start) = child {
            if let Some(comment) = by_id.remove(&start.id) {
                start.comment = comment;
            }
        }
    }
}

fn attach_in_table(table: &mut Table, by_id: &mut HashMap<usize, Comment>) {
    for row in table.rows.iter_mut() {
        for cell in row.cells.iter_mut() {
            for content in cell.children.iter_mut() {
                match content {
                    TableCellContent::Paragraph(p) => attach_in_paragraph(p, by_id),
                    TableCellContent::Table(t) => attach_in_table(t, by_id),
                }
            }
        }
    }
}

// =============================================================================
// Comments Writer
// =============================================================================

/// Generate word/comments.xml for the anchored comments of the plan
pub(crate) fn write_comments(plan: &PackagePlan, writer: &mut DocumentWriter) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(&format!(
        r#"<w:comments xmlns:w="{}" xmlns:r="{}" xmlns:w14="{}" xmlns:w15="{}" xmlns:mc="{}" mc:Ignorable="w14 w15">"#,
        namespaces::W,
        namespaces::R,
        namespaces::W14,
        namespaces::W15,
        namespaces::MC,
    ));

    for comment in &plan.comments {
        xml.push_str(&format!(
            r#"<w:comment w:id="{}" w:author="{}" w:date="{}""#,
            comment.id,
            escape_xml(&comment.author),
            escape_xml(&comment.date),
        ));
        if let Some(ref initials) = comment.initials {
            xml.push_str(&format!(r#" w:initials="{}""#, escape_xml(initials)));
        }
        xml.push('>');

        let para_ids = plan
            .comment_para_ids
            .get(&comment.id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let mut para_ids = para_ids.iter().map(String::as_str);

        let has_paragraph = comment
            .children
            .iter()
            .any(|c| matches!(c, CommentChild::Paragraph(_)));
        for child in &comment.children {
            match child {
                CommentChild::Paragraph(p) => writer.write_paragraph(&mut xml, p, para_ids.next()),
                CommentChild::Table(t) => writer.write_table(&mut xml, t),
            }
        }
        if !has_paragraph {
            tracing::warn!(comment = comment.id, "comment without paragraphs, writing an empty one");
            match para_ids.next() {
                Some(id) => xml.push_str(&format!(
                    r#"<w:p w14:paraId="{}" w14:textId="77777777"/>"#,
                    id
                )),
                None => xml.push_str("<w:p/>"),
            }
        }

        xml.push_str("</w:comment>");
    }

    xml.push_str("</w:comments>");
    xml
}

/// Generate word/commentsExtended.xml
pub(crate) fn write_comments_extended(plan: &PackagePlan) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push('\n');
    xml.push_str(&format!(
        r#"<w15:commentsEx xmlns:w15="{}" xmlns:mc="{}" mc:Ignorable="w15">"#,
        namespaces::W15,
        namespaces::MC,
    ));

    for comment in &plan.comments {
        let Some(anchor) = plan.comment_anchor_para_id(comment.id) else {
            continue;
        };
        xml.push_str(&format!(r#"<w15:commentEx w15:paraId="{}""#, anchor));
        if let Some(parent) = comment.parent_comment_id {
            match plan.comment_anchor_para_id(parent) {
                Some(parent_anchor) => {
                    xml.push_str(&format!(r#" w15:paraIdParent="{}""#, parent_anchor))
                }
                None => tracing::warn!(
                    comment = comment.id,
                    parent,
                    "reply parent is not an anchored comment, dropping the link"
                ),
            }
        }
        xml.push_str(&format!(
            r#" w15:done="{}"/>"#,
            if comment.done { "1" } else { "0" }
        ));
    }

    xml.push_str("</w15:commentsEx>");
    xml
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::BuildOptions;
    use doc_model::{Document, Run, TableCell, TableRow};

    fn commented_document() -> Document {
        let first = Comment::new(1)
            .with_author("bokuweb")
            .with_initials("bw")
            .with_date("2019-01-01T00:00:00Z")
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Hello")))
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("World")));
        let reply = Comment::new(2)
            .with_author("reviewer")
            .with_date("2019-01-02T00:00:00Z")
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("Agreed")))
            .with_parent_comment_id(1)
            .with_done(true);
        Document::new().add_paragraph(
            Paragraph::new()
                .add_comment_start(first)
                .add_comment_start(reply)
                .add_run(Run::new().add_text("commented"))
                .add_comment_end(1)
                .add_comment_end(2),
        )
    }

    fn render(doc: &Document) -> (String, String) {
        let plan = PackagePlan::new(doc).unwrap();
        let options = BuildOptions::default();
        let mut writer = DocumentWriter::new(&plan, &options);
        (write_comments(&plan, &mut writer), write_comments_extended(&plan))
    }

    #[test]
    fn test_write_comments() {
        let (comments, extended) = render(&commented_document());
        assert!(comments.contains(
            r#"<w:comment w:id="1" w:author="bokuweb" w:date="2019-01-01T00:00:00Z" w:initials="bw">"#
        ));
        assert!(comments.contains(r#"<w:p w14:paraId="10000000" w14:textId="77777777">"#));
        assert!(comments.contains(r#"<w:p w14:paraId="10000001" w14:textId="77777777">"#));
        assert!(extended.contains(r#"<w15:commentEx w15:paraId="10000001" w15:done="0"/>"#));
        assert!(extended.contains(
            r#"<w15:commentEx w15:paraId="10000002" w15:paraIdParent="10000001" w15:done="1"/>"#
        ));
    }

    #[test]
    fn test_empty_comment_gets_placeholder_paragraph() {
        let doc = Document::new().add_paragraph(
            Paragraph::new()
                .add_comment_start(Comment::new(3))
                .add_comment_end(3),
        );
        let (comments, extended) = render(&doc);
        assert!(comments.contains(r#"<w:p w14:paraId="10000000" w14:textId="77777777"/>"#));
        assert!(extended.contains(r#"w15:paraId="10000000""#));
    }

    #[test]
    fn test_filler_paragraph_is_dropped_on_read() {
        let doc = Document::new().add_paragraph(
            Paragraph::new()
                .add_comment_start(Comment::new(3).with_author("ann").with_done(true))
                .add_comment_end(3),
        );
        let (comments_xml, extended_xml) = render(&doc);

        let parser = CommentsParser::new();
        let mut parsed = parser.parse_comments(&comments_xml).unwrap();
        apply_extended(&mut parsed, &parser.parse_comments_extended(&extended_xml).unwrap());

        assert_eq!(parsed.len(), 1);
        assert!(parsed[0].comment.children.is_empty());
        assert_eq!(parsed[0].para_ids, vec!["10000000"]);
        assert!(parsed[0].comment.done);
    }

    #[test]
    fn test_written_empty_paragraph_is_kept() {
        let xml = r#"<w:comments xmlns:w="w"><w:comment w:id="1"><w:p></w:p></w:comment><w:comment w:id="2"><w:p/><w:p/></w:comment></w:comments>"#;
        let parsed = CommentsParser::new().parse_comments(xml).unwrap();
        assert_eq!(parsed[0].comment.children.len(), 1);
        assert_eq!(parsed[1].comment.children.len(), 2);
    }

    #[test]
    fn test_unanchored_parent_is_dropped() {
        let doc = Document::new().add_paragraph(
            Paragraph::new()
                .add_comment_start(Comment::new(1).with_parent_comment_id(99))
                .add_comment_end(1),
        );
        let (_, extended) = render(&doc);
        assert!(!extended.contains("paraIdParent"));
    }

    #[test]
    fn test_comments_read_back() {
        let doc = commented_document();
        let (comments_xml, extended_xml) = render(&doc);

        let parser = CommentsParser::new();
        let mut parsed = parser.parse_comments(&comments_xml).unwrap();
        let extended = parser.parse_comments_extended(&extended_xml).unwrap();
        apply_extended(&mut parsed, &extended);

        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].para_ids, vec!["10000000", "10000001"]);
        let first = &parsed[0].comment;
        assert_eq!(first.initials.as_deref(), Some("bw"));
        assert_eq!(first.children.len(), 2);
        assert!(!first.done);
        let reply = &parsed[1].comment;
        assert_eq!(reply.parent_comment_id, Some(1));
        assert!(reply.done);
        assert_eq!(reply.initials, None);
    }

    #[test]
    fn test_attach_comments_in_tables() {
        let cell = TableCell::new().add_paragraph(
            Paragraph::new()
                .add_comment_start(Comment::new(4))
                .add_comment_end(4),
        );
        let mut children = vec![DocumentChild::Table(Box::new(Table::new(vec![TableRow::new(
            vec![cell],
        )])))];
        let body = Comment::new(4).with_author("ann");
        attach_comments(&mut children, vec![body.clone(), Comment::new(8)]);

        let DocumentChild::Table(table) = &children[0] else {
            panic!("expected table");
        };
        let TableCellContent::Paragraph(p) = &table.rows[0].cells[0].children[0] else {
            panic!("expected paragraph");
        };
        match &p.children[0] {
            ParagraphChild::CommentStart(start) => assert_eq!(start.comment, body),
            other => panic!("unexpected child {:?}", other),
        }
    }

    #[test]
    fn test_foreign_extended_entry_on_first_paragraph() {
        let mut parsed = vec![ParsedComment {
            comment: Comment::new(0),
            para_ids: vec!["0A".into(), "0B".into()],
        }];
        let extended = vec![CommentExtended {
            para_id: "0A".into(),
            parent_para_id: None,
            done: true,
        }];
        apply_extended(&mut parsed, &extended);
        assert!(parsed[0].comment.done);
    }
}
