//! Build plan: feature flags and the relation table
//!
//! Computed once per build before any part is rendered. Serializers read
//! relationship ids, paragraph ids and revision id seeds from here instead of
//! deriving them at their emit sites.

use crate::part_names;
use crate::relationship_types;
use crate::relationships::Relationships;
use doc_model::{
    Comment, CommentChild, Document, DocumentChild, Paragraph, ParagraphChild, Table,
    TableCellContent, ValidationError,
};
use std::collections::HashMap;

/// First synthesized `w14:paraId`; values must stay below 0x80000000
const PARA_ID_BASE: u32 = 0x1000_0000;

/// Optional features in use, decided once per document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Features {
    /// Any numbering definition exists, referenced by a paragraph or not.
    /// Unreferenced definitions are model state and must read back.
    pub numbering: bool,
    pub comments: bool,
    pub custom_properties: bool,
    pub web_extensions: bool,
    pub custom_items: bool,
}

impl Features {
    fn detect(doc: &Document, comment_count: usize) -> Self {
        Self {
            numbering: !doc.abstract_numberings.is_empty() || !doc.numberings.is_empty(),
            comments: comment_count > 0,
            custom_properties: !doc.doc_props.custom_properties.is_empty(),
            web_extensions: !doc.web_extensions.is_empty(),
            custom_items: !doc.custom_items.is_empty(),
        }
    }
}

/// Relation table and synthesized ids for one build
pub(crate) struct PackagePlan<'a> {
    pub doc: &'a Document,
    pub features: Features,
    /// Anchored comments in document order
    pub comments: Vec<&'a Comment>,
    /// `w14:paraId` of every top-level paragraph of each comment, by comment id
    pub comment_para_ids: HashMap<usize, Vec<String>>,
    /// First id handed to `w:ins` / `w:del`; above every caller-supplied annotation id
    pub first_revision_id: usize,
    pub root_rels: Relationships,
    pub doc_rels: Relationships,
    pub taskpane_rels: Relationships,
    /// Relationship id of each web extension inside the task pane rels
    pub web_extension_rel_ids: Vec<String>,
    /// One rels part per custom item, linking it to its properties part
    pub custom_item_rels: Vec<Relationships>,
}

impl<'a> PackagePlan<'a> {
    /// Validate the document and allocate every synthesized id
    pub fn new(doc: &'a Document) -> Result<Self, ValidationError> {
        doc.validate()?;

        let mut walk = AnnotationWalk::default();
        for child in &doc.children {
            match child {
                DocumentChild::Paragraph(p) => walk.paragraph(p, true),
                DocumentChild::Table(t) => walk.table(t, true),
                DocumentChild::BookmarkStart(b) => walk.note_id(b.id),
                DocumentChild::BookmarkEnd(b) => walk.note_id(b.id),
            }
        }

        let features = Features::detect(doc, walk.comments.len());
        let comment_para_ids = allocate_para_ids(&walk.comments);

        let mut root_rels = Relationships::new();
        root_rels.add(relationship_types::DOCUMENT, part_names::DOCUMENT);
        root_rels.add(relationship_types::CORE_PROPERTIES, part_names::CORE);
        if features.custom_properties {
            root_rels.add(relationship_types::CUSTOM_PROPERTIES, part_names::CUSTOM);
        }

        let mut doc_rels = Relationships::new();
        doc_rels.add(relationship_types::STYLES, "styles.xml");
        doc_rels.add(relationship_types::SETTINGS, "settings.xml");
        if features.numbering {
            doc_rels.add(relationship_types::NUMBERING, "numbering.xml");
        }
        if features.comments {
            doc_rels.add(relationship_types::COMMENTS, "comments.xml");
            doc_rels.add(relationship_types::COMMENTS_EXTENDED, "commentsExtended.xml");
        }

        let mut taskpane_rels = Relationships::new();
        let mut web_extension_rel_ids = Vec::new();
        if features.web_extensions {
            doc_rels.add(
                relationship_types::WEB_EXTENSION_TASKPANES,
                "webextensions/taskpanes.xml",
            );
            for index in 1..=doc.web_extensions.len() {
                web_extension_rel_ids.push(taskpane_rels.add(
                    relationship_types::WEB_EXTENSION,
                    &format!("webextension{}.xml", index),
                ));
            }
        }

        let mut custom_item_rels = Vec::new();
        for index in 1..=doc.custom_items.len() {
            doc_rels.add(
                relationship_types::CUSTOM_XML,
                &format!("../customXml/item{}.xml", index),
            );
            let mut rels = Relationships::new();
            rels.add(
                relationship_types::CUSTOM_XML_PROPS,
                &format!("item{}Props/core.xml", index),
            );
            custom_item_rels.push(rels);
        }

        Ok(Self {
            doc,
            features,
            comments: walk.comments,
            comment_para_ids,
            first_revision_id: walk.max_id.map_or(1, |id| id + 1),
            root_rels,
            doc_rels,
            taskpane_rels,
            web_extension_rel_ids,
            custom_item_rels,
        })
    }

    /// Paragraph id anchoring a comment in commentsExtended (its last paragraph)
    pub fn comment_anchor_para_id(&self, comment_id: usize) -> Option<&str> {
        self.comment_para_ids
            .get(&comment_id)
            .and_then(|ids| ids.last())
            .map(String::as_str)
    }
}

fn allocate_para_ids(comments: &[&Comment]) -> HashMap<usize, Vec<String>> {
    let mut next = PARA_ID_BASE;
    let mut ids = HashMap::new();
    for comment in comments {
        let paragraphs = comment
            .children
            .iter()
            .filter(|c| matches!(c, CommentChild::Paragraph(_)))
            .count()
            .max(1);
        let allocated = (0..paragraphs)
            .map(|_| {
                let id = format!("{:08X}", next);
                next += 1;
                id
            })
            .collect();
        ids.insert(comment.id, allocated);
    }
    ids
}

/// Collects anchored comments and the highest caller-supplied annotation id
#[derive(Default)]
struct AnnotationWalk<'a> {
    comments: Vec<&'a Comment>,
    max_id: Option<usize>,
}

impl<'a> AnnotationWalk<'a> {
    fn note_id(&mut self, id: usize) {
        self.max_id = Some(self.max_id.map_or(id, |m| m.max(id)));
    }

    /// `collect` is false inside comment bodies; their ranges are not anchored
    fn paragraph(&mut self, paragraph: &'a Paragraph, collect: bool) {
        for child in &paragraph.children {
            match child {
                ParagraphChild::BookmarkStart(b) => self.note_id(b.id),
                ParagraphChild::BookmarkEnd(b) => self.note_id(b.id),
                ParagraphChild::CommentEnd(end) => self.note_id(end.id),
                ParagraphChild::CommentStart(start) => {
                    self.note_id(start.id);
                    if collect {
                        self.comments.push(&start.comment);
                    }
                    for body in &start.comment.children {
                        match body {
                            CommentChild::Paragraph(p) => self.paragraph(p, false),
                            CommentChild::Table(t) => self.table(t, false),
                        }
                    }
                }
                ParagraphChild::Run(_) | ParagraphChild::Insert(_) | ParagraphChild::Delete(_) => {}
            }
        }
    }

    fn table(&mut self, table: &'a Table, collect: bool) {
        for row in &table.rows {
            for cell in &row.cells {
                for content in &cell.children {
                    match content {
                        TableCellContent::Paragraph(p) => self.paragraph(p, collect),
                        TableCellContent::Table(t) => self.table(t, collect),
                    }
                }
            }
        }
    }
}
