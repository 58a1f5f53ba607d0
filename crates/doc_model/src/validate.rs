//! Referential checks run before a document is serialized
//!
//! Ids are supplied by the caller; nothing here renumbers anything. The walk
//! visits markers in document order so that range pairing (comments and
//! bookmarks may span paragraphs and table cells) is checked the same way a
//! consumer reads the body.

use crate::{
    CommentChild, Document, DocumentChild, Paragraph, ParagraphChild, Result, Table,
    TableCellContent, ValidationError,
};
use std::collections::HashSet;

#[derive(Default)]
struct MarkerState {
    numbering_ids: HashSet<usize>,
    comments_started: HashSet<usize>,
    comments_open: Vec<usize>,
    comments_closed: HashSet<usize>,
    bookmarks_started: HashSet<usize>,
    bookmarks_open: Vec<usize>,
}

impl MarkerState {
    fn bookmark_start(&mut self, id: usize) -> Result<()> {
        if !self.bookmarks_started.insert(id) {
            return Err(ValidationError::DuplicateBookmark(id));
        }
        self.bookmarks_open.push(id);
        Ok(())
    }

    fn bookmark_end(&mut self, id: usize) -> Result<()> {
        match self.bookmarks_open.iter().position(|open| *open == id) {
            Some(pos) => {
                self.bookmarks_open.remove(pos);
                Ok(())
            }
            None => Err(ValidationError::UnpairedBookmarkEnd(id)),
        }
    }

    fn comment_end(&mut self, id: usize) -> Result<()> {
        if self.comments_closed.contains(&id) {
            return Err(ValidationError::DuplicateCommentEnd(id));
        }
        match self.comments_open.iter().position(|open| *open == id) {
            Some(pos) => {
                self.comments_open.remove(pos);
                self.comments_closed.insert(id);
                Ok(())
            }
            None => Err(ValidationError::CommentEndWithoutStart(id)),
        }
    }

    fn numbering_ref(&self, id: usize) -> Result<()> {
        if self.numbering_ids.contains(&id) {
            Ok(())
        } else {
            Err(ValidationError::UndefinedNumbering(id))
        }
    }

    fn paragraph(&mut self, paragraph: &Paragraph) -> Result<()> {
        if let Some(num) = paragraph.property.numbering {
            self.numbering_ref(num.id)?;
        }
        for child in &paragraph.children {
            match child {
                ParagraphChild::BookmarkStart(b) => self.bookmark_start(b.id)?,
                ParagraphChild::BookmarkEnd(b) => self.bookmark_end(b.id)?,
                ParagraphChild::CommentStart(start) => {
                    if !self.comments_started.insert(start.id) {
                        return Err(ValidationError::DuplicateComment(start.id));
                    }
                    self.comments_open.push(start.id);
                    for body in &start.comment.children {
                        match body {
                            CommentChild::Paragraph(p) => self.paragraph(p)?,
                            CommentChild::Table(t) => self.table(t)?,
                        }
                    }
                }
                ParagraphChild::CommentEnd(end) => self.comment_end(end.id)?,
                ParagraphChild::Run(_) | ParagraphChild::Insert(_) | ParagraphChild::Delete(_) => {}
            }
        }
        Ok(())
    }

    fn table(&mut self, table: &Table) -> Result<()> {
        for row in &table.rows {
            for cell in &row.cells {
                for content in &cell.children {
                    match content {
                        TableCellContent::Paragraph(p) => self.paragraph(p)?,
                        TableCellContent::Table(t) => self.table(t)?,
                    }
                }
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<()> {
        if let Some(id) = self.comments_open.first() {
            return Err(ValidationError::UnclosedComment(*id));
        }
        if let Some(id) = self.bookmarks_open.first() {
            return Err(ValidationError::UnpairedBookmarkStart(*id));
        }
        Ok(())
    }
}

impl Document {
    /// Check every cross-reference the package depends on.
    ///
    /// Fails on the first broken reference: undefined or duplicated
    /// numbering definitions, unpaired or duplicated comment and bookmark
    /// ranges, and duplicated custom item ids.
    pub fn validate(&self) -> Result<()> {
        let mut abstract_ids = HashSet::new();
        for abstract_num in &self.abstract_numberings {
            if !abstract_ids.insert(abstract_num.id) {
                return Err(ValidationError::DuplicateAbstractNumbering(abstract_num.id));
            }
        }

        let mut state = MarkerState::default();
        for numbering in &self.numberings {
            if !state.numbering_ids.insert(numbering.id) {
                return Err(ValidationError::DuplicateNumbering(numbering.id));
            }
            if !abstract_ids.contains(&numbering.abstract_num_id) {
                return Err(ValidationError::UndefinedAbstractNumbering {
                    numbering_id: numbering.id,
                    abstract_num_id: numbering.abstract_num_id,
                });
            }
        }

        for style in &self.styles.styles {
            if let Some(num) = style.paragraph_property.numbering {
                state.numbering_ref(num.id)?;
            }
        }

        for child in &self.children {
            match child {
                DocumentChild::Paragraph(p) => state.paragraph(p)?,
                DocumentChild::Table(t) => state.table(t)?,
                DocumentChild::BookmarkStart(b) => state.bookmark_start(b.id)?,
                DocumentChild::BookmarkEnd(b) => state.bookmark_end(b.id)?,
            }
        }
        state.finish()?;

        let mut item_ids = HashSet::new();
        for item in &self.custom_items {
            if !item_ids.insert(item.id.as_str()) {
                return Err(ValidationError::DuplicateCustomItem(item.id.clone()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::*;

    fn numbered_doc() -> Document {
        Document::new()
            .add_abstract_numbering(
                AbstractNumbering::new(2).add_level(Level::new(
                    0,
                    1,
                    NumberFormat::Decimal,
                    "%1.",
                    LevelJc::Left,
                )),
            )
            .add_numbering(Numbering::new(2, 2))
    }

    #[test]
    fn test_valid_numbering_reference() {
        let doc = numbered_doc().add_paragraph(Paragraph::new().with_numbering(2, 0));
        assert_eq!(doc.validate(), Ok(()));
    }

    #[test]
    fn test_undefined_numbering() {
        let doc = Document::new().add_paragraph(Paragraph::new().with_numbering(7, 0));
        assert_eq!(doc.validate(), Err(ValidationError::UndefinedNumbering(7)));
    }

    #[test]
    fn test_numbering_in_nested_cell_is_checked() {
        let inner = Table::new(vec![TableRow::new(vec![
            TableCell::new().add_paragraph(Paragraph::new().with_numbering(9, 0)),
        ])]);
        let outer = Table::new(vec![TableRow::new(vec![TableCell::new().add_table(inner)])]);
        let doc = numbered_doc().add_table(outer);
        assert_eq!(doc.validate(), Err(ValidationError::UndefinedNumbering(9)));
    }

    #[test]
    fn test_undefined_abstract_numbering() {
        let doc = Document::new().add_numbering(Numbering::new(1, 5));
        assert_eq!(
            doc.validate(),
            Err(ValidationError::UndefinedAbstractNumbering {
                numbering_id: 1,
                abstract_num_id: 5
            })
        );
    }

    #[test]
    fn test_duplicate_numbering() {
        let doc = numbered_doc().add_numbering(Numbering::new(2, 2));
        assert_eq!(doc.validate(), Err(ValidationError::DuplicateNumbering(2)));
    }

    #[test]
    fn test_comment_spanning_paragraphs() {
        let doc = Document::new()
            .add_paragraph(Paragraph::new().add_comment_start(Comment::new(1)))
            .add_paragraph(Paragraph::new().add_comment_end(1));
        assert_eq!(doc.validate(), Ok(()));
    }

    #[test]
    fn test_comment_pairing_errors() {
        let unclosed =
            Document::new().add_paragraph(Paragraph::new().add_comment_start(Comment::new(1)));
        assert_eq!(unclosed.validate(), Err(ValidationError::UnclosedComment(1)));

        let orphan_end = Document::new().add_paragraph(Paragraph::new().add_comment_end(3));
        assert_eq!(
            orphan_end.validate(),
            Err(ValidationError::CommentEndWithoutStart(3))
        );

        let double_end = Document::new().add_paragraph(
            Paragraph::new()
                .add_comment_start(Comment::new(1))
                .add_comment_end(1)
                .add_comment_end(1),
        );
        assert_eq!(
            double_end.validate(),
            Err(ValidationError::DuplicateCommentEnd(1))
        );
    }

    #[test]
    fn test_bookmark_pairing() {
        let ok = Document::new()
            .add_bookmark_start(1, "a")
            .add_paragraph(Paragraph::new().add_bookmark_end(1));
        assert_eq!(ok.validate(), Ok(()));

        let open = Document::new().add_bookmark_start(4, "a");
        assert_eq!(open.validate(), Err(ValidationError::UnpairedBookmarkStart(4)));

        let twice = Document::new()
            .add_bookmark_start(1, "a")
            .add_bookmark_start(1, "b");
        assert_eq!(twice.validate(), Err(ValidationError::DuplicateBookmark(1)));

        let end_first = Document::new()
            .add_bookmark_end(2)
            .add_bookmark_start(2, "late");
        assert_eq!(end_first.validate(), Err(ValidationError::UnpairedBookmarkEnd(2)));
    }

    #[test]
    fn test_duplicate_custom_item() {
        let doc = Document::new()
            .add_custom_item("{A}", "<a/>")
            .add_custom_item("{A}", "<b/>");
        assert_eq!(
            doc.validate(),
            Err(ValidationError::DuplicateCustomItem("{A}".to_string()))
        );
    }
}
