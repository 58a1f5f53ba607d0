//! Comments - annotations anchored to a range of the paragraph stream
//!
//! A comment's body travels with its opening anchor (`CommentRangeStart`);
//! the closing anchor only carries the id. Threading is expressed through
//! `parent_comment_id`.

use crate::{Paragraph, Table};
use serde::{Deserialize, Serialize};

/// Block content of a comment body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum CommentChild {
    Paragraph(Box<Paragraph>),
    Table(Box<Table>),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: usize,
    pub author: String,
    pub initials: Option<String>,
    /// ISO 8601 timestamp
    pub date: String,
    pub children: Vec<CommentChild>,
    /// Comment this one replies to
    pub parent_comment_id: Option<usize>,
    /// Resolved flag from the extended comment part
    pub done: bool,
}

impl Comment {
    pub fn new(id: usize) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    pub fn with_initials(mut self, initials: impl Into<String>) -> Self {
        self.initials = Some(initials.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = date.into();
        self
    }

    pub fn add_paragraph(mut self, paragraph: Paragraph) -> Self {
        self.children.push(CommentChild::Paragraph(Box::new(paragraph)));
        self
    }

    pub fn add_table(mut self, table: Table) -> Self {
        self.children.push(CommentChild::Table(Box::new(table)));
        self
    }

    pub fn with_parent_comment_id(mut self, parent: usize) -> Self {
        self.parent_comment_id = Some(parent);
        self
    }

    pub fn with_done(mut self, done: bool) -> Self {
        self.done = done;
        self
    }
}

/// Opening anchor of a comment range; owns the comment body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRangeStart {
    pub id: usize,
    pub comment: Comment,
}

impl CommentRangeStart {
    pub fn new(comment: Comment) -> Self {
        Self {
            id: comment.id,
            comment,
        }
    }
}

/// Closing anchor of a comment range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRangeEnd {
    pub id: usize,
}

impl CommentRangeEnd {
    pub fn new(id: usize) -> Self {
        Self { id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Run;

    #[test]
    fn test_range_start_takes_comment_id() {
        let start = CommentRangeStart::new(Comment::new(7).with_author("Ann"));
        assert_eq!(start.id, 7);
        assert_eq!(start.comment.author, "Ann");
    }

    #[test]
    fn test_comment_body_order() {
        let comment = Comment::new(1)
            .add_paragraph(Paragraph::new().add_run(Run::new().add_text("first")))
            .add_table(Table::new(vec![]))
            .add_paragraph(Paragraph::new());
        assert!(matches!(comment.children[0], CommentChild::Paragraph(_)));
        assert!(matches!(comment.children[1], CommentChild::Table(_)));
        assert_eq!(comment.children.len(), 3);
    }
}
