//! Error types for document model operations

use thiserror::Error;

/// Broken cross-references found when a document is checked before build
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Numbering {0} is referenced but not defined")]
    UndefinedNumbering(usize),

    #[error("Numbering {numbering_id} references undefined abstract numbering {abstract_num_id}")]
    UndefinedAbstractNumbering {
        numbering_id: usize,
        abstract_num_id: usize,
    },

    #[error("Numbering {0} is defined more than once")]
    DuplicateNumbering(usize),

    #[error("Abstract numbering {0} is defined more than once")]
    DuplicateAbstractNumbering(usize),

    #[error("Comment end {0} has no preceding comment start")]
    CommentEndWithoutStart(usize),

    #[error("Comment {0} is never closed")]
    UnclosedComment(usize),

    #[error("Comment {0} is started more than once")]
    DuplicateComment(usize),

    #[error("Comment {0} is closed more than once")]
    DuplicateCommentEnd(usize),

    #[error("Bookmark {0} is never closed")]
    UnpairedBookmarkStart(usize),

    #[error("Bookmark end {0} has no matching start")]
    UnpairedBookmarkEnd(usize),

    #[error("Bookmark {0} is started more than once")]
    DuplicateBookmark(usize),

    #[error("Custom item {0} is defined more than once")]
    DuplicateCustomItem(String),
}

pub type Result<T> = std::result::Result<T, ValidationError>;
