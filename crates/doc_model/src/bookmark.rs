//! Bookmarks - named anchors paired by id

use serde::{Deserialize, Serialize};

/// Opening anchor of a bookmark (`w:bookmarkStart`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkStart {
    pub id: usize,
    pub name: String,
}

impl BookmarkStart {
    pub fn new(id: usize, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Closing anchor of a bookmark (`w:bookmarkEnd`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookmarkEnd {
    pub id: usize,
}

impl BookmarkEnd {
    pub fn new(id: usize) -> Self {
        Self { id }
    }
}
