//! Document Model - typed node tree for word-processing documents
//!
//! This crate holds the in-memory model that the OOXML codec writes and
//! reads: paragraphs, runs, tables, numbering, styles, comments, bookmarks,
//! section setup and package-level metadata. It also resolves effective
//! formatting through the style cascade and checks cross-references.

#[macro_use]
mod literal;

mod border;
mod run;
mod paragraph;
mod bookmark;
mod comment;
pub mod table;
pub mod list;
pub mod section;
pub mod style;
mod resolver;
mod extension;
mod document;
mod validate;
mod error;

pub use border::*;
pub use run::*;
pub use paragraph::*;
pub use bookmark::*;
pub use comment::*;
pub use table::*;
pub use list::*;
pub use section::*;
pub use style::*;
pub use resolver::*;
pub use extension::*;
pub use document::*;
pub use error::*;
