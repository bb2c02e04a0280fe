//! Content module - handles the writing collection and its ordering

mod error;
mod frontmatter;
pub mod loader;
mod markdown;
pub mod recent;
mod writing;

pub use error::ContentError;
pub use frontmatter::FrontMatter;
pub use markdown::MarkdownRenderer;
pub use recent::{select, select_recent, RECENT_WRITINGS_LIMIT};
pub use writing::{validate_slug, PostRecord, Writing};
