//! Helper functions for content and templates
//!
//! Date parsing and labels, URL building and small HTML utilities shared by
//! the loader, the templates and the generator.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
