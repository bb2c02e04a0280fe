//! Content errors

use thiserror::Error;

/// Errors raised while loading or ordering the writing collection
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    #[error("Malformed publishedAt {value:?} for writing '{slug}'")]
    MalformedTimestamp { slug: String, value: String },

    #[error("Missing field '{field}' in {path}")]
    MissingField { field: &'static str, path: String },

    #[error("Invalid slug {slug:?} in {path}")]
    InvalidSlug { slug: String, path: String },

    #[error("Duplicate slug '{slug}' in {first} and {second}")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },
}
