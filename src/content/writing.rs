//! Writing and PostRecord models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use super::ContentError;
use crate::helpers::parse_timestamp;

/// A writing as loaded from the content directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Writing {
    /// Slug (URL-friendly name, unique across the collection)
    pub slug: String,

    /// Writing title
    pub title: String,

    /// Short summary, may be empty
    pub summary: String,

    /// Publication timestamp as written in the front-matter
    pub published_at: String,

    /// Tags
    pub tags: Vec<String>,

    /// Drafts are skipped unless `render_drafts` is set
    pub draft: bool,

    /// Raw markdown content
    pub raw: String,

    /// Rendered HTML content
    pub content: String,

    /// Source file path (relative to the content directory)
    pub source: String,

    /// Full source file path
    pub full_source: PathBuf,

    /// Custom front-matter fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Writing {
    /// Create a new writing with minimal required fields
    pub fn new(slug: String, title: String, published_at: String, source: String) -> Self {
        Self {
            slug,
            title,
            summary: String::new(),
            published_at,
            tags: Vec::new(),
            draft: false,
            raw: String::new(),
            content: String::new(),
            source: source.clone(),
            full_source: PathBuf::from(&source),
            extra: HashMap::new(),
        }
    }
}

/// The projection of a writing shown in listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    pub slug: String,
    pub title: String,
    pub summary: String,
    pub published_at: String,
}

impl PostRecord {
    /// Parse `published_at` into a comparable instant
    pub fn published_instant(&self) -> Result<DateTime<Utc>, ContentError> {
        parse_timestamp(&self.published_at).ok_or_else(|| ContentError::MalformedTimestamp {
            slug: self.slug.clone(),
            value: self.published_at.clone(),
        })
    }
}

/// Check that a slug is usable as a single path segment
///
/// Empty values, `.` and `..`, separators and control characters are rejected.
pub fn validate_slug(slug: &str, path: &str) -> Result<(), ContentError> {
    let invalid = slug.trim().is_empty()
        || slug == "."
        || slug == ".."
        || slug
            .chars()
            .any(|c| c == '/' || c == '\\' || c.is_control());

    if invalid {
        return Err(ContentError::InvalidSlug {
            slug: slug.to_string(),
            path: path.to_string(),
        });
    }
    Ok(())
}

impl From<&Writing> for PostRecord {
    fn from(writing: &Writing) -> Self {
        Self {
            slug: writing.slug.clone(),
            title: writing.title.clone(),
            summary: writing.summary.clone(),
            published_at: writing.published_at.clone(),
        }
    }
}

impl From<&PostRecord> for PostRecord {
    fn from(record: &PostRecord) -> Self {
        record.clone()
    }
}
