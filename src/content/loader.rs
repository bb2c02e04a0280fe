//! Content loader - loads the writing collection from the content directory

use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::{validate_slug, ContentError, FrontMatter, MarkdownRenderer, Writing};
use crate::Folio;

/// Loads content from the content directory
pub struct ContentLoader<'a> {
    folio: &'a Folio,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(folio: &'a Folio) -> Self {
        Self {
            folio,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Load every writing under `<content_dir>/<writing_dir>`
    ///
    /// Files that cannot be read are skipped with a warning. Invalid
    /// front-matter, missing required fields and duplicate slugs are errors.
    pub fn load_writings(&self) -> Result<Vec<Writing>> {
        let writing_dir = self.folio.writing_dir();
        if !writing_dir.exists() {
            tracing::debug!("No writing directory at {:?}", writing_dir);
            return Ok(Vec::new());
        }

        let mut writings = Vec::new();
        let mut seen: HashMap<String, String> = HashMap::new();

        for entry in WalkDir::new(&writing_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }

            let raw = match fs::read_to_string(path) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!("Failed to read writing {:?}: {}", path, e);
                    continue;
                }
            };

            let writing = self.parse_writing(path, &raw)?;

            if writing.draft && !self.folio.config.render_drafts {
                tracing::debug!("Skipping draft: {}", writing.source);
                continue;
            }

            if let Some(first) = seen.get(&writing.slug) {
                return Err(ContentError::DuplicateSlug {
                    slug: writing.slug.clone(),
                    first: first.clone(),
                    second: writing.source.clone(),
                }
                .into());
            }
            seen.insert(writing.slug.clone(), writing.source.clone());

            writings.push(writing);
        }

        tracing::debug!("Loaded {} writings from {:?}", writings.len(), writing_dir);
        Ok(writings)
    }

    /// Build a writing from the contents of one file
    fn parse_writing(&self, path: &Path, raw: &str) -> Result<Writing> {
        let (fm, body) = FrontMatter::parse(raw)
            .map_err(|e| anyhow!("Invalid front-matter in {:?}: {}", path, e))?;

        let source = path
            .strip_prefix(&self.folio.content_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .to_string();

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();

        let title = fm.title.unwrap_or_else(|| stem.clone());
        if title.trim().is_empty() {
            return Err(ContentError::MissingField {
                field: "title",
                path: source,
            }
            .into());
        }

        let published_at = fm.published_at.ok_or_else(|| ContentError::MissingField {
            field: "publishedAt",
            path: source.clone(),
        })?;

        let slug = fm.slug.filter(|s| !s.trim().is_empty()).unwrap_or(stem);
        validate_slug(&slug, &source)?;

        let mut writing = Writing::new(slug, title, published_at, source);
        writing.summary = fm.summary.unwrap_or_default();
        writing.tags = fm.tags;
        writing.draft = fm.draft;
        writing.raw = body.to_string();
        writing.content = self.renderer.render(body)?;
        writing.full_source = path.to_path_buf();
        writing.extra = fm.extra;

        Ok(writing)
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}
