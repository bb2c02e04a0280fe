//! Built-in portfolio templates using the Tera template engine
//!
//! Templates are embedded in the binary; the generator only supplies data.

use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::helpers::{date_label, writing_path};

/// Template renderer with the embedded portfolio theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates and filters loaded
    pub fn new(config: &SiteConfig) -> Result<Self> {
        let mut tera = Tera::default();

        // Paths and URLs must not be escaped; text fields use `| escape`
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("portfolio/layout.html")),
            ("home.html", include_str!("portfolio/home.html")),
            ("writing.html", include_str!("portfolio/writing.html")),
            ("writings.html", include_str!("portfolio/writings.html")),
            // Partials
            (
                "partials/header.html",
                include_str!("portfolio/partials/header.html"),
            ),
            (
                "partials/about.html",
                include_str!("portfolio/partials/about.html"),
            ),
            (
                "partials/links.html",
                include_str!("portfolio/partials/links.html"),
            ),
            (
                "partials/recent.html",
                include_str!("portfolio/partials/recent.html"),
            ),
        ])?;

        tera.register_filter(
            "date_label",
            date_label_filter(config.date_format.clone(), config.timezone.clone()),
        );
        tera.register_filter("writing_url", writing_url_filter(config.clone()));

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: human-readable label for a `publishedAt` string
///
/// `{{ post.publishedAt | date_label }}` or
/// `{{ post.publishedAt | date_label(format="YYYY") }}`
fn date_label_filter(
    default_format: String,
    timezone: String,
) -> impl Fn(&tera::Value, &HashMap<String, tera::Value>) -> tera::Result<tera::Value> + Send + Sync
{
    move |value: &tera::Value, args: &HashMap<String, tera::Value>| {
        let s = tera::try_get_value!("date_label", "value", String, value);
        let format = match args.get("format") {
            Some(val) => tera::try_get_value!("date_label", "format", String, val),
            None => default_format.clone(),
        };

        // Unparseable values are shown as written
        let label = date_label(&s, &format, &timezone).unwrap_or(s);
        Ok(tera::Value::String(label))
    }
}

/// Tera filter: route of a writing from its slug
fn writing_url_filter(
    config: SiteConfig,
) -> impl Fn(&tera::Value, &HashMap<String, tera::Value>) -> tera::Result<tera::Value> + Send + Sync
{
    move |value: &tera::Value, _args: &HashMap<String, tera::Value>| {
        let slug = tera::try_get_value!("writing_url", "value", String, value);
        Ok(tera::Value::String(writing_path(&config, &slug)))
    }
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub language: String,
    pub url: String,
    pub root: String,
    pub feed: String,
    pub writings: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct IdentityData {
    pub name: String,
    pub tagline: String,
    pub logo: String,
    pub logo_badge: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LinkData {
    pub name: String,
    pub html: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NavWriting {
    pub title: String,
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct WritingData {
    pub slug: String,
    pub title: String,
    pub summary: String,
    #[serde(rename = "publishedAt")]
    pub published_at: String,
    pub tags: Vec<String>,
    pub content: String,
}
