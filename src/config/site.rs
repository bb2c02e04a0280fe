//! Site configuration (folio.yml)

use anyhow::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::content::RECENT_WRITINGS_LIMIT;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,

    // Identity
    pub name: String,
    pub tagline: String,
    pub logo: String,
    pub logo_badge: String,

    // About me (markdown paragraphs)
    pub about: Vec<String>,

    // Links block, in display order
    pub links: IndexMap<String, String>,
    #[serde(default)]
    pub external_link: ExternalLinkConfig,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub content_dir: String,
    pub static_dir: String,
    pub public_dir: String,
    pub writing_dir: String,

    // Writing
    pub recent_writings: usize,
    pub render_drafts: bool,

    // Date / Time
    pub date_format: String,
    pub timezone: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            description: String::new(),
            language: "en".to_string(),

            name: "John Doe".to_string(),
            tagline: String::new(),
            logo: "/images/logo.png".to_string(),
            logo_badge: "✨".to_string(),

            about: Vec::new(),

            links: IndexMap::new(),
            external_link: ExternalLinkConfig::default(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            content_dir: "content".to_string(),
            static_dir: "static".to_string(),
            public_dir: "public".to_string(),
            writing_dir: "writing".to_string(),

            recent_writings: RECENT_WRITINGS_LIMIT,
            render_drafts: false,

            date_format: "MMM DD, YYYY".to_string(),
            timezone: String::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        tracing::debug!("Loaded config from {:?}", path.as_ref());
        Ok(config)
    }
}

/// External link configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalLinkConfig {
    /// Open off-site links in a new tab
    pub enable: bool,
    /// Append an arrow to off-site links
    pub arrow: bool,
}

impl Default for ExternalLinkConfig {
    fn default() -> Self {
        Self {
            enable: true,
            arrow: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.recent_writings, 3);
        assert_eq!(config.writing_dir, "writing");
        assert_eq!(config.public_dir, "public");
        assert!(config.links.is_empty());
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
name: Crețu
tagline: Design, Engineer
recent_writings: 5
links:
  GitHub: https://github.com/example
  Email: mailto:me@example.com
external_link:
  arrow: false
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.name, "Crețu");
        assert_eq!(config.tagline, "Design, Engineer");
        assert_eq!(config.recent_writings, 5);
        assert!(config.external_link.enable);
        assert!(!config.external_link.arrow);

        let names: Vec<_> = config.links.keys().cloned().collect();
        assert_eq!(names, vec!["GitHub", "Email"]);
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.yml");
        fs::write(&path, "title: My Site\ntimezone: Europe/Bucharest\n").unwrap();

        let config = SiteConfig::load(&path).unwrap();
        assert_eq!(config.title, "My Site");
        assert_eq!(config.timezone, "Europe/Bucharest");
        assert_eq!(config.date_format, "MMM DD, YYYY");
    }
}
