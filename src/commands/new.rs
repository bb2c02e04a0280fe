//! Create a new writing

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Folio;

/// Create a new writing and return its path
pub fn create_writing(folio: &Folio, title: &str, slug: Option<&str>) -> Result<PathBuf> {
    let now = chrono::Utc::now();

    let slug = match slug {
        Some(s) => slug::slugify(s),
        None => slug::slugify(title),
    };
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a slug from title {:?}", title);
    }

    let target_dir = folio.writing_dir();
    fs::create_dir_all(&target_dir)?;

    let file_path = target_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let content = format!(
        "---\ntitle: {}\nsummary: ''\npublishedAt: {}\n---\n",
        serde_yaml::to_string(title)?.trim_end(),
        now.format("%Y-%m-%d")
    );

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::content::loader::ContentLoader;

    #[test]
    fn test_create_writing() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::with_config(dir.path(), SiteConfig::default());

        let path = create_writing(&folio, "Designing: the Small Things", None).unwrap();
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("designing-the-small-things.md")
        );

        let writings = ContentLoader::new(&folio).load_writings().unwrap();
        assert_eq!(writings.len(), 1);
        assert_eq!(writings[0].title, "Designing: the Small Things");
        assert!(writings[0].summary.is_empty());
        assert!(crate::helpers::parse_timestamp(&writings[0].published_at).is_some());
    }

    #[test]
    fn test_create_writing_twice_fails() {
        let dir = tempfile::tempdir().unwrap();
        let folio = Folio::with_config(dir.path(), SiteConfig::default());

        create_writing(&folio, "Same", Some("same")).unwrap();
        assert!(create_writing(&folio, "Other title", Some("same")).is_err());
    }
}
