//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::config::SiteConfig;

/// Characters escaped inside a single path segment
const SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Generate a URL with the root path
///
/// # Examples
/// ```ignore
/// url_for(&config, "/images/logo.png") // -> "/portfolio/images/logo.png"
/// ```
pub fn url_for(config: &SiteConfig, path: &str) -> String {
    if is_external_url(path) {
        return path.to_string();
    }

    let root = config.root.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", root)
    } else {
        format!("{}/{}", root, path)
    }
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/writing/") // -> "https://example.com/writing/"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    if is_external_url(path) {
        return path.to_string();
    }
    format!(
        "{}{}",
        config.url.trim_end_matches('/'),
        url_for(config, path)
    )
}

/// Route of a single writing: `/writing/{slug}/`
pub fn writing_path(config: &SiteConfig, slug: &str) -> String {
    url_for(
        config,
        &format!(
            "{}/{}/",
            config.writing_dir.trim_matches('/'),
            encode_segment(slug)
        ),
    )
}

/// Percent-encode one URL path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, SEGMENT).to_string()
}

/// Whether a link points off-site (has a scheme or is protocol-relative)
pub fn is_external_url(path: &str) -> bool {
    path.starts_with("http://") || path.starts_with("https://") || path.starts_with("//")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.url = "https://example.com".to_string();
        config.root = "/portfolio/".to_string();
        config
    }

    #[test]
    fn test_url_for() {
        let config = test_config();
        assert_eq!(
            url_for(&config, "/images/logo.png"),
            "/portfolio/images/logo.png"
        );
        assert_eq!(url_for(&config, "work/"), "/portfolio/work/");
        assert_eq!(url_for(&config, ""), "/portfolio/");
        assert_eq!(
            url_for(&config, "https://cdn.example.com/a.png"),
            "https://cdn.example.com/a.png"
        );
    }

    #[test]
    fn test_full_url_for() {
        let config = test_config();
        assert_eq!(
            full_url_for(&config, "/writing/"),
            "https://example.com/portfolio/writing/"
        );
    }

    #[test]
    fn test_writing_path() {
        let config = SiteConfig::default();
        assert_eq!(
            writing_path(&config, "hello-world"),
            "/writing/hello-world/"
        );
        assert_eq!(writing_path(&config, "a b/c"), "/writing/a%20b%2Fc/");

        let config = test_config();
        assert_eq!(writing_path(&config, "x"), "/portfolio/writing/x/");
    }
}
