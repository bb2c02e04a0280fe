//! HTML helper functions

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::url::is_external_url;

lazy_static! {
    static ref ANCHOR: Regex =
        Regex::new(r#"<a href="([^"]*)"([^>]*)>(.*?)</a>"#).expect("anchor regex is valid");
}

const ARROW: &str = r#"<span class="arrow" aria-hidden="true">↗</span>"#;

/// Generate an anchor to an off-site page
///
/// # Examples
/// ```ignore
/// external_link("http://example.com/", "Moon", false)
/// // -> <a href="http://example.com/" target="_blank" rel="noopener noreferrer">Moon</a>
/// ```
pub fn external_link(href: &str, text: &str, arrow: bool) -> String {
    format!(
        r#"<a href="{}" class="external" target="_blank" rel="noopener noreferrer">{}{}</a>"#,
        html_escape(href),
        html_escape(text),
        if arrow { ARROW } else { "" }
    )
}

/// Rewrite off-site anchors in rendered HTML to open in a new tab
///
/// Links to `site_url` and relative links are left alone.
pub fn mark_external_links(html: &str, site_url: &str, arrow: bool) -> String {
    let site_url = site_url.trim_end_matches('/');

    ANCHOR
        .replace_all(html, |caps: &Captures| {
            let href = &caps[1];
            let is_own = !site_url.is_empty() && href.starts_with(site_url);
            if !is_external_url(href) || is_own || caps[2].contains("target=") {
                return caps[0].to_string();
            }
            format!(
                r#"<a href="{}"{} class="external" target="_blank" rel="noopener noreferrer">{}{}</a>"#,
                href,
                &caps[2],
                &caps[3],
                if arrow { ARROW } else { "" }
            )
        })
        .into_owned()
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_link() {
        let html = external_link("http://example.com/", "Tools for the Web", true);
        assert!(html.starts_with(r#"<a href="http://example.com/""#));
        assert!(html.contains(r#"target="_blank""#));
        assert!(html.contains("Tools for the Web"));
        assert!(html.contains("↗"));

        let html = external_link("http://example.com/", "Moon", false);
        assert!(!html.contains("↗"));
    }

    #[test]
    fn test_mark_external_links() {
        let html = r#"<p>At <a href="http://example.com/">Moon</a>, see <a href="/work">highlights</a> and <a href="https://me.dev/about">about</a>.</p>"#;
        let marked = mark_external_links(html, "https://me.dev", false);

        assert!(marked.contains(
            r#"<a href="http://example.com/" class="external" target="_blank" rel="noopener noreferrer">Moon</a>"#
        ));
        assert!(marked.contains(r#"<a href="/work">highlights</a>"#));
        assert!(marked.contains(r#"<a href="https://me.dev/about">about</a>"#));
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }
}
