//! Generator module - renders the portfolio into static HTML with Tera templates

use anyhow::{anyhow, Result};
use chrono::Utc;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tera::Context;
use walkdir::WalkDir;

use crate::content::{select_recent, validate_slug, MarkdownRenderer, PostRecord, Writing};
use crate::helpers::{
    date_xml, external_link, full_url_for, html_escape, is_external_url, mark_external_links,
    parse_timestamp, url_for, writing_path,
};
use crate::templates::{
    IdentityData, LinkData, NavWriting, SiteData, TemplateRenderer, WritingData,
};
use crate::Folio;

/// Static site generator using Tera templates
pub struct Generator {
    folio: Folio,
    renderer: TemplateRenderer,
    markdown: MarkdownRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(folio: &Folio) -> Result<Self> {
        let renderer = TemplateRenderer::new(&folio.config)?;

        Ok(Self {
            folio: folio.clone(),
            renderer,
            markdown: MarkdownRenderer::new(),
        })
    }

    /// Generate the entire site
    ///
    /// Slugs and timestamps are validated before anything is written.
    pub fn generate(&self, writings: &[Writing]) -> Result<()> {
        for writing in writings {
            validate_slug(&writing.slug, &writing.source)?;
        }

        // Every writing, newest first; fails on the first malformed publishedAt
        let ordered = select_recent(writings, writings.len())?;
        let context = self.create_base_context()?;

        fs::create_dir_all(&self.folio.public_dir)?;
        self.copy_static_assets()?;

        let home = self.render_home_with(&ordered, &context)?;
        self.write_page(&self.folio.public_dir.join("index.html"), &home)?;
        tracing::info!("Generated homepage");

        self.generate_writing_index(&ordered, &context)?;
        self.generate_writing_pages(writings, &ordered, &context)?;
        self.generate_atom_feed(writings, &ordered)?;
        self.generate_writing_json(&ordered)?;

        Ok(())
    }

    /// Render only the homepage
    pub fn render_home(&self, writings: &[Writing]) -> Result<String> {
        let recent = select_recent(writings, self.folio.config.recent_writings)?;
        let context = self.create_base_context()?;
        self.render_home_with(&recent, &context)
    }

    fn render_home_with(&self, ordered: &[PostRecord], base: &Context) -> Result<String> {
        let limit = self.folio.config.recent_writings.min(ordered.len());
        let mut context = base.clone();
        context.insert("recent_writings", &ordered[..limit]);
        context.insert("current_path", &url_for(&self.folio.config, "/"));
        self.renderer.render("home.html", &context)
    }

    /// Create a base context with the site, identity, about and links data
    fn create_base_context(&self) -> Result<Context> {
        let config = &self.folio.config;

        let site = SiteData {
            title: config.title.clone(),
            description: config.description.clone(),
            language: config.language.clone(),
            url: config.url.clone(),
            root: config.root.clone(),
            feed: url_for(config, "atom.xml"),
            writings: url_for(
                config,
                &format!("{}/", config.writing_dir.trim_matches('/')),
            ),
        };

        let identity = IdentityData {
            name: config.name.clone(),
            tagline: config.tagline.clone(),
            logo: html_escape(&url_for(config, &config.logo)),
            logo_badge: config.logo_badge.clone(),
        };

        let about = config
            .about
            .iter()
            .map(|paragraph| {
                let html = self.markdown.render(paragraph)?;
                Ok(if config.external_link.enable {
                    mark_external_links(&html, &config.url, config.external_link.arrow)
                } else {
                    html
                })
            })
            .collect::<Result<Vec<String>>>()?;

        let links: Vec<LinkData> = config
            .links
            .iter()
            .map(|(name, url)| {
                let html = if config.external_link.enable && is_external_url(url) {
                    external_link(url, name, config.external_link.arrow)
                } else {
                    let href = if url.contains(':') {
                        url.clone()
                    } else {
                        url_for(config, url)
                    };
                    format!(
                        r#"<a href="{}">{}</a>"#,
                        html_escape(&href),
                        html_escape(name)
                    )
                };
                LinkData {
                    name: name.clone(),
                    html,
                }
            })
            .collect();

        let mut context = Context::new();
        context.insert("site", &site);
        context.insert("identity", &identity);
        context.insert("about", &about);
        context.insert("links", &links);
        context.insert("current_year", &Utc::now().format("%Y").to_string());
        Ok(context)
    }

    /// Generate the listing of every writing
    fn generate_writing_index(&self, ordered: &[PostRecord], base: &Context) -> Result<()> {
        let mut context = base.clone();
        context.insert("writings", ordered);
        context.insert("current_path", &self.writing_root());

        let html = self.renderer.render("writings.html", &context)?;
        let output_path = self
            .folio
            .public_dir
            .join(self.folio.config.writing_dir.trim_matches('/'))
            .join("index.html");
        self.write_page(&output_path, &html)?;
        tracing::info!("Generated writing index ({} entries)", ordered.len());

        Ok(())
    }

    /// Generate one page per writing at `/writing/{slug}/`
    fn generate_writing_pages(
        &self,
        writings: &[Writing],
        ordered: &[PostRecord],
        base: &Context,
    ) -> Result<()> {
        let by_slug: HashMap<&str, &Writing> =
            writings.iter().map(|w| (w.slug.as_str(), w)).collect();

        let nav = |record: &PostRecord| NavWriting {
            title: record.title.clone(),
            path: writing_path(&self.folio.config, &record.slug),
        };

        for (i, record) in ordered.iter().enumerate() {
            let writing = by_slug
                .get(record.slug.as_str())
                .ok_or_else(|| anyhow!("Writing '{}' disappeared while generating", record.slug))?;

            let newer = i.checked_sub(1).map(|j| nav(&ordered[j]));
            let older = ordered.get(i + 1).map(|r| nav(r));

            let data = WritingData {
                slug: writing.slug.clone(),
                title: writing.title.clone(),
                summary: writing.summary.clone(),
                published_at: writing.published_at.clone(),
                tags: writing.tags.clone(),
                content: writing.content.clone(),
            };

            let path = writing_path(&self.folio.config, &writing.slug);
            let mut context = base.clone();
            context.insert("writing", &data);
            context.insert("newer", &newer);
            context.insert("older", &older);
            context.insert("current_path", &path);

            let html = self.renderer.render("writing.html", &context)?;

            let output_path = self
                .folio
                .public_dir
                .join(self.folio.config.writing_dir.trim_matches('/'))
                .join(&writing.slug)
                .join("index.html");
            self.write_page(&output_path, &html)?;
            tracing::debug!("Generated writing: {:?}", output_path);
        }

        Ok(())
    }

    /// Generate the Atom feed of every writing
    fn generate_atom_feed(&self, writings: &[Writing], ordered: &[PostRecord]) -> Result<()> {
        let config = &self.folio.config;
        let by_slug: HashMap<&str, &Writing> =
            writings.iter().map(|w| (w.slug.as_str(), w)).collect();

        let updated = ordered
            .first()
            .and_then(|r| parse_timestamp(&r.published_at))
            .unwrap_or_else(Utc::now);

        let mut feed = String::new();
        feed.push_str(r#"<?xml version="1.0" encoding="utf-8"?>"#);
        feed.push('\n');
        feed.push_str(r#"<feed xmlns="http://www.w3.org/2005/Atom">"#);
        feed.push('\n');
        feed.push_str(&format!(
            "  <title>{}</title>\n",
            html_escape(&config.title)
        ));
        feed.push_str(&format!(
            "  <link href=\"{}\" rel=\"self\"/>\n",
            full_url_for(config, "atom.xml")
        ));
        feed.push_str(&format!(
            "  <link href=\"{}\"/>\n",
            full_url_for(config, "/")
        ));
        feed.push_str(&format!("  <updated>{}</updated>\n", date_xml(&updated)));
        feed.push_str(&format!("  <id>{}</id>\n", full_url_for(config, "/")));
        feed.push_str(&format!(
            "  <author><name>{}</name></author>\n",
            html_escape(&config.name)
        ));

        for record in ordered {
            let link = full_url_for(config, &writing_path(config, &record.slug));
            let published = parse_timestamp(&record.published_at).unwrap_or(updated);

            feed.push_str("  <entry>\n");
            feed.push_str(&format!(
                "    <title>{}</title>\n",
                html_escape(&record.title)
            ));
            feed.push_str(&format!("    <link href=\"{}\"/>\n", link));
            feed.push_str(&format!("    <id>{}</id>\n", link));
            feed.push_str(&format!(
                "    <published>{}</published>\n",
                date_xml(&published)
            ));
            feed.push_str(&format!(
                "    <updated>{}</updated>\n",
                date_xml(&published)
            ));
            if !record.summary.is_empty() {
                feed.push_str(&format!(
                    "    <summary>{}</summary>\n",
                    html_escape(&record.summary)
                ));
            }
            if let Some(writing) = by_slug.get(record.slug.as_str()) {
                feed.push_str(&format!(
                    "    <content type=\"html\"><![CDATA[{}]]></content>\n",
                    writing.content.replace("]]>", "]]]]><![CDATA[>")
                ));
            }
            feed.push_str("  </entry>\n");
        }

        feed.push_str("</feed>\n");

        fs::write(self.folio.public_dir.join("atom.xml"), feed)?;
        tracing::info!("Generated atom.xml");

        Ok(())
    }

    /// Generate the JSON projection of every writing
    fn generate_writing_json(&self, ordered: &[PostRecord]) -> Result<()> {
        let json = serde_json::to_string_pretty(ordered)?;
        fs::write(self.folio.public_dir.join("writing.json"), json)?;
        tracing::info!("Generated writing.json");
        Ok(())
    }

    /// Copy the static directory into the public directory
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.folio.static_dir;
        if !static_dir.exists() {
            return Ok(());
        }

        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = self.folio.public_dir.join(relative);

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)?;
        }

        Ok(())
    }

    fn writing_root(&self) -> String {
        let config = &self.folio.config;
        url_for(
            config,
            &format!("{}/", config.writing_dir.trim_matches('/')),
        )
    }

    fn write_page(&self, output_path: &Path, html: &str) -> Result<()> {
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| anyhow!("Failed to create dir {:?}: {}", parent, e))?;
        }
        fs::write(output_path, html)
            .map_err(|e| anyhow!("Failed to write {:?}: {}", output_path, e))?;
        Ok(())
    }
}
