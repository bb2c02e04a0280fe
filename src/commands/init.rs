//! Initialize a new portfolio site

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::CONFIG_FILE;

const DEFAULT_CONFIG: &str = r#"# Site
title: Portfolio
description: ''
language: en

# Identity
name: John Doe
tagline: Design, Engineer
logo: /images/logo.png
logo_badge: ✨

# About me, one markdown paragraph per entry
about:
  - Passionate about crafting seamless, polished interfaces where design meets engineering.
  - Working on multiple projects and apps; formerly at [Moon](http://example.com/).
  - Check out my [highlights and projects](/work) if you want to learn more about me.

# Links block, shown in this order
links:
  GitHub: https://github.com/
  Email: mailto:hello@example.com

external_link:
  enable: true
  arrow: true

# URL
url: http://example.com
root: /

# Directory
content_dir: content
static_dir: static
public_dir: public
writing_dir: writing

# Writing
recent_writings: 3
render_drafts: false

# Date / Time
date_format: MMM DD, YYYY
timezone: ''
"#;

/// Initialize a new site in the given directory
pub fn init_site(target_dir: &Path) -> Result<()> {
    let config_path = target_dir.join(CONFIG_FILE);
    if config_path.exists() {
        anyhow::bail!("Site already initialized: {:?}", config_path);
    }

    fs::create_dir_all(target_dir.join("content/writing"))?;
    fs::create_dir_all(target_dir.join("static/images"))?;

    fs::write(&config_path, DEFAULT_CONFIG)?;

    let now = chrono::Utc::now();
    let sample = format!(
        r#"---
title: Hello World
summary: The first entry in the writing collection.
publishedAt: {}
---

Welcome! Writings live in `content/writing/` as markdown files with a
`title`, a `summary` and a `publishedAt` date in their front-matter.

The three most recent ones are listed on the homepage.
"#,
        now.format("%Y-%m-%d")
    );
    fs::write(target_dir.join("content/writing/hello-world.md"), sample)?;

    tracing::debug!("Created site skeleton in {:?}", target_dir);

    Ok(())
}
