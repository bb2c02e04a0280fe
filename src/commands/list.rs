//! List writings

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::content::{select_recent, PostRecord};
use crate::helpers::date_label;
use crate::Folio;

/// Records shown by `list`: the homepage selection, or everything
pub fn records(folio: &Folio, all: bool) -> Result<Vec<PostRecord>> {
    let writings = ContentLoader::new(folio).load_writings()?;
    let limit = if all {
        writings.len()
    } else {
        folio.config.recent_writings
    };
    Ok(select_recent(&writings, limit)?)
}

/// List writings as text or JSON
pub fn run(folio: &Folio, all: bool, json: bool) -> Result<()> {
    let records = records(folio, all)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    let heading = if all { "Writing" } else { "Recent writing" };
    println!("{} ({}):", heading, records.len());
    for record in &records {
        let label = date_label(
            &record.published_at,
            &folio.config.date_format,
            &folio.config.timezone,
        )
        .unwrap_or_else(|| record.published_at.clone());
        println!("  {} - {} [{}]", label, record.title, record.slug);
    }

    Ok(())
}
