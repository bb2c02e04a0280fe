//! Generate static files

use anyhow::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult};
use std::sync::mpsc::{channel, Receiver};
use std::time::{Duration, Instant};

use crate::content::loader::ContentLoader;
use crate::generator::Generator;
use crate::{Folio, CONFIG_FILE};

/// Generate the static site
pub fn run(folio: &Folio) -> Result<()> {
    let start = Instant::now();

    let loader = ContentLoader::new(folio);
    let writings = loader.load_writings()?;
    tracing::info!("Loaded {} writings", writings.len());

    let generator = Generator::new(folio)?;
    generator.generate(&writings)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

/// Watch for file changes and regenerate
pub async fn watch(folio: &Folio) -> Result<()> {
    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    let folio = folio.clone();
    tokio::task::spawn_blocking(move || {
        watch_site(&folio, || {
            tracing::info!("Change detected, regenerating...");
            if let Err(e) = run(&folio) {
                tracing::error!("Generation failed: {}", e);
            }
        })
    })
    .await??;

    Ok(())
}

/// Block on debounced changes to content, static files and config
///
/// `on_change` runs once per settled batch of events.
pub fn watch_site(folio: &Folio, on_change: impl FnMut()) -> Result<()> {
    let (tx, rx) = channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    let config_path = folio.base_dir.join(CONFIG_FILE);
    let watched = [
        (&folio.content_dir, RecursiveMode::Recursive),
        (&folio.static_dir, RecursiveMode::Recursive),
        (&config_path, RecursiveMode::NonRecursive),
    ];
    for (path, mode) in watched {
        if path.exists() {
            debouncer.watcher().watch(path, mode)?;
            tracing::debug!("Watching: {:?}", path);
        }
    }

    rebuild_on_events(&rx, on_change);

    // Keep the watcher alive for as long as events arrive
    drop(debouncer);
    Ok(())
}

fn rebuild_on_events(rx: &Receiver<DebounceEventResult>, mut on_change: impl FnMut()) {
    while let Ok(result) = rx.recv() {
        match result {
            Ok(events) => {
                let relevant = events.iter().any(|e| {
                    let path_str = e.path.to_string_lossy();
                    !path_str.contains(".git")
                        && !path_str.contains(".DS_Store")
                        && !path_str.ends_with('~')
                });
                if relevant {
                    on_change();
                }
            }
            Err(e) => tracing::error!("Watch error: {:?}", e),
        }
    }
}
