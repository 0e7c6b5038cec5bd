//! Generate static files

use anyhow::Result;
use notify::Watcher;
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::Duration;

use crate::cache::{hash_content, CacheDb};
use crate::content::loader::ContentLoader;
use crate::generator::Generator;
use crate::Folio;

/// Generate the static site, skipping the build when nothing changed
pub fn run(folio: &Folio) -> Result<()> {
    run_with_options(folio, false)
}

/// Generate with force option
pub fn run_with_options(folio: &Folio, force: bool) -> Result<()> {
    let start = std::time::Instant::now();

    let loader = ContentLoader::new(folio);
    let posts = loader.load_posts()?;
    let pages = loader.load_pages()?;

    tracing::info!("Loaded {} posts and {} pages", posts.len(), pages.len());

    let config_hash = hash_content(&serde_yaml::to_string(&folio.config)?);
    let post_hashes: Vec<_> = posts
        .iter()
        .map(|p| (p.source.clone(), hash_content(&p.raw)))
        .collect();
    let page_hashes: Vec<_> = pages
        .iter()
        .map(|p| (p.source.clone(), hash_content(&p.raw)))
        .collect();

    let cache = CacheDb::load(&folio.base_dir);
    if !force && !cache.is_stale(config_hash, &post_hashes, &page_hashes) {
        tracing::info!(
            "No changes detected, skipping generation ({:.2}s)",
            start.elapsed().as_secs_f64()
        );
        return Ok(());
    }

    let generator = Generator::new(folio)?;
    generator.generate(&posts, &pages)?;

    CacheDb::snapshot(config_hash, &post_hashes, &page_hashes).save(&folio.base_dir)?;

    tracing::info!("Generated in {:.2}s", start.elapsed().as_secs_f64());

    Ok(())
}

/// Watch for file changes and regenerate
pub async fn watch(folio: &Folio) -> Result<()> {
    let (tx, rx) = channel();

    let mut watcher = notify::recommended_watcher(move |res| {
        if let Ok(event) = res {
            let _ = tx.send(event);
        }
    })?;

    watcher.watch(folio.source_dir.as_ref(), notify::RecursiveMode::Recursive)?;

    let config_path = folio.base_dir.join("config.yml");
    if config_path.exists() {
        watcher.watch(Path::new(&config_path), notify::RecursiveMode::NonRecursive)?;
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    // Debounce events
    let mut last_rebuild = std::time::Instant::now();

    loop {
        match rx.recv_timeout(Duration::from_millis(100)) {
            Ok(_event) => {
                if last_rebuild.elapsed() > Duration::from_millis(500) {
                    tracing::info!("File changed, regenerating...");
                    if let Err(e) = run(folio) {
                        tracing::error!("Generation failed: {}", e);
                    }
                    last_rebuild = std::time::Instant::now();
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                // Continue waiting
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    Ok(())
}
