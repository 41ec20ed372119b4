//! Generate static files

use anyhow::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use std::time::Duration;

use crate::generator::Generator;
use crate::Folio;

/// Generate the site output from the current content
pub fn run(folio: &Folio) -> Result<()> {
    let start = std::time::Instant::now();

    let loader = folio.loader();
    let posts = loader.list_posts()?;
    let projects = folio.projects()?;
    let graph = folio.contributions();

    tracing::info!(
        "Loaded {} posts and {} projects",
        posts.len(),
        projects.len()
    );

    Generator::new(folio).generate(&loader, &posts, &projects, &graph)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

/// Watch the content and regenerate on change until the channel closes
pub async fn watch(folio: &Folio) -> Result<()> {
    let folio = folio.clone();
    tokio::task::spawn_blocking(move || watch_blocking(&folio)).await?
}

fn watch_blocking(folio: &Folio) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    for dir in [&folio.posts_dir, &folio.static_dir] {
        if dir.exists() {
            debouncer.watcher().watch(dir, RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", dir);
        }
    }
    for file in [folio.base_dir.join("_config.yml"), folio.projects_file.clone()] {
        if file.exists() {
            debouncer.watcher().watch(&file, RecursiveMode::NonRecursive)?;
            tracing::debug!("Watching: {:?}", file);
        }
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant: Vec<_> = events
                    .iter()
                    .filter(|e| is_relevant(&e.path.to_string_lossy()))
                    .collect();
                if relevant.is_empty() {
                    continue;
                }

                for event in &relevant {
                    tracing::info!("File changed: {}", event.path.display());
                }
                if let Err(e) = run(folio) {
                    tracing::error!("Generation failed: {:#}", e);
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// Editor swap files and VCS metadata never trigger a rebuild
fn is_relevant(path: &str) -> bool {
    !path.contains(".git")
        && !path.contains(".DS_Store")
        && !path.ends_with('~')
        && !path.ends_with(".swp")
}
