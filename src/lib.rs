//! folio-rs: the content pipeline behind a personal portfolio site
//!
//! This crate loads Markdown posts and a static project catalog, renders
//! them to HTML, indexes them for command-palette navigation, and models the
//! activity heatmap shown on the profile page.

pub mod commands;
pub mod config;
pub mod contact;
pub mod content;
pub mod contributions;
pub mod generator;
pub mod helpers;
pub mod search;
pub mod server;

use anyhow::Result;
use std::path::Path;

use content::{ContentLoader, MarkdownRenderer, ProjectCatalog};
use contributions::ContributionGraph;

/// The main Folio application
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Directory holding one Markdown file per post
    pub posts_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
    /// Static assets copied verbatim into the output
    pub static_dir: std::path::PathBuf,
    /// Project catalog file
    pub projects_file: std::path::PathBuf,
}

impl Folio {
    /// Create a new Folio instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let posts_dir = base_dir.join(&config.posts_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let static_dir = base_dir.join(&config.static_dir);
        let projects_file = base_dir.join(&config.projects_file);

        Ok(Self {
            config,
            base_dir,
            posts_dir,
            public_dir,
            static_dir,
            projects_file,
        })
    }

    /// Content loader over this site's posts directory
    pub fn loader(&self) -> ContentLoader {
        ContentLoader::new(&self.posts_dir)
    }

    /// Markdown renderer configured from the site's highlight settings
    pub fn renderer(&self) -> MarkdownRenderer {
        MarkdownRenderer::from_config(&self.config.highlight)
    }

    /// Load the project catalog. A missing catalog file is an empty catalog.
    pub fn projects(&self) -> Result<ProjectCatalog> {
        if !self.projects_file.exists() {
            tracing::debug!("No project catalog at {:?}", self.projects_file);
            return Ok(ProjectCatalog::default());
        }
        Ok(ProjectCatalog::load(&self.projects_file)?)
    }

    /// The configured contribution export, if one is set and loads
    pub fn configured_contributions(&self) -> Option<ContributionGraph> {
        let file = self.config.contributions_file.as_ref()?;
        match ContributionGraph::load(self.base_dir.join(file)) {
            Ok(graph) => Some(graph),
            Err(e) => {
                tracing::warn!("Using random contribution graph: {:#}", e);
                None
            }
        }
    }

    /// The activity graph: the configured export when it loads, otherwise a
    /// freshly generated decorative one
    pub fn contributions(&self) -> ContributionGraph {
        self.configured_contributions().unwrap_or_else(|| {
            ContributionGraph::random(chrono::Local::now().date_naive(), &mut rand::thread_rng())
        })
    }

    /// Generate the static site
    pub fn generate(&self) -> Result<()> {
        commands::generate::run(self)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
