//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub posts_dir: String,
    pub public_dir: String,
    pub static_dir: String,
    pub projects_file: String,

    // Project documentation
    /// Base URL that `remote` documentation paths are resolved against
    pub docs_base_url: String,

    // Contact
    pub contact_email: String,

    // Activity graph
    /// JSON export of contribution days. When unset or unreadable the
    /// graph falls back to decorative random data.
    pub contributions_file: Option<String>,
    pub github_username: String,

    // Writing
    /// Pass raw HTML in post bodies through to the output (author embeds)
    pub allow_raw_html: bool,
    pub highlight: HighlightConfig,

    // Server
    pub server_ip: String,
    pub server_port: u16,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Portfolio".to_string(),
            description: String::new(),
            author: "John Doe".to_string(),
            language: "en".to_string(),

            url: "http://localhost:4000".to_string(),
            root: "/".to_string(),

            posts_dir: "content/posts".to_string(),
            public_dir: "public".to_string(),
            static_dir: "static".to_string(),
            projects_file: "projects.yml".to_string(),

            docs_base_url: "http://localhost:4000".to_string(),

            contact_email: "hello@example.com".to_string(),

            contributions_file: None,
            github_username: String::new(),

            allow_raw_html: true,
            highlight: HighlightConfig::default(),

            server_ip: "localhost".to_string(),
            server_port: 4000,
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Code block highlighting
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub enable: bool,
    pub theme: String,
    pub line_number: bool,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: true,
            theme: "base16-ocean.dark".to_string(),
            line_number: false,
        }
    }
}
