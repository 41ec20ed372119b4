//! Project documentation sections: resolution and tab state
//!
//! A section is either inline text from the catalog or a path fetched over
//! HTTP when the tab is shown. Failures stay inside the section that hit them.

use serde::Serialize;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use super::markdown::{MarkdownRenderer, RenderOptions};
use super::project::{Project, Section, SectionSource};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("server answered {0}")]
    Status(u16),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Fetches the text behind a remote documentation path
pub trait DocFetcher {
    fn fetch(&self, path: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Plain-text HTTP GET against the docs base URL
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Absolute URL for a documentation path. Absolute URLs pass through.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl DocFetcher for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let url = self.url_for(path);
        tracing::debug!("Fetching {}", url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

/// Display state of one documentation section
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SectionState {
    /// The project has nothing for this section
    Empty,
    /// Rendered HTML
    Ready { html: String },
    /// The fetch failed; shown inline in place of the content
    Failed { message: String },
}

impl SectionState {
    pub fn is_failed(&self) -> bool {
        matches!(self, SectionState::Failed { .. })
    }
}

/// Turns a project's section sources into display states
pub struct SectionResolver<F> {
    fetcher: F,
    renderer: Arc<MarkdownRenderer>,
}

impl<F: DocFetcher> SectionResolver<F> {
    pub fn new(fetcher: F, renderer: Arc<MarkdownRenderer>) -> Self {
        Self { fetcher, renderer }
    }

    /// Raw text of a source: the inline string, or the fetched document
    pub async fn source_text(&self, source: &SectionSource) -> Result<String, FetchError> {
        match source {
            SectionSource::Inline(text) => Ok(text.clone()),
            SectionSource::Remote(path) => self.fetcher.fetch(path).await,
        }
    }

    /// Resolve one section. Never fails and never retries.
    pub async fn resolve(&self, project: &Project, section: Section) -> SectionState {
        let Some(source) = project.content.get(section) else {
            return SectionState::Empty;
        };

        match self.source_text(source).await {
            Ok(text) => SectionState::Ready {
                // Catalog and docs are author content, embeds allowed
                html: self.renderer.render(&text, RenderOptions::trusted()),
            },
            Err(e) => {
                tracing::warn!(
                    project = %project.slug,
                    section = %section,
                    "Failed to load section: {}",
                    e
                );
                SectionState::Failed {
                    message: format!("Failed to load {}.", section),
                }
            }
        }
    }

    /// Resolve every section independently, in tab order
    pub async fn resolve_all(&self, project: &Project) -> Vec<(Section, SectionState)> {
        let mut states = Vec::with_capacity(Section::ALL.len());
        for section in Section::ALL {
            states.push((section, self.resolve(project, section).await));
        }
        states
    }
}

/// Identifies one section load started by [`SectionTabs::select`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    section: Section,
    generation: u64,
}

impl Ticket {
    pub fn section(&self) -> Section {
        self.section
    }
}

/// Tab state of one project page.
///
/// Owned by the page that shows it and dropped with it. Completed sections
/// are cached; failures are not, so selecting the tab again refetches.
#[derive(Debug)]
pub struct SectionTabs {
    active: Section,
    generation: u64,
    cache: HashMap<Section, SectionState>,
    failed: Option<SectionState>,
}

impl SectionTabs {
    pub fn new() -> Self {
        Self {
            active: Section::Readme,
            generation: 0,
            cache: HashMap::new(),
            failed: None,
        }
    }

    pub fn active(&self) -> Section {
        self.active
    }

    /// Switch to a tab. Returns a ticket if its content still has to be loaded.
    pub fn select(&mut self, section: Section) -> Option<Ticket> {
        self.active = section;
        self.generation += 1;
        self.failed = None;
        if self.cache.contains_key(&section) {
            return None;
        }
        Some(Ticket {
            section,
            generation: self.generation,
        })
    }

    /// Deliver a load result. Returns false and drops the result when the
    /// user has switched tabs since the ticket was issued.
    pub fn complete(&mut self, ticket: Ticket, state: SectionState) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!("Ignoring stale result for {}", ticket.section);
            return false;
        }
        if state.is_failed() {
            self.failed = Some(state);
        } else {
            self.cache.insert(ticket.section, state);
        }
        true
    }

    /// What the active tab shows; `None` while it is loading
    pub fn current(&self) -> Option<&SectionState> {
        self.cache
            .get(&self.active)
            .or_else(|| self.failed.as_ref())
    }
}

impl Default for SectionTabs {
    fn default() -> Self {
        Self::new()
    }
}
