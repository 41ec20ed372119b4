//! Content module - posts, projects, and Markdown rendering

mod error;
mod frontmatter;
mod loader;
mod markdown;
mod post;
mod project;
mod section;

pub use error::{ContentError, Result};
pub use frontmatter::{parse_date_string, FrontMatter};
pub use loader::ContentLoader;
pub(crate) use markdown::html_escape;
pub use markdown::{MarkdownRenderer, RenderOptions};
pub use post::Post;
pub use project::{Project, ProjectCatalog, ProjectContent, Section, SectionSource, UnknownSection};
pub use section::{
    DocFetcher, FetchError, HttpFetcher, SectionResolver, SectionState, SectionTabs, Ticket,
};
