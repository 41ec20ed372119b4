//! JSON documents written by the generator and served by the server

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::SiteConfig;
use crate::content::{MarkdownRenderer, Post, Project, RenderOptions, Section, SectionSource};
use crate::helpers::{full_date, full_url_for, url_for};

/// Site-wide metadata for page headers and the profile card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteMeta {
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,
    pub github: Option<String>,
}

impl SiteMeta {
    pub fn new(config: &SiteConfig) -> Self {
        let username = config.github_username.trim();
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
            url: full_url_for(config, "/"),
            github: (!username.is_empty()).then(|| format!("https://github.com/{}", username)),
        }
    }
}

/// A post as it appears in listings
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub slug: String,
    pub title: String,
    pub date: NaiveDate,
    pub display_date: String,
    pub summary: String,
    pub image: Option<String>,
    pub categories: Vec<String>,
    pub url: String,
}

impl PostSummary {
    pub fn new(config: &SiteConfig, post: &Post) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.title.clone(),
            date: post.date,
            display_date: full_date(&post.date),
            summary: post.summary.clone(),
            image: post.image.clone(),
            categories: post.categories.clone(),
            url: url_for(config, &post.path()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NavPost {
    pub title: String,
    pub url: String,
}

/// A single post page, body rendered
#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    #[serde(flatten)]
    pub summary: PostSummary,
    pub permalink: String,
    pub html: String,
    pub reading_time: usize,
    pub newer: Option<NavPost>,
    pub older: Option<NavPost>,
}

impl PostPage {
    /// Render a fully loaded post. `listing` is the date-sorted post list used
    /// for newer/older links.
    pub fn new(
        config: &SiteConfig,
        renderer: &MarkdownRenderer,
        post: &Post,
        listing: &[Post],
    ) -> Self {
        let opts = RenderOptions {
            allow_raw_html: config.allow_raw_html,
        };
        let nav = |p: &Post| NavPost {
            title: p.title.clone(),
            url: url_for(config, &p.path()),
        };

        Self {
            summary: PostSummary::new(config, post),
            permalink: full_url_for(config, &post.path()),
            html: renderer.render(post.body.as_deref().unwrap_or_default(), opts),
            reading_time: post.reading_time(),
            newer: post.prev(listing).map(nav),
            older: post.next(listing).map(nav),
        }
    }
}

/// A project as it appears in the showcase grid
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub tags: Vec<String>,
    pub repository: Option<String>,
    pub url: String,
    pub sections: Vec<Section>,
}

impl ProjectSummary {
    pub fn new(config: &SiteConfig, project: &Project) -> Self {
        Self {
            slug: project.slug.clone(),
            name: project.name.clone(),
            description: project.description.clone(),
            tags: project.tags.clone(),
            repository: project.repository.clone(),
            url: url_for(config, &project.path()),
            sections: project.content.available(),
        }
    }
}

/// Build-time view of a documentation section. Remote sections are left for
/// the client to fetch when the tab is opened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SectionEntry {
    Inline { html: String },
    Remote { path: String },
    Empty,
}

/// A project page with its documentation tabs
#[derive(Debug, Clone, Serialize)]
pub struct ProjectPage {
    #[serde(flatten)]
    pub summary: ProjectSummary,
    pub content: BTreeMap<&'static str, SectionEntry>,
}

impl ProjectPage {
    pub fn new(config: &SiteConfig, renderer: &MarkdownRenderer, project: &Project) -> Self {
        let content = Section::ALL
            .into_iter()
            .map(|section| {
                let entry = match project.content.get(section) {
                    Some(SectionSource::Inline(text)) => SectionEntry::Inline {
                        html: renderer.render(text, RenderOptions::trusted()),
                    },
                    Some(SectionSource::Remote(path)) => SectionEntry::Remote { path: path.clone() },
                    None => SectionEntry::Empty,
                };
                (section.as_str(), entry)
            })
            .collect();

        Self {
            summary: ProjectSummary::new(config, project),
            content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HighlightConfig;
    use crate::content::ProjectContent;

    fn renderer() -> MarkdownRenderer {
        MarkdownRenderer::from_config(&HighlightConfig {
            enable: false,
            ..Default::default()
        })
    }

    #[test]
    fn test_post_page() {
        let config = SiteConfig {
            url: "https://me.dev".to_string(),
            allow_raw_html: false,
            ..Default::default()
        };
        let date = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let mut post = Post::new("hello", "Hello", date);
        post.body = Some("**hi** <script>x</script>".to_string());
        let listing = vec![
            Post::new("newest", "Newest", date),
            Post::new("hello", "Hello", date),
        ];

        let page = PostPage::new(&config, &renderer(), &post, &listing);
        assert_eq!(page.permalink, "https://me.dev/blog/hello");
        assert!(page.html.contains("<strong>hi</strong>"));
        assert!(!page.html.contains("<script>"));
        assert_eq!(page.newer.as_ref().map(|n| n.url.as_str()), Some("/blog/newest"));
        assert!(page.older.is_none());

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["slug"], "hello");
        assert_eq!(json["display_date"], "May 15, 2024");
    }

    #[test]
    fn test_site_meta() {
        let mut config = SiteConfig {
            title: "Jane Doe".to_string(),
            url: "https://jane.dev".to_string(),
            github_username: " janedoe ".to_string(),
            ..Default::default()
        };
        let meta = SiteMeta::new(&config);
        assert_eq!(meta.title, "Jane Doe");
        assert_eq!(meta.url, "https://jane.dev/");
        assert_eq!(meta.github.as_deref(), Some("https://github.com/janedoe"));

        config.github_username.clear();
        assert!(SiteMeta::new(&config).github.is_none());
    }

    #[test]
    fn test_project_page_sections() {
        let project = Project {
            slug: "folio".to_string(),
            name: "Folio".to_string(),
            description: String::new(),
            tags: Vec::new(),
            repository: None,
            content: ProjectContent {
                readme: Some(SectionSource::Inline("# Folio".to_string())),
                demo: Some(SectionSource::Remote("/docs/demo.md".to_string())),
                ..Default::default()
            },
        };
        let page = ProjectPage::new(&SiteConfig::default(), &renderer(), &project);

        assert_eq!(
            page.content["readme"],
            SectionEntry::Inline {
                html: "<h1>Folio</h1>\n".to_string()
            }
        );
        assert_eq!(
            page.content["demo"],
            SectionEntry::Remote {
                path: "/docs/demo.md".to_string()
            }
        );
        assert_eq!(page.content["architecture"], SectionEntry::Empty);
        assert_eq!(page.summary.sections, vec![Section::Readme, Section::Demo]);
    }
}
