//! Generator module - writes the site's data documents and fragments
//!
//! Output layout under the public directory:
//!
//! ```text
//! api/posts.json              listing, newest first
//! api/posts/<slug>.json       one post, body rendered
//! api/projects.json           showcase grid
//! api/projects/<slug>.json    one project, inline sections rendered
//! blog/<slug>.html            rendered post body fragment
//! site.json                   title, author and profile links
//! search.json                 command-palette index
//! contributions.json          heatmap data
//! contributions.html          heatmap fragment
//! ```

mod data;

pub use data::{
    NavPost, PostPage, PostSummary, ProjectPage, ProjectSummary, SectionEntry, SiteMeta,
};

use anyhow::Result;
use serde::Serialize;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::content::{ContentLoader, MarkdownRenderer, Post, ProjectCatalog};
use crate::contributions::{ContributionGraph, GraphData};
use crate::search::{SearchIndex, ROUTES};
use crate::Folio;

/// Static output generator
pub struct Generator {
    folio: Folio,
    renderer: MarkdownRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(folio: &Folio) -> Self {
        Self {
            folio: folio.clone(),
            renderer: folio.renderer(),
        }
    }

    /// Generate the entire site from a date-sorted post listing
    pub fn generate(
        &self,
        loader: &ContentLoader,
        posts: &[Post],
        projects: &ProjectCatalog,
        graph: &ContributionGraph,
    ) -> Result<()> {
        fs::create_dir_all(&self.folio.public_dir)?;

        self.copy_static_assets()?;
        self.write_json("site.json", &SiteMeta::new(&self.folio.config))?;
        self.generate_post_pages(loader, posts)?;
        self.generate_project_pages(projects)?;
        self.generate_search_index(projects, posts)?;
        self.generate_contributions(graph)?;

        Ok(())
    }

    /// Listing plus one document and one fragment per post
    fn generate_post_pages(&self, loader: &ContentLoader, posts: &[Post]) -> Result<()> {
        let config = &self.folio.config;

        let listing: Vec<_> = posts.iter().map(|p| PostSummary::new(config, p)).collect();
        self.write_json("api/posts.json", &listing)?;

        for summary in posts {
            // Listings carry no bodies; load the full post now
            let post = loader.get_post(&summary.slug)?;
            let page = PostPage::new(config, &self.renderer, &post, posts);

            self.write_file(&format!("blog/{}.html", post.slug), &page.html)?;
            self.write_json(&format!("api/posts/{}.json", post.slug), &page)?;
            tracing::debug!("Generated post {}", post.slug);
        }

        tracing::info!("Generated {} posts", posts.len());
        Ok(())
    }

    fn generate_project_pages(&self, projects: &ProjectCatalog) -> Result<()> {
        let config = &self.folio.config;

        let grid: Vec<_> = projects
            .iter()
            .map(|p| ProjectSummary::new(config, p))
            .collect();
        self.write_json("api/projects.json", &grid)?;

        for project in projects.iter() {
            let page = ProjectPage::new(config, &self.renderer, project);
            self.write_json(&format!("api/projects/{}.json", project.slug), &page)?;
        }

        tracing::info!("Generated {} projects", projects.len());
        Ok(())
    }

    /// Generate search index (JSON)
    fn generate_search_index(&self, projects: &ProjectCatalog, posts: &[Post]) -> Result<()> {
        let index = SearchIndex::build(ROUTES, projects.iter(), posts);
        self.write_json("search.json", index.entries())?;
        tracing::info!("Generated search.json ({} entries)", index.entries().len());
        Ok(())
    }

    fn generate_contributions(&self, graph: &ContributionGraph) -> Result<()> {
        self.write_json("contributions.json", &GraphData::from(graph))?;
        self.write_file("contributions.html", &graph.render_html())?;
        tracing::info!("Generated contribution graph ending {}", graph.end());
        Ok(())
    }

    fn write_json<T: Serialize + ?Sized>(&self, relative: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        self.write_file(relative, &json)
    }

    fn write_file(&self, relative: &str, content: &str) -> Result<()> {
        let output_path = self.folio.public_dir.join(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, content)?;
        Ok(())
    }

    /// Copy static assets (images, documentation files) to public directory
    fn copy_static_assets(&self) -> Result<()> {
        let static_dir = &self.folio.static_dir;
        if !static_dir.exists() {
            return Ok(());
        }

        let mut copied = 0;
        for entry in WalkDir::new(static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(static_dir)?;
            let dest = self.folio.public_dir.join(relative);
            copy_file(path, &dest)?;
            copied += 1;
        }

        tracing::debug!("Copied {} static files", copied);
        Ok(())
    }
}

fn copy_file(from: &Path, to: &Path) -> Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(from, to)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn site() -> (TempDir, Folio) {
        let dir = TempDir::new().unwrap();
        let base = dir.path();
        fs::create_dir_all(base.join("content/posts")).unwrap();
        fs::create_dir_all(base.join("static/docs")).unwrap();
        fs::write(
            base.join("content/posts/first.md"),
            "---\ntitle: First\ndate: 2024-01-01\n---\nOld **news**",
        )
        .unwrap();
        fs::write(
            base.join("content/posts/second.md"),
            "---\ntitle: Second\ndate: 2024-05-15\ncategories: [rust]\n---\nFresh",
        )
        .unwrap();
        fs::write(base.join("content/posts/._first.md"), "\0\0").unwrap();
        fs::write(base.join("static/docs/readme.md"), "# Docs").unwrap();
        fs::write(
            base.join("projects.yml"),
            "projects:\n  - slug: folio\n    name: Folio\n    content:\n      readme:\n        remote: /docs/readme.md\n",
        )
        .unwrap();
        fs::write(
            base.join("_config.yml"),
            "title: Jane\ngithub_username: jane\nhighlight:\n  enable: false\n",
        )
        .unwrap();

        let folio = Folio::new(base).unwrap();
        (dir, folio)
    }

    #[test]
    fn test_generate_outputs() {
        let (_dir, folio) = site();
        let loader = folio.loader();
        let posts = loader.list_posts().unwrap();
        let projects = folio.projects().unwrap();
        let graph = ContributionGraph::from_days(
            Vec::new(),
            NaiveDate::from_ymd_opt(2024, 5, 15).unwrap(),
        );

        Generator::new(&folio)
            .generate(&loader, &posts, &projects, &graph)
            .unwrap();

        let public = &folio.public_dir;
        let listing: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(public.join("api/posts.json")).unwrap())
                .unwrap();
        assert_eq!(listing[0]["slug"], "second");
        assert_eq!(listing[1]["slug"], "first");
        assert_eq!(listing.as_array().unwrap().len(), 2);
        assert!(listing[0].get("body").is_none());

        let fragment = fs::read_to_string(public.join("blog/first.html")).unwrap();
        assert!(fragment.contains("<strong>news</strong>"));

        let project: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(public.join("api/projects/folio.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(project["content"]["readme"]["kind"], "remote");
        assert_eq!(project["content"]["demo"]["kind"], "empty");

        let search: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(public.join("search.json")).unwrap())
                .unwrap();
        assert!(search
            .as_array()
            .unwrap()
            .iter()
            .any(|e| e["href"] == "/blog/second"));

        assert!(public.join("docs/readme.md").exists());
        assert!(public.join("contributions.html").exists());

        let site: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(public.join("site.json")).unwrap()).unwrap();
        assert_eq!(site["title"], "Jane");
        assert_eq!(site["github"], "https://github.com/jane");
    }
}
