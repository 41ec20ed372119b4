//! List site content

use anyhow::Result;
use std::collections::HashMap;

use crate::search::ROUTES;
use crate::Folio;

/// List site content by type
pub fn run(folio: &Folio, content_type: &str) -> Result<()> {
    match content_type {
        "post" | "posts" => {
            let posts = folio.loader().list_posts()?;
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!(
                    "  {} - {} [{}]",
                    post.date.format("%Y-%m-%d"),
                    post.title,
                    post.slug
                );
            }
        }
        "project" | "projects" => {
            let projects = folio.projects()?;
            println!("Projects ({}):", projects.len());
            for project in projects.iter() {
                let sections: Vec<_> = project
                    .content
                    .available()
                    .iter()
                    .map(|s| s.as_str())
                    .collect();
                println!(
                    "  {} [{}] ({})",
                    project.name,
                    project.slug,
                    sections.join(", ")
                );
            }
        }
        "route" | "routes" => {
            let posts = folio.loader().list_posts()?;
            let projects = folio.projects()?;
            println!(
                "Routes ({}):",
                ROUTES.len() + projects.len() + posts.len()
            );
            for route in ROUTES {
                println!("  {}", route.path);
            }
            for project in projects.iter() {
                println!("  {}", project.path());
            }
            for post in &posts {
                println!("  {}", post.path());
            }
        }
        "category" | "categories" => {
            let posts = folio.loader().list_posts()?;
            let categories = count_categories(&posts);
            println!("Categories ({}):", categories.len());
            for (cat, count) in categories {
                println!("  {} ({})", cat, count);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, project, route, category",
                content_type
            );
        }
    }

    Ok(())
}

/// Category usage, most used first, ties by name
fn count_categories(posts: &[crate::content::Post]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for post in posts {
        for cat in &post.categories {
            *counts.entry(cat.as_str()).or_insert(0) += 1;
        }
    }
    let mut counts: Vec<_> = counts
        .into_iter()
        .map(|(cat, n)| (cat.to_string(), n))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Post;
    use chrono::NaiveDate;

    #[test]
    fn test_count_categories() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let mut a = Post::new("a", "A", date);
        a.categories = vec!["rust".to_string(), "web".to_string()];
        let mut b = Post::new("b", "B", date);
        b.categories = vec!["rust".to_string()];

        assert_eq!(
            count_categories(&[a, b]),
            vec![("rust".to_string(), 2), ("web".to_string(), 1)]
        );
    }

    #[test]
    fn test_unknown_type() {
        let dir = tempfile::TempDir::new().unwrap();
        let folio = Folio::new(dir.path()).unwrap();
        assert!(run(&folio, "tags").is_err());
    }
}
