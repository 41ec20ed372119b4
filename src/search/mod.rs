//! Command-palette search over routes, projects and posts
//!
//! Everything is indexed in memory from already-loaded records. Matching is
//! case-insensitive: prefix beats substring beats in-order subsequence.

mod routes;

pub use routes::{Route, ROUTES};

use serde::Serialize;

use crate::content::{Post, Project};

/// Result group, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Group {
    Pages,
    Projects,
    Posts,
}

impl Group {
    pub fn heading(&self) -> &'static str {
        match self {
            Group::Pages => "Pages",
            Group::Projects => "Projects",
            Group::Posts => "Posts",
        }
    }
}

/// One navigable target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchEntry {
    pub group: Group,
    pub label: String,
    pub href: String,
    #[serde(skip)]
    key: String,
}

impl SearchEntry {
    pub fn new(group: Group, label: impl Into<String>, href: impl Into<String>) -> Self {
        let label = label.into();
        let key = label.to_lowercase();
        Self {
            group,
            label,
            href: href.into(),
            key,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Rank {
    Subsequence,
    Substring,
    Prefix,
}

fn rank(key: &str, query: &str) -> Option<Rank> {
    if key.starts_with(query) {
        Some(Rank::Prefix)
    } else if key.contains(query) {
        Some(Rank::Substring)
    } else {
        let mut chars = key.chars();
        query
            .chars()
            .all(|q| chars.any(|c| c == q))
            .then_some(Rank::Subsequence)
    }
}

/// A group of matches under one heading
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultGroup<'a> {
    pub group: Group,
    pub heading: &'static str,
    pub entries: Vec<&'a SearchEntry>,
}

/// Grouped matches for one query
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults<'a> {
    pub groups: Vec<ResultGroup<'a>>,
}

impl SearchResults<'_> {
    /// Nothing matched; shown as an explicit "no results" state
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.entries.len()).sum()
    }

    pub fn entries(&self) -> impl Iterator<Item = &SearchEntry> {
        self.groups.iter().flat_map(|g| g.entries.iter().copied())
    }
}

/// Search index over every navigation target
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchIndex {
    entries: Vec<SearchEntry>,
}

impl SearchIndex {
    /// Index routes, then projects, then posts
    pub fn build<'a>(
        routes: &[Route],
        projects: impl IntoIterator<Item = &'a Project>,
        posts: impl IntoIterator<Item = &'a Post>,
    ) -> Self {
        let mut entries: Vec<SearchEntry> = routes
            .iter()
            .map(|r| SearchEntry::new(Group::Pages, r.label, r.path))
            .collect();
        entries.extend(
            projects
                .into_iter()
                .map(|p| SearchEntry::new(Group::Projects, &p.name, p.path())),
        );
        entries.extend(
            posts
                .into_iter()
                .map(|p| SearchEntry::new(Group::Posts, &p.title, p.path())),
        );
        Self { entries }
    }

    pub fn entries(&self) -> &[SearchEntry] {
        &self.entries
    }

    /// Filter every label by the typed text and group the survivors
    pub fn query(&self, text: &str) -> SearchResults<'_> {
        let query = text.trim().to_lowercase();

        let mut groups: Vec<ResultGroup> = Vec::new();
        for group in [Group::Pages, Group::Projects, Group::Posts] {
            let mut ranked: Vec<(Rank, &SearchEntry)> = self
                .entries
                .iter()
                .filter(|e| e.group == group)
                .filter_map(|e| {
                    if query.is_empty() {
                        Some((Rank::Prefix, e))
                    } else {
                        rank(&e.key, &query).map(|r| (r, e))
                    }
                })
                .collect();

            if ranked.is_empty() {
                continue;
            }

            // Best rank first; stable so index order breaks ties
            ranked.sort_by(|a, b| b.0.cmp(&a.0));
            groups.push(ResultGroup {
                group,
                heading: group.heading(),
                entries: ranked.into_iter().map(|(_, e)| e).collect(),
            });
        }

        SearchResults { groups }
    }
}
