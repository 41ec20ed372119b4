//! Content loader - loads posts from the posts directory

use chrono::{Local, NaiveDate};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::error::{ContentError, Result};
use super::{FrontMatter, Post};

/// File extensions recognised as posts, in lookup priority order
const POST_EXTENSIONS: [&str; 3] = ["md", "markdown", "mdx"];

/// Loads posts from a directory of Markdown files
#[derive(Debug, Clone)]
pub struct ContentLoader {
    posts_dir: PathBuf,
}

impl ContentLoader {
    /// Create a new content loader
    pub fn new(posts_dir: impl Into<PathBuf>) -> Self {
        Self {
            posts_dir: posts_dir.into(),
        }
    }

    pub fn posts_dir(&self) -> &Path {
        &self.posts_dir
    }

    /// Load every post's metadata, newest first.
    ///
    /// Bodies are not kept. Posts sharing a date keep identifier order.
    pub fn list_posts(&self) -> Result<Vec<Post>> {
        // Stem -> the file `get_post` would resolve it to
        let mut sources: BTreeMap<String, PathBuf> = BTreeMap::new();

        for entry in WalkDir::new(&self.posts_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(ContentError::Unreadable {
                        path: self.posts_dir.clone(),
                        source: e
                            .into_io_error()
                            .unwrap_or_else(|| io::Error::other("filesystem loop")),
                    });
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let (Some(stem), Some(rank)) = (post_stem(path), extension_rank(path)) else {
                continue;
            };
            if !is_plain_identifier(stem) {
                tracing::debug!("Skipping {:?}: not a post identifier", path);
                continue;
            }

            if let Some(kept) = sources.get(stem) {
                if extension_rank(kept).is_some_and(|r| r <= rank) {
                    tracing::warn!("Ignoring {:?}: {:?} has the same identifier", path, kept);
                    continue;
                }
                tracing::warn!("Ignoring {:?}: {:?} has the same identifier", kept, path);
            }
            sources.insert(stem.to_string(), path.to_path_buf());
        }

        let mut posts = Vec::with_capacity(sources.len());
        for path in sources.values() {
            match load_post(path, false) {
                Ok(post) => posts.push(post),
                Err(e) => tracing::warn!("Failed to load post {:?}: {}", path, e),
            }
        }

        // Sort by date descending (newest first); sort_by is stable
        posts.sort_by(|a, b| b.date.cmp(&a.date));

        tracing::debug!("Loaded {} posts from {:?}", posts.len(), self.posts_dir);
        Ok(posts)
    }

    /// Load a single post, body included
    pub fn get_post(&self, id: &str) -> Result<Post> {
        if !self.posts_dir.is_dir() {
            return Err(ContentError::Unreadable {
                path: self.posts_dir.clone(),
                source: io::Error::new(io::ErrorKind::NotFound, "not a directory"),
            });
        }

        if !is_plain_identifier(id) {
            return Err(ContentError::post_not_found(id));
        }

        let path = POST_EXTENSIONS
            .iter()
            .map(|ext| self.posts_dir.join(format!("{}.{}", id, ext)))
            .find(|p| p.is_file())
            .ok_or_else(|| ContentError::post_not_found(id))?;

        load_post(&path, true)
    }
}

/// Parse one post file. The body is kept only when `with_body` is set.
fn load_post(path: &Path, with_body: bool) -> Result<Post> {
    let content = fs::read_to_string(path).map_err(|source| ContentError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let (fm, body) = FrontMatter::parse(&content);

    let slug = post_stem(path).unwrap_or("untitled").to_string();

    let date = match fm.parse_date() {
        Some(date) => date,
        None => {
            if let Some(raw) = &fm.date {
                tracing::warn!("Unparseable date {:?} in {:?}, using mtime", raw, path);
            }
            file_modified_date(path)
        }
    };

    let mut post = Post::new(slug.clone(), fm.title.unwrap_or(slug), date);
    post.summary = fm.summary.unwrap_or_default();
    post.image = fm.image;
    post.categories = fm.categories;
    if with_body {
        post.body = Some(body.to_string());
    }

    Ok(post)
}

fn file_modified_date(path: &Path) -> NaiveDate {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map(|t| chrono::DateTime::<Local>::from(t).date_naive())
        .unwrap_or_else(|_| Local::now().date_naive())
}

/// Lookup priority of a post file's extension; `None` for non-posts
fn extension_rank(path: &Path) -> Option<usize> {
    let ext = path.extension().and_then(|e| e.to_str())?;
    POST_EXTENSIONS.iter().position(|candidate| *candidate == ext)
}

fn post_stem(path: &Path) -> Option<&str> {
    path.file_stem().and_then(|s| s.to_str())
}

/// Identifiers are bare file stems; anything that could walk the filesystem is rejected
fn is_plain_identifier(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && !id.contains(['/', '\\', '\0'])
}
