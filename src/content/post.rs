//! Post model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Average adult reading speed used for the "N min read" estimate
const WORDS_PER_MINUTE: usize = 200;

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Identifier, the source file name without its extension
    pub slug: String,

    /// Post title
    pub title: String,

    /// Publication date
    pub date: NaiveDate,

    /// One-line summary for listings
    pub summary: String,

    /// Cover image path or URL
    pub image: Option<String>,

    /// Category labels in author order
    pub categories: Vec<String>,

    /// Raw markdown body. Only loaded for single-post lookups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(slug: impl Into<String>, title: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            date,
            summary: String::new(),
            image: None,
            categories: Vec::new(),
            body: None,
        }
    }

    /// Site-relative URL of the post page
    pub fn path(&self) -> String {
        format!("/blog/{}", self.slug)
    }

    /// Estimated reading time in minutes, never less than one
    pub fn reading_time(&self) -> usize {
        let words = self
            .body
            .as_deref()
            .map(|b| b.split_whitespace().count())
            .unwrap_or(0);
        words.div_ceil(WORDS_PER_MINUTE).max(1)
    }

    /// Get the newer neighbour in a date-descending listing
    pub fn prev<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        if pos > 0 {
            Some(&posts[pos - 1])
        } else {
            None
        }
    }

    /// Get the older neighbour in a date-descending listing
    pub fn next<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.slug == self.slug)?;
        posts.get(pos + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(slug: &str, day: u32) -> Post {
        Post::new(slug, slug, NaiveDate::from_ymd_opt(2024, 1, day).unwrap())
    }

    #[test]
    fn test_reading_time() {
        let mut p = post("a", 1);
        assert_eq!(p.reading_time(), 1);

        p.body = Some("word ".repeat(401));
        assert_eq!(p.reading_time(), 3);
    }

    #[test]
    fn test_neighbours() {
        let posts = vec![post("c", 3), post("b", 2), post("a", 1)];
        let b = &posts[1];
        assert_eq!(b.prev(&posts).map(|p| p.slug.as_str()), Some("c"));
        assert_eq!(b.next(&posts).map(|p| p.slug.as_str()), Some("a"));
        assert!(posts[0].prev(&posts).is_none());
        assert!(posts[2].next(&posts).is_none());
    }

    #[test]
    fn test_listing_omits_body() {
        let p = post("a", 1);
        let json = serde_json::to_value(&p).unwrap();
        assert!(json.get("body").is_none());
        assert_eq!(json["date"], "2024-01-01");
    }
}
