//! Front-matter parsing
//!
//! Front-matter is free-form author input. Every field here is optional and
//! shape-tolerant: a value of the wrong type degrades to "absent" instead of
//! failing the whole block.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

/// Accept any scalar and keep it as a string. Anything else is treated as absent.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_to_string(&value))
}

/// Accept a list of labels or a single label. Non-string items are dropped,
/// other shapes (maps, null) become an empty list.
fn lenient_labels<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(labels_from_value(&value))
}

fn scalar_to_string(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

fn labels_from_value(value: &Value) -> Vec<String> {
    match value {
        Value::Sequence(items) => items
            .iter()
            .filter(|item| !matches!(item, Value::Sequence(_) | Value::Mapping(_)))
            .filter_map(scalar_to_string)
            .collect(),
        Value::String(_) => scalar_to_string(value).into_iter().collect(),
        _ => Vec::new(),
    }
}

/// Front-matter data from a post
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub summary: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub image: Option<String>,
    #[serde(deserialize_with = "lenient_labels")]
    pub categories: Vec<String>,
}

impl FrontMatter {
    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> (Self, &str) {
        let trimmed = content.trim_start();

        if !trimmed.starts_with("---") {
            return (FrontMatter::default(), content);
        }

        // Skip opening ---
        let rest = trimmed[3..].trim_start_matches([' ', '\t']);
        let rest = rest.strip_prefix("\r\n").or_else(|| rest.strip_prefix('\n'));
        let Some(rest) = rest else {
            // "---something" is not a front-matter fence
            return (FrontMatter::default(), content);
        };

        let Some(end_pos) = find_closing_fence(rest) else {
            return (FrontMatter::default(), content);
        };

        let yaml_content = &rest[..end_pos];
        let remaining = rest[end_pos..]
            .trim_start_matches(['\n', '\r'])
            .strip_prefix("---")
            .unwrap_or_default()
            .trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return (FrontMatter::default(), remaining);
        }

        match serde_yaml::from_str::<FrontMatter>(yaml_content) {
            Ok(fm) => (fm, remaining),
            Err(e) => {
                tracing::warn!("Failed to parse YAML front-matter, ignoring it: {}", e);
                (FrontMatter::default(), remaining)
            }
        }
    }

    /// Parse the date string into a calendar date
    pub fn parse_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_date_string)
    }
}

/// Byte offset of the line holding the closing `---`
fn find_closing_fence(rest: &str) -> Option<usize> {
    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some(offset);
        }
        offset += line.len();
    }
    None
}

/// Parse a date string in the formats authors actually write
pub fn parse_date_string(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    for fmt in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15
summary: First post
image: /images/hello.png
categories:
  - rust
  - web
---

This is the content.
"#;

        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.title.as_deref(), Some("Hello World"));
        assert_eq!(fm.summary.as_deref(), Some("First post"));
        assert_eq!(fm.image.as_deref(), Some("/images/hello.png"));
        assert_eq!(fm.categories, vec!["rust", "web"]);
        assert_eq!(
            fm.parse_date(),
            NaiveDate::from_ymd_opt(2024, 1, 15)
        );
        assert!(remaining.starts_with("This is the content."));
    }

    #[test]
    fn test_missing_categories_is_empty() {
        let content = "---\ntitle: No Labels\ndate: 2024-02-01\n---\nBody";
        let (fm, _) = FrontMatter::parse(content);
        assert!(fm.categories.is_empty());
    }

    #[test]
    fn test_malformed_categories() {
        let (fm, _) = FrontMatter::parse("---\ntitle: A\ncategories: Notes\n---\n");
        assert_eq!(fm.categories, vec!["Notes"]);

        let (fm, _) = FrontMatter::parse("---\ntitle: A\ncategories:\n  key: value\n---\n");
        assert!(fm.categories.is_empty());

        let (fm, _) = FrontMatter::parse("---\ntitle: A\ncategories:\n---\n");
        assert!(fm.categories.is_empty());

        let (fm, _) = FrontMatter::parse(
            "---\ntitle: A\ncategories:\n  - rust\n  - [nested]\n  - 2024\n---\n",
        );
        assert_eq!(fm.categories, vec!["rust", "2024"]);
        assert_eq!(fm.title.as_deref(), Some("A"));
    }

    #[test]
    fn test_numeric_title_kept_as_string() {
        let (fm, _) = FrontMatter::parse("---\ntitle: 1984\n---\n");
        assert_eq!(fm.title.as_deref(), Some("1984"));
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just markdown\n\nNo metadata here.";
        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_unclosed_frontmatter_is_content() {
        let content = "---\ntitle: Never closed\n\nBody";
        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.title, None);
        assert_eq!(remaining, content);
    }

    #[test]
    fn test_broken_yaml_keeps_body() {
        let content = "---\ntitle: [unterminated\n---\nStill here.";
        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.title, None);
        assert_eq!(remaining, "Still here.");
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 5, 15);
        assert_eq!(parse_date_string("2024-05-15"), expected);
        assert_eq!(parse_date_string("2024/05/15"), expected);
        assert_eq!(parse_date_string("2024-05-15 10:30:00"), expected);
        assert_eq!(parse_date_string("2024-05-15T10:30:00Z"), expected);
        assert_eq!(parse_date_string("May 15th"), None);
    }
}
