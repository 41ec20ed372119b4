//! Project showcase model and catalog

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use super::error::{ContentError, Result};

/// Where a documentation section's text comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "RawSectionSource")]
pub enum SectionSource {
    /// Markdown or HTML embedded in the catalog
    Inline(String),
    /// Path fetched at display time, relative to the docs base URL
    Remote(String),
}

/// Catalog form of a section: exactly one of `inline` or `remote`
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSectionSource {
    inline: Option<String>,
    remote: Option<String>,
}

impl TryFrom<RawSectionSource> for SectionSource {
    type Error = String;

    fn try_from(raw: RawSectionSource) -> core::result::Result<Self, Self::Error> {
        match (raw.inline, raw.remote) {
            (Some(text), None) => Ok(SectionSource::Inline(text)),
            (None, Some(path)) => Ok(SectionSource::Remote(path)),
            (Some(_), Some(_)) => Err("section has both `inline` and `remote`".to_string()),
            (None, None) => Err("section needs `inline` or `remote`".to_string()),
        }
    }
}

/// The four documentation tabs of a project page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Readme,
    Demo,
    Architecture,
    Challenges,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Readme,
        Section::Demo,
        Section::Architecture,
        Section::Challenges,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Readme => "readme",
            Section::Demo => "demo",
            Section::Architecture => "architecture",
            Section::Challenges => "challenges",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown section: {0}")]
pub struct UnknownSection(String);

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        Section::ALL
            .into_iter()
            .find(|section| section.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownSection(s.to_string()))
    }
}

/// Documentation bundle; any subset may be present
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub readme: Option<SectionSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demo: Option<SectionSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub architecture: Option<SectionSource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenges: Option<SectionSource>,
}

impl ProjectContent {
    pub fn get(&self, section: Section) -> Option<&SectionSource> {
        match section {
            Section::Readme => self.readme.as_ref(),
            Section::Demo => self.demo.as_ref(),
            Section::Architecture => self.architecture.as_ref(),
            Section::Challenges => self.challenges.as_ref(),
        }
    }

    /// Sections that have content, in tab order
    pub fn available(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|s| self.get(*s).is_some())
            .collect()
    }
}

/// A showcase project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub slug: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub content: ProjectContent,
}

impl Project {
    /// Site-relative URL of the project page
    pub fn path(&self) -> String {
        format!("/projects/{}", self.slug)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    projects: Vec<Project>,
}

/// The static list of showcase projects, in catalog order
#[derive(Debug, Clone, Default)]
pub struct ProjectCatalog {
    projects: Vec<Project>,
}

impl ProjectCatalog {
    /// Build a catalog, rejecting duplicate slugs
    pub fn new(projects: Vec<Project>) -> Result<Self> {
        {
            let mut seen = HashSet::new();
            for project in &projects {
                if !seen.insert(project.slug.as_str()) {
                    return Err(ContentError::DuplicateProject(project.slug.clone()));
                }
            }
        }
        Ok(Self { projects })
    }

    /// Load the catalog from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ContentError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let file: CatalogFile =
            serde_yaml::from_str(&content).map_err(|source| ContentError::Catalog {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!("Loaded {} projects from {:?}", file.projects.len(), path);
        Self::new(file.projects)
    }

    pub fn get(&self, slug: &str) -> Result<&Project> {
        self.projects
            .iter()
            .find(|p| p.slug == slug)
            .ok_or_else(|| ContentError::project_not_found(slug))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Project> {
        self.projects.iter()
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r##"
projects:
  - slug: folio
    name: Folio
    description: This site
    tags: [rust, web]
    repository: https://github.com/example/folio
    content:
      readme:
        inline: "# Folio\n\nHello."
      architecture:
        remote: /docs/folio/architecture.md
  - slug: heatmap
    name: Heatmap
"##;

    #[test]
    fn test_parse_catalog() {
        let file: CatalogFile = serde_yaml::from_str(CATALOG).unwrap();
        let catalog = ProjectCatalog::new(file.projects).unwrap();
        assert_eq!(catalog.len(), 2);

        let folio = catalog.get("folio").unwrap();
        assert_eq!(folio.tags, vec!["rust", "web"]);
        assert_eq!(
            folio.content.readme,
            Some(SectionSource::Inline("# Folio\n\nHello.".to_string()))
        );
        assert_eq!(
            folio.content.get(Section::Architecture),
            Some(&SectionSource::Remote("/docs/folio/architecture.md".to_string()))
        );
        assert_eq!(
            folio.content.available(),
            vec![Section::Readme, Section::Architecture]
        );

        let heatmap = catalog.get("heatmap").unwrap();
        assert!(heatmap.content.available().is_empty());
        assert!(heatmap.repository.is_none());
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let project = Project {
            slug: "dup".to_string(),
            name: "Dup".to_string(),
            description: String::new(),
            tags: Vec::new(),
            repository: None,
            content: ProjectContent::default(),
        };
        let err = ProjectCatalog::new(vec![project.clone(), project]).unwrap_err();
        assert!(matches!(err, ContentError::DuplicateProject(slug) if slug == "dup"));
    }

    #[test]
    fn test_section_needs_one_source() {
        let both = "inline: a\nremote: /b.md\n";
        assert!(serde_yaml::from_str::<SectionSource>(both).is_err());
        assert!(serde_yaml::from_str::<SectionSource>("{}").is_err());
    }

    #[test]
    fn test_unknown_project() {
        let catalog = ProjectCatalog::default();
        assert!(catalog.get("nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_section_from_str() {
        assert_eq!("readme".parse::<Section>(), Ok(Section::Readme));
        assert_eq!("Challenges".parse::<Section>(), Ok(Section::Challenges));
        assert!("changelog".parse::<Section>().is_err());
    }
}
