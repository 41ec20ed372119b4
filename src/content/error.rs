//! Content errors

use std::io;
use std::path::PathBuf;

pub type Result<T> = core::result::Result<T, ContentError>;

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    /// The content directory itself cannot be read. Nothing can be served.
    #[error("content directory {path:?} is unreadable: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// No record matches the requested identifier
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid project catalog {path:?}: {source}")]
    Catalog {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("duplicate project slug: {0}")]
    DuplicateProject(String),
}

impl ContentError {
    pub fn post_not_found(id: impl Into<String>) -> Self {
        ContentError::NotFound {
            kind: "post",
            id: id.into(),
        }
    }

    pub fn project_not_found(id: impl Into<String>) -> Self {
        ContentError::NotFound {
            kind: "project",
            id: id.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ContentError::NotFound { .. })
    }
}
