//! Error types for document reading.

use std::path::PathBuf;

/// Error while discovering or reading local document folders.
#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    /// Documents root does not exist or is not a directory.
    #[error("documents root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// I/O error with the path that caused it.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// File or directory being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Frontmatter or labels file is not valid YAML.
    #[error("invalid YAML in {}: {source}", path.display())]
    Frontmatter {
        /// File containing the YAML.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: serde_yaml::Error,
    },

    /// Folder path is not known to the source.
    #[error("unknown folder: {0}")]
    UnknownFolder(String),
}

impl DocsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
