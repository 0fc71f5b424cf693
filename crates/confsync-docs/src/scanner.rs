//! Page folder discovery by filesystem walking.
//!
//! A directory is a page folder when it directly contains the marker file.
//! Directories without the marker are still descended into, so a page can
//! sit below plain grouping directories.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::DocsError;

/// Discovers page folders under a documents root.
pub(crate) struct Scanner {
    source_dir: PathBuf,
    marker_file: String,
}

impl Scanner {
    /// Create a new Scanner.
    ///
    /// # Arguments
    ///
    /// * `source_dir` - Root directory to scan
    /// * `marker_file` - Name of the file marking a page folder (e.g., "README.md")
    pub fn new(source_dir: PathBuf, marker_file: String) -> Self {
        Self {
            source_dir,
            marker_file,
        }
    }

    /// Scan the filesystem and return page folder paths relative to the root.
    ///
    /// The root itself is never returned even when it contains the marker.
    pub fn scan(&self) -> Result<Vec<String>, DocsError> {
        if !self.source_dir.is_dir() {
            return Err(DocsError::RootNotFound(self.source_dir.clone()));
        }
        let mut folders = Vec::new();
        self.scan_directory(&self.source_dir, "", &mut folders)?;
        Ok(folders)
    }

    fn scan_directory(
        &self,
        dir_path: &Path,
        rel_prefix: &str,
        folders: &mut Vec<String>,
    ) -> Result<(), DocsError> {
        let entries = fs::read_dir(dir_path).map_err(|e| DocsError::io(dir_path, e))?;

        let mut has_marker = false;
        for entry in entries {
            let entry = entry.map_err(|e| DocsError::io(dir_path, e))?;
            let name = entry.file_name().to_string_lossy().into_owned();

            // Skip hidden files/dirs
            if name.starts_with('.') {
                continue;
            }

            let is_dir = entry.file_type().is_ok_and(|t| t.is_dir());
            if is_dir {
                let child_rel = if rel_prefix.is_empty() {
                    name
                } else {
                    format!("{rel_prefix}/{name}")
                };
                self.scan_directory(&entry.path(), &child_rel, folders)?;
            } else if name == self.marker_file {
                has_marker = true;
            }
        }

        if has_marker && !rel_prefix.is_empty() {
            debug!("Found page folder {}", rel_prefix);
            folders.push(rel_prefix.to_owned());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    fn scan_sorted(root: &Path) -> Vec<String> {
        let mut folders = Scanner::new(root.to_path_buf(), "README.md".to_owned())
            .scan()
            .unwrap();
        folders.sort();
        folders
    }

    #[test]
    fn test_scan_finds_marker_folders() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "a/README.md");
        touch(dir.path(), "a/b/README.md");
        touch(dir.path(), "c/notes.md");

        assert_eq!(scan_sorted(dir.path()), vec!["a", "a/b"]);
    }

    #[test]
    fn test_scan_descends_through_plain_directories() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "group/inner/README.md");

        assert_eq!(scan_sorted(dir.path()), vec!["group/inner"]);
    }

    #[test]
    fn test_scan_skips_root_and_hidden() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "README.md");
        touch(dir.path(), ".git/README.md");
        touch(dir.path(), "visible/README.md");

        assert_eq!(scan_sorted(dir.path()), vec!["visible"]);
    }

    #[test]
    fn test_scan_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let err = Scanner::new(dir.path().join("missing"), "README.md".to_owned())
            .scan()
            .unwrap_err();
        assert!(matches!(err, DocsError::RootNotFound(_)));
    }
}
