//! YAML frontmatter and labels file parsing.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::error::DocsError;

static FRONTMATTER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\A---\r?\n(.*?)\r?\n---[ \t]*(?:\r?\n|\z)").unwrap());

/// Page metadata from a folder's frontmatter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Frontmatter {
    /// Explicit page title, overriding the folder name.
    pub title: Option<String>,
    /// Labels to apply to the page.
    pub labels: Vec<String>,
}

impl Frontmatter {
    /// Append labels, skipping any already present.
    pub fn merge_labels(&mut self, labels: impl IntoIterator<Item = String>) {
        for label in labels {
            let label = label.trim().to_owned();
            if !label.is_empty() && !self.labels.contains(&label) {
                self.labels.push(label);
            }
        }
    }
}

/// Contents of a labels file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LabelsFile {
    labels: Vec<String>,
}

/// Split a document into its frontmatter YAML and body.
///
/// Returns `None` for the YAML when the document does not start with a
/// `---` delimited block.
pub(crate) fn split_frontmatter(content: &str) -> (Option<&str>, &str) {
    match FRONTMATTER_RE.captures(content) {
        Some(caps) => {
            let yaml = caps.get(1).map_or("", |m| m.as_str());
            let end = caps.get(0).map_or(0, |m| m.end());
            (Some(yaml), &content[end..])
        }
        None => (None, content),
    }
}

/// Parse frontmatter YAML. Empty YAML yields default metadata.
///
/// Labels are normalized the same way as [`Frontmatter::merge_labels`].
pub(crate) fn parse_frontmatter(yaml: &str, path: &Path) -> Result<Frontmatter, DocsError> {
    if yaml.trim().is_empty() {
        return Ok(Frontmatter::default());
    }
    let parsed: Frontmatter =
        serde_yaml::from_str(yaml).map_err(|source| DocsError::Frontmatter {
            path: path.to_path_buf(),
            source,
        })?;
    let mut frontmatter = Frontmatter {
        title: parsed
            .title
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty()),
        labels: Vec::new(),
    };
    frontmatter.merge_labels(parsed.labels);
    Ok(frontmatter)
}

/// Parse a labels file (`labels: [...]`).
pub(crate) fn parse_labels_file(yaml: &str, path: &Path) -> Result<Vec<String>, DocsError> {
    if yaml.trim().is_empty() {
        return Ok(Vec::new());
    }
    let parsed: LabelsFile = serde_yaml::from_str(yaml).map_err(|source| DocsError::Frontmatter {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parsed.labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_frontmatter() {
        let (yaml, body) = split_frontmatter("---\ntitle: Hello\n---\n# Body\n");
        assert_eq!(yaml, Some("title: Hello"));
        assert_eq!(body, "# Body\n");
    }

    #[test]
    fn test_split_without_frontmatter() {
        let content = "# Just a body\n---\nnot: yaml\n";
        let (yaml, body) = split_frontmatter(content);
        assert_eq!(yaml, None);
        assert_eq!(body, content);
    }

    #[test]
    fn test_split_crlf_frontmatter() {
        let (yaml, body) = split_frontmatter("---\r\ntitle: Win\r\n---\r\nText");
        assert_eq!(yaml, Some("title: Win"));
        assert_eq!(body, "Text");
    }

    #[test]
    fn test_parse_frontmatter_title_and_labels() {
        let fm = parse_frontmatter(
            "title: ' Custom Title '\nlabels: [api, docs, api]",
            Path::new("README.md"),
        )
        .unwrap();
        assert_eq!(fm.title.as_deref(), Some("Custom Title"));
        assert_eq!(fm.labels, vec!["api".to_owned(), "docs".to_owned()]);
    }

    #[test]
    fn test_parse_frontmatter_empty() {
        let fm = parse_frontmatter("  \n", Path::new("README.md")).unwrap();
        assert_eq!(fm, Frontmatter::default());
    }

    #[test]
    fn test_parse_frontmatter_invalid_yaml() {
        let err = parse_frontmatter("title: [unclosed", Path::new("a/README.md")).unwrap_err();
        assert!(matches!(err, DocsError::Frontmatter { .. }));
        assert!(err.to_string().contains("a/README.md"));
    }

    #[test]
    fn test_parse_labels_file() {
        let labels = parse_labels_file("labels:\n  - one\n  - two\n", Path::new("labels.yaml"))
            .unwrap();
        assert_eq!(labels, vec!["one".to_owned(), "two".to_owned()]);
    }

    #[test]
    fn test_merge_labels_dedupes() {
        let mut fm = Frontmatter {
            title: None,
            labels: vec!["a".to_owned()],
        };
        fm.merge_labels(vec!["a".to_owned(), " b ".to_owned(), String::new()]);
        assert_eq!(fm.labels, vec!["a".to_owned(), "b".to_owned()]);
    }
}
