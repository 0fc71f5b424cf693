//! Configuration management for confsync.
//!
//! Parses `confsync.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings (flags or their environment variables) can be applied during
//! load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String values in the `[confluence]` section support environment variable
//! expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! ## Example
//!
//! ```toml
//! [confluence]
//! base_url = "https://example.atlassian.net/wiki"
//! email = "${EMAIL}"
//! api_token = "${API_TOKEN}"
//! space_key = "DOCS"
//!
//! [docs]
//! source_dir = "docs"
//! ```

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override documents root directory.
    pub source_dir: Option<PathBuf>,
    /// Override Confluence base URL.
    pub base_url: Option<String>,
    /// Override account email.
    pub email: Option<String>,
    /// Override API token.
    pub api_token: Option<String>,
    /// Override target space key.
    pub space_key: Option<String>,
    /// Override default parent page ID.
    pub parent_page_id: Option<String>,
}

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "confsync.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Confluence connection and target space.
    pub confluence: ConfluenceConfig,
    /// Documents configuration (paths are relative strings from TOML).
    docs: DocsConfigRaw,
    /// Sync state storage configuration.
    pub state: StateConfig,

    /// Resolved docs configuration (set after loading).
    #[serde(skip)]
    pub docs_resolved: DocsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Confluence configuration.
///
/// Every field may also come from [`CliSettings`], so all of them default to
/// empty and are checked by [`ConfluenceConfig::validate`].
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConfluenceConfig {
    /// Confluence base URL (including `/wiki` for Cloud).
    pub base_url: String,
    /// Account email used for basic authentication.
    pub email: String,
    /// API token used for basic authentication.
    pub api_token: String,
    /// Key of the space pages are synced into.
    pub space_key: String,
    /// Page that top-level folders are created under.
    pub parent_page_id: Option<String>,
}

impl ConfluenceConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.base_url, "confluence.base_url")?;
        require_http_url(&self.base_url, "confluence.base_url")?;
        require_non_empty(&self.email, "confluence.email")?;
        require_non_empty(&self.api_token, "confluence.api_token")?;
        require_non_empty(&self.space_key, "confluence.space_key")?;
        if let Some(parent) = &self.parent_page_id {
            require_non_empty(parent, "confluence.parent_page_id")?;
        }
        Ok(())
    }
}

/// Raw docs configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct DocsConfigRaw {
    source_dir: Option<String>,
    marker_file: Option<String>,
    labels_file: Option<String>,
    attachments_dir: Option<String>,
}

/// Resolved documents configuration with absolute paths.
#[derive(Debug, Clone)]
pub struct DocsConfig {
    /// Root directory that folders are discovered under.
    pub source_dir: PathBuf,
    /// File whose presence marks a directory as a page.
    pub marker_file: String,
    /// Optional per-folder YAML file with extra labels.
    pub labels_file: String,
    /// Per-folder directory whose files are uploaded as attachments.
    pub attachments_dir: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self::with_source_dir(PathBuf::from("docs"))
    }
}

impl DocsConfig {
    fn with_source_dir(source_dir: PathBuf) -> Self {
        Self {
            source_dir,
            marker_file: "README.md".to_owned(),
            labels_file: "labels.yaml".to_owned(),
            attachments_dir: "attachments".to_owned(),
        }
    }
}

/// Sync state storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StateConfig {
    /// Title of the page holding the sync state.
    pub page_title: String,
    /// Name of the state attachment on that page.
    pub attachment_name: String,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            page_title: "Confluence Sync State".to_owned(),
            attachment_name: "state.json".to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`confluence.api_token`").
        field: String,
        /// Error message (e.g., "${`API_TOKEN`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

/// Require a field to be a bare file name without path separators.
fn require_file_name(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    if value.contains(['/', '\\']) {
        return Err(ConfigError::Validation(format!(
            "{field} must be a file name, not a path"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `confsync.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.docs_resolved.source_dir.clone_from(source_dir);
        }
        if let Some(base_url) = &settings.base_url {
            self.confluence.base_url.clone_from(base_url);
        }
        if let Some(email) = &settings.email {
            self.confluence.email.clone_from(email);
        }
        if let Some(api_token) = &settings.api_token {
            self.confluence.api_token.clone_from(api_token);
        }
        if let Some(space_key) = &settings.space_key {
            self.confluence.space_key.clone_from(space_key);
        }
        if let Some(parent_page_id) = &settings.parent_page_id {
            self.confluence.parent_page_id = Some(parent_page_id.clone());
        }
    }

    /// Get validated Confluence configuration.
    ///
    /// Use this instead of accessing the `confluence` field directly when the
    /// command talks to Confluence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if a required field is missing or invalid.
    pub fn require_confluence(&self) -> Result<&ConfluenceConfig, ConfigError> {
        self.confluence.validate()?;
        Ok(&self.confluence)
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            confluence: ConfluenceConfig::default(),
            docs: DocsConfigRaw::default(),
            state: StateConfig::default(),
            docs_resolved: DocsConfig::with_source_dir(base.join("docs")),
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate the non-Confluence parts of the configuration.
    ///
    /// Confluence settings are validated lazily by [`Config::require_confluence`]
    /// because CLI flags may still fill them in.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` describing the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let docs = &self.docs_resolved;
        require_file_name(&docs.marker_file, "docs.marker_file")?;
        require_file_name(&docs.labels_file, "docs.labels_file")?;
        require_file_name(&docs.attachments_dir, "docs.attachments_dir")?;
        require_non_empty(&self.state.page_title, "state.page_title")?;
        require_file_name(&self.state.attachment_name, "state.attachment_name")?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        let confluence = &mut self.confluence;
        confluence.base_url = expand::expand_env(&confluence.base_url, "confluence.base_url")?;
        confluence.email = expand::expand_env(&confluence.email, "confluence.email")?;
        confluence.api_token = expand::expand_env(&confluence.api_token, "confluence.api_token")?;
        confluence.space_key = expand::expand_env(&confluence.space_key, "confluence.space_key")?;
        confluence.parent_page_id = expand::expand_env_opt(
            confluence.parent_page_id.as_deref(),
            "confluence.parent_page_id",
        )?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let defaults = DocsConfig::default();
        let raw = &self.docs;
        self.docs_resolved = DocsConfig {
            source_dir: config_dir.join(raw.source_dir.as_deref().unwrap_or("docs")),
            marker_file: raw.marker_file.clone().unwrap_or(defaults.marker_file),
            labels_file: raw.labels_file.clone().unwrap_or(defaults.labels_file),
            attachments_dir: raw
                .attachments_dir
                .clone()
                .unwrap_or(defaults.attachments_dir),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn valid_confluence_config() -> ConfluenceConfig {
        ConfluenceConfig {
            base_url: "https://example.atlassian.net/wiki".to_owned(),
            email: "bot@example.com".to_owned(),
            api_token: "token123".to_owned(),
            space_key: "DOCS".to_owned(),
            parent_page_id: None,
        }
    }

    fn assert_validation_error(result: Result<(), ConfigError>, expected: &str) {
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        assert!(
            err.to_string().contains(expected),
            "Expected '{expected}' in '{err}'"
        );
    }

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
        assert_eq!(config.docs_resolved.marker_file, "README.md");
        assert_eq!(config.docs_resolved.labels_file, "labels.yaml");
        assert_eq!(config.docs_resolved.attachments_dir, "attachments");
        assert_eq!(config.state.page_title, "Confluence Sync State");
        assert_eq!(config.state.attachment_name, "state.json");
        assert!(config.confluence.parent_page_id.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.confluence.base_url.is_empty());
        assert_eq!(config.state.page_title, "Confluence Sync State");
    }

    #[test]
    fn test_parse_confluence_config() {
        let toml = r#"
[confluence]
base_url = "https://example.atlassian.net/wiki"
email = "bot@example.com"
api_token = "token123"
space_key = "DOCS"
parent_page_id = "4242"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(
            config.confluence.base_url,
            "https://example.atlassian.net/wiki"
        );
        assert_eq!(config.confluence.email, "bot@example.com");
        assert_eq!(config.confluence.space_key, "DOCS");
        assert_eq!(config.confluence.parent_page_id.as_deref(), Some("4242"));
    }

    #[test]
    fn test_parse_state_config() {
        let toml = r#"
[state]
page_title = "Docs Sync State"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.state.page_title, "Docs Sync State");
        assert_eq!(config.state.attachment_name, "state.json");
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[docs]
source_dir = "documentation"
marker_file = "index.md"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/project/documentation")
        );
        assert_eq!(config.docs_resolved.marker_file, "index.md");
        assert_eq!(config.docs_resolved.attachments_dir, "attachments");
    }

    #[test]
    fn test_apply_cli_settings_confluence() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            base_url: Some("https://wiki.example.com".to_owned()),
            space_key: Some("ENG".to_owned()),
            parent_page_id: Some("77".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.confluence.base_url, "https://wiki.example.com");
        assert_eq!(config.confluence.space_key, "ENG");
        assert_eq!(config.confluence.parent_page_id.as_deref(), Some("77"));
        assert!(config.confluence.email.is_empty()); // Unchanged
    }

    #[test]
    fn test_apply_cli_settings_source_dir() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            source_dir: Some(PathBuf::from("/custom/docs")),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(
            config.docs_resolved.source_dir,
            PathBuf::from("/custom/docs")
        );
    }

    #[test]
    fn test_apply_cli_settings_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.docs_resolved.source_dir, PathBuf::from("/test/docs"));
        assert!(config.confluence.space_key.is_empty());
    }

    #[test]
    fn test_expand_env_vars_confluence() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("CONFSYNC_CFG_TOKEN", "from-env");
        }
        let toml = r#"
[confluence]
base_url = "https://wiki.example.com"
api_token = "${CONFSYNC_CFG_TOKEN}"
space_key = "${CONFSYNC_CFG_SPACE:-DOCS}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.expand_env_vars().unwrap();
        unsafe {
            std::env::remove_var("CONFSYNC_CFG_TOKEN");
        }

        assert_eq!(config.confluence.api_token, "from-env");
        assert_eq!(config.confluence.space_key, "DOCS");
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        let toml = r#"
[confluence]
email = "${CONFSYNC_CFG_DEFINITELY_UNSET}"
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        let err = config.expand_env_vars().unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("confluence.email"));
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/confsync.toml")), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "[docs]\nsource_dir = \"pages\"\n\n[confluence]\nspace_key = \"DOCS\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.docs_resolved.source_dir, dir.path().join("pages"));
        assert_eq!(config.config_path, Some(path));
        assert_eq!(config.confluence.space_key, "DOCS");
    }

    #[test]
    fn test_load_rejects_marker_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[docs]\nmarker_file = \"sub/README.md\"\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(err.to_string().contains("docs.marker_file"));
    }

    #[test]
    fn test_confluence_config_validate_valid() {
        assert!(valid_confluence_config().validate().is_ok());
    }

    #[test]
    fn test_confluence_config_validate_empty_token() {
        let config = ConfluenceConfig {
            api_token: String::new(),
            ..valid_confluence_config()
        };
        assert_validation_error(config.validate(), "confluence.api_token");
    }

    #[test]
    fn test_confluence_config_validate_invalid_url() {
        let config = ConfluenceConfig {
            base_url: "wiki.example.com".to_owned(),
            ..valid_confluence_config()
        };
        assert_validation_error(config.validate(), "http://");
    }

    #[test]
    fn test_confluence_config_validate_empty_parent() {
        let config = ConfluenceConfig {
            parent_page_id: Some(String::new()),
            ..valid_confluence_config()
        };
        assert_validation_error(config.validate(), "confluence.parent_page_id");
    }

    #[test]
    fn test_config_require_confluence_missing_space() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.confluence = ConfluenceConfig {
            space_key: String::new(),
            ..valid_confluence_config()
        };
        let err = config.require_confluence().unwrap_err();
        assert!(err.to_string().contains("confluence.space_key"));
    }
}
