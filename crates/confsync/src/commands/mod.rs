//! CLI command implementations.

pub(crate) mod state;
pub(crate) mod sync;

pub(crate) use state::StateArgs;
pub(crate) use sync::SyncArgs;

use std::path::PathBuf;

use clap::Args;
use confsync_config::{CONFIG_FILENAME, CliSettings, Config, ConfluenceConfig};
use confsync_confluence::ConfluenceClient;
use confsync_engine::SyncSettings;
use tracing::debug;

use crate::error::CliError;
use crate::output::Output;

/// Connection and configuration arguments shared by all commands.
#[derive(Args)]
pub(crate) struct ConnectionArgs {
    /// Path to configuration file (default: auto-discover confsync.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Confluence base URL, e.g. `https://example.atlassian.net/wiki`.
    #[arg(long, env = "CONFLUENCE_BASE_URL")]
    base_url: Option<String>,

    /// Account email used for authentication.
    #[arg(long, env = "EMAIL")]
    email: Option<String>,

    /// API token used for authentication.
    #[arg(long, env = "API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Key of the target space.
    #[arg(long, env = "SPACE_KEY")]
    space_key: Option<String>,

    /// Page that top-level folders are created under.
    #[arg(long, env = "PARENT_PAGE_ID")]
    parent_page_id: Option<String>,
}

impl ConnectionArgs {
    /// Load configuration with these arguments taking precedence.
    pub(crate) fn load_config(&self, source_dir: Option<PathBuf>) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            source_dir,
            base_url: self.base_url.clone(),
            email: self.email.clone(),
            api_token: self.api_token.clone(),
            space_key: self.space_key.clone(),
            parent_page_id: self.parent_page_id.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        match &config.config_path {
            Some(path) => debug!("Loaded configuration from {}", path.display()),
            None => debug!("No {} found, using defaults", CONFIG_FILENAME),
        }
        Ok(config)
    }
}

fn require_confluence<'a>(
    config: &'a Config,
    output: &Output,
) -> Result<&'a ConfluenceConfig, CliError> {
    config.require_confluence().map_err(|err| {
        output.info("\nSet the missing values in confsync.toml:");
        output.info("\n[confluence]");
        output.info(r#"base_url = "https://example.atlassian.net/wiki""#);
        output.info(r#"email = "bot@example.com""#);
        output.info(r#"api_token = "${CONFLUENCE_API_TOKEN}""#);
        output.info(r#"space_key = "DOCS""#);
        output.info("\nor pass them as flags or environment variables.\n");
        CliError::from(err)
    })
}

fn create_client(conf: &ConfluenceConfig) -> ConfluenceClient {
    ConfluenceClient::new(&conf.base_url, &conf.email, &conf.api_token)
}

fn sync_settings(config: &Config, conf: &ConfluenceConfig) -> SyncSettings {
    SyncSettings::new(conf.space_key.clone())
        .with_default_parent(conf.parent_page_id.clone())
        .with_state_page(
            config.state.page_title.clone(),
            config.state.attachment_name.clone(),
        )
}
