//! `confsync state` command implementation.

use clap::Args;
use confsync_engine::StateStore;

use super::ConnectionArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the state command.
#[derive(Args)]
pub(crate) struct StateArgs {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Print the state as JSON.
    #[arg(long)]
    json: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl StateArgs {
    /// Execute the state command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or the state page
    /// cannot be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.connection.load_config(None)?;
        let conf = super::require_confluence(&config, &output)?;
        let client = super::create_client(conf);
        let settings = super::sync_settings(&config, conf);

        let state = StateStore::new(&client, &settings).load()?;

        if self.json {
            output.data(&state.to_json()?);
            return Ok(());
        }

        if state.is_empty() {
            output.warning(&format!(
                "No folders recorded on '{}'.",
                settings.state_page_title
            ));
            return Ok(());
        }

        output.highlight(&format!(
            "{} folder(s) recorded on '{}':",
            state.len(),
            settings.state_page_title
        ));
        for (path, page_id) in state.iter() {
            output.data(&format!("{path}\t{page_id}"));
        }
        Ok(())
    }
}
