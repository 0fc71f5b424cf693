//! `confsync sync` command implementation.

use std::path::PathBuf;

use clap::Args;
use confsync_confluence::PageStore;
use confsync_docs::FsDocs;
use confsync_engine::{
    DryRunStore, FolderOutcome, Orchestrator, PageAction, Removal, SyncReport, SyncSettings,
};

use super::ConnectionArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the sync command.
#[derive(Args)]
pub(crate) struct SyncArgs {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// Documents root directory (overrides config).
    #[arg(long, env = "DOCS_DIR")]
    source_dir: Option<PathBuf>,

    /// Preview changes without writing to Confluence.
    #[arg(long)]
    dry_run: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl SyncArgs {
    /// Execute the sync command.
    ///
    /// # Errors
    ///
    /// Returns an error if the run aborts or any folder failed to sync.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = self.connection.load_config(self.source_dir.clone())?;
        let conf = super::require_confluence(&config, &output)?;
        let client = super::create_client(conf);
        let settings = super::sync_settings(&config, conf);

        let docs_config = &config.docs_resolved;
        let docs = FsDocs::new(docs_config.source_dir.clone())
            .with_marker_file(docs_config.marker_file.clone())
            .with_labels_file(docs_config.labels_file.clone())
            .with_attachments_dir(docs_config.attachments_dir.clone());

        output.info(&format!(
            "Syncing {} to space {}...",
            docs.source_dir().display(),
            settings.space_key
        ));

        let report = if self.dry_run {
            let dry = DryRunStore::new(&client);
            let report = run(&dry, &docs, &settings)?;
            output.highlight(&format!(
                "\n[DRY RUN] No changes made, {} write(s) skipped.",
                dry.skipped_writes()
            ));
            report
        } else {
            run(&client, &docs, &settings)?
        };

        print_report(&output, &report);

        if report.failed() > 0 {
            return Err(CliError::Incomplete(format!(
                "{} folder(s) failed to sync",
                report.failed()
            )));
        }
        Ok(())
    }
}

fn run<S: PageStore + ?Sized>(
    store: &S,
    docs: &FsDocs,
    settings: &SyncSettings,
) -> Result<SyncReport, CliError> {
    Ok(Orchestrator::new(store, docs, settings).run()?)
}

fn print_report(output: &Output, report: &SyncReport) {
    output.info("");
    for (path, outcome) in &report.outcomes {
        match outcome {
            FolderOutcome::Synced {
                page_id,
                action: PageAction::Unchanged,
            } => output.muted(&format!("  = {path} ({page_id})")),
            FolderOutcome::Synced { page_id, action } => {
                let marker = if *action == PageAction::Created { '+' } else { '~' };
                output.success(&format!("  {marker} {path} ({page_id})"));
            }
            FolderOutcome::Failed { error, .. } => {
                output.error(&format!("  ! {path}: {error}"));
            }
            FolderOutcome::Removed { page_id, removal } => match removal {
                Removal::Deleted => output.warning(&format!("  - {path} ({page_id})")),
                Removal::Retained => output.muted(&format!("  > {path} ({page_id}) kept")),
                Removal::Failed(error) => {
                    output.error(&format!("  ! {path} ({page_id}): {error}"));
                }
            },
        }
    }

    for failure in &report.attachment_failures {
        output.warning(&format!(
            "  ! {}/{}: {}",
            failure.folder, failure.filename, failure.error
        ));
    }

    let line = summary(report);
    if report.has_failures() {
        output.warning(&format!("\n{line}"));
    } else {
        output.success(&format!("\n{line}"));
    }
}

fn summary(report: &SyncReport) -> String {
    let mut line = format!(
        "{} created, {} updated, {} unchanged, {} deleted",
        report.synced(PageAction::Created),
        report.synced(PageAction::Updated),
        report.synced(PageAction::Unchanged),
        report.deleted()
    );
    if report.failed() > 0 {
        line.push_str(&format!(", {} failed", report.failed()));
    }
    if report.deletion_failures() > 0 {
        line.push_str(&format!(", {} not deleted", report.deletion_failures()));
    }
    if report.attachments_uploaded > 0 || !report.attachment_failures.is_empty() {
        line.push_str(&format!(
            "; attachments: {} uploaded, {} failed",
            report.attachments_uploaded,
            report.attachment_failures.len()
        ));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use confsync_engine::AttachmentFailure;
    use pretty_assertions::assert_eq;

    fn synced(action: PageAction) -> FolderOutcome {
        FolderOutcome::Synced {
            page_id: "1".to_owned(),
            action,
        }
    }

    #[test]
    fn test_summary_clean_run() {
        let mut report = SyncReport::default();
        report
            .outcomes
            .insert("a".to_owned(), synced(PageAction::Created));
        report
            .outcomes
            .insert("b".to_owned(), synced(PageAction::Unchanged));

        assert_eq!(
            summary(&report),
            "1 created, 0 updated, 1 unchanged, 0 deleted"
        );
    }

    #[test]
    fn test_summary_with_failures() {
        let mut report = SyncReport::default();
        report.outcomes.insert(
            "a".to_owned(),
            FolderOutcome::Failed {
                previous_id: None,
                error: "boom".to_owned(),
            },
        );
        report.outcomes.insert(
            "old".to_owned(),
            FolderOutcome::Removed {
                page_id: "9".to_owned(),
                removal: Removal::Failed("denied".to_owned()),
            },
        );
        report.attachments_uploaded = 2;
        report.attachment_failures.push(AttachmentFailure {
            folder: "b".to_owned(),
            filename: "x.png".to_owned(),
            error: "too large".to_owned(),
        });

        assert_eq!(
            summary(&report),
            "0 created, 0 updated, 0 unchanged, 0 deleted, 1 failed, 1 not deleted; \
             attachments: 2 uploaded, 1 failed"
        );
    }
}
