//! Sync engine mirroring local page folders into a Confluence space.
//!
//! A run is driven by the [`Orchestrator`]:
//!
//! 1. Discover folders through a [`DocsSource`](confsync_docs::DocsSource)
//!    and order them parents first ([`FolderTree`])
//! 2. Load the previous folder -> page mapping ([`StateStore`])
//! 3. Synchronize each folder ([`PageSynchronizer`]), resolving ancestor
//!    pages with the [`HierarchyResolver`]
//! 4. Delete pages of folders that no longer exist
//! 5. Save the new mapping
//!
//! All per-run caches live in a [`RunContext`] owned by the run.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use confsync_confluence::ConfluenceClient;
//! use confsync_docs::FsDocs;
//! use confsync_engine::{Orchestrator, SyncSettings};
//!
//! let client = ConfluenceClient::new(
//!     "https://example.atlassian.net/wiki",
//!     "bot@example.com",
//!     "api-token",
//! );
//! let docs = FsDocs::new("docs");
//! let settings = SyncSettings::new("DOCS");
//!
//! let report = Orchestrator::new(&client, &docs, &settings).run()?;
//! println!("{} folder(s) failed", report.failed());
//! # Ok(())
//! # }
//! ```

mod context;
mod dry_run;
mod error;
mod hierarchy;
mod orchestrator;
mod report;
mod settings;
mod state;
mod synchronizer;
mod title;
mod tree;

pub use context::{HierarchyCache, RunContext};
pub use dry_run::{DRY_RUN_ID_PREFIX, DryRunStore};
pub use error::{FolderError, SyncError};
pub use hierarchy::{HierarchyResolver, PLACEHOLDER_BODY};
pub use orchestrator::Orchestrator;
pub use report::{AttachmentFailure, FolderOutcome, PageAction, Removal, SyncReport};
pub use settings::{DEFAULT_STATE_ATTACHMENT, DEFAULT_STATE_PAGE_TITLE, SyncSettings};
pub use state::{STATE_FORMAT, STATE_PAGE_BODY, StateDecodeError, StateStore, SyncState};
pub use synchronizer::{PageSync, PageSynchronizer};
pub use title::format_title;
pub use tree::FolderTree;
