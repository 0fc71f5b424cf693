//! Local document folders for confsync.
//!
//! This crate provides the local side of a sync run through the
//! [`DocsSource`] trait:
//!
//! - **Folder discovery**: directories containing a marker file (`README.md`)
//! - **Content reading**: YAML frontmatter, labels file, markdown body
//!   rendered to Confluence storage format
//! - **Attachment enumeration**: files in the folder's `attachments/` directory
//!
//! [`FsDocs`] implements the trait for a directory tree; `MockDocs` (behind
//! the `mock` feature) is an in-memory source for tests.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use confsync_docs::{DocsSource, FsDocs};
//!
//! let docs = FsDocs::new("docs");
//! for folder in docs.find_folders()? {
//!     let content = docs.read_folder(&folder)?;
//!     println!("{folder}: {:?}", content.frontmatter.title);
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod frontmatter;
mod fs;
mod markup;
#[cfg(feature = "mock")]
mod mock;
mod scanner;
mod source;

pub use error::DocsError;
pub use frontmatter::Frontmatter;
pub use fs::FsDocs;
pub use markup::render_storage;
#[cfg(feature = "mock")]
pub use mock::MockDocs;
pub use source::{AttachmentFile, DocsSource, FolderContent};
