//! Confluence integration for confsync.
//!
//! This crate provides the remote side of a sync run:
//! - [`PageStore`]: the page operations the sync engine relies on
//! - [`ConfluenceClient`]: blocking REST API client implementing [`PageStore`]
//! - `MockPageStore`: in-memory store for tests (behind the `mock` feature)
//!
//! # API Client
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use confsync_confluence::{ConfluenceClient, PageStore};
//!
//! let client = ConfluenceClient::new(
//!     "https://example.atlassian.net/wiki",
//!     "bot@example.com",
//!     "api-token",
//! );
//!
//! if let Some(page) = client.find_page_by_title("DOCS", "Getting Started")? {
//!     println!("Page {} is at version {}", page.id, page.version.number);
//! }
//! # Ok(())
//! # }
//! ```

mod auth;

// API client
mod client;
pub use client::ConfluenceClient;

// Store abstraction
mod store;
pub use store::PageStore;

#[cfg(feature = "mock")]
mod mock;
#[cfg(feature = "mock")]
pub use mock::{MockPage, MockPageStore, StoreCall};

// Types
pub mod types;
pub use types::{Attachment, Page};

// Errors
pub mod error;
pub use error::ConfluenceError;
