//! Confluence REST API types.

mod attachment;
mod page;

pub use attachment::{Attachment, AttachmentLinks, AttachmentsResponse};
pub use page::{Body, Page, PagesResponse, Storage, Version};
