//! Page-editor content: a repository seam over the `page_content` table and
//! the load/save service the HTTP layer calls.

pub mod repository;
pub mod service;

pub use service::PageContentService;
