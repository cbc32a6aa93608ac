use std::sync::Arc;

use tracing::{info, instrument};

use models::block::Block;
use models::page_content;

use crate::errors::ServiceError;
use crate::page_content::repository::PageContentRepository;

/// Load/save contract of the visual page editor.
///
/// Authorization is the caller's job; this service only enforces the
/// required-field rules and the full-replace upsert.
#[derive(Clone)]
pub struct PageContentService {
    repo: Arc<dyn PageContentRepository>,
}

impl PageContentService {
    pub fn new(repo: Arc<dyn PageContentRepository>) -> Self { Self { repo } }

    /// Blocks stored for `page`, or an empty list when nothing was saved yet.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::page_content::{PageContentService, repository::mock::MockPageContentRepository};
    /// let svc = PageContentService::new(Arc::new(MockPageContentRepository::default()));
    /// let blocks = tokio_test::block_on(svc.load(Some("home"))).unwrap();
    /// assert!(blocks.is_empty());
    /// ```
    #[instrument(skip(self))]
    pub async fn load(&self, page: Option<&str>) -> Result<Vec<Block>, ServiceError> {
        let page = match page {
            Some(p) if !p.trim().is_empty() => p,
            _ => return Err(ServiceError::Validation("Page parameter is required".into())),
        };
        let found = self.repo.find_by_page(page).await?;
        Ok(found.map(|doc| doc.blocks.into_inner()).unwrap_or_default())
    }

    /// Replace the whole block list of `page`, creating the document if needed.
    /// Block order is stored exactly as supplied.
    #[instrument(skip(self, blocks), fields(block_count = blocks.as_ref().map(Vec::len)))]
    pub async fn save(&self, page: Option<String>, blocks: Option<Vec<Block>>) -> Result<page_content::Model, ServiceError> {
        let (page, blocks) = match (page, blocks) {
            (Some(page), Some(blocks)) if !page.trim().is_empty() => (page, blocks),
            _ => return Err(ServiceError::Validation("Page and blocks are required".into())),
        };
        let count = blocks.len();
        let saved = self.repo.upsert(&page, blocks.into()).await?;
        info!(event = "page_content_saved", page = %saved.page, blocks = count, "page content saved");
        Ok(saved)
    }
}
