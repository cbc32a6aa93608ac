use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{sea_query::OnConflict, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use models::block::PageBlocks;
use models::page_content;

use crate::errors::ServiceError;

#[async_trait]
pub trait PageContentRepository: Send + Sync {
    async fn find_by_page(&self, page: &str) -> Result<Option<page_content::Model>, ServiceError>;
    /// Create the document for `page`, or replace its blocks if it exists.
    async fn upsert(&self, page: &str, blocks: PageBlocks) -> Result<page_content::Model, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmPageContentRepository {
    pub db: DatabaseConnection,
}

#[async_trait]
impl PageContentRepository for SeaOrmPageContentRepository {
    async fn find_by_page(&self, page: &str) -> Result<Option<page_content::Model>, ServiceError> {
        page_content::Entity::find()
            .filter(page_content::Column::Page.eq(page))
            .one(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }

    async fn upsert(&self, page: &str, blocks: PageBlocks) -> Result<page_content::Model, ServiceError> {
        let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
        let am = page_content::ActiveModel {
            id: Set(Uuid::new_v4()),
            page: Set(page.to_string()),
            blocks: Set(blocks),
            created_at: Set(now),
            updated_at: Set(now),
        };
        // Single statement: concurrent saves serialize on the unique key and the last commit wins.
        page_content::Entity::insert(am)
            .on_conflict(
                OnConflict::column(page_content::Column::Page)
                    .update_columns([page_content::Column::Blocks, page_content::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))
    }
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockPageContentRepository {
        docs: Mutex<HashMap<String, page_content::Model>>, // key: page
        failing: AtomicBool,
    }

    impl MockPageContentRepository {
        /// Make every subsequent call fail as a store error.
        pub fn fail_with_store_error(&self) {
            self.failing.store(true, Ordering::SeqCst);
        }

        pub fn len(&self) -> usize {
            self.docs.lock().unwrap_or_else(|p| p.into_inner()).len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }

        fn check(&self) -> Result<(), ServiceError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(ServiceError::Db("mock store unavailable".into()));
            }
            Ok(())
        }
    }

    #[async_trait]
    impl PageContentRepository for MockPageContentRepository {
        async fn find_by_page(&self, page: &str) -> Result<Option<page_content::Model>, ServiceError> {
            self.check()?;
            let docs = self.docs.lock().unwrap_or_else(|p| p.into_inner());
            Ok(docs.get(page).cloned())
        }

        async fn upsert(&self, page: &str, blocks: PageBlocks) -> Result<page_content::Model, ServiceError> {
            self.check()?;
            let now: sea_orm::prelude::DateTimeWithTimeZone = Utc::now().into();
            let mut docs = self.docs.lock().unwrap_or_else(|p| p.into_inner());
            let doc = docs
                .entry(page.to_string())
                .and_modify(|d| {
                    d.blocks = blocks.clone();
                    d.updated_at = now;
                })
                .or_insert_with(|| page_content::Model {
                    id: Uuid::new_v4(),
                    page: page.to_string(),
                    blocks: blocks.clone(),
                    created_at: now,
                    updated_at: now,
                });
            Ok(doc.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use models::block::Block;
    use serde_json::json;

    #[tokio::test]
    async fn upsert_keeps_one_row_per_page() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let repo = SeaOrmPageContentRepository { db: db.clone() };
        let page = format!("repo-{}", Uuid::new_v4().simple());
        let first: Vec<Block> = serde_json::from_value(json!([
            {"id": "a", "type": "text", "content": {"text": "one"}, "styles": {}, "order": 0}
        ]))?;
        let second: Vec<Block> = serde_json::from_value(json!([
            {"id": "z", "type": "grid", "content": {"items": [{"title": "x"}]}, "styles": {"margin": "0"}, "order": 3}
        ]))?;

        let created = repo.upsert(&page, first.into()).await?;
        let replaced = repo.upsert(&page, second.clone().into()).await?;
        assert_eq!(created.id, replaced.id);
        assert!(replaced.updated_at >= created.updated_at);

        let stored = repo.find_by_page(&page).await?.map(|d| d.blocks.into_inner());
        assert_eq!(stored, Some(second));
        assert!(repo.find_by_page("no-such-page-here").await?.is_none());

        page_content::Entity::delete_by_id(created.id).exec(&db).await?;
        Ok(())
    }
}
