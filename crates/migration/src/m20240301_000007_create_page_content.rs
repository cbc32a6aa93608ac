//! Create `page_content` table.
//! One row per page identifier; the whole block list lives in a single JSONB column.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PageContent::Table)
                    .if_not_exists()
                    .col(uuid(PageContent::Id).primary_key())
                    // the unique key is the upsert conflict target
                    .col(string_len(PageContent::Page, 128).unique_key().not_null())
                    .col(json_binary(PageContent::Blocks).not_null())
                    .col(timestamp_with_time_zone(PageContent::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(PageContent::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(PageContent::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum PageContent { Table, Id, Page, Blocks, CreatedAt, UpdatedAt }
