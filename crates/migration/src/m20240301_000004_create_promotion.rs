//! Create `promotion` table holding redeemable discount codes.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Promotion::Table)
                    .if_not_exists()
                    .col(uuid(Promotion::Id).primary_key())
                    .col(string_len(Promotion::Code, 32).unique_key().not_null())
                    .col(text(Promotion::Description).not_null())
                    .col(string_len(Promotion::DiscountKind, 16).not_null())
                    .col(integer(Promotion::DiscountValue).not_null())
                    .col(integer_null(Promotion::MaxUses))
                    .col(integer(Promotion::Uses).default(0).not_null())
                    .col(timestamp_with_time_zone_null(Promotion::StartsAt))
                    .col(timestamp_with_time_zone_null(Promotion::EndsAt))
                    .col(boolean(Promotion::IsActive).not_null())
                    .col(timestamp_with_time_zone(Promotion::CreatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Promotion::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Promotion {
    Table,
    Id,
    Code,
    Description,
    DiscountKind,
    DiscountValue,
    MaxUses,
    Uses,
    StartsAt,
    EndsAt,
    IsActive,
    CreatedAt,
}
