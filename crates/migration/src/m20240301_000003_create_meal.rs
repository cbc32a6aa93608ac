//! Create `meal` table: the storefront catalog.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Meal::Table)
                    .if_not_exists()
                    .col(uuid(Meal::Id).primary_key())
                    .col(string_len(Meal::Name, 128).not_null())
                    .col(string_len(Meal::Slug, 160).unique_key().not_null())
                    .col(text(Meal::Description).not_null())
                    .col(big_integer(Meal::PriceCents).not_null())
                    .col(string_len(Meal::Category, 64).not_null())
                    .col(string_len_null(Meal::ImageUrl, 512))
                    .col(integer_null(Meal::Calories))
                    .col(boolean(Meal::IsActive).not_null())
                    .col(timestamp_with_time_zone(Meal::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Meal::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Meal::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Meal {
    Table,
    Id,
    Name,
    Slug,
    Description,
    PriceCents,
    Category,
    ImageUrl,
    Calories,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
