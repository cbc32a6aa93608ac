//! Create `affiliate` table.
//! An affiliate may be linked to a user account; deleting the user keeps the record.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Affiliate::Table)
                    .if_not_exists()
                    .col(uuid(Affiliate::Id).primary_key())
                    .col(uuid_null(Affiliate::UserId))
                    .col(string_len(Affiliate::Code, 32).unique_key().not_null())
                    .col(string_len(Affiliate::Name, 128).not_null())
                    .col(integer(Affiliate::CommissionBps).not_null())
                    .col(big_integer(Affiliate::Clicks).default(0).not_null())
                    .col(boolean(Affiliate::IsActive).not_null())
                    .col(timestamp_with_time_zone(Affiliate::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_affiliate_user")
                            .from(Affiliate::Table, Affiliate::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Affiliate::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Affiliate { Table, Id, UserId, Code, Name, CommissionBps, Clicks, IsActive, CreatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }
