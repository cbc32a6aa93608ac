use uuid::Uuid;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::Serialize;

use common::{pagination::Pagination, types::Page};
use models::order::{self, OrderStatus};
use models::user::{self, Role};
use crate::errors::ServiceError;

#[derive(Debug, Serialize)]
pub struct CustomerDetail {
    #[serde(flatten)]
    pub customer: user::Model,
    pub order_count: u64,
    /// Sum of totals over orders that were not cancelled.
    pub lifetime_spend_cents: i64,
}

/// Customer accounts, newest first.
pub async fn list_customers(db: &DatabaseConnection, p: Pagination) -> Result<Page<user::Model>, ServiceError> {
    let (idx, per_page) = p.normalize();
    let paginator = user::Entity::find()
        .filter(user::Column::Role.eq(Role::Customer))
        .order_by_desc(user::Column::CreatedAt)
        .paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(idx).await?;
    Ok(Page { items, page: idx + 1, per_page, total })
}

pub async fn get_customer(db: &DatabaseConnection, id: Uuid) -> Result<CustomerDetail, ServiceError> {
    let customer = user::Entity::find_by_id(id)
        .filter(user::Column::Role.eq(Role::Customer))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("customer"))?;
    let order_count = order::Entity::find()
        .filter(order::Column::UserId.eq(id))
        .count(db)
        .await?;
    let totals: Vec<i64> = order::Entity::find()
        .select_only()
        .column(order::Column::TotalCents)
        .filter(order::Column::UserId.eq(id))
        .filter(order::Column::Status.ne(OrderStatus::Cancelled))
        .into_tuple()
        .all(db)
        .await?;
    Ok(CustomerDetail { customer, order_count, lifetime_spend_cents: totals.iter().sum() })
}
