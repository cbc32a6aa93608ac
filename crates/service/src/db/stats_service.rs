use sea_orm::{
    sea_query::{Alias, Expr, Func, SimpleExpr}, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect,
};
use serde::Serialize;

use models::order::{self, OrderStatus};
use models::user::{self, Role};
use models::meal;
use crate::errors::ServiceError;

/// Back-office dashboard counters.
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub meals: u64,
    pub customers: u64,
    pub orders: u64,
    /// Revenue from delivered orders only.
    pub revenue_cents: i64,
}

pub async fn dashboard(db: &DatabaseConnection) -> Result<DashboardStats, ServiceError> {
    let meals = meal::Entity::find().count(db).await?;
    let customers = user::Entity::find()
        .filter(user::Column::Role.eq(Role::Customer))
        .count(db)
        .await?;
    let orders = order::Entity::find().count(db).await?;
    // SUM(bigint) is NUMERIC in postgres
    let revenue: Option<Option<i64>> = order::Entity::find()
        .select_only()
        .column_as(
            SimpleExpr::from(Func::cast_as(Func::sum(Expr::col(order::Column::TotalCents)), Alias::new("BIGINT"))),
            "revenue",
        )
        .filter(order::Column::Status.eq(OrderStatus::Delivered))
        .into_tuple()
        .one(db)
        .await?;
    Ok(DashboardStats { meals, customers, orders, revenue_cents: revenue.flatten().unwrap_or(0) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn dashboard_counts_are_consistent() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let email = format!("stats_{}@example.com", uuid::Uuid::new_v4().simple());
        user::create(&db, &email, "Stats", Role::Customer).await?;
        let stats = dashboard(&db).await?;
        assert!(stats.customers >= 1);
        assert!(stats.revenue_cents >= 0);
        Ok(())
    }
}
