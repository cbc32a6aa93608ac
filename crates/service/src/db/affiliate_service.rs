use uuid::Uuid;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde::Serialize;
use tracing::{debug, info};

use common::{pagination::Pagination, types::Page};
use models::affiliate::{self, AffiliateInput};
use models::errors::ModelError;
use models::order::{self, OrderStatus};
use crate::errors::ServiceError;

/// An affiliate's own dashboard figures.
#[derive(Debug, Serialize)]
pub struct AffiliateStats {
    #[serde(flatten)]
    pub affiliate: affiliate::Model,
    pub referred_orders: u64,
    pub commission_cents: i64,
}

/// Count one click on an active affiliate link.
pub async fn track_click(db: &DatabaseConnection, code: &str) -> Result<(), ServiceError> {
    let code = affiliate::normalize_code(code);
    let res = affiliate::Entity::update_many()
        .col_expr(affiliate::Column::Clicks, Expr::col(affiliate::Column::Clicks).add(1))
        .filter(affiliate::Column::Code.eq(code.as_str()))
        .filter(affiliate::Column::IsActive.eq(true))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("affiliate"));
    }
    debug!(event = "affiliate_click", code = %code);
    Ok(())
}

/// Stats for the affiliate record linked to `user_id`.
pub async fn stats_for_user(db: &DatabaseConnection, user_id: Uuid) -> Result<AffiliateStats, ServiceError> {
    let affiliate = affiliate::Entity::find()
        .filter(affiliate::Column::UserId.eq(user_id))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("affiliate"))?;

    let totals: Vec<i64> = order::Entity::find()
        .select_only()
        .column(order::Column::TotalCents)
        .filter(order::Column::AffiliateCode.eq(affiliate.code.as_str()))
        .filter(order::Column::Status.ne(OrderStatus::Cancelled))
        .into_tuple()
        .all(db)
        .await?;

    let commission_cents = totals
        .iter()
        .map(|total| affiliate::commission_for(*total, affiliate.commission_bps))
        .sum();
    Ok(AffiliateStats { referred_orders: totals.len() as u64, commission_cents, affiliate })
}

pub async fn list_affiliates(db: &DatabaseConnection, p: Pagination) -> Result<Page<affiliate::Model>, ServiceError> {
    let (idx, per_page) = p.normalize();
    let paginator = affiliate::Entity::find()
        .order_by_asc(affiliate::Column::Code)
        .paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(idx).await?;
    Ok(Page { items, page: idx + 1, per_page, total })
}

pub async fn create_affiliate(db: &DatabaseConnection, input: AffiliateInput) -> Result<affiliate::Model, ServiceError> {
    let created = affiliate::create(db, input).await?;
    info!(event = "affiliate_created", affiliate_id = %created.id, code = %created.code);
    Ok(created)
}

/// Replace the editable fields; the click counter is left alone.
pub async fn update_affiliate(db: &DatabaseConnection, id: Uuid, input: AffiliateInput) -> Result<affiliate::Model, ServiceError> {
    let code = affiliate::validate(&input)?;
    let mut am: affiliate::ActiveModel = affiliate::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("affiliate"))?
        .into();
    am.code = Set(code);
    am.name = Set(input.name.trim().to_string());
    am.user_id = Set(input.user_id);
    am.commission_bps = Set(input.commission_bps);
    am.is_active = Set(input.is_active);
    Ok(am.update(db).await.map_err(|e| ModelError::from_db(e, "affiliate code"))?)
}

pub async fn delete_affiliate(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = affiliate::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("affiliate"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn clicks_increment_only_for_active_codes() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let code = format!("AF{}", &Uuid::new_v4().simple().to_string()[..10]);
        let input = AffiliateInput { code: code.clone(), name: "Chef Jo".into(), user_id: None, commission_bps: 500, is_active: true };
        let created = create_affiliate(&db, input.clone()).await?;

        track_click(&db, &code.to_lowercase()).await?;
        track_click(&db, &code).await?;
        let after = affiliate::Entity::find_by_id(created.id).one(&db).await?.unwrap();
        assert_eq!(after.clicks, 2);

        let mut paused = input;
        paused.is_active = false;
        let updated = update_affiliate(&db, created.id, paused).await?;
        assert_eq!(updated.clicks, 2);
        assert!(matches!(track_click(&db, &code).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(track_click(&db, "NO-SUCH-CODE-XYZ").await, Err(ServiceError::NotFound(_))));

        delete_affiliate(&db, created.id).await?;
        Ok(())
    }
}
