use uuid::Uuid;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use chrono::Utc;
use tracing::info;

use common::{pagination::Pagination, types::Page};
use models::errors::ModelError;
use models::promotion::{self, PromotionInput};
use crate::errors::ServiceError;

/// A promotion that can be applied right now; anything else reads as not found.
pub async fn find_redeemable(db: &DatabaseConnection, code: &str) -> Result<promotion::Model, ServiceError> {
    let promo = promotion::Entity::find()
        .filter(promotion::Column::Code.eq(promotion::normalize_code(code)))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("promotion"))?;
    if !promo.is_redeemable(Utc::now().into()) {
        return Err(ServiceError::not_found("promotion"));
    }
    Ok(promo)
}

pub async fn list_promotions(db: &DatabaseConnection, p: Pagination) -> Result<Page<promotion::Model>, ServiceError> {
    let (idx, per_page) = p.normalize();
    let paginator = promotion::Entity::find()
        .order_by_desc(promotion::Column::CreatedAt)
        .paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(idx).await?;
    Ok(Page { items, page: idx + 1, per_page, total })
}

pub async fn create_promotion(db: &DatabaseConnection, input: PromotionInput) -> Result<promotion::Model, ServiceError> {
    let created = promotion::create(db, input).await?;
    info!(event = "promotion_created", promotion_id = %created.id, code = %created.code);
    Ok(created)
}

/// Replace the editable fields; the usage counter is left alone.
pub async fn update_promotion(db: &DatabaseConnection, id: Uuid, input: PromotionInput) -> Result<promotion::Model, ServiceError> {
    let code = promotion::validate(&input)?;
    let mut am: promotion::ActiveModel = promotion::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("promotion"))?
        .into();
    am.code = Set(code);
    am.description = Set(input.description);
    am.discount_kind = Set(input.discount_kind);
    am.discount_value = Set(input.discount_value);
    am.max_uses = Set(input.max_uses);
    am.starts_at = Set(input.starts_at);
    am.ends_at = Set(input.ends_at);
    am.is_active = Set(input.is_active);
    Ok(am.update(db).await.map_err(|e| ModelError::from_db(e, "promotion code"))?)
}

pub async fn delete_promotion(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = promotion::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("promotion"));
    }
    Ok(())
}
