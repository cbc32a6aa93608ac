use uuid::Uuid;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use chrono::Utc;
use tracing::info;

use common::{pagination::Pagination, types::Page};
use models::errors::ModelError;
use models::meal::{self, MealInput};
use crate::errors::ServiceError;

/// Active meals ordered by name, optionally narrowed to one category.
pub async fn list_active(db: &DatabaseConnection, category: Option<&str>) -> Result<Vec<meal::Model>, ServiceError> {
    let mut query = meal::Entity::find().filter(meal::Column::IsActive.eq(true));
    if let Some(category) = category.map(str::trim).filter(|c| !c.is_empty()) {
        query = query.filter(meal::Column::Category.eq(category));
    }
    Ok(query.order_by_asc(meal::Column::Name).all(db).await?)
}

pub async fn get_active_by_slug(db: &DatabaseConnection, slug: &str) -> Result<meal::Model, ServiceError> {
    meal::Entity::find()
        .filter(meal::Column::Slug.eq(slug))
        .filter(meal::Column::IsActive.eq(true))
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("meal"))
}

/// Every meal, active or not, for the back office.
pub async fn list_all(db: &DatabaseConnection, p: Pagination) -> Result<Page<meal::Model>, ServiceError> {
    let (idx, per_page) = p.normalize();
    let paginator = meal::Entity::find().order_by_asc(meal::Column::Name).paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(idx).await?;
    Ok(Page { items, page: idx + 1, per_page, total })
}

pub async fn create_meal(db: &DatabaseConnection, input: MealInput) -> Result<meal::Model, ServiceError> {
    let created = meal::create(db, input).await?;
    info!(event = "meal_created", meal_id = %created.id, slug = %created.slug);
    Ok(created)
}

/// Replace all editable fields of a meal.
pub async fn update_meal(db: &DatabaseConnection, id: Uuid, input: MealInput) -> Result<meal::Model, ServiceError> {
    let slug = meal::validate(&input)?;
    let mut am: meal::ActiveModel = meal::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("meal"))?
        .into();
    am.name = Set(input.name.trim().to_string());
    am.slug = Set(slug);
    am.description = Set(input.description);
    am.price_cents = Set(input.price_cents);
    am.category = Set(input.category.trim().to_string());
    am.image_url = Set(input.image_url);
    am.calories = Set(input.calories);
    am.is_active = Set(input.is_active);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await.map_err(|e| ModelError::from_db(e, "meal slug"))?;
    Ok(updated)
}

pub async fn delete_meal(db: &DatabaseConnection, id: Uuid) -> Result<(), ServiceError> {
    let res = meal::Entity::delete_by_id(id).exec(db).await?;
    if res.rows_affected == 0 {
        return Err(ServiceError::not_found("meal"));
    }
    info!(event = "meal_deleted", meal_id = %id);
    Ok(())
}
