use std::collections::HashMap;

use uuid::Uuid;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Deserialize;
use chrono::Utc;
use tracing::{info, instrument};

use common::{pagination::Pagination, types::Page};
use models::order::{self, OrderItem, OrderItems, OrderStatus};
use models::{affiliate, meal, promotion};
use crate::errors::ServiceError;

pub const MAX_QUANTITY: i32 = 50;

#[derive(Clone, Debug, Deserialize)]
pub struct OrderLineInput {
    pub meal_id: Uuid,
    pub quantity: i32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct PlaceOrderInput {
    pub items: Vec<OrderLineInput>,
    pub delivery_address: String,
    #[serde(default)]
    pub promotion_code: Option<String>,
    #[serde(default)]
    pub affiliate_code: Option<String>,
}

/// Price each line from the catalog snapshot in `meals` (active meals only).
pub fn price_lines(lines: &[OrderLineInput], meals: &HashMap<Uuid, meal::Model>) -> Result<OrderItems, ServiceError> {
    if lines.is_empty() {
        return Err(ServiceError::Validation("order needs at least one item".into()));
    }
    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
        if !(1..=MAX_QUANTITY).contains(&line.quantity) {
            return Err(ServiceError::Validation(format!("quantity must be within 1..={MAX_QUANTITY}")));
        }
        let meal = meals
            .get(&line.meal_id)
            .filter(|m| m.is_active)
            .ok_or_else(|| ServiceError::Validation(format!("meal {} is not available", line.meal_id)))?;
        items.push(OrderItem {
            meal_id: meal.id,
            name: meal.name.clone(),
            unit_price_cents: meal.price_cents,
            quantity: line.quantity,
        });
    }
    Ok(OrderItems(items))
}

/// Place an order for `user_id`. Pricing, promotion redemption and the insert
/// share one transaction.
#[instrument(skip(db, input), fields(lines = input.items.len()))]
pub async fn place_order(db: &DatabaseConnection, user_id: Uuid, input: PlaceOrderInput) -> Result<order::Model, ServiceError> {
    let address = input.delivery_address.trim();
    if address.is_empty() {
        return Err(ServiceError::Validation("delivery_address required".into()));
    }

    let txn = db.begin().await?;

    let ids: Vec<Uuid> = input.items.iter().map(|l| l.meal_id).collect();
    let meals: HashMap<Uuid, meal::Model> = meal::Entity::find()
        .filter(meal::Column::Id.is_in(ids))
        .all(&txn)
        .await?
        .into_iter()
        .map(|m| (m.id, m))
        .collect();
    let items = price_lines(&input.items, &meals)?;
    let subtotal = items.subtotal();

    let mut discount = 0;
    let mut promotion_code = None;
    if let Some(code) = input.promotion_code.as_deref().map(promotion::normalize_code).filter(|c| !c.is_empty()) {
        let promo = promotion::Entity::find()
            .filter(promotion::Column::Code.eq(code.as_str()))
            .one(&txn)
            .await?
            .filter(|p| p.is_redeemable(Utc::now().into()))
            .ok_or_else(|| ServiceError::Validation("promotion code is not valid".into()))?;
        // Conditional bump so concurrent orders cannot overrun max_uses.
        let bumped = promotion::Entity::update_many()
            .col_expr(promotion::Column::Uses, Expr::col(promotion::Column::Uses).add(1))
            .filter(promotion::Column::Id.eq(promo.id))
            .filter(
                Condition::any()
                    .add(promotion::Column::MaxUses.is_null())
                    .add(Expr::col(promotion::Column::Uses).lt(Expr::col(promotion::Column::MaxUses))),
            )
            .exec(&txn)
            .await?;
        if bumped.rows_affected == 0 {
            return Err(ServiceError::Validation("promotion code is no longer available".into()));
        }
        discount = promo.discount_for(subtotal);
        promotion_code = Some(promo.code);
    }

    let affiliate_code = match input.affiliate_code.as_deref().map(affiliate::normalize_code).filter(|c| !c.is_empty()) {
        Some(code) => affiliate::Entity::find()
            .filter(affiliate::Column::Code.eq(code.as_str()))
            .filter(affiliate::Column::IsActive.eq(true))
            .one(&txn)
            .await?
            .map(|a| a.code),
        None => None,
    };

    let now = Utc::now().into();
    let created = order::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        status: Set(OrderStatus::Pending),
        items: Set(items),
        subtotal_cents: Set(subtotal),
        discount_cents: Set(discount),
        total_cents: Set(subtotal - discount),
        promotion_code: Set(promotion_code),
        affiliate_code: Set(affiliate_code),
        delivery_address: Set(address.to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    info!(event = "order_placed", order_id = %created.id, user_id = %user_id, total_cents = created.total_cents);
    Ok(created)
}

/// The caller's own orders, newest first.
pub async fn list_for_user(db: &DatabaseConnection, user_id: Uuid, p: Pagination) -> Result<Page<order::Model>, ServiceError> {
    let (idx, per_page) = p.normalize();
    let paginator = order::Entity::find()
        .filter(order::Column::UserId.eq(user_id))
        .order_by_desc(order::Column::CreatedAt)
        .paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(idx).await?;
    Ok(Page { items, page: idx + 1, per_page, total })
}

pub async fn list_all(db: &DatabaseConnection, status: Option<OrderStatus>, p: Pagination) -> Result<Page<order::Model>, ServiceError> {
    let (idx, per_page) = p.normalize();
    let mut query = order::Entity::find();
    if let Some(status) = status {
        query = query.filter(order::Column::Status.eq(status));
    }
    let paginator = query.order_by_desc(order::Column::CreatedAt).paginate(db, per_page);
    let total = paginator.num_items().await?;
    let items = paginator.fetch_page(idx).await?;
    Ok(Page { items, page: idx + 1, per_page, total })
}

#[instrument(skip(db))]
pub async fn update_status(db: &DatabaseConnection, id: Uuid, next: OrderStatus) -> Result<order::Model, ServiceError> {
    let current = order::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("order"))?;
    if !current.status.can_transition_to(next) {
        return Err(ServiceError::Validation(format!("cannot move order from {:?} to {:?}", current.status, next)));
    }
    let from = current.status;
    let mut am: order::ActiveModel = current.into();
    am.status = Set(next);
    am.updated_at = Set(Utc::now().into());
    let updated = am.update(db).await?;
    info!(event = "order_status_changed", order_id = %id, from = ?from, to = ?next);
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use models::{promotion::{DiscountKind, PromotionInput}, user};

    fn meal(price: i64, active: bool) -> meal::Model {
        let now = Utc::now().into();
        meal::Model {
            id: Uuid::new_v4(),
            name: "Bowl".into(),
            slug: format!("bowl-{}", Uuid::new_v4()),
            description: String::new(),
            price_cents: price,
            category: "bowls".into(),
            image_url: None,
            calories: None,
            is_active: active,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn price_lines_uses_catalog_prices() {
        let m = meal(1250, true);
        let catalog = HashMap::from([(m.id, m.clone())]);
        let items = price_lines(&[OrderLineInput { meal_id: m.id, quantity: 3 }], &catalog).unwrap();
        assert_eq!(items.subtotal(), 3750);
        assert_eq!(items.0[0].name, "Bowl");
    }

    #[test]
    fn price_lines_rejects_bad_lines() {
        let active = meal(900, true);
        let inactive = meal(900, false);
        let catalog = HashMap::from([(active.id, active.clone()), (inactive.id, inactive.clone())]);
        assert!(price_lines(&[], &catalog).is_err());
        assert!(price_lines(&[OrderLineInput { meal_id: active.id, quantity: 0 }], &catalog).is_err());
        assert!(price_lines(&[OrderLineInput { meal_id: active.id, quantity: 51 }], &catalog).is_err());
        assert!(price_lines(&[OrderLineInput { meal_id: inactive.id, quantity: 1 }], &catalog).is_err());
        assert!(price_lines(&[OrderLineInput { meal_id: Uuid::new_v4(), quantity: 1 }], &catalog).is_err());
    }

    #[tokio::test]
    async fn place_order_applies_single_use_promotion_once() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await else { return Ok(()) };
        let tag = Uuid::new_v4().simple().to_string();
        let customer = user::create(&db, &format!("buyer_{tag}@example.com"), "Buyer", user::Role::Customer).await?;
        let dish = models::meal::create(&db, models::meal::MealInput {
            name: format!("Order Bowl {tag}"),
            slug: None,
            description: String::new(),
            price_cents: 1000,
            category: "bowls".into(),
            image_url: None,
            calories: None,
            is_active: true,
        }).await?;
        let code = format!("ONCE{}", &tag[..8]);
        promotion::create(&db, PromotionInput {
            code: code.clone(),
            description: String::new(),
            discount_kind: DiscountKind::Percent,
            discount_value: 20,
            max_uses: Some(1),
            starts_at: None,
            ends_at: None,
            is_active: true,
        }).await?;

        let input = PlaceOrderInput {
            items: vec![OrderLineInput { meal_id: dish.id, quantity: 2 }],
            delivery_address: "1 Market St".into(),
            promotion_code: Some(code.to_lowercase()),
            affiliate_code: Some("UNKNOWN-AFFILIATE".into()),
        };
        let placed = place_order(&db, customer.id, input.clone()).await?;
        assert_eq!(placed.subtotal_cents, 2000);
        assert_eq!(placed.discount_cents, 400);
        assert_eq!(placed.total_cents, 1600);
        assert_eq!(placed.affiliate_code, None);
        assert_eq!(placed.status, OrderStatus::Pending);

        assert!(matches!(place_order(&db, customer.id, input).await, Err(ServiceError::Validation(_))));

        assert!(matches!(update_status(&db, placed.id, OrderStatus::Delivered).await, Err(ServiceError::Validation(_))));
        let confirmed = update_status(&db, placed.id, OrderStatus::Confirmed).await?;
        assert_eq!(confirmed.status, OrderStatus::Confirmed);

        let mine = list_for_user(&db, customer.id, Pagination::default()).await?;
        assert_eq!(mine.total, 1);
        Ok(())
    }
}
