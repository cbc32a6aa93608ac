use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscountKind {
    #[sea_orm(string_value = "PERCENT")]
    Percent,
    #[sea_orm(string_value = "FIXED")]
    Fixed,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "promotion")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub code: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub discount_kind: DiscountKind,
    pub discount_value: i32,
    pub max_uses: Option<i32>,
    pub uses: i32,
    pub starts_at: Option<DateTimeWithTimeZone>,
    pub ends_at: Option<DateTimeWithTimeZone>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PromotionInput {
    pub code: String,
    #[serde(default)]
    pub description: String,
    pub discount_kind: DiscountKind,
    pub discount_value: i32,
    #[serde(default)]
    pub max_uses: Option<i32>,
    #[serde(default)]
    pub starts_at: Option<DateTimeWithTimeZone>,
    #[serde(default)]
    pub ends_at: Option<DateTimeWithTimeZone>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool { true }

pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

pub fn validate(input: &PromotionInput) -> Result<String, errors::ModelError> {
    let code = normalize_code(&input.code);
    if code.is_empty() || code.len() > 32 || !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(errors::ModelError::Validation("code must be 1-32 of A-Z, 0-9, '-' or '_'".into()));
    }
    match input.discount_kind {
        DiscountKind::Percent if !(1..=100).contains(&input.discount_value) => {
            return Err(errors::ModelError::Validation("percent discount must be within 1..=100".into()));
        }
        DiscountKind::Fixed if input.discount_value <= 0 => {
            return Err(errors::ModelError::Validation("fixed discount must be > 0".into()));
        }
        _ => {}
    }
    if matches!(input.max_uses, Some(m) if m <= 0) {
        return Err(errors::ModelError::Validation("max_uses must be > 0".into()));
    }
    if let (Some(s), Some(e)) = (input.starts_at, input.ends_at) {
        if e <= s {
            return Err(errors::ModelError::Validation("ends_at must be after starts_at".into()));
        }
    }
    Ok(code)
}

impl Model {
    /// Whether the code can be applied at `now`.
    pub fn is_redeemable(&self, now: DateTimeWithTimeZone) -> bool {
        if !self.is_active {
            return false;
        }
        if matches!(self.starts_at, Some(s) if now < s) || matches!(self.ends_at, Some(e) if now >= e) {
            return false;
        }
        !matches!(self.max_uses, Some(max) if self.uses >= max)
    }

    /// Discount in cents for a subtotal; never exceeds the subtotal.
    pub fn discount_for(&self, subtotal_cents: i64) -> i64 {
        let raw = match self.discount_kind {
            DiscountKind::Percent => subtotal_cents * i64::from(self.discount_value) / 100,
            DiscountKind::Fixed => i64::from(self.discount_value),
        };
        raw.clamp(0, subtotal_cents.max(0))
    }
}

pub async fn create(db: &DatabaseConnection, input: PromotionInput) -> Result<Model, errors::ModelError> {
    let code = validate(&input)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        code: Set(code),
        description: Set(input.description),
        discount_kind: Set(input.discount_kind),
        discount_value: Set(input.discount_value),
        max_uses: Set(input.max_uses),
        uses: Set(0),
        starts_at: Set(input.starts_at),
        ends_at: Set(input.ends_at),
        is_active: Set(input.is_active),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::from_db(e, "promotion code"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn promo(kind: DiscountKind, value: i32) -> Model {
        Model {
            id: Uuid::new_v4(),
            code: "WELCOME".into(),
            description: String::new(),
            discount_kind: kind,
            discount_value: value,
            max_uses: None,
            uses: 0,
            starts_at: None,
            ends_at: None,
            is_active: true,
            created_at: Utc::now().into(),
        }
    }

    #[test]
    fn percent_and_fixed_discounts_are_capped() {
        assert_eq!(promo(DiscountKind::Percent, 15).discount_for(2000), 300);
        assert_eq!(promo(DiscountKind::Fixed, 500).discount_for(2000), 500);
        assert_eq!(promo(DiscountKind::Fixed, 5000).discount_for(2000), 2000);
    }

    #[test]
    fn redeemable_respects_window_and_usage() {
        let now: DateTimeWithTimeZone = Utc::now().into();
        let mut p = promo(DiscountKind::Percent, 10);
        assert!(p.is_redeemable(now));

        p.max_uses = Some(2);
        p.uses = 2;
        assert!(!p.is_redeemable(now));

        p.uses = 0;
        p.starts_at = Some((Utc::now() + Duration::hours(1)).into());
        assert!(!p.is_redeemable(now));

        p.starts_at = None;
        p.ends_at = Some((Utc::now() - Duration::hours(1)).into());
        assert!(!p.is_redeemable(now));

        p.ends_at = None;
        p.is_active = false;
        assert!(!p.is_redeemable(now));
    }

    #[test]
    fn validate_normalizes_code_and_bounds() {
        let mut input = PromotionInput {
            code: " spring-10 ".into(),
            description: String::new(),
            discount_kind: DiscountKind::Percent,
            discount_value: 10,
            max_uses: None,
            starts_at: None,
            ends_at: None,
            is_active: true,
        };
        assert_eq!(validate(&input).unwrap(), "SPRING-10");
        input.discount_value = 150;
        assert!(validate(&input).is_err());
        input.discount_kind = DiscountKind::Fixed;
        assert!(validate(&input).is_ok());
        input.code = "bad code".into();
        assert!(validate(&input).is_err());
    }
}
