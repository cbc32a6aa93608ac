use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, user};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "affiliate")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    #[sea_orm(unique)]
    pub code: String,
    pub name: String,
    /// Commission in basis points of an order total.
    pub commission_bps: i32,
    pub clicks: i64,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { User }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AffiliateInput {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    pub commission_bps: i32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool { true }

pub fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}

pub fn validate(input: &AffiliateInput) -> Result<String, errors::ModelError> {
    let code = normalize_code(&input.code);
    if code.is_empty() || code.len() > 32 || !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(errors::ModelError::Validation("code must be 1-32 of A-Z, 0-9, '-' or '_'".into()));
    }
    if input.name.trim().is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    if !(0..=10_000).contains(&input.commission_bps) {
        return Err(errors::ModelError::Validation("commission_bps must be within 0..=10000".into()));
    }
    Ok(code)
}

/// Commission owed on one order total.
pub fn commission_for(total_cents: i64, commission_bps: i32) -> i64 {
    total_cents * i64::from(commission_bps) / 10_000
}

pub async fn create(db: &DatabaseConnection, input: AffiliateInput) -> Result<Model, errors::ModelError> {
    let code = validate(&input)?;
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(input.user_id),
        code: Set(code),
        name: Set(input.name.trim().to_string()),
        commission_bps: Set(input.commission_bps),
        clicks: Set(0),
        is_active: Set(input.is_active),
        created_at: Set(Utc::now().into()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::from_db(e, "affiliate code"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commission_uses_basis_points() {
        assert_eq!(commission_for(10_000, 500), 500);
        assert_eq!(commission_for(1999, 1000), 199);
        assert_eq!(commission_for(5000, 0), 0);
    }

    #[test]
    fn validate_rejects_out_of_range_commission() {
        let mut input = AffiliateInput { code: "chefjo".into(), name: "Chef Jo".into(), user_id: None, commission_bps: 750, is_active: true };
        assert_eq!(validate(&input).unwrap(), "CHEFJO");
        input.commission_bps = 10_001;
        assert!(validate(&input).is_err());
    }
}
