use sea_orm::{entity::prelude::*, Set, DatabaseConnection};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "meal")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub price_cents: i64,
    pub category: String,
    pub image_url: Option<String>,
    pub calories: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Fields accepted when creating or replacing a meal.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct MealInput {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    pub price_cents: i64,
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub calories: Option<i32>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool { true }

/// Lowercase, with every run of non-alphanumerics collapsed to a single `-`.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Validate an input and resolve its slug.
pub fn validate(input: &MealInput) -> Result<String, errors::ModelError> {
    if input.name.trim().is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    if input.category.trim().is_empty() {
        return Err(errors::ModelError::Validation("category required".into()));
    }
    if input.price_cents <= 0 {
        return Err(errors::ModelError::Validation("price_cents must be > 0".into()));
    }
    if matches!(input.calories, Some(c) if c < 0) {
        return Err(errors::ModelError::Validation("calories must be >= 0".into()));
    }
    let slug = match input.slug.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => slugify(s),
        _ => slugify(&input.name),
    };
    if slug.is_empty() {
        return Err(errors::ModelError::Validation("slug must contain letters or digits".into()));
    }
    Ok(slug)
}

pub async fn create(db: &DatabaseConnection, input: MealInput) -> Result<Model, errors::ModelError> {
    let slug = validate(&input)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(input.name.trim().to_string()),
        slug: Set(slug),
        description: Set(input.description),
        price_cents: Set(input.price_cents),
        category: Set(input.category.trim().to_string()),
        image_url: Set(input.image_url),
        calories: Set(input.calories),
        is_active: Set(input.is_active),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::from_db(e, "meal slug"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, price: i64) -> MealInput {
        MealInput {
            name: name.into(),
            slug: None,
            description: String::new(),
            price_cents: price,
            category: "bowls".into(),
            image_url: None,
            calories: None,
            is_active: true,
        }
    }

    #[test]
    fn slugify_collapses_separators() {
        assert_eq!(slugify("Teriyaki  Chicken & Rice!"), "teriyaki-chicken-rice");
        assert_eq!(slugify("--Vegan Bowl--"), "vegan-bowl");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn validate_derives_slug_and_checks_price() {
        assert_eq!(validate(&input("Salmon Poke", 1299)).unwrap(), "salmon-poke");
        assert!(validate(&input("Salmon Poke", 0)).is_err());
        let mut explicit = input("Salmon Poke", 1299);
        explicit.slug = Some("Poke Special".into());
        assert_eq!(validate(&explicit).unwrap(), "poke-special");
    }
}
