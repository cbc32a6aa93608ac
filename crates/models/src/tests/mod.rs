//! Database-backed entity tests. Skipped when `SKIP_DB_TESTS` is set or no
//! database is reachable.

use migration::MigratorTrait;
use sea_orm::{DatabaseConnection, EntityTrait};
use uuid::Uuid;

use crate::{db, errors::ModelError, meal, promotion, user, user_credentials};

async fn setup_test_db() -> Option<DatabaseConnection> {
    if std::env::var("SKIP_DB_TESTS").is_ok() {
        return None;
    }
    let db = match db::connect().await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("skip: cannot connect to db: {}", e);
            return None;
        }
    };
    if let Err(e) = migration::Migrator::up(&db, None).await {
        eprintln!("skip: migrate up failed: {}", e);
        return None;
    }
    Some(db)
}

fn meal_input(name: &str) -> meal::MealInput {
    meal::MealInput {
        name: name.to_string(),
        slug: None,
        description: "test meal".into(),
        price_cents: 1450,
        category: "bowls".into(),
        image_url: None,
        calories: Some(640),
        is_active: true,
    }
}

#[tokio::test]
async fn test_user_and_credentials_crud() -> anyhow::Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let email = format!("model_{}@Example.com", Uuid::new_v4());
    let u = user::create(&db, &email, "Model User", user::Role::Customer).await?;
    assert_eq!(u.email, email.to_lowercase());
    assert_eq!(u.role, user::Role::Customer);

    let found = user::find_by_email(&db, &email).await?;
    assert_eq!(found.map(|f| f.id), Some(u.id));

    let dup = user::create(&db, &email, "Again", user::Role::Customer).await;
    assert!(matches!(dup, Err(ModelError::Conflict(_))));

    let promoted = user::set_role(&db, u.id, user::Role::Admin).await?;
    assert_eq!(promoted.role, user::Role::Admin);

    let c1 = user_credentials::upsert_password(&db, u.id, "hash-one".into(), "argon2").await?;
    let c2 = user_credentials::upsert_password(&db, u.id, "hash-two".into(), "argon2").await?;
    assert_eq!(c1.id, c2.id);
    assert_eq!(c2.password_hash, "hash-two");

    user::Entity::delete_by_id(u.id).exec(&db).await?;
    assert!(user_credentials::find_by_user(&db, u.id).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_meal_slug_is_unique() -> anyhow::Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let name = format!("Model Meal {}", Uuid::new_v4());
    let m = meal::create(&db, meal_input(&name)).await?;
    assert_eq!(m.slug, meal::slugify(&name));

    let dup = meal::create(&db, meal_input(&name)).await;
    assert!(matches!(dup, Err(ModelError::Conflict(_))));

    meal::Entity::delete_by_id(m.id).exec(&db).await?;
    Ok(())
}

#[tokio::test]
async fn test_promotion_code_is_uppercased() -> anyhow::Result<()> {
    let Some(db) = setup_test_db().await else { return Ok(()) };

    let code = format!("m{}", &Uuid::new_v4().simple().to_string()[..10]);
    let p = promotion::create(&db, promotion::PromotionInput {
        code: code.clone(),
        description: "model test".into(),
        discount_kind: promotion::DiscountKind::Percent,
        discount_value: 20,
        max_uses: Some(5),
        starts_at: None,
        ends_at: None,
        is_active: true,
    })
    .await?;
    assert_eq!(p.code, code.to_ascii_uppercase());
    assert_eq!(p.uses, 0);

    promotion::Entity::delete_by_id(p.id).exec(&db).await?;
    Ok(())
}
