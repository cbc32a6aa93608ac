use std::net::SocketAddr;

use axum::Router;
use migration::MigratorTrait;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes::{self, auth::ServerState};
use service::auth::AuthConfig;

struct TestApp {
    base_url: String,
    admin_email: String,
}

const ADMIN_PASSWORD: &str = "RootPass123";

async fn start_server() -> anyhow::Result<TestApp> {
    // Ignore any local config file; tests run against DATABASE_URL only
    std::env::set_var("CONFIG_PATH", "/nonexistent-config-for-tests.toml");
    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("DATABASE_URL missing; skip e2e tests");
        return Err(anyhow::anyhow!("missing DATABASE_URL"));
    }

    let db = models::db::connect().await?;
    if let Err(e) = migration::Migrator::up(&db, None).await { eprintln!("migrations notice: {}", e); }

    let state = ServerState::new(
        db,
        AuthConfig { jwt_secret: "test-secret".into(), token_ttl_hours: 1, password_algorithm: "argon2".into() },
    );
    let admin_email = format!("root_{}@example.com", Uuid::new_v4().simple());
    state.auth.ensure_super_admin(&admin_email, ADMIN_PASSWORD).await?;

    let app: Router = routes::build_router(state, CorsLayer::very_permissive());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });

    Ok(TestApp { base_url: format!("http://{}", addr), admin_email })
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("reqwest client")
}

async fn login(c: &reqwest::Client, base: &str, email: &str, password: &str) -> anyhow::Result<String> {
    let res = c.post(format!("{}/api/auth/login", base))
        .json(&json!({"email": email, "password": password}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert!(res.headers().get("set-cookie").is_some());
    let body = res.json::<Value>().await?;
    Ok(body["token"].as_str().unwrap_or_default().to_string())
}

#[tokio::test]
async fn e2e_register_login_me_with_cookie() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let Ok(app) = start_server().await else { return Ok(()) };
    let c = client();
    let email = format!("user_{}@example.com", Uuid::new_v4().simple());

    let res = c.post(format!("{}/api/auth/register", app.base_url))
        .json(&json!({"email": email, "name": "Tester", "password": "S3curePass!"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);

    let res = c.post(format!("{}/api/auth/register", app.base_url))
        .json(&json!({"email": email, "name": "Tester", "password": "S3curePass!"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CONFLICT);

    login(&c, &app.base_url, &email, "S3curePass!").await?;
    let me = c.get(format!("{}/api/auth/me", app.base_url)).send().await?;
    assert_eq!(me.status(), HttpStatusCode::OK);
    let me = me.json::<Value>().await?;
    assert_eq!(me["role"], "CUSTOMER");

    let res = c.post(format!("{}/api/auth/login", app.base_url))
        .json(&json!({"email": email, "password": "wrong-pass"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn e2e_page_editor_round_trip_against_postgres() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let Ok(app) = start_server().await else { return Ok(()) };
    let c = client();
    let page = format!("e2e-{}", Uuid::new_v4().simple());
    let blocks = json!([
        {"id": "b1", "type": "hero", "content": {"heading": "Welcome", "buttonText": "Order"}, "styles": {"padding": "2rem"}, "order": 0},
        {"id": "b2", "type": "spacer", "content": {"height": "24px"}, "styles": {}, "order": 1}
    ]);

    let res = c.post(format!("{}/api/page-editor", app.base_url))
        .json(&json!({"page": page, "blocks": blocks}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);

    login(&c, &app.base_url, &app.admin_email, ADMIN_PASSWORD).await?;
    for body in [json!({"page": page, "blocks": []}), json!({"page": page, "blocks": blocks})] {
        let res = c.post(format!("{}/api/page-editor", app.base_url)).json(&body).send().await?;
        assert_eq!(res.status(), HttpStatusCode::OK);
    }

    let res = c.get(format!("{}/api/page-editor?page={}", app.base_url, page)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, json!({"blocks": blocks}));
    Ok(())
}

#[tokio::test]
async fn e2e_catalog_order_and_admin_flow() -> anyhow::Result<()> {
    if std::env::var("SKIP_DB_TESTS").is_ok() { return Ok(()); }
    let Ok(app) = start_server().await else { return Ok(()) };
    let tag = Uuid::new_v4().simple().to_string();

    let admin = client();
    login(&admin, &app.base_url, &app.admin_email, ADMIN_PASSWORD).await?;
    let res = admin.post(format!("{}/api/admin/meals", app.base_url))
        .json(&json!({"name": format!("Miso Salmon {tag}"), "price_cents": 1450, "category": format!("e2e-{tag}")}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let meal = res.json::<Value>().await?;

    let res = reqwest::get(format!("{}/api/meals/{}", app.base_url, meal["slug"].as_str().unwrap_or_default())).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let customer = client();
    let email = format!("buyer_{tag}@example.com");
    customer.post(format!("{}/api/auth/register", app.base_url))
        .json(&json!({"email": email, "name": "Buyer", "password": "BuyerPass1"}))
        .send().await?;
    login(&customer, &app.base_url, &email, "BuyerPass1").await?;

    let res = customer.get(format!("{}/api/admin/stats", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::UNAUTHORIZED);

    let res = customer.post(format!("{}/api/orders", app.base_url))
        .json(&json!({"items": [{"meal_id": meal["id"], "quantity": 2}], "delivery_address": "5 Pier Rd"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let order = res.json::<Value>().await?;
    assert_eq!(order["total_cents"], 2900);

    let res = admin.patch(format!("{}/api/admin/orders/{}/status", app.base_url, order["id"].as_str().unwrap_or_default()))
        .json(&json!({"status": "DELIVERED"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let res = admin.patch(format!("{}/api/admin/orders/{}/status", app.base_url, order["id"].as_str().unwrap_or_default()))
        .json(&json!({"status": "CONFIRMED"}))
        .send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);

    let res = admin.get(format!("{}/api/admin/stats", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let stats = res.json::<Value>().await?;
    assert!(stats["orders"].as_u64().unwrap_or_default() >= 1);
    Ok(())
}
