use axum::{
    middleware,
    routing::{get, patch, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;

use crate::metrics;
use crate::openapi::ApiDoc;

pub mod admin;
pub mod affiliates;
pub mod auth;
pub mod customers;
pub mod meals;
pub mod orders;
pub mod page_editor;
pub mod promotions;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router: public storefront, customer, affiliate and admin routes.
pub fn build_router(state: auth::ServerState, cors: CorsLayer) -> Router {
    let storefront = Router::new()
        .route("/api/meals", get(meals::list))
        .route("/api/meals/:slug", get(meals::get))
        .route("/api/promotions/:code", get(promotions::lookup))
        .route("/api/affiliates/track", post(affiliates::track))
        .route("/api/affiliates/me", get(affiliates::me))
        .route("/api/orders", get(orders::mine).post(orders::place))
        .route("/api/page-editor", get(page_editor::load).post(page_editor::save));

    let account = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/auth/me", get(auth::me));

    let admin_routes = Router::new()
        .route("/api/admin/stats", get(admin::stats))
        .route("/api/admin/users/:id/role", patch(auth::set_role))
        .route("/api/admin/meals", get(meals::admin_list).post(meals::create))
        .route("/api/admin/meals/:id", put(meals::update).delete(meals::delete))
        .route("/api/admin/promotions", get(promotions::admin_list).post(promotions::create))
        .route("/api/admin/promotions/:id", put(promotions::update).delete(promotions::delete))
        .route("/api/admin/affiliates", get(affiliates::admin_list).post(affiliates::create))
        .route("/api/admin/affiliates/:id", put(affiliates::update).delete(affiliates::delete))
        .route("/api/admin/orders", get(orders::admin_list))
        .route("/api/admin/orders/:id/status", patch(orders::set_status))
        .route("/api/admin/customers", get(customers::list))
        .route("/api/admin/customers/:id", get(customers::get));

    let api = storefront
        .merge(account)
        .merge(admin_routes)
        .route_layer(middleware::from_fn(metrics::track_http));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics::metrics_handler))
        .merge(api)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                // 5xx and transport failures
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
