use utoipa::OpenApi;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterRequest { pub email: String, pub name: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

/// `CUSTOMER`, `AFFILIATE`, `ADMIN` or `SUPER_ADMIN`.
#[derive(ToSchema)]
pub struct SetRoleRequest { pub role: String }

/// One editor block: `type` selects the shape of `content`. Other top-level
/// keys are stored and returned as sent.
#[derive(ToSchema)]
pub struct BlockDoc {
    pub id: String,
    #[schema(example = "hero")]
    pub r#type: String,
    #[schema(value_type = Option<Object>)]
    pub content: Option<serde_json::Value>,
    #[schema(value_type = Option<Object>)]
    pub styles: Option<serde_json::Value>,
    pub order: i32,
}

#[derive(ToSchema)]
pub struct SavePageRequest { pub page: String, pub blocks: Vec<BlockDoc> }

#[derive(ToSchema)]
pub struct MealRequest {
    pub name: String,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub price_cents: i64,
    pub category: String,
    pub image_url: Option<String>,
    pub calories: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(ToSchema)]
pub struct PromotionRequest {
    pub code: String,
    pub description: Option<String>,
    /// `PERCENT` or `FIXED`
    pub discount_kind: String,
    pub discount_value: i32,
    pub max_uses: Option<i32>,
    pub starts_at: Option<String>,
    pub ends_at: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(ToSchema)]
pub struct AffiliateRequest {
    pub code: String,
    pub name: String,
    pub user_id: Option<Uuid>,
    pub commission_bps: i32,
    pub is_active: Option<bool>,
}

#[derive(ToSchema)]
pub struct TrackRequest { pub code: String }

#[derive(ToSchema)]
pub struct OrderLineRequest { pub meal_id: Uuid, pub quantity: i32 }

#[derive(ToSchema)]
pub struct PlaceOrderRequest {
    pub items: Vec<OrderLineRequest>,
    pub delivery_address: String,
    pub promotion_code: Option<String>,
    pub affiliate_code: Option<String>,
}

#[derive(ToSchema)]
pub struct OrderStatusRequest { pub status: String }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::auth::set_role,
        crate::routes::page_editor::load,
        crate::routes::page_editor::save,
        crate::routes::meals::list,
        crate::routes::meals::get,
        crate::routes::meals::admin_list,
        crate::routes::meals::create,
        crate::routes::meals::update,
        crate::routes::meals::delete,
        crate::routes::promotions::lookup,
        crate::routes::promotions::admin_list,
        crate::routes::promotions::create,
        crate::routes::promotions::update,
        crate::routes::promotions::delete,
        crate::routes::affiliates::track,
        crate::routes::affiliates::me,
        crate::routes::affiliates::admin_list,
        crate::routes::affiliates::create,
        crate::routes::affiliates::update,
        crate::routes::affiliates::delete,
        crate::routes::orders::place,
        crate::routes::orders::mine,
        crate::routes::orders::admin_list,
        crate::routes::orders::set_status,
        crate::routes::customers::list,
        crate::routes::customers::get,
        crate::routes::admin::stats,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            SetRoleRequest,
            BlockDoc,
            SavePageRequest,
            MealRequest,
            PromotionRequest,
            AffiliateRequest,
            TrackRequest,
            OrderLineRequest,
            PlaceOrderRequest,
            OrderStatusRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "page-editor"),
        (name = "catalog"),
        (name = "affiliates"),
        (name = "orders"),
        (name = "admin")
    )
)]
pub struct ApiDoc;
