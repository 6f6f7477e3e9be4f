//! Admin routes. Everything except `login` requires [`AdminAuth`].

use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::order::OrderStatus;
use crate::domain::product::{NewProduct, ProductPatch};
use crate::errors::AppError;
use crate::handlers::auth::AdminAuth;
use crate::handlers::orders::OrderResponse;
use crate::handlers::products::{
    CreateProductRequest, ProductEnvelope, ProductListResponse, ProductResponse, UpdateProductRequest,
};
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    #[schema(format = Password)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListOrdersParams {
    /// Page number (1-based). Defaults to 1.
    #[serde(default = "default_page")]
    pub page: i64,
    /// Number of items per page. Defaults to 20, maximum 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    20
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderListResponse {
    pub success: bool,
    pub orders: Vec<OrderResponse>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OrderEnvelope {
    pub success: bool,
    pub order: OrderResponse,
}

/// Status arrives as free text so an unknown value can be answered with the
/// allowed set instead of a generic deserialization error.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeleteResponse {
    pub success: bool,
    pub message: String,
}

// ── Auth ─────────────────────────────────────────────────────────────────────

/// POST /api/admin/login
#[utoipa::path(
    post,
    path = "/api/admin/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Signed admin token", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorBody),
    ),
    tag = "admin"
)]
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let body = body.into_inner();
    let issued = state.auth.login(&body.username, &body.password)?;

    Ok(HttpResponse::Ok().json(LoginResponse {
        success: true,
        token: issued.token,
        expires_at: issued.expires_at,
    }))
}

// ── Orders ───────────────────────────────────────────────────────────────────

/// GET /api/admin/orders
///
/// Newest orders first, each with its lines and confirmation outcome.
#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(ListOrdersParams),
    responses(
        (status = 200, description = "Paginated list of orders", body = OrderListResponse),
        (status = 401, description = "Missing bearer token"),
        (status = 403, description = "Invalid or expired token"),
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_orders(
    _admin: AdminAuth,
    state: web::Data<AppState>,
    query: web::Query<ListOrdersParams>,
) -> Result<HttpResponse, AppError> {
    let params = query.into_inner();
    let page = params.page.max(1);
    let limit = params.limit.clamp(1, 100);
    let orders = state.orders.clone();

    let result = web::block(move || orders.list_orders(page, limit)).await??;

    Ok(HttpResponse::Ok().json(OrderListResponse {
        success: true,
        orders: result.items.into_iter().map(OrderResponse::from).collect(),
        total: result.total,
        page,
        limit,
    }))
}

/// GET /api/admin/orders/{id}
#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Order found", body = OrderEnvelope),
        (status = 404, description = "Order not found", body = crate::errors::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn get_order(
    _admin: AdminAuth,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let orders = state.orders.clone();

    let order = web::block(move || orders.get_order(id)).await??;

    Ok(HttpResponse::Ok().json(OrderEnvelope {
        success: true,
        order: order.into(),
    }))
}

/// PUT /api/admin/orders/{id}/status
///
/// An unknown status is rejected before the store is touched.
#[utoipa::path(
    put,
    path = "/api/admin/orders/{id}/status",
    params(("id" = Uuid, Path, description = "Order UUID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = OrderEnvelope),
        (status = 400, description = "Unknown status", body = crate::errors::ErrorBody),
        (status = 404, description = "Order not found", body = crate::errors::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn update_order_status(
    admin: AdminAuth,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let status: OrderStatus = body.status.parse().map_err(AppError::BadRequest)?;
    let orders = state.orders.clone();

    let order = web::block(move || orders.update_status(id, status)).await??;
    log::info!("Order {} set to {} by {}", id, status, admin.0.sub);

    Ok(HttpResponse::Ok().json(OrderEnvelope {
        success: true,
        order: order.into(),
    }))
}

// ── Products ─────────────────────────────────────────────────────────────────

/// GET /api/admin/products
#[utoipa::path(
    get,
    path = "/api/admin/products",
    responses((status = 200, description = "All products", body = ProductListResponse)),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn list_products(
    _admin: AdminAuth,
    state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let catalog = state.catalog.clone();
    let products = web::block(move || catalog.list_products(None)).await??;

    Ok(HttpResponse::Ok().json(ProductListResponse {
        success: true,
        products: products.into_iter().map(ProductResponse::from).collect(),
    }))
}

/// GET /api/admin/products/{id}
#[utoipa::path(
    get,
    path = "/api/admin/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductEnvelope),
        (status = 404, description = "Product not found", body = crate::errors::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn get_product(
    _admin: AdminAuth,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let catalog = state.catalog.clone();
    let product = web::block(move || catalog.get_product(&id)).await??;

    Ok(HttpResponse::Ok().json(ProductEnvelope {
        success: true,
        product: product.into(),
    }))
}

/// POST /api/admin/products
#[utoipa::path(
    post,
    path = "/api/admin/products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductEnvelope),
        (status = 400, description = "Invalid product", body = crate::errors::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn create_product(
    _admin: AdminAuth,
    state: web::Data<AppState>,
    body: web::Json<CreateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let new_product: NewProduct = body.into_inner().into();
    let catalog = state.catalog.clone();
    let product = web::block(move || catalog.create_product(new_product)).await??;
    log::info!("Product {} created", product.id);

    Ok(HttpResponse::Created().json(ProductEnvelope {
        success: true,
        product: product.into(),
    }))
}

/// PUT /api/admin/products/{id}
///
/// Partial update; only the fields present in the body change.
#[utoipa::path(
    put,
    path = "/api/admin/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductEnvelope),
        (status = 400, description = "Invalid update", body = crate::errors::ErrorBody),
        (status = 404, description = "Product not found", body = crate::errors::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn update_product(
    _admin: AdminAuth,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdateProductRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let patch: ProductPatch = body.into_inner().into();
    let catalog = state.catalog.clone();
    let product = web::block(move || catalog.update_product(&id, patch)).await??;

    Ok(HttpResponse::Ok().json(ProductEnvelope {
        success: true,
        product: product.into(),
    }))
}

/// DELETE /api/admin/products/{id}
#[utoipa::path(
    delete,
    path = "/api/admin/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product deleted", body = DeleteResponse),
        (status = 404, description = "Product not found", body = crate::errors::ErrorBody),
    ),
    security(("bearer_auth" = [])),
    tag = "admin"
)]
pub async fn delete_product(
    _admin: AdminAuth,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let catalog = state.catalog.clone();
    let deleted_id = id.clone();
    web::block(move || catalog.delete_product(&id)).await??;
    log::info!("Product {deleted_id} deleted");

    Ok(HttpResponse::Ok().json(DeleteResponse {
        success: true,
        message: "Product deleted".to_string(),
    }))
}
