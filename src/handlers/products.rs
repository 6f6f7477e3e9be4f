use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::product::{NewProduct, Product, ProductPatch};
use crate::errors::AppError;
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Decimal price as a string, e.g. "99.99"
    #[schema(value_type = String)]
    pub price: BigDecimal,
    pub image_url: String,
    pub category: Option<String>,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            description: p.description,
            price: p.price,
            image_url: p.image_url,
            category: p.category,
            stock: p.stock,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductListResponse {
    pub success: bool,
    pub products: Vec<ProductResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductEnvelope {
    pub success: bool,
    pub product: ProductResponse,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    /// Case-insensitive substring matched against name and description.
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    #[schema(value_type = String)]
    pub price: BigDecimal,
    pub image_url: String,
    #[serde(default)]
    pub category: Option<String>,
    pub stock: i32,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(r: CreateProductRequest) -> Self {
        NewProduct {
            name: r.name,
            description: r.description,
            price: r.price,
            image_url: r.image_url,
            category: r.category,
            stock: r.stock,
        }
    }
}

/// Partial update: omitted fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProductRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub price: Option<BigDecimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i32>,
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(r: UpdateProductRequest) -> Self {
        ProductPatch {
            name: r.name,
            description: r.description,
            price: r.price,
            image_url: r.image_url,
            category: r.category,
            stock: r.stock,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// GET /api/products
///
/// Public catalog listing, optionally filtered by `search`.
#[utoipa::path(
    get,
    path = "/api/products",
    params(SearchParams),
    responses(
        (status = 200, description = "Catalog products", body = ProductListResponse),
        (status = 500, description = "Internal server error"),
    ),
    tag = "catalog"
)]
pub async fn list_products(
    state: web::Data<AppState>,
    query: web::Query<SearchParams>,
) -> Result<HttpResponse, AppError> {
    let search = query.into_inner().search;
    let catalog = state.catalog.clone();

    let products = web::block(move || catalog.list_products(search.as_deref())).await??;

    Ok(HttpResponse::Ok().json(ProductListResponse {
        success: true,
        products: products.into_iter().map(ProductResponse::from).collect(),
    }))
}

/// GET /api/products/{id}
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product id")),
    responses(
        (status = 200, description = "Product found", body = ProductEnvelope),
        (status = 404, description = "Product not found", body = crate::errors::ErrorBody),
    ),
    tag = "catalog"
)]
pub async fn get_product(
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
