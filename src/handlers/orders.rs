use actix_web::{web, HttpResponse};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::delivery::DeliveryInfo;
use crate::domain::order::{
    ConfirmationStatus, ConfirmationView, OrderLineView, OrderStatus, OrderSubmission, OrderView,
};
use crate::errors::AppError;
use crate::AppState;

// ── Request / response DTOs ──────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub success: bool,
    pub order_id: Uuid,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineResponse {
    pub id: Uuid,
    pub product_id: String,
    pub name: String,
    pub quantity: i32,
    /// Unit price captured when the order was placed.
    #[schema(value_type = String)]
    pub price: BigDecimal,
}

impl From<OrderLineView> for OrderLineResponse {
    fn from(l: OrderLineView) -> Self {
        Self {
            id: l.id,
            product_id: l.product_id,
            name: l.name,
            quantity: l.quantity,
            price: l.unit_price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationResponse {
    pub status: ConfirmationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl From<ConfirmationView> for ConfirmationResponse {
    fn from(c: ConfirmationView) -> Self {
        Self {
            status: c.status,
            last_error: c.last_error,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub items: Vec<OrderLineResponse>,
    pub delivery_info: DeliveryInfo,
    #[schema(value_type = String)]
    pub subtotal: BigDecimal,
    #[schema(value_type = String)]
    pub shipping: BigDecimal,
    #[schema(value_type = String)]
    pub grand_total: BigDecimal,
    pub status: OrderStatus,
    pub confirmation: ConfirmationResponse,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<OrderView> for OrderResponse {
    fn from(o: OrderView) -> Self {
        Self {
            id: o.id,
            items: o.lines.into_iter().map(OrderLineResponse::from).collect(),
            delivery_info: o.delivery,
            subtotal: o.subtotal,
            shipping: o.shipping,
            grand_total: o.grand_total,
            status: o.status,
            confirmation: o.confirmation.into(),
            created_at: o.created_at,
            updated_at: o.updated_at,
        }
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────────

/// POST /api/orders
///
/// Validates the checkout submission, recomputes its totals and records the
/// order with its line snapshots in a single transaction. The confirmation
/// email is attempted afterwards; its failure is flagged on the order and
/// does not change this response.
#[utoipa::path(
    post,
    path = "/api/orders",
    request_body = OrderSubmission,
    responses(
        (status = 201, description = "Order placed", body = CreateOrderResponse),
        (status = 400, description = "Invalid submission", body = crate::errors::ErrorBody),
        (status = 500, description = "Internal server error"),
    ),
    tag = "orders"
)]
pub async fn create_order(
    state: web::Data<AppState>,
    body: web::Json<OrderSubmission>,
) -> Result<HttpResponse, AppError> {
    let placed = state.orders.place_order(body.into_inner()).await?;

    Ok(HttpResponse::Created().json(CreateOrderResponse {
        success: true,
        order_id: placed.id,
        message: "Order placed successfully".to_string(),
    }))
}
