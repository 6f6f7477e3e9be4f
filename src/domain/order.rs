use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::delivery::DeliveryInfo;
use super::pricing;
use super::validation::ValidationErrors;

/// Fulfilment status of an order. New orders start as `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                let allowed: Vec<&str> = OrderStatus::ALL.iter().map(|s| s.as_str()).collect();
                format!("Invalid status '{s}'. Allowed: {}", allowed.join(", "))
            })
    }
}

/// Outcome of the confirmation email sent after an order is recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub enum ConfirmationStatus {
    #[default]
    Pending,
    Sent,
    Failed,
}

impl ConfirmationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ConfirmationStatus::Pending => "PENDING",
            ConfirmationStatus::Sent => "SENT",
            ConfirmationStatus::Failed => "FAILED",
        }
    }
}

impl FromStr for ConfirmationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(ConfirmationStatus::Pending),
            "SENT" => Ok(ConfirmationStatus::Sent),
            "FAILED" => Ok(ConfirmationStatus::Failed),
            other => Err(format!("unknown confirmation status: {other}")),
        }
    }
}

// ── Checkout submission (wire shape shared by client and server) ─────────────

/// Snapshot of one cart line at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SubmittedItem {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    /// Decimal unit price, e.g. "99.99"
    #[schema(value_type = String)]
    pub price: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderSubmission {
    pub items: Vec<SubmittedItem>,
    pub delivery_info: DeliveryInfo,
    #[schema(value_type = String)]
    pub subtotal: BigDecimal,
    #[schema(value_type = String)]
    pub shipping: BigDecimal,
    #[schema(value_type = String)]
    pub grand_total: BigDecimal,
}

impl OrderSubmission {
    /// Validate the submission and recompute its totals against `shipping_fee`.
    ///
    /// Totals sent by the client must agree with the recomputed ones; any
    /// disagreement is reported as a validation error rather than corrected.
    pub fn into_new_order(self, shipping_fee: &BigDecimal) -> Result<NewOrder, ValidationErrors> {
        let delivery_info = self.delivery_info.trimmed();
        let mut errors = match delivery_info.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if self.items.is_empty() {
            errors.add("items", "Order must contain at least one item.");
        }

        let mut lines = Vec::with_capacity(self.items.len());
        for (index, item) in self.items.iter().enumerate() {
            let field = format!("items[{index}]");
            if item.product_id.trim().is_empty() {
                errors.add(&field, "Product id is required.");
            }
            if item.price < BigDecimal::zero() {
                errors.add(&field, "Price cannot be negative.");
            } else if !pricing::fits_money_column(&item.price) {
                errors.add(
                    &field,
                    "Price must have at most two decimal places and be below 10000000000.",
                );
            }
            match i32::try_from(item.quantity) {
                Ok(quantity) if quantity > 0 => lines.push(OrderLineInput {
                    product_id: item.product_id.clone(),
                    name: item.name.clone(),
                    quantity,
                    unit_price: item.price.clone(),
                }),
                _ => errors.add(&field, "Quantity must be a positive integer."),
            }
        }

        let subtotal = pricing::subtotal(self.items.iter().map(|i| (&i.price, i.quantity)));
        let grand_total = pricing::grand_total(&subtotal, shipping_fee);

        if self.shipping != *shipping_fee {
            errors.add("shipping", format!("Shipping fee must be {shipping_fee}."));
        }
        if self.subtotal != subtotal {
            errors.add("subtotal", format!("Subtotal does not match items ({subtotal})."));
        }
        if self.grand_total != grand_total {
            errors.add("grandTotal", format!("Grand total does not match ({grand_total})."));
        }
        if !pricing::fits_money_column(&grand_total) || !pricing::fits_money_column(&subtotal) {
            errors.add("grandTotal", "Order total is too large.");
        }

        errors.into_result()?;

        Ok(NewOrder {
            delivery: delivery_info,
            lines,
            subtotal,
            shipping: shipping_fee.clone(),
            grand_total,
        })
    }
}

// ── Validated order, ready to persist ────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct OrderLineInput {
    pub product_id: String,
    pub name: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub delivery: DeliveryInfo,
    pub lines: Vec<OrderLineInput>,
    pub subtotal: BigDecimal,
    pub shipping: BigDecimal,
    pub grand_total: BigDecimal,
}

// ── Read models ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub id: Uuid,
    pub product_id: String,
    pub name: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

#[derive(Debug, Clone)]
pub struct ConfirmationView {
    pub status: ConfirmationStatus,
    pub last_error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub delivery: DeliveryInfo,
    pub subtotal: BigDecimal,
    pub shipping: BigDecimal,
    pub grand_total: BigDecimal,
    pub status: OrderStatus,
    pub confirmation: ConfirmationView,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub lines: Vec<OrderLineView>,
}

impl OrderView {
    pub fn item_count(&self) -> i64 {
        self.lines.iter().map(|l| i64::from(l.quantity)).sum()
    }
}

#[derive(Debug, Clone)]
pub struct ListResult {
    pub items: Vec<OrderView>,
    pub total: i64,
}

/// Row offset of the 1-based `page`, or `None` when it lies past any
/// addressable row.
pub fn page_offset(page: i64, limit: i64) -> Option<i64> {
    page.checked_sub(1)?.checked_mul(limit).filter(|offset| *offset >= 0)
}
