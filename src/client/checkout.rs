//! Checkout: validate the delivery form, price the cart and place the order.

use bigdecimal::BigDecimal;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::delivery::DeliveryInfo;
use crate::domain::order::{OrderSubmission, SubmittedItem};
use crate::domain::pricing;
use crate::domain::validation::ValidationErrors;

use super::api::StorefrontApi;
use super::cart::CartStore;

/// The delivery form has exactly the fields the order records.
pub type DeliveryForm = DeliveryInfo;

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("Your cart is empty.")]
    EmptyCart,

    #[error("Please correct the highlighted fields.")]
    Invalid(ValidationErrors),

    #[error("{message}")]
    Submission { message: String },
}

/// What the shopper sees after a successful order.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirmation {
    pub order_id: Uuid,
    pub email: String,
    pub item_count: u64,
    pub grand_total: BigDecimal,
}

pub struct Checkout {
    form: DeliveryForm,
    shipping_fee: BigDecimal,
}

impl Checkout {
    pub fn new(shipping_fee: BigDecimal) -> Self {
        Self {
            form: DeliveryForm::default(),
            shipping_fee,
        }
    }

    pub fn form(&self) -> &DeliveryForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut DeliveryForm {
        &mut self.form
    }

    pub fn shipping_fee(&self) -> &BigDecimal {
        &self.shipping_fee
    }

    /// Grand total the cart would be charged right now.
    pub fn grand_total(&self, cart: &CartStore) -> BigDecimal {
        pricing::grand_total(&cart.subtotal(), &self.shipping_fee)
    }

    /// Submit `cart` as an order.
    ///
    /// Nothing is sent when the cart is empty or the form is invalid. On
    /// success the cart is cleared and the form reset; on failure both are
    /// left as they were so the shopper can retry.
    pub async fn submit(
        &mut self,
        cart: &mut CartStore,
        api: &dyn StorefrontApi,
    ) -> Result<Confirmation, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        let delivery_info = self.form.trimmed();
        delivery_info.validate().map_err(CheckoutError::Invalid)?;

        let mut items = Vec::with_capacity(cart.lines().len());
        for line in cart.lines() {
            let price = match &line.price {
                Some(price) => price.clone(),
                None => {
                    let product = api.fetch_product(&line.product_id).await.map_err(|e| {
                        log::warn!("Price lookup for {} failed: {}", line.product_id, e);
                        CheckoutError::Submission {
                            message: e.user_message(),
                        }
                    })?;
                    product.price
                }
            };
            items.push(SubmittedItem {
                product_id: line.product_id.clone(),
                name: line.name.clone(),
                quantity: line.quantity,
                price,
            });
        }

        let subtotal = pricing::subtotal(items.iter().map(|i| (&i.price, i.quantity)));
        let grand_total = pricing::grand_total(&subtotal, &self.shipping_fee);
        let submission = OrderSubmission {
            items,
            delivery_info,
            subtotal,
            shipping: self.shipping_fee.clone(),
            grand_total: grand_total.clone(),
        };

        let placed = api.place_order(&submission).await.map_err(|e| {
            log::warn!("Order submission failed: {e}");
            CheckoutError::Submission {
                message: e.user_message(),
            }
        })?;

        let confirmation = Confirmation {
            order_id: placed.order_id,
            email: submission.delivery_info.email.clone(),
            item_count: cart.item_count(),
            grand_total,
        };
        cart.clear();
        self.form = DeliveryForm::default();
        Ok(confirmation)
    }
}
