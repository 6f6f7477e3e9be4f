//! The shopper's cart, persisted to client storage after every change.

use std::sync::Arc;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::pricing;
use crate::handlers::products::ProductResponse;

use super::storage::ClientStorage;
use super::CART_KEY;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(alias = "id")]
    pub product_id: String,
    pub name: String,
    /// Price seen when the line was added; absent for lines persisted without one.
    #[serde(default)]
    pub price: Option<BigDecimal>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub quantity: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    #[error("{name} is out of stock.")]
    OutOfStock { name: String },

    #[error("Only {available} of {name} left in stock.")]
    InsufficientStock { name: String, available: u32 },
}

/// Owns the cart lines and writes them through to `storage`.
///
/// At most one line exists per product id and every quantity is positive.
pub struct CartStore {
    storage: Arc<dyn ClientStorage>,
    lines: Vec<CartLine>,
}

impl CartStore {
    /// Restore the persisted cart. An absent or unreadable value yields an
    /// empty cart.
    pub fn load(storage: Arc<dyn ClientStorage>) -> Self {
        let lines = match storage.get(CART_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<CartLine>>(&raw) {
                Ok(lines) => normalize(lines),
                Err(e) => {
                    log::warn!("Discarding unreadable cart: {e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("Could not read cart from storage: {e}");
                Vec::new()
            }
        };
        Self { storage, lines }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum of price × quantity; a line without a price counts as zero.
    pub fn subtotal(&self) -> BigDecimal {
        pricing::subtotal(
            self.lines
                .iter()
                .filter_map(|l| l.price.as_ref().map(|p| (p, l.quantity))),
        )
    }

    fn quantity_of(&self, product_id: &str) -> u32 {
        self.lines
            .iter()
            .find(|l| l.product_id == product_id)
            .map_or(0, |l| l.quantity)
    }

    /// Add `quantity` of `product`, merging into an existing line.
    pub fn add_line(&mut self, product: &ProductResponse, quantity: u32) {
        if quantity == 0 {
            return;
        }
        match self.lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.lines.push(CartLine {
                product_id: product.id.clone(),
                name: product.name.clone(),
                price: Some(product.price.clone()),
                image_url: Some(product.image_url.clone()),
                quantity,
            }),
        }
        self.persist();
    }

    /// Like [`add_line`](Self::add_line), but refuses to exceed the product's stock.
    pub fn add_available(&mut self, product: &ProductResponse, quantity: u32) -> Result<(), CartError> {
        let stock = u32::try_from(product.stock).unwrap_or(0);
        if stock == 0 {
            return Err(CartError::OutOfStock {
                name: product.name.clone(),
            });
        }
        let available = stock.saturating_sub(self.quantity_of(&product.id));
        if quantity > available {
            return Err(CartError::InsufficientStock {
                name: product.name.clone(),
                available,
            });
        }
        self.add_line(product, quantity);
        Ok(())
    }

    /// Adjust a line by `delta`; the line is removed when the result is not
    /// positive. Unknown ids are ignored.
    pub fn change_quantity(&mut self, product_id: &str, delta: i64) {
        let Some(index) = self.lines.iter().position(|l| l.product_id == product_id) else {
            return;
        };
        let next = i64::from(self.lines[index].quantity) + delta;
        if next <= 0 {
            self.lines.remove(index);
        } else {
            self.lines[index].quantity = u32::try_from(next).unwrap_or(u32::MAX);
        }
        self.persist();
    }

    pub fn remove_line(&mut self, product_id: &str) {
        let before = self.lines.len();
        self.lines.retain(|l| l.product_id != product_id);
        if self.lines.len() != before {
            self.persist();
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.persist();
    }

    fn persist(&self) {
        let result = serde_json::to_string(&self.lines)
            .map_err(|e| e.to_string())
            .and_then(|raw| self.storage.set(CART_KEY, &raw).map_err(|e| e.to_string()));
        if let Err(e) = result {
            log::warn!("Could not persist cart: {e}");
        }
    }
}

/// Drop non-positive lines and merge duplicates, keeping first-seen order.
fn normalize(raw: Vec<CartLine>) -> Vec<CartLine> {
    let mut lines: Vec<CartLine> = Vec::with_capacity(raw.len());
    for line in raw.into_iter().filter(|l| l.quantity > 0) {
        match lines.iter_mut().find(|l| l.product_id == line.product_id) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => lines.push(line),
        }
    }
    lines
}
