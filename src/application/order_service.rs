use std::sync::Arc;

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{ConfirmationStatus, ListResult, OrderStatus, OrderSubmission, OrderView};
use crate::domain::ports::{Mailer, OrderRepository};

use super::blocking;

/// Result of a checkout: the order is durably recorded whatever `confirmation` says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub id: Uuid,
    pub confirmation: ConfirmationStatus,
}

#[derive(Clone)]
pub struct OrderService {
    repo: Arc<dyn OrderRepository>,
    mailer: Arc<dyn Mailer>,
    shipping_fee: BigDecimal,
}

impl OrderService {
    pub fn new(repo: Arc<dyn OrderRepository>, mailer: Arc<dyn Mailer>, shipping_fee: BigDecimal) -> Self {
        Self {
            repo,
            mailer,
            shipping_fee,
        }
    }

    pub fn shipping_fee(&self) -> &BigDecimal {
        &self.shipping_fee
    }

    /// Record the order, then attempt the confirmation email.
    ///
    /// A failed email never undoes the order: the failure is logged and
    /// flagged on the order's confirmation record for the admin to follow up.
    pub async fn place_order(&self, submission: OrderSubmission) -> Result<PlacedOrder, DomainError> {
        let new_order = submission.into_new_order(&self.shipping_fee)?;

        let repo = Arc::clone(&self.repo);
        let order = blocking(move || {
            let id = repo.create(new_order)?;
            repo.find_by_id(id)?
                .ok_or_else(|| DomainError::Internal(format!("order {id} vanished after insert")))
        })
        .await?;
        log::info!(
            "Order {} recorded: {} item(s), grand total {}",
            order.id,
            order.item_count(),
            order.grand_total
        );

        let (confirmation, error) = match self.mailer.send_order_confirmation(&order).await {
            Ok(()) => (ConfirmationStatus::Sent, None),
            Err(e) => {
                log::error!("Order {} recorded but confirmation email failed: {}", order.id, e);
                (ConfirmationStatus::Failed, Some(e.to_string()))
            }
        };

        let repo = Arc::clone(&self.repo);
        let id = order.id;
        if let Err(e) = blocking(move || repo.record_confirmation(id, confirmation, error)).await {
            log::error!("Could not record confirmation outcome for order {id}: {e}");
        }

        Ok(PlacedOrder { id, confirmation })
    }

    pub fn get_order(&self, id: Uuid) -> Result<OrderView, DomainError> {
        self.repo.find_by_id(id)?.ok_or(DomainError::NotFound("Order"))
    }

    pub fn list_orders(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        self.repo.list(page.max(1), limit.clamp(1, 100))
    }

    pub fn update_status(&self, id: Uuid, status: OrderStatus) -> Result<OrderView, DomainError> {
        let order = self
            .repo
            .update_status(id, status)?
            .ok_or(DomainError::NotFound("Order"))?;
        log::info!("Order {id} status set to {status}");
        Ok(order)
    }
}
