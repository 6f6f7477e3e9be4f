use async_trait::async_trait;
use uuid::Uuid;

use super::errors::{DomainError, MailError};
use super::order::{ConfirmationStatus, ListResult, NewOrder, OrderStatus, OrderView};
use super::product::{NewProduct, Product, ProductPatch};

pub trait ProductRepository: Send + Sync + 'static {
    fn list(&self, search: Option<&str>) -> Result<Vec<Product>, DomainError>;
    fn find_by_id(&self, id: &str) -> Result<Option<Product>, DomainError>;
    fn create(&self, id: String, product: NewProduct) -> Result<Product, DomainError>;
    fn update(&self, id: &str, patch: ProductPatch) -> Result<Option<Product>, DomainError>;
    fn delete(&self, id: &str) -> Result<bool, DomainError>;
}

pub trait OrderRepository: Send + Sync + 'static {
    /// Persist the order, its lines and a pending confirmation record atomically.
    fn create(&self, order: NewOrder) -> Result<Uuid, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError>;
    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError>;
    fn update_status(&self, id: Uuid, status: OrderStatus)
        -> Result<Option<OrderView>, DomainError>;
    fn record_confirmation(
        &self,
        id: Uuid,
        status: ConfirmationStatus,
        error: Option<String>,
    ) -> Result<(), DomainError>;
}

#[async_trait]
pub trait Mailer: Send + Sync + 'static {
    async fn send_order_confirmation(&self, order: &OrderView) -> Result<(), MailError>;
}
