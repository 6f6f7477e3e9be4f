//! Process-local repositories, used when no database is configured.
//!
//! Contents are lost on restart.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::order::{
    page_offset, ConfirmationStatus, ConfirmationView, ListResult, NewOrder, OrderLineView,
    OrderStatus, OrderView,
};
use crate::domain::ports::{OrderRepository, ProductRepository};
use crate::domain::product::{NewProduct, Product, ProductPatch};

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, DomainError> {
    mutex
        .lock()
        .map_err(|_| DomainError::Internal("in-memory store lock poisoned".to_string()))
}

#[derive(Default)]
pub struct InMemoryProductRepository {
    products: Mutex<Vec<Product>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductRepository for InMemoryProductRepository {
    fn list(&self, search: Option<&str>) -> Result<Vec<Product>, DomainError> {
        let products = lock(&self.products)?;
        let term = search.map(str::trim).filter(|t| !t.is_empty());
        Ok(products
            .iter()
            .filter(|p| term.map_or(true, |t| p.matches(t)))
            .cloned()
            .collect())
    }

    fn find_by_id(&self, id: &str) -> Result<Option<Product>, DomainError> {
        let products = lock(&self.products)?;
        Ok(products.iter().find(|p| p.id == id).cloned())
    }

    fn create(&self, id: String, product: NewProduct) -> Result<Product, DomainError> {
        let mut products = lock(&self.products)?;
        if products.iter().any(|p| p.id == id) {
            return Err(DomainError::Conflict(format!("product '{id}' already exists")));
        }
        let now = Utc::now();
        let product = Product {
            id,
            name: product.name,
            description: product.description,
            price: product.price,
            image_url: product.image_url,
            category: product.category,
            stock: product.stock,
            created_at: now,
            updated_at: now,
        };
        products.push(product.clone());
        Ok(product)
    }

    fn update(&self, id: &str, patch: ProductPatch) -> Result<Option<Product>, DomainError> {
        let mut products = lock(&self.products)?;
        let Some(product) = products.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        patch.apply(product);
        product.updated_at = Utc::now();
        Ok(Some(product.clone()))
    }

    fn delete(&self, id: &str) -> Result<bool, DomainError> {
        let mut products = lock(&self.products)?;
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }
}

#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: Mutex<Vec<OrderView>>,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn create(&self, order: NewOrder) -> Result<Uuid, DomainError> {
        let mut orders = lock(&self.orders)?;
        let now = Utc::now();
        let id = Uuid::new_v4();
        orders.push(OrderView {
            id,
            delivery: order.delivery,
            subtotal: order.subtotal,
            shipping: order.shipping,
            grand_total: order.grand_total,
            status: OrderStatus::Pending,
            confirmation: ConfirmationView {
                status: ConfirmationStatus::Pending,
                last_error: None,
            },
            created_at: now,
            updated_at: now,
            lines: order
                .lines
                .into_iter()
                .map(|l| OrderLineView {
                    id: Uuid::new_v4(),
                    product_id: l.product_id,
                    name: l.name,
                    quantity: l.quantity,
                    unit_price: l.unit_price,
                })
                .collect(),
        });
        Ok(id)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError> {
        let orders = lock(&self.orders)?;
        Ok(orders.iter().find(|o| o.id == id).cloned())
    }

    fn list(&self, page: i64, limit: i64) -> Result<ListResult, DomainError> {
        let skip = page_offset(page, limit).and_then(|o| usize::try_from(o).ok());
        let take = usize::try_from(limit).unwrap_or(0);

        let orders = lock(&self.orders)?;
        let items = match skip {
            // Newest first, like the database listing.
            Some(skip) => orders.iter().rev().skip(skip).take(take).cloned().collect(),
            None => Vec::new(),
        };
        Ok(ListResult {
            items,
            total: orders.len() as i64,
        })
    }

    fn update_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<OrderView>, DomainError> {
        let mut orders = lock(&self.orders)?;
        let Some(order) = orders.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };
        order.status = status;
        order.updated_at = Utc::now();
        Ok(Some(order.clone()))
    }

    fn record_confirmation(
        &self,
        id: Uuid,
        status: ConfirmationStatus,
        error: Option<String>,
    ) -> Result<(), DomainError> {
        let mut orders = lock(&self.orders)?;
        let order = orders
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(DomainError::NotFound("Order"))?;
        order.confirmation = ConfirmationView {
            status,
            last_error: error,
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::domain::delivery::DeliveryInfo;
    use crate::domain::order::OrderLineInput;

    fn new_product(name: &str) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            description: format!("{name} description"),
            price: BigDecimal::from_str("10.00").unwrap(),
            image_url: "https://img.example/x.jpg".to_string(),
            category: None,
            stock: 1,
        }
    }

    fn new_order() -> NewOrder {
        NewOrder {
            delivery: DeliveryInfo::default(),
            lines: vec![OrderLineInput {
                product_id: "p1".to_string(),
                name: "Thing".to_string(),
                quantity: 1,
                unit_price: BigDecimal::from_str("1.00").unwrap(),
            }],
            subtotal: BigDecimal::from_str("1.00").unwrap(),
            shipping: BigDecimal::from_str("5.00").unwrap(),
            grand_total: BigDecimal::from_str("6.00").unwrap(),
        }
    }

    #[test]
    fn product_search_and_duplicate_ids() {
        let repo = InMemoryProductRepository::new();
        repo.create("a".into(), new_product("Desk Lamp")).unwrap();
        repo.create("b".into(), new_product("Office Chair")).unwrap();

        assert_eq!(repo.list(Some("lamp")).unwrap().len(), 1);
        assert_eq!(repo.list(Some("  ")).unwrap().len(), 2);
        assert!(matches!(
            repo.create("a".into(), new_product("Other")),
            Err(DomainError::Conflict(_))
        ));
    }

    #[test]
    fn product_update_and_delete() {
        let repo = InMemoryProductRepository::new();
        repo.create("a".into(), new_product("Desk Lamp")).unwrap();

        let patch = ProductPatch {
            name: Some("Floor Lamp".into()),
            ..ProductPatch::default()
        };
        assert_eq!(repo.update("a", patch).unwrap().unwrap().name, "Floor Lamp");
        assert!(repo.update("zzz", ProductPatch::default()).unwrap().is_none());
        assert!(repo.delete("a").unwrap());
        assert!(!repo.delete("a").unwrap());
    }

    #[test]
    fn orders_list_newest_first_with_paging() {
        let repo = InMemoryOrderRepository::new();
        let ids: Vec<Uuid> = (0..3).map(|_| repo.create(new_order()).unwrap()).collect();

        let page = repo.list(1, 2).unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.items[0].id, ids[2]);
        assert_eq!(page.items.len(), 2);
        assert_eq!(repo.list(2, 2).unwrap().items.len(), 1);
    }

    #[test]
    fn huge_page_is_empty_and_leaves_the_store_usable() {
        let repo = InMemoryOrderRepository::new();
        repo.create(new_order()).unwrap();

        let page = repo.list(i64::MAX, 100).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 1);

        repo.create(new_order()).unwrap();
        assert_eq!(repo.list(1, 100).unwrap().items.len(), 2);
    }

    #[test]
    fn record_confirmation_on_unknown_order_is_not_found() {
        let repo = InMemoryOrderRepository::new();
        let err = repo
            .record_confirmation(Uuid::new_v4(), ConfirmationStatus::Sent, None)
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound("Order")));
    }
}
