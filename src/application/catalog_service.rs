use std::sync::Arc;

use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::ProductRepository;
use crate::domain::product::{NewProduct, Product, ProductPatch};

#[derive(Clone)]
pub struct CatalogService {
    repo: Arc<dyn ProductRepository>,
}

impl CatalogService {
    pub fn new(repo: Arc<dyn ProductRepository>) -> Self {
        Self { repo }
    }

    pub fn list_products(&self, search: Option<&str>) -> Result<Vec<Product>, DomainError> {
        self.repo.list(search)
    }

    pub fn get_product(&self, id: &str) -> Result<Product, DomainError> {
        self.repo
            .find_by_id(id)?
            .ok_or(DomainError::NotFound("Product"))
    }

    pub fn create_product(&self, product: NewProduct) -> Result<Product, DomainError> {
        product.validate()?;
        let created = self.repo.create(Uuid::new_v4().to_string(), product)?;
        log::info!("Created product {} ({})", created.id, created.name);
        Ok(created)
    }

    pub fn update_product(&self, id: &str, patch: ProductPatch) -> Result<Product, DomainError> {
        patch.validate()?;
        self.repo
            .update(id, patch)?
            .ok_or(DomainError::NotFound("Product"))
    }

    pub fn delete_product(&self, id: &str) -> Result<(), DomainError> {
        if !self.repo.delete(id)? {
            return Err(DomainError::NotFound("Product"));
        }
        log::info!("Deleted product {id}");
        Ok(())
    }
}
