use bigdecimal::{BigDecimal, Zero};
use chrono::{DateTime, Utc};

use super::pricing;
use super::validation::ValidationErrors;

#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub image_url: String,
    pub category: Option<String>,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Case-insensitive substring match against name or description.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.name.to_lowercase().contains(&term) || self.description.to_lowercase().contains(&term)
    }
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: BigDecimal,
    pub image_url: String,
    pub category: Option<String>,
    pub stock: i32,
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.require("name", &self.name, "Product name is required.");
        errors.require("description", &self.description, "Description is required.");
        errors.require("imageUrl", &self.image_url, "Image URL is required.");
        check_price(&mut errors, &self.price);
        check_stock(&mut errors, self.stock);
        errors.into_result()
    }
}

/// Admin edit: each present field replaces the stored value, absent fields are left alone.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<BigDecimal>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub stock: Option<i32>,
}

impl ProductPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.image_url.is_none()
            && self.category.is_none()
            && self.stock.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.is_empty() {
            errors.add("body", "No fields to update.");
        }
        if let Some(name) = &self.name {
            errors.require("name", name, "Product name cannot be empty.");
        }
        if let Some(description) = &self.description {
            errors.require("description", description, "Description cannot be empty.");
        }
        if let Some(image_url) = &self.image_url {
            errors.require("imageUrl", image_url, "Image URL cannot be empty.");
        }
        if let Some(price) = &self.price {
            check_price(&mut errors, price);
        }
        if let Some(stock) = self.stock {
            check_stock(&mut errors, stock);
        }
        errors.into_result()
    }

    /// Apply the present fields to `product` in place.
    pub fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(image_url) = self.image_url {
            product.image_url = image_url;
        }
        if let Some(category) = self.category {
            product.category = Some(category);
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
    }
}

fn check_price(errors: &mut ValidationErrors, price: &BigDecimal) {
    if price < &BigDecimal::zero() {
        errors.add("price", "Price cannot be negative.");
    } else if !pricing::fits_money_column(price) {
        errors.add(
            "price",
            "Price must have at most two decimal places and be below 10000000000.",
        );
    }
}

fn check_stock(errors: &mut ValidationErrors, stock: i32) {
    if stock < 0 {
        errors.add("stock", "Stock cannot be negative.");
    }
}
