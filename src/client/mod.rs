//! Storefront client: the cart, the checkout flow and the admin session,
//! talking to the service over its HTTP API.

pub mod admin;
pub mod api;
pub mod cart;
pub mod checkout;
pub mod storage;

/// Storage key under which the cart is persisted.
pub const CART_KEY: &str = "ecomCart";

/// Storage key under which the admin token is persisted.
pub const ADMIN_TOKEN_KEY: &str = "adminToken";
