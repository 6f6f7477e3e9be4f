pub mod mailer;
pub mod memory;
pub mod models;
pub mod order_repo;
pub mod product_repo;
pub mod seed;
pub mod token;

#[cfg(test)]
pub(crate) mod test_db;
