pub mod admin;
pub mod auth;
pub mod orders;
pub mod products;

use actix_web::{error, web, HttpRequest};

use crate::errors::AppError;

/// Register every API route on `cfg`.
///
/// Extractor failures (malformed JSON, unknown fields, bad path or query
/// values) are answered with the same `{success: false, message}` body as
/// every other error.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(|e, _| reject(e.to_string())))
        .app_data(web::QueryConfig::default().error_handler(|e, _| reject(e.to_string())))
        .service(
            web::scope("/api")
                .route("/products", web::get().to(products::list_products))
                .route("/products/{id}", web::get().to(products::get_product))
                .route("/orders", web::post().to(orders::create_order))
                .service(
                    web::scope("/admin")
                        .route("/login", web::post().to(admin::login))
                        .route("/orders", web::get().to(admin::list_orders))
                        .route("/orders/{id}", web::get().to(admin::get_order))
                        .route("/orders/{id}/status", web::put().to(admin::update_order_status))
                        .route("/products", web::get().to(admin::list_products))
                        .route("/products", web::post().to(admin::create_product))
                        .route("/products/{id}", web::get().to(admin::get_product))
                        .route("/products/{id}", web::put().to(admin::update_product))
                        .route("/products/{id}", web::delete().to(admin::delete_product)),
                ),
        );
}

fn json_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    log::debug!("Rejected JSON body on {}: {}", req.path(), err);
    reject(err.to_string())
}

fn reject(message: String) -> actix_web::Error {
    AppError::BadRequest(message).into()
}
