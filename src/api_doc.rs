use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers::{admin, orders, products};

#[derive(OpenApi)]
#[openapi(
    paths(
        products::list_products,
        products::get_product,
        orders::create_order,
        admin::login,
        admin::list_orders,
        admin::get_order,
        admin::update_order_status,
        admin::list_products,
        admin::get_product,
        admin::create_product,
        admin::update_product,
        admin::delete_product,
    ),
    components(schemas(
        crate::errors::ErrorBody,
        crate::domain::order::OrderSubmission,
        crate::domain::order::OrderStatus,
        orders::OrderResponse,
        products::ProductResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "catalog", description = "Public product catalog"),
        (name = "orders", description = "Checkout"),
        (name = "admin", description = "Bearer-token guarded administration"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by the admin paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_admin_routes_and_bearer_scheme() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/admin/orders/{id}/status"));
        assert!(doc.paths.paths.contains_key("/api/orders"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
