//! Admin session: holds the bearer token and performs admin calls with it.

use std::sync::Arc;

use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::domain::product::{NewProduct, ProductPatch};
use crate::handlers::admin::{
    DeleteResponse, LoginRequest, LoginResponse, OrderEnvelope, OrderListResponse, UpdateStatusRequest,
};
use crate::handlers::orders::OrderResponse;
use crate::handlers::products::{
    CreateProductRequest, ProductEnvelope, ProductListResponse, ProductResponse, UpdateProductRequest,
};

use super::api::{read_json, ApiError};
use super::storage::ClientStorage;
use super::ADMIN_TOKEN_KEY;

const LOGIN_REQUIRED: &str = "Please log in to continue.";

pub struct AdminSession {
    http: reqwest::Client,
    base_url: String,
    storage: Arc<dyn ClientStorage>,
    token: Option<String>,
}

impl AdminSession {
    /// Resume any token persisted by an earlier session.
    pub fn new(base_url: impl Into<String>, storage: Arc<dyn ClientStorage>) -> Self {
        let token = match storage.get(ADMIN_TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                log::warn!("Could not read admin token: {e}");
                None
            }
        };
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            storage,
            token,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/admin{}", self.base_url, path)
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<(), ApiError> {
        let response = self
            .http
            .post(self.url("/login"))
            .json(&LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;
        let body: LoginResponse = read_json(response).await?;

        if let Err(e) = self.storage.set(ADMIN_TOKEN_KEY, &body.token) {
            log::warn!("Could not persist admin token: {e}");
        }
        self.token = Some(body.token);
        Ok(())
    }

    pub fn logout(&mut self) {
        self.token = None;
        if let Err(e) = self.storage.remove(ADMIN_TOKEN_KEY) {
            log::warn!("Could not remove admin token: {e}");
        }
    }

    /// Send `request` with the bearer token. Without a token nothing is sent;
    /// a 401/403 answer discards the token.
    async fn authorized<T: DeserializeOwned>(&mut self, request: RequestBuilder) -> Result<T, ApiError> {
        let Some(token) = self.token.clone() else {
            return Err(ApiError::Unauthenticated(LOGIN_REQUIRED.to_string()));
        };

        let result = match request.bearer_auth(token).send().await {
            Ok(response) => read_json(response).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = &result {
            if e.is_auth_failure() {
                log::warn!("Admin token rejected, logging out: {e}");
                self.logout();
            }
        }
        result
    }

    pub async fn list_orders(&mut self, page: i64, limit: i64) -> Result<OrderListResponse, ApiError> {
        let request = self
            .http
            .get(self.url("/orders"))
            .query(&[("page", page), ("limit", limit)]);
        self.authorized(request).await
    }

    pub async fn get_order(&mut self, id: Uuid) -> Result<OrderResponse, ApiError> {
        let request = self.http.get(self.url(&format!("/orders/{id}")));
        let body: OrderEnvelope = self.authorized(request).await?;
        Ok(body.order)
    }

    pub async fn update_order_status(&mut self, id: Uuid, status: &str) -> Result<OrderResponse, ApiError> {
        let request = self
            .http
            .put(self.url(&format!("/orders/{id}/status")))
            .json(&UpdateStatusRequest {
                status: status.to_string(),
            });
        let body: OrderEnvelope = self.authorized(request).await?;
        Ok(body.order)
    }

    pub async fn list_products(&mut self) -> Result<Vec<ProductResponse>, ApiError> {
        let request = self.http.get(self.url("/products"));
        let body: ProductListResponse = self.authorized(request).await?;
        Ok(body.products)
    }

    pub async fn get_product(&mut self, id: &str) -> Result<ProductResponse, ApiError> {
        let request = self.http.get(self.url(&format!("/products/{id}")));
        let body: ProductEnvelope = self.authorized(request).await?;
        Ok(body.product)
    }

    pub async fn create_product(&mut self, product: &CreateProductRequest) -> Result<ProductResponse, ApiError> {
        NewProduct::from(product.clone())
            .validate()
            .map_err(ApiError::Invalid)?;
        let request = self.http.post(self.url("/products")).json(product);
        let body: ProductEnvelope = self.authorized(request).await?;
        Ok(body.product)
    }

    pub async fn update_product(
        &mut self,
        id: &str,
        patch: &UpdateProductRequest,
    ) -> Result<ProductResponse, ApiError> {
        ProductPatch::from(patch.clone())
            .validate()
            .map_err(ApiError::Invalid)?;
        let request = self.http.put(self.url(&format!("/products/{id}"))).json(patch);
        let body: ProductEnvelope = self.authorized(request).await?;
        Ok(body.product)
    }

    pub async fn delete_product(&mut self, id: &str) -> Result<(), ApiError> {
        let request = self.http.delete(self.url(&format!("/products/{id}")));
        let _: DeleteResponse = self.authorized(request).await?;
        Ok(())
    }
}
