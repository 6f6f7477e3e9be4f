//! HTTP access to the storefront API.

use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::domain::order::OrderSubmission;
use crate::domain::validation::ValidationErrors;
use crate::errors::ErrorBody;
use crate::handlers::orders::CreateOrderResponse;
use crate::handlers::products::{ProductEnvelope, ProductListResponse, ProductResponse};

/// Shown when the server gave no usable message of its own.
pub const NETWORK_ERROR_MESSAGE: &str = "Network error or server unavailable.";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("request rejected ({status}): {message}")]
    Rejected {
        status: u16,
        message: String,
        errors: Option<ValidationErrors>,
    },

    #[error("unexpected response: {0}")]
    Decode(String),

    /// Rejected locally; nothing was sent.
    #[error("{0}")]
    Invalid(ValidationErrors),
}

impl ApiError {
    /// Message suitable for the shopper: the server's own message when it
    /// sent one, otherwise the generic network message.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::NotFound(message)
            | ApiError::Unauthenticated(message)
            | ApiError::Unauthorized(message)
            | ApiError::Rejected { message, .. }
                if !message.is_empty() =>
            {
                message.clone()
            }
            ApiError::Invalid(errors) => errors.to_string(),
            _ => NETWORK_ERROR_MESSAGE.to_string(),
        }
    }

    /// True when the server refused the caller's credentials.
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ApiError::Unauthenticated(_) | ApiError::Unauthorized(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Network(e.to_string())
    }
}

/// Decode a success body as `T`, or map an error status and its
/// `{success: false, message}` body onto [`ApiError`].
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    if status.is_success() {
        return response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()));
    }

    let (message, errors) = match response.json::<ErrorBody>().await {
        Ok(body) => (body.message, body.errors),
        Err(_) => (String::new(), None),
    };
    Err(match status {
        StatusCode::UNAUTHORIZED => ApiError::Unauthenticated(message),
        StatusCode::FORBIDDEN => ApiError::Unauthorized(message),
        StatusCode::NOT_FOUND => ApiError::NotFound(message),
        _ => ApiError::Rejected {
            status: status.as_u16(),
            message,
            errors,
        },
    })
}

/// Storefront operations the checkout flow depends on.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    async fn list_products(&self, search: Option<&str>) -> Result<Vec<ProductResponse>, ApiError>;
    async fn fetch_product(&self, id: &str) -> Result<ProductResponse, ApiError>;
    async fn place_order(&self, submission: &OrderSubmission) -> Result<CreateOrderResponse, ApiError>;
}

#[derive(Debug, Clone)]
pub struct HttpStorefrontApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpStorefrontApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
    async fn list_products(&self, search: Option<&str>) -> Result<Vec<ProductResponse>, ApiError> {
        let mut request = self.http.get(self.url("/api/products"));
        if let Some(term) = search.filter(|t| !t.trim().is_empty()) {
            request = request.query(&[("search", term)]);
        }
        let body: ProductListResponse = read_json(request.send().await?).await?;
        Ok(body.products)
    }

    async fn fetch_product(&self, id: &str) -> Result<ProductResponse, ApiError> {
        let response = self
            .http
            .get(self.url(&format!("/api/products/{id}")))
            .send()
            .await?;
        let body: ProductEnvelope = read_json(response).await?;
        Ok(body.product)
    }

    async fn place_order(&self, submission: &OrderSubmission) -> Result<CreateOrderResponse, ApiError> {
        let response = self
            .http
            .post(self.url("/api/orders"))
            .json(submission)
            .send()
            .await?;
        read_json(response).await
    }
}
