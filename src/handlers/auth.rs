//! Bearer-token guard for admin routes.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};

use crate::errors::AppError;
use crate::infrastructure::token::AdminClaims;
use crate::AppState;

/// Extractor that requires a valid admin bearer token.
///
/// No `Authorization: Bearer` header rejects with 401; a token that fails
/// verification (bad signature, malformed, expired) rejects with 403.
#[derive(Debug)]
pub struct AdminAuth(pub AdminClaims);

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequest for AdminAuth {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            return ready(Err(AppError::Internal("application state missing".to_string())));
        };
        let Some(token) = bearer_token(req) else {
            return ready(Err(AppError::Unauthenticated));
        };

        ready(state.auth.verify(token).map(AdminAuth).map_err(|e| {
            log::warn!("Rejected admin token on {}: {}", req.path(), e);
            AppError::Unauthorized
        }))
    }
}
