//! Bearer token authentication

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header, request::Parts},
};
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::ApiError;
use crate::domain::Principal;

/// Extractor that resolves `Authorization: Bearer <token>` to a [`Principal`]
#[derive(Debug, Clone)]
pub struct RequirePrincipal(pub Principal);

impl FromRequestParts<AppState> for RequirePrincipal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_bearer_token(&parts.headers)?;

        debug!(
            token_prefix = %token.chars().take(4).collect::<String>(),
            "Resolving principal"
        );

        let principal = state
            .principals
            .resolve(&token)
            .await
            .map_err(|e| ApiError::internal(e.to_string()))?
            .ok_or_else(|| ApiError::unauthorized("Invalid token"))?;

        Ok(RequirePrincipal(principal))
    }
}

fn extract_bearer_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let auth_header = headers.get(header::AUTHORIZATION).ok_or_else(|| {
        ApiError::unauthorized("Token required. Provide via 'Authorization: Bearer <token>' header")
    })?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| ApiError::bad_request("Invalid Authorization header encoding"))?;

    match auth_str.strip_prefix("Bearer ").map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token.to_string()),
        _ => Err(ApiError::unauthorized("Authorization header must use the Bearer scheme")),
    }
}
