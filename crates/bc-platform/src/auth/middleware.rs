//! Bearer token extractor for Axum handlers.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use std::sync::Arc;

use super::token_service::{extract_bearer_token, CustomerClaims, TokenService};
use crate::usecase::UseCaseError;

/// Authenticated customer extractor.
/// Validates the bearer token and exposes its claims.
pub struct Authenticated(pub CustomerClaims);

impl std::ops::Deref for Authenticated {
    type Target = CustomerClaims;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = UseCaseError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(extract_bearer_token)
            .ok_or_else(|| {
                UseCaseError::unauthenticated("TOKEN_MISSING", "Missing bearer token")
            })?;

        let token_service = Arc::<TokenService>::from_ref(state);
        let claims = token_service.verify(token)?;

        Ok(Authenticated(claims))
    }
}
