use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use super::AdminContext;
use crate::error::ErrorResponse;
use crate::middleware::request_id::request_id;

/// Extractor that requires a bearer token.
///
/// ```ignore
/// async fn protected_route(auth: RequireToken) -> impl IntoResponse {
///     state.backend.dashboard_stats(&auth).await
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireToken(pub AdminContext);

impl std::ops::Deref for RequireToken {
    type Target = AdminContext;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidFormat,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let message = match &self {
            AuthError::MissingToken => "Missing authorization token",
            AuthError::InvalidFormat => "Invalid authorization format",
        };

        let body = ErrorResponse {
            code: "UNAUTHORIZED".to_string(),
            message: message.to_string(),
            request_id: None,
        };

        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

/// Pulls the token out of an `Authorization: Bearer <token>` value.
fn parse_bearer(header: &str) -> Result<&str, AuthError> {
    let token = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
        .ok_or(AuthError::InvalidFormat)?
        .trim();

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }

    Ok(token)
}

#[async_trait]
impl<S> FromRequestParts<S> for RequireToken
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?
            .to_str()
            .map_err(|_| AuthError::InvalidFormat)?;

        let token = parse_bearer(auth_header).map_err(|e| {
            tracing::warn!(error = ?e, "Rejected admin request");
            e
        })?;

        Ok(RequireToken(AdminContext::new(
            token,
            request_id(&parts.headers),
        )))
    }
}
