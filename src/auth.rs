use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

use crate::api::routes::AppState;

/// Caller identity for authenticated routes: the service API key plus the
/// acting user's id from the `X-User-Id` header.
pub struct AuthUser {
    pub user_id: Uuid,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get auth header
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| {
                let body = Json(json!({
                    "error": "Missing authorization header"
                }));
                (StatusCode::UNAUTHORIZED, body).into_response()
            })?;

        // Extract Bearer token
        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            let body = Json(json!({
                "error": "Invalid authorization format"
            }));
            (StatusCode::BAD_REQUEST, body).into_response()
        })?;

        if token != state.config.api_key || token.len() < 32 {
            return Err((
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "Invalid API key" })),
            )
                .into_response());
        }

        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|h| h.to_str().ok())
            .and_then(|v| Uuid::parse_str(v).ok())
            .ok_or_else(|| {
                let body = Json(json!({
                    "error": "Missing or invalid X-User-Id header"
                }));
                (StatusCode::UNAUTHORIZED, body).into_response()
            })?;

        Ok(AuthUser { user_id })
    }
}
