//! Bearer token authentication middleware.
//!
//! Extracts `Authorization: Bearer <token>`, resolves the hashed token
//! through the sessions table, and injects the citizen's `UserContext`
//! into request extensions for downstream handlers. Session issuance
//! (login, one-time codes) lives in the identity service.

use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::api::error::ApiError;
use crate::api::types::{hash_token, ApiContext, UserContext};
use crate::db::repository::find_user_by_session;

/// Require a valid citizen session.
///
/// Accesses `ApiContext` from request extensions (injected by Extension layer).
pub async fn require_auth(req: Request<axum::body::Body>, next: Next) -> Response {
    match require_auth_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn require_auth_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let ctx: ApiContext = req
        .extensions()
        .get::<ApiContext>()
        .cloned()
        .ok_or(ApiError::Internal("missing API context".into()))?;

    let token = req
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Unauthorized)?
        .to_string();

    let conn = ctx.state.open_db()?;
    let user = find_user_by_session(&conn, &hash_token(&token))?
        .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(UserContext { user });

    Ok(next.run(req).await)
}
