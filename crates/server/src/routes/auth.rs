use axum::{extract::{Request, State}, http::Method, middleware::Next, response::Response};
use axum_extra::headers::{authorization::Bearer, Authorization};
use axum_extra::TypedHeader;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::state::AppState;

/// Identity of the caller, attached to the request by [`require_bearer_token_state`].
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
}

/// Verify `Authorization: Bearer <token>` and attach an [`AuthContext`].
/// Missing, malformed, forged or expired tokens are rejected with 401.
/// CORS preflight requests pass through untouched.
pub async fn require_bearer_token_state(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if req.method() == Method::OPTIONS {
        return Ok(next.run(req).await);
    }
    let path = req.uri().path().to_string();

    let Some(TypedHeader(Authorization(bearer))) = bearer else {
        tracing::warn!(path = %path, "missing or malformed Authorization header (expect Bearer)");
        return Err(ApiError::authentication_failed());
    };

    let claims = state.tokens().verify(bearer.token()).map_err(|e| {
        tracing::warn!(path = %path, err = %e, "token validation failed");
        ApiError::authentication_failed()
    })?;

    req.extensions_mut().insert(AuthContext { user_id: claims.user_id, email: claims.email });
    Ok(next.run(req).await)
}
