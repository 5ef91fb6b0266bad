use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use service::auth::domain::{AuthSession, AuthUser, LoginInput, SignupInput};

use crate::errors::ApiError;
use crate::forms::FormPayload;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UsersBody {
    pub users: Vec<AuthUser>,
}

/// Signup/login response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthBody {
    pub user_id: Uuid,
    pub email: String,
    pub token: String,
}

impl From<AuthSession> for AuthBody {
    fn from(s: AuthSession) -> Self {
        Self { user_id: s.user.id, email: s.user.email, token: s.token }
    }
}

#[utoipa::path(get, path = "/api/users", tag = "users",
    responses((status = 200, description = "All users", body = crate::openapi::UsersResponse)))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UsersBody>, ApiError> {
    let users = state.auth.list_users().await?;
    Ok(Json(UsersBody { users }))
}

#[utoipa::path(post, path = "/api/users/signup", tag = "users",
    request_body(content = crate::openapi::SignupForm, content_type = "multipart/form-data"),
    responses((status = 201, description = "Signed up", body = crate::openapi::AuthResponse), (status = 422, description = "Invalid inputs or user exists", body = crate::openapi::MessageResponse)))]
pub async fn signup(State(state): State<AppState>, form: FormPayload) -> Result<(StatusCode, Json<AuthBody>), ApiError> {
    let name = form.require("name")?.to_string();
    let email = form.require("email")?.to_string();
    let password = form.raw("password").unwrap_or_default().to_string();

    let image = match form.image.as_ref() {
        Some(upload) => Some(state.images.save(upload).await?),
        None => None,
    };
    let input = SignupInput { name, email, password, image: image.clone() };
    match state.auth.signup(input).await {
        Ok(session) => Ok((StatusCode::CREATED, Json(session.into()))),
        Err(e) => {
            if let Some(stored) = image {
                state.images.discard(&stored).await;
            }
            Err(e.into())
        }
    }
}

#[utoipa::path(post, path = "/api/users/login", tag = "users",
    request_body = crate::openapi::LoginRequest,
    responses((status = 200, description = "Logged in", body = crate::openapi::AuthResponse), (status = 401, description = "Invalid credentials", body = crate::openapi::MessageResponse)))]
pub async fn login(State(state): State<AppState>, body: Result<Json<LoginInput>, JsonRejection>) -> Result<Json<AuthBody>, ApiError> {
    let Json(input) = body.map_err(|e| {
        debug!(error = %e, "rejected login body");
        ApiError::invalid_inputs()
    })?;
    let session = state.auth.login(input).await?;
    Ok(Json(session.into()))
}
