use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::{debug, error};

use common::types::Message;
use models::errors::ModelError;
use service::auth::errors::AuthError;
use service::errors::ServiceError;

pub const INVALID_INPUTS: &str = "Invalid inputs passed, please check your data.";
pub const AUTHENTICATION_FAILED: &str = "Authentication failed!";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials, could not log you in.";
pub const USER_EXISTS: &str = "User exists already, please login instead.";
pub const UNKNOWN_ROUTE: &str = "Could not find this route.";
pub const UNKNOWN_ERROR: &str = "An unknown error occurred!";

/// Error returned by every handler; rendered as `{"message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unauthorized(String),
    /// Internal detail; only logged, never sent to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn invalid_inputs() -> Self { Self::Validation(INVALID_INPUTS.into()) }
    pub fn authentication_failed() -> Self { Self::Unauthorized(AUTHENTICATION_FAILED.into()) }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ApiError::Internal(detail) => {
                error!(error = %detail, "request failed");
                UNKNOWN_ERROR.to_string()
            }
            ApiError::Validation(m) | ApiError::NotFound(m) | ApiError::Unauthorized(m) => m,
        };
        (status, Json(Message::new(message))).into_response()
    }
}

impl From<ServiceError> for ApiError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Validation(detail) => {
                debug!(%detail, "validation failed");
                ApiError::invalid_inputs()
            }
            ServiceError::NotFound(m) => ApiError::NotFound(m),
            ServiceError::Forbidden(m) => ApiError::Unauthorized(m),
            ServiceError::Db(detail) => ApiError::Internal(detail),
            ServiceError::Model(e) => e.into(),
        }
    }
}

impl From<ModelError> for ApiError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(detail) => {
                debug!(%detail, "validation failed");
                ApiError::invalid_inputs()
            }
            ModelError::Conflict(detail) => ApiError::Validation(detail),
            ModelError::Db(detail) => ApiError::Internal(detail),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::Validation(detail) => {
                debug!(%detail, "validation failed");
                ApiError::invalid_inputs()
            }
            AuthError::Conflict => ApiError::Validation(USER_EXISTS.into()),
            AuthError::Unauthorized => ApiError::Unauthorized(INVALID_CREDENTIALS.into()),
            AuthError::TokenError(_) => ApiError::authentication_failed(),
            AuthError::HashError(detail) | AuthError::Repository(detail) => ApiError::Internal(detail),
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (ApiError::from(ServiceError::Validation("x".into())), StatusCode::UNPROCESSABLE_ENTITY),
            (ApiError::from(ServiceError::NotFound("x".into())), StatusCode::NOT_FOUND),
            (ApiError::from(ServiceError::Forbidden("x".into())), StatusCode::UNAUTHORIZED),
            (ApiError::from(ServiceError::Db("x".into())), StatusCode::INTERNAL_SERVER_ERROR),
            (ApiError::from(AuthError::Conflict), StatusCode::UNPROCESSABLE_ENTITY),
            (ApiError::from(AuthError::Unauthorized), StatusCode::UNAUTHORIZED),
            (ApiError::from(AuthError::Repository("x".into())), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.status(), status);
        }
    }

    #[test]
    fn internal_detail_is_not_exposed() {
        let resp = ApiError::Internal("connection refused".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
