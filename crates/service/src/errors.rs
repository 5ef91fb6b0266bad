use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// Caller is authenticated but does not own the target record.
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(msg: &str) -> Self { Self::NotFound(msg.to_string()) }
    pub fn forbidden(msg: &str) -> Self { Self::Forbidden(msg.to_string()) }

    /// Field-level failures collapse into a single validation error.
    pub fn invalid_input(e: models::errors::ModelError) -> Self {
        match e {
            models::errors::ModelError::Validation(msg) => Self::Validation(msg),
            other => Self::Model(other),
        }
    }
}
