use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{AuthUser, Credentials, NewUser};
use super::errors::AuthError;

/// Repository abstraction for user persistence.
///
/// Emails passed in are already normalised by the service.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError>;
    /// Fails with `AuthError::Conflict` when the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<AuthUser, AuthError>;
    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError>;
    async fn list_users(&self) -> Result<Vec<AuthUser>, AuthError>;
}
