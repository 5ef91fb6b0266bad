use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Signup input; `image` is the stored path of an already-uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

/// Domain user (business view, never carries the password hash)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub places: Vec<Uuid>,
}

impl From<models::user::Model> for AuthUser {
    fn from(m: models::user::Model) -> Self {
        Self { id: m.id, name: m.name, email: m.email, image: m.image, places: m.places }
    }
}

/// A user row about to be persisted; the password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub image: Option<String>,
}

/// Domain credentials (hashed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub user_id: Uuid,
    pub password_hash: String,
}

/// Signup/login result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: String,
    /// Unix seconds after which `token` is rejected.
    pub expires_at: i64,
}
