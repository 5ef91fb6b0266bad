//! HS256 bearer tokens carrying the user id and email.
//!
//! Expiry is checked here rather than by `jsonwebtoken` so the clock can be
//! supplied by the caller (`verify_at`); a token issued at `T` with a one hour
//! lifetime is accepted at `T + 3600` and rejected from `T + 3601` on.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::AuthError;

pub const DEFAULT_TTL_SECS: i64 = 3600;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly signed token and its expiry (unix seconds).
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: i64,
}

#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService").field("ttl_secs", &self.ttl_secs).finish_non_exhaustive()
    }
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> i64 { self.ttl_secs }

    pub fn issue(&self, user_id: Uuid, email: &str) -> Result<IssuedToken, AuthError> {
        self.issue_at(user_id, email, Utc::now().timestamp())
    }

    pub fn issue_at(&self, user_id: Uuid, email: &str, now: i64) -> Result<IssuedToken, AuthError> {
        let claims = Claims { user_id, email: email.to_string(), iat: now, exp: now + self.ttl_secs };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        Ok(IssuedToken { token, expires_at: claims.exp })
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);
        let data = decode::<Claims>(token, &self.decoding, &validation)
            .map_err(|e| AuthError::TokenError(e.to_string()))?;
        if now > data.claims.exp {
            return Err(AuthError::TokenError("token expired".into()));
        }
        Ok(data.claims)
    }
}
