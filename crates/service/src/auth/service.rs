use std::sync::Arc;

use tracing::{info, debug, instrument};

use super::domain::{SignupInput, LoginInput, AuthUser, AuthSession, NewUser};
use super::errors::AuthError;
use super::password::{hash_password, verify_password};
use super::repository::UserRepository;
use super::token::TokenService;

/// Auth business service independent of web framework
pub struct AuthService<R: ?Sized> {
    repo: Arc<R>,
    tokens: TokenService,
}

impl<R: UserRepository + ?Sized> AuthService<R> {
    pub fn new(repo: Arc<R>, tokens: TokenService) -> Self { Self { repo, tokens } }

    pub fn tokens(&self) -> &TokenService { &self.tokens }

    /// Register a new user with a hashed password and hand back a token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, TokenService, domain::SignupInput};
    /// use service::storage::memory::MemoryStore;
    /// use std::sync::Arc;
    /// let svc = AuthService::new(Arc::new(MemoryStore::new()), TokenService::new("secret", 3600));
    /// let input = SignupInput { name: "Ann".into(), email: "A@B.com".into(), password: "secret1".into(), image: None };
    /// let session = tokio_test::block_on(svc.signup(input)).unwrap();
    /// assert_eq!(session.user.email, "a@b.com");
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn signup(&self, input: SignupInput) -> Result<AuthSession, AuthError> {
        models::user::validate_name(&input.name)?;
        let email = models::user::normalize_email(&input.email);
        models::user::validate_email(&email)?;
        models::user::validate_password(&input.password)?;

        if let Some(existing) = self.repo.find_by_email(&email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let password_hash = hash_password(&input.password)?;
        let user = self.repo.create_user(NewUser {
            name: input.name.trim().to_string(),
            email,
            password_hash,
            image: input.image,
        }).await?;
        info!(user_id = %user.id, email = %user.email, "user_registered");
        self.session_for(user)
    }

    /// Authenticate a user and issue a token.
    ///
    /// Unknown emails and wrong passwords are indistinguishable to the caller.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let email = models::user::normalize_email(&input.email);
        let user = self.repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !verify_password(&input.password, &cred.password_hash)? {
            return Err(AuthError::Unauthorized);
        }
        info!(user_id = %user.id, "user_logged_in");
        self.session_for(user)
    }

    pub async fn list_users(&self) -> Result<Vec<AuthUser>, AuthError> {
        self.repo.list_users().await
    }

    fn session_for(&self, user: AuthUser) -> Result<AuthSession, AuthError> {
        let issued = self.tokens.issue(user.id, &user.email)?;
        Ok(AuthSession { user, token: issued.token, expires_at: issued.expires_at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStore;

    fn service() -> (Arc<MemoryStore>, AuthService<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let svc = AuthService::new(store.clone(), TokenService::new("test-secret", 3600));
        (store, svc)
    }

    fn ann() -> SignupInput {
        SignupInput { name: "Ann".into(), email: "a@b.com".into(), password: "secret1".into(), image: None }
    }

    #[tokio::test]
    async fn signup_then_login() {
        let (_, svc) = service();
        let signed_up = svc.signup(ann()).await.unwrap();
        let claims = svc.tokens().verify(&signed_up.token).unwrap();
        assert_eq!(claims.user_id, signed_up.user.id);

        let logged_in = svc.login(LoginInput { email: "a@b.com".into(), password: "secret1".into() }).await.unwrap();
        assert_eq!(logged_in.user.id, signed_up.user.id);
        assert_eq!(svc.tokens().verify(&logged_in.token).unwrap().email, "a@b.com");
    }

    #[tokio::test]
    async fn duplicate_email_conflicts_without_new_record() {
        let (_, svc) = service();
        svc.signup(ann()).await.unwrap();
        let mut again = ann();
        again.email = " A@B.COM ".into();
        again.name = "Other".into();
        assert!(matches!(svc.signup(again).await, Err(AuthError::Conflict)));
        assert_eq!(svc.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn signup_validates_fields() {
        let (_, svc) = service();
        let mut short = ann();
        short.password = "12345".into();
        assert!(matches!(svc.signup(short).await, Err(AuthError::Validation(_))));
        let mut bad_email = ann();
        bad_email.email = "not-an-email".into();
        assert!(matches!(svc.signup(bad_email).await, Err(AuthError::Validation(_))));
        let mut no_name = ann();
        no_name.name = " ".into();
        assert!(matches!(svc.signup(no_name).await, Err(AuthError::Validation(_))));
        assert!(svc.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn login_rejects_wrong_password_and_unknown_email() {
        let (_, svc) = service();
        svc.signup(ann()).await.unwrap();
        let wrong = svc.login(LoginInput { email: "a@b.com".into(), password: "wrong-pass".into() }).await;
        assert!(matches!(wrong, Err(AuthError::Unauthorized)));
        let unknown = svc.login(LoginInput { email: "nobody@b.com".into(), password: "secret1".into() }).await;
        assert!(matches!(unknown, Err(AuthError::Unauthorized)));
    }

    #[tokio::test]
    async fn storage_failure_surfaces_as_repository_error() {
        let (store, svc) = service();
        store.fail_writes(true);
        assert!(matches!(svc.signup(ann()).await, Err(AuthError::Repository(_))));
        store.fail_writes(false);
        assert!(svc.list_users().await.unwrap().is_empty());
    }
}
