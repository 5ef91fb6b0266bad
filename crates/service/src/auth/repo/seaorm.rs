use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};
use tracing::debug;
use uuid::Uuid;

use crate::auth::domain::{AuthUser, Credentials, NewUser};
use crate::auth::errors::AuthError;
use crate::auth::repository::UserRepository;

pub struct SeaOrmUserRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let res = models::user::find_by_email(&self.db, email).await?;
        Ok(res.map(AuthUser::from))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
        let res = models::user::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(AuthUser::from))
    }

    async fn create_user(&self, user: NewUser) -> Result<AuthUser, AuthError> {
        let created = models::user::create(&self.db, &user.name, &user.email, user.password_hash, user.image).await?;
        debug!(user_id = %created.id, "user row inserted");
        Ok(created.into())
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let res = models::user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(res.map(|u| Credentials { user_id: u.id, password_hash: u.password_hash }))
    }

    async fn list_users(&self) -> Result<Vec<AuthUser>, AuthError> {
        let rows = models::user::Entity::find()
            .order_by_asc(models::user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(rows.into_iter().map(AuthUser::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;

    #[tokio::test]
    async fn create_find_and_list() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        let repo = SeaOrmUserRepository { db: db.clone() };

        let email = format!("repo_{}@example.com", Uuid::new_v4());
        let created = repo.create_user(NewUser {
            name: "Repo".into(),
            email: email.clone(),
            password_hash: "$argon2id$stub".into(),
            image: Some("uploads/images/a.png".into()),
        }).await?;

        let by_email = repo.find_by_email(&email).await?.expect("by email");
        assert_eq!(by_email.id, created.id);
        let creds = repo.get_credentials(created.id).await?.expect("credentials");
        assert_eq!(creds.password_hash, "$argon2id$stub");
        assert!(repo.list_users().await?.iter().any(|u| u.id == created.id));

        let dup = repo.create_user(NewUser {
            name: "Dup".into(),
            email,
            password_hash: "$argon2id$stub".into(),
            image: None,
        }).await;
        assert!(matches!(dup, Err(AuthError::Conflict)));

        models::user::Entity::delete_by_id(created.id).exec(&db).await?;
        Ok(())
    }
}
