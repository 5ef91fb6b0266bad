use sea_orm::{entity::prelude::*, ConnectionTrait, QueryFilter, Set, SqlErr};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::place;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub image: Option<String>,
    pub places: Vec<Uuid>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Place,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::Place => Entity::has_many(place::Entity).into() }
    }
}

impl Related<place::Entity> for Entity {
    fn to() -> RelationDef { Relation::Place.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Trim and lower-case an email so uniqueness is case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), errors::ModelError> {
    let invalid = || errors::ModelError::Validation("invalid email".into());
    if email.chars().any(char::is_whitespace) { return Err(invalid()); }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') { return Err(invalid()); }
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() { return Err(errors::ModelError::Validation("name required".into())); }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), errors::ModelError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(errors::ModelError::Validation(format!("password too short (>={MIN_PASSWORD_LEN})")));
    }
    Ok(())
}

/// Append a place id to an owned-place list; ids already present are kept once.
pub fn push_place(places: &mut Vec<Uuid>, place_id: Uuid) {
    if !places.contains(&place_id) {
        places.push(place_id);
    }
}

/// Remove a place id from an owned-place list; returns whether it was present.
pub fn prune_place(places: &mut Vec<Uuid>, place_id: Uuid) -> bool {
    let before = places.len();
    places.retain(|p| *p != place_id);
    places.len() != before
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    name: &str,
    email: &str,
    password_hash: String,
    image: Option<String>,
) -> Result<Model, errors::ModelError> {
    validate_name(name)?;
    let email = normalize_email(email);
    validate_email(&email)?;
    if password_hash.trim().is_empty() {
        return Err(errors::ModelError::Validation("password hash required".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.trim().to_string()),
        email: Set(email),
        password_hash: Set(password_hash),
        image: Set(image),
        places: Set(Vec::new()),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => errors::ModelError::Conflict("email already registered".into()),
        _ => errors::ModelError::Db(e.to_string()),
    })
}

pub async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Email.eq(normalize_email(email)))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Overwrite the owned-place list of a user.
pub async fn set_places<C: ConnectionTrait>(db: &C, user: Model, places: Vec<Uuid>) -> Result<Model, errors::ModelError> {
    let mut am: ActiveModel = user.into();
    am.places = Set(places);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_validation() {
        assert!(validate_email("a@b.com").is_ok());
        assert!(validate_email("first.last@sub.example.org").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@b.com").is_err());
        assert!(validate_email("a@b").is_err());
        assert!(validate_email("a@.com").is_err());
        assert!(validate_email("a b@c.com").is_err());
        assert!(validate_email("a@b@c.com").is_err());
    }

    #[test]
    fn email_is_normalized() {
        assert_eq!(normalize_email("  Test@Test.COM "), "test@test.com");
    }

    #[test]
    fn password_minimum_length() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("secret1").is_ok());
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn name_required() {
        assert!(validate_name("   ").is_err());
        assert!(validate_name("Ann").is_ok());
    }

    #[test]
    fn place_list_helpers() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let mut places = Vec::new();
        push_place(&mut places, a);
        push_place(&mut places, a);
        push_place(&mut places, b);
        assert_eq!(places, vec![a, b]);
        assert!(prune_place(&mut places, a));
        assert!(!prune_place(&mut places, a));
        assert_eq!(places, vec![b]);
    }
}
