use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use uuid::Uuid;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::{errors, user};

pub const MIN_DESCRIPTION_LEN: usize = 5;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "place")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub image: String,
    pub address: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub creator_id: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Creator }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Creator => Entity::belongs_to(user::Entity)
                .from(Column::CreatorId)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl Related<user::Entity> for Entity {
    fn to() -> RelationDef { Relation::Creator.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Row values for a new place; validated by [`create`].
#[derive(Clone, Debug)]
pub struct NewPlaceRow<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub address: &'a str,
    pub image: &'a str,
    pub location: Option<(f64, f64)>,
    pub creator_id: Uuid,
}

pub fn validate_title(t: &str) -> Result<(), errors::ModelError> {
    if t.trim().is_empty() {
        return Err(errors::ModelError::Validation("title required".into()));
    }
    Ok(())
}

pub fn validate_description(d: &str) -> Result<(), errors::ModelError> {
    if d.chars().count() < MIN_DESCRIPTION_LEN {
        return Err(errors::ModelError::Validation(format!("description too short (>={MIN_DESCRIPTION_LEN})")));
    }
    Ok(())
}

pub fn validate_address(a: &str) -> Result<(), errors::ModelError> {
    if a.trim().is_empty() {
        return Err(errors::ModelError::Validation("address required".into()));
    }
    Ok(())
}

pub fn validate_location(lat: f64, lng: f64) -> Result<(), errors::ModelError> {
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(errors::ModelError::Validation("coordinates out of range".into()));
    }
    Ok(())
}

pub fn validate_image(path: &str) -> Result<(), errors::ModelError> {
    if path.trim().is_empty() {
        return Err(errors::ModelError::Validation("image required".into()));
    }
    Ok(())
}

/// Validate every field of a new place.
pub fn validate_new(row: &NewPlaceRow<'_>) -> Result<(), errors::ModelError> {
    validate_title(row.title)?;
    validate_description(row.description)?;
    validate_address(row.address)?;
    validate_image(row.image)?;
    if let Some((lat, lng)) = row.location {
        validate_location(lat, lng)?;
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(db: &C, row: NewPlaceRow<'_>) -> Result<Model, errors::ModelError> {
    validate_new(&row)?;
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(row.title.to_string()),
        description: Set(row.description.to_string()),
        image: Set(row.image.to_string()),
        address: Set(row.address.to_string()),
        lat: Set(row.location.map(|(lat, _)| lat)),
        lng: Set(row.location.map(|(_, lng)| lng)),
        creator_id: Set(row.creator_id),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// Replace title and description together.
pub async fn update_content<C: ConnectionTrait>(
    db: &C,
    existing: Model,
    title: &str,
    description: &str,
) -> Result<Model, errors::ModelError> {
    validate_title(title)?;
    validate_description(description)?;
    let mut am: ActiveModel = existing.into();
    am.title = Set(title.to_string());
    am.description = Set(description.to_string());
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
