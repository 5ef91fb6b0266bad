use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

/// Place as exposed to callers; `creator` is the owning user id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Place {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    pub creator: Uuid,
}

impl From<models::place::Model> for Place {
    fn from(m: models::place::Model) -> Self {
        let location = match (m.lat, m.lng) {
            (Some(lat), Some(lng)) => Some(Location { lat, lng }),
            _ => None,
        };
        Self {
            id: m.id,
            title: m.title,
            description: m.description,
            image: m.image,
            address: m.address,
            location,
            creator: m.creator_id,
        }
    }
}

/// Fields of a place about to be created. The owner is supplied separately.
#[derive(Debug, Clone)]
pub struct NewPlace {
    pub title: String,
    pub description: String,
    pub address: String,
    /// Stored path of the uploaded image.
    pub image: String,
    pub location: Option<Location>,
}

impl NewPlace {
    pub fn as_row(&self, creator_id: Uuid) -> models::place::NewPlaceRow<'_> {
        models::place::NewPlaceRow {
            title: &self.title,
            description: &self.description,
            address: &self.address,
            image: &self.image,
            location: self.location.map(|l| (l.lat, l.lng)),
            creator_id,
        }
    }

    pub fn validate(&self) -> Result<(), ServiceError> {
        models::place::validate_new(&self.as_row(Uuid::nil())).map_err(ServiceError::invalid_input)
    }
}

/// Title and description are always replaced together.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceUpdate {
    pub title: String,
    pub description: String,
}

impl PlaceUpdate {
    pub fn validate(&self) -> Result<(), ServiceError> {
        models::place::validate_title(&self.title).map_err(ServiceError::invalid_input)?;
        models::place::validate_description(&self.description).map_err(ServiceError::invalid_input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn location_only_when_both_coordinates_present() {
        let now = Utc::now().into();
        let mut m = models::place::Model {
            id: Uuid::new_v4(),
            title: "Empire State Building".into(),
            description: "One of the most famous sky scrapers".into(),
            image: "uploads/images/a.png".into(),
            address: "20 W 34th St, New York, NY 10001".into(),
            lat: Some(40.7484405),
            lng: Some(-73.9878584),
            creator_id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        };
        let p = Place::from(m.clone());
        assert_eq!(p.location, Some(Location { lat: 40.7484405, lng: -73.9878584 }));
        assert_eq!(p.creator, m.creator_id);

        m.lng = None;
        let json = serde_json::to_value(Place::from(m)).unwrap();
        assert!(json.get("location").is_none());
        assert!(json.get("creator").is_some());
    }

    #[test]
    fn update_requires_both_fields() {
        let ok = PlaceUpdate { title: "New".into(), description: "Longer text".into() };
        assert!(ok.validate().is_ok());
        let short = PlaceUpdate { title: "New".into(), description: "abc".into() };
        assert!(matches!(short.validate(), Err(ServiceError::Validation(_))));
        let blank = PlaceUpdate { title: " ".into(), description: "Longer text".into() };
        assert!(matches!(blank.validate(), Err(ServiceError::Validation(_))));
    }
}
