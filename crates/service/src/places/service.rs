use std::sync::Arc;

use tracing::{info, warn, instrument};
use uuid::Uuid;

use super::domain::{NewPlace, Place, PlaceUpdate};
use super::repository::PlaceRepository;
use crate::errors::ServiceError;

pub const PLACE_NOT_FOUND: &str = "Could not find a place for the provided id.";
pub const USER_PLACES_NOT_FOUND: &str = "Could not find places for the provided user id.";
pub const OWNER_NOT_FOUND: &str = "Could not find user for provided id";
pub const EDIT_FORBIDDEN: &str = "You are not allowed to edit this place.";
pub const DELETE_FORBIDDEN: &str = "You are not allowed to delete this place.";

/// Place workflows. Mutations verify that the caller owns the record first.
pub struct PlaceService<R: ?Sized> {
    repo: Arc<R>,
}

impl<R: PlaceRepository + ?Sized> PlaceService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    pub async fn get(&self, id: Uuid) -> Result<Place, ServiceError> {
        self.repo.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found(PLACE_NOT_FOUND))
    }

    /// Places owned by `user_id`; an empty result is reported as not found.
    pub async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Place>, ServiceError> {
        let places = self.repo.find_by_creator(user_id).await?;
        if places.is_empty() {
            return Err(ServiceError::not_found(USER_PLACES_NOT_FOUND));
        }
        Ok(places)
    }

    #[instrument(skip(self, input), fields(user_id = %caller))]
    pub async fn create(&self, caller: Uuid, input: NewPlace) -> Result<Place, ServiceError> {
        input.validate()?;
        let place = self.repo.insert_with_owner(caller, input).await?;
        info!(place_id = %place.id, "place_created");
        Ok(place)
    }

    #[instrument(skip(self, update), fields(place_id = %id, user_id = %caller))]
    pub async fn update(&self, id: Uuid, caller: Uuid, update: PlaceUpdate) -> Result<Place, ServiceError> {
        update.validate()?;
        let existing = self.get(id).await?;
        if existing.creator != caller {
            warn!("non-owner update rejected");
            return Err(ServiceError::forbidden(EDIT_FORBIDDEN));
        }
        let place = self.repo.update_content(id, update).await?;
        info!("place_updated");
        Ok(place)
    }

    /// Returns the removed place so the caller can clean up its image.
    #[instrument(skip(self), fields(place_id = %id, user_id = %caller))]
    pub async fn delete(&self, id: Uuid, caller: Uuid) -> Result<Place, ServiceError> {
        let existing = self.get(id).await?;
        if existing.creator != caller {
            warn!("non-owner delete rejected");
            return Err(ServiceError::forbidden(DELETE_FORBIDDEN));
        }
        let place = self.repo.delete_with_owner(id).await?;
        info!("place_deleted");
        Ok(place)
    }
}
