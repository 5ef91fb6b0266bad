use async_trait::async_trait;
use uuid::Uuid;

use super::domain::{NewPlace, Place, PlaceUpdate};
use crate::errors::ServiceError;

/// Place persistence. Ownership is checked by the service, not here.
#[async_trait]
pub trait PlaceRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Place>, ServiceError>;
    async fn find_by_creator(&self, user_id: Uuid) -> Result<Vec<Place>, ServiceError>;
    /// Insert the place and append it to the owner's list, both or neither.
    /// `NotFound` when the owner does not exist.
    async fn insert_with_owner(&self, owner_id: Uuid, place: NewPlace) -> Result<Place, ServiceError>;
    async fn update_content(&self, id: Uuid, update: PlaceUpdate) -> Result<Place, ServiceError>;
    /// Delete the place and prune it from the owner's list, both or neither.
    async fn delete_with_owner(&self, id: Uuid) -> Result<Place, ServiceError>;
}
