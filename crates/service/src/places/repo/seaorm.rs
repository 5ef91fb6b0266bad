use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::places::domain::{NewPlace, Place, PlaceUpdate};
use crate::places::repository::PlaceRepository;
use crate::places::service::{OWNER_NOT_FOUND, PLACE_NOT_FOUND};

fn db_err(e: sea_orm::DbErr) -> ServiceError { ServiceError::Db(e.to_string()) }

/// PostgreSQL place repository. Dual writes run in one transaction with the
/// owner row locked so concurrent writers cannot drop list entries. Deletes
/// also lock the place row first, so only one of two racing deletes succeeds.
pub struct SeaOrmPlaceRepository {
    pub db: DatabaseConnection,
}

async fn lock_owner(txn: &DatabaseTransaction, owner_id: Uuid) -> Result<Option<models::user::Model>, ServiceError> {
    models::user::Entity::find_by_id(owner_id)
        .lock_exclusive()
        .one(txn)
        .await
        .map_err(db_err)
}

#[async_trait]
impl PlaceRepository for SeaOrmPlaceRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Place>, ServiceError> {
        let res = models::place::Entity::find_by_id(id).one(&self.db).await.map_err(db_err)?;
        Ok(res.map(Place::from))
    }

    async fn find_by_creator(&self, user_id: Uuid) -> Result<Vec<Place>, ServiceError> {
        let rows = models::place::Entity::find()
            .filter(models::place::Column::CreatorId.eq(user_id))
            .order_by_asc(models::place::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Place::from).collect())
    }

    async fn insert_with_owner(&self, owner_id: Uuid, place: NewPlace) -> Result<Place, ServiceError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let owner = lock_owner(&txn, owner_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(OWNER_NOT_FOUND))?;

        let created = models::place::create(&txn, place.as_row(owner_id))
            .await
            .map_err(ServiceError::invalid_input)?;
        let mut places = owner.places.clone();
        models::user::push_place(&mut places, created.id);
        models::user::set_places(&txn, owner, places).await?;

        txn.commit().await.map_err(db_err)?;
        debug!(place_id = %created.id, user_id = %owner_id, "place and owner list committed");
        Ok(created.into())
    }

    async fn update_content(&self, id: Uuid, update: PlaceUpdate) -> Result<Place, ServiceError> {
        let existing = models::place::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| ServiceError::not_found(PLACE_NOT_FOUND))?;
        let updated = models::place::update_content(&self.db, existing, &update.title, &update.description)
            .await
            .map_err(ServiceError::invalid_input)?;
        Ok(updated.into())
    }

    async fn delete_with_owner(&self, id: Uuid) -> Result<Place, ServiceError> {
        let txn = self.db.begin().await.map_err(db_err)?;
        let existing = models::place::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| ServiceError::not_found(PLACE_NOT_FOUND))?;

        if let Some(owner) = lock_owner(&txn, existing.creator_id).await? {
            let mut places = owner.places.clone();
            if models::user::prune_place(&mut places, id) {
                models::user::set_places(&txn, owner, places).await?;
            }
        }
        let res = models::place::Entity::delete_by_id(id).exec(&txn).await.map_err(db_err)?;
        if res.rows_affected == 0 {
            return Err(ServiceError::not_found(PLACE_NOT_FOUND));
        }

        txn.commit().await.map_err(db_err)?;
        debug!(place_id = %id, "place deleted and pruned from owner");
        Ok(existing.into())
    }
}
