use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::domain::{AuthUser, Credentials, NewUser};
use crate::auth::errors::AuthError;
use crate::auth::repository::UserRepository;
use crate::errors::ServiceError;
use crate::places::domain::{NewPlace, Place, PlaceUpdate};
use crate::places::repository::PlaceRepository;
use crate::places::service::{OWNER_NOT_FOUND, PLACE_NOT_FOUND};

const INJECTED_FAILURE: &str = "injected write failure";

struct UserRecord {
    user: AuthUser,
    password_hash: String,
    seq: u64,
}

struct PlaceRecord {
    place: Place,
    seq: u64,
}

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, UserRecord>,
    places: HashMap<Uuid, PlaceRecord>,
}

/// In-process store for users and places.
///
/// Every mutation validates first and then applies all of its writes under a
/// single write lock, so readers never observe half of a dual write.
/// `fail_writes(true)` makes the next mutations fail before anything is
/// applied.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    fail_writes: AtomicBool,
    seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn writes_failing(&self) -> bool { self.fail_writes.load(Ordering::SeqCst) }

    fn next_seq(&self) -> u64 { self.seq.fetch_add(1, Ordering::SeqCst) }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|r| r.user.email == email).map(|r| r.user.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
        Ok(self.tables.read().await.users.get(&id).map(|r| r.user.clone()))
    }

    async fn create_user(&self, user: NewUser) -> Result<AuthUser, AuthError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|r| r.user.email == user.email) {
            return Err(AuthError::Conflict);
        }
        if self.writes_failing() {
            return Err(AuthError::Repository(INJECTED_FAILURE.into()));
        }
        let record = UserRecord {
            user: AuthUser {
                id: Uuid::new_v4(),
                name: user.name,
                email: user.email,
                image: user.image,
                places: Vec::new(),
            },
            password_hash: user.password_hash,
            seq: self.next_seq(),
        };
        let created = record.user.clone();
        tables.users.insert(created.id, record);
        Ok(created)
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&user_id).map(|r| Credentials { user_id, password_hash: r.password_hash.clone() }))
    }

    async fn list_users(&self) -> Result<Vec<AuthUser>, AuthError> {
        let tables = self.tables.read().await;
        let mut records: Vec<&UserRecord> = tables.users.values().collect();
        records.sort_by_key(|r| r.seq);
        Ok(records.into_iter().map(|r| r.user.clone()).collect())
    }
}

#[async_trait]
impl PlaceRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Place>, ServiceError> {
        Ok(self.tables.read().await.places.get(&id).map(|r| r.place.clone()))
    }

    async fn find_by_creator(&self, user_id: Uuid) -> Result<Vec<Place>, ServiceError> {
        let tables = self.tables.read().await;
        let mut records: Vec<&PlaceRecord> = tables.places.values().filter(|r| r.place.creator == user_id).collect();
        records.sort_by_key(|r| r.seq);
        Ok(records.into_iter().map(|r| r.place.clone()).collect())
    }

    async fn insert_with_owner(&self, owner_id: Uuid, place: NewPlace) -> Result<Place, ServiceError> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&owner_id) {
            return Err(ServiceError::not_found(OWNER_NOT_FOUND));
        }
        place.validate()?;
        if self.writes_failing() {
            return Err(ServiceError::Db(INJECTED_FAILURE.into()));
        }
        let created = Place {
            id: Uuid::new_v4(),
            title: place.title,
            description: place.description,
            image: place.image,
            address: place.address,
            location: place.location,
            creator: owner_id,
        };
        let seq = self.next_seq();
        tables.places.insert(created.id, PlaceRecord { place: created.clone(), seq });
        if let Some(owner) = tables.users.get_mut(&owner_id) {
            models::user::push_place(&mut owner.user.places, created.id);
        }
        Ok(created)
    }

    async fn update_content(&self, id: Uuid, update: PlaceUpdate) -> Result<Place, ServiceError> {
        let mut tables = self.tables.write().await;
        update.validate()?;
        let writes_failing = self.writes_failing();
        let record = tables.places.get_mut(&id).ok_or_else(|| ServiceError::not_found(PLACE_NOT_FOUND))?;
        if writes_failing {
            return Err(ServiceError::Db(INJECTED_FAILURE.into()));
        }
        record.place.title = update.title;
        record.place.description = update.description;
        Ok(record.place.clone())
    }

    async fn delete_with_owner(&self, id: Uuid) -> Result<Place, ServiceError> {
        let mut tables = self.tables.write().await;
        if !tables.places.contains_key(&id) {
            return Err(ServiceError::not_found(PLACE_NOT_FOUND));
        }
        if self.writes_failing() {
            return Err(ServiceError::Db(INJECTED_FAILURE.into()));
        }
        let removed = tables
            .places
            .remove(&id)
            .map(|r| r.place)
            .ok_or_else(|| ServiceError::not_found(PLACE_NOT_FOUND))?;
        if let Some(owner) = tables.users.get_mut(&removed.creator) {
            models::user::prune_place(&mut owner.user.places, id);
        }
        Ok(removed)
    }
}
