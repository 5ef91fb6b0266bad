use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::auth::repo::seaorm::SeaOrmUserRepository;
use service::auth::repository::UserRepository;
use service::auth::{AuthService, TokenService};
use service::places::repo::seaorm::SeaOrmPlaceRepository;
use service::places::repository::PlaceRepository;
use service::places::PlaceService;
use service::storage::memory::MemoryStore;

use crate::uploads::ImageStore;

/// Shared handler state; cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService<dyn UserRepository>>,
    pub places: Arc<PlaceService<dyn PlaceRepository>>,
    pub images: Arc<ImageStore>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserRepository>,
        places: Arc<dyn PlaceRepository>,
        tokens: TokenService,
        images: ImageStore,
    ) -> Self {
        Self {
            auth: Arc::new(AuthService::new(users, tokens)),
            places: Arc::new(PlaceService::new(places)),
            images: Arc::new(images),
        }
    }

    /// PostgreSQL-backed state.
    pub fn seaorm(db: DatabaseConnection, tokens: TokenService, images: ImageStore) -> Self {
        let users = Arc::new(SeaOrmUserRepository { db: db.clone() });
        let places = Arc::new(SeaOrmPlaceRepository { db });
        Self::new(users, places, tokens, images)
    }

    /// State over a single in-process store.
    pub fn in_memory(store: Arc<MemoryStore>, tokens: TokenService, images: ImageStore) -> Self {
        Self::new(store.clone(), store, tokens, images)
    }

    pub fn tokens(&self) -> &TokenService { self.auth.tokens() }
}
