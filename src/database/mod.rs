//! Persistence for the catalog and user documents.
//!
//! Every route maps onto exactly one [`CatalogStore`] call. The trait has a
//! Postgres implementation for deployments and an in-memory one for tests and
//! local runs.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::config::DatabaseConfig;

pub mod memory;
pub mod models;
pub mod postgres;


pub use memory::MemoryStore;
pub use models::{Director, Drama, Genre, NewUser, User, UserChanges};
pub use postgres::PgStore;

/// Errors from the document store
#[derive(Debug, Error)]
pub enum StoreError {
    /// A unique field (the username) is already taken.
    #[error("{0} already exists")]
    Conflict(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Document operations needed by the API.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Checks that the backend is reachable.
    async fn ping(&self) -> StoreResult<()>;

    async fn list_dramas(&self) -> StoreResult<Vec<Drama>>;

    async fn find_drama_by_title(&self, title: &str) -> StoreResult<Option<Drama>>;

    /// Finds the first drama whose embedded director has exactly this name.
    async fn find_drama_by_director(&self, name: &str) -> StoreResult<Option<Drama>>;

    /// Inserts the drama, or replaces the one stored under the same id.
    async fn upsert_drama(&self, drama: &Drama) -> StoreResult<()>;

    async fn list_genres(&self) -> StoreResult<Vec<Genre>>;

    async fn find_genre_by_name(&self, name: &str) -> StoreResult<Option<Genre>>;

    /// Returns the genres among `ids` that exist, in no particular order.
    async fn find_genres_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Genre>>;

    /// Inserts the genre, or replaces the one stored under the same id.
    async fn upsert_genre(&self, genre: &Genre) -> StoreResult<()>;

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Creates a user, failing with [`StoreError::Conflict`] if the username is taken.
    async fn create_user(&self, user: NewUser) -> StoreResult<User>;

    /// Updates the user in place and returns the new document, or `None` if
    /// no user has this username.
    async fn update_user(&self, username: &str, changes: UserChanges) -> StoreResult<Option<User>>;

    /// Appends `drama_id` to the favorites, even if already present.
    async fn push_favorite(&self, username: &str, drama_id: Uuid) -> StoreResult<Option<User>>;

    /// Removes every occurrence of `drama_id` from the favorites.
    async fn pull_favorite(&self, username: &str, drama_id: Uuid) -> StoreResult<Option<User>>;

    /// Deletes the user and returns the removed document, if any.
    async fn delete_user(&self, username: &str) -> StoreResult<Option<User>>;
}

/// Expands the genre references of `dramas` with a single genre lookup.
pub async fn populate_genres(
    store: &dyn CatalogStore,
    dramas: Vec<Drama>,
) -> StoreResult<Vec<models::DramaView>> {
    let mut ids: Vec<Uuid> = dramas.iter().flat_map(|d| d.genre.iter().copied()).collect();
    ids.sort();
    ids.dedup();

    let genres = if ids.is_empty() { Vec::new() } else { store.find_genres_by_ids(&ids).await? };
    Ok(dramas.into_iter().map(|d| d.populate(&genres)).collect())
}

/// Opens the store named by the configuration.
pub async fn connect(config: &DatabaseConfig) -> StoreResult<Arc<dyn CatalogStore>> {
    if config.uses_memory_store() {
        tracing::warn!("Using the in-memory store; data will not survive a restart");
        return Ok(Arc::new(MemoryStore::new()));
    }
    Ok(Arc::new(PgStore::connect(config).await?))
}
