use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{Drama, Genre, NewUser, User, UserChanges};
use super::{CatalogStore, StoreError, StoreResult};

#[derive(Debug, Default)]
struct Documents {
    genres: Vec<Genre>,
    dramas: Vec<Drama>,
    users: Vec<User>,
}

/// Document store kept in process memory.
///
/// Listing order matches [`super::PgStore`]: dramas by title, genres by name.
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RwLock<Documents>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored users with this username.
    pub async fn count_users(&self, username: &str) -> usize {
        self.docs.read().await.users.iter().filter(|u| u.username == username).count()
    }
}

impl Documents {
    fn user_mut(&mut self, username: &str) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.username == username)
    }

    fn username_taken(&self, username: &str, except: Option<Uuid>) -> bool {
        self.users.iter().any(|u| u.username == username && Some(u.id) != except)
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn list_dramas(&self) -> StoreResult<Vec<Drama>> {
        let mut dramas = self.docs.read().await.dramas.clone();
        dramas.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(dramas)
    }

    async fn find_drama_by_title(&self, title: &str) -> StoreResult<Option<Drama>> {
        let docs = self.docs.read().await;
        Ok(docs.dramas.iter().find(|d| d.title == title).cloned())
    }

    async fn find_drama_by_director(&self, name: &str) -> StoreResult<Option<Drama>> {
        Ok(self
            .list_dramas()
            .await?
            .into_iter()
            .find(|d| d.director.name.as_deref() == Some(name)))
    }

    async fn upsert_drama(&self, drama: &Drama) -> StoreResult<()> {
        let mut docs = self.docs.write().await;
        let index = docs.dramas.iter().position(|d| d.id == drama.id);
        match index {
            Some(index) => docs.dramas[index] = drama.clone(),
            None => docs.dramas.push(drama.clone()),
        }
        Ok(())
    }

    async fn list_genres(&self) -> StoreResult<Vec<Genre>> {
        let mut genres = self.docs.read().await.genres.clone();
        genres.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(genres)
    }

    async fn find_genre_by_name(&self, name: &str) -> StoreResult<Option<Genre>> {
        let docs = self.docs.read().await;
        Ok(docs.genres.iter().find(|g| g.name == name).cloned())
    }

    async fn find_genres_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Genre>> {
        let docs = self.docs.read().await;
        Ok(docs.genres.iter().filter(|g| ids.contains(&g.id)).cloned().collect())
    }

    async fn upsert_genre(&self, genre: &Genre) -> StoreResult<()> {
        let mut docs = self.docs.write().await;
        let index = docs.genres.iter().position(|g| g.id == genre.id);
        match index {
            Some(index) => docs.genres[index] = genre.clone(),
            None => docs.genres.push(genre.clone()),
        }
        Ok(())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let docs = self.docs.read().await;
        Ok(docs.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let docs = self.docs.read().await;
        Ok(docs.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let mut docs = self.docs.write().await;
        if docs.username_taken(&user.username, None) {
            return Err(StoreError::Conflict(user.username));
        }
        let user = user.into_user(Uuid::new_v4());
        docs.users.push(user.clone());
        Ok(user)
    }

    async fn update_user(&self, username: &str, changes: UserChanges) -> StoreResult<Option<User>> {
        let mut docs = self.docs.write().await;
        let id = match docs.user_mut(username) {
            Some(user) => user.id,
            None => return Ok(None),
        };
        if docs.username_taken(&changes.username, Some(id)) {
            return Err(StoreError::Conflict(changes.username));
        }
        let user = docs.user_mut(username).map(|user| {
            user.apply(changes);
            user.clone()
        });
        Ok(user)
    }

    async fn push_favorite(&self, username: &str, drama_id: Uuid) -> StoreResult<Option<User>> {
        let mut docs = self.docs.write().await;
        Ok(docs.user_mut(username).map(|user| {
            user.fav_dramas.push(drama_id);
            user.clone()
        }))
    }

    async fn pull_favorite(&self, username: &str, drama_id: Uuid) -> StoreResult<Option<User>> {
        let mut docs = self.docs.write().await;
        Ok(docs.user_mut(username).map(|user| {
            user.fav_dramas.retain(|id| *id != drama_id);
            user.clone()
        }))
    }

    async fn delete_user(&self, username: &str) -> StoreResult<Option<User>> {
        let mut docs = self.docs.write().await;
        let index = docs.users.iter().position(|u| u.username == username);
        Ok(index.map(|index| docs.users.remove(index)))
    }
}
