use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Row};
use std::time::Duration;
use tracing::info;
use uuid::Uuid;

use super::models::{Director, Drama, Genre, NewUser, User, UserChanges};
use super::{CatalogStore, StoreError, StoreResult};
use crate::config::DatabaseConfig;

/// Postgres error code for unique constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS genres (
        id          UUID PRIMARY KEY,
        name        TEXT NOT NULL DEFAULT '',
        description TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS dramas (
        id           UUID PRIMARY KEY,
        title        TEXT NOT NULL,
        description  TEXT NOT NULL,
        genre        UUID[] NOT NULL DEFAULT '{}',
        release_year TEXT,
        episodes     TEXT,
        director     JSONB NOT NULL DEFAULT '{}',
        writer       TEXT[] NOT NULL DEFAULT '{}',
        image_path   TEXT,
        featured     BOOLEAN NOT NULL DEFAULT FALSE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id         UUID PRIMARY KEY,
        username   TEXT NOT NULL,
        password   TEXT NOT NULL,
        email      TEXT NOT NULL,
        birthday   DATE,
        fav_dramas UUID[] NOT NULL DEFAULT '{}'
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS users_username_key ON users (username)",
    "CREATE INDEX IF NOT EXISTS dramas_title_idx ON dramas (title)",
    "CREATE INDEX IF NOT EXISTS dramas_director_name_idx ON dramas ((director->>'Name'))",
];

const USER_COLUMNS: &str = "id, username, password, email, birthday, fav_dramas";

/// Document store backed by a Postgres connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connects to the database and creates any missing tables.
    pub async fn connect(config: &DatabaseConfig) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(&config.url)
            .await?;
        info!("Created database pool (max {} connections)", config.max_connections);

        let store = Self::from_pool(pool);
        store.init_schema().await?;
        Ok(store)
    }

    /// Wraps an existing pool without touching the schema.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn init_schema(&self) -> StoreResult<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}

impl<'r> FromRow<'r, PgRow> for Drama {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let Json(director): Json<Director> = row.try_get("director")?;
        Ok(Drama {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            genre: row.try_get("genre")?,
            release_year: row.try_get("release_year")?,
            episodes: row.try_get("episodes")?,
            director,
            writer: row.try_get("writer")?,
            image_path: row.try_get("image_path")?,
            featured: row.try_get("featured")?,
        })
    }
}

/// Turns a unique violation on `users.username` into a conflict on `username`.
fn username_conflict(err: sqlx::Error, username: &str) -> StoreError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            StoreError::Conflict(username.to_string())
        }
        _ => StoreError::Sqlx(err),
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_dramas(&self) -> StoreResult<Vec<Drama>> {
        let dramas = sqlx::query_as::<_, Drama>("SELECT * FROM dramas ORDER BY title, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(dramas)
    }

    async fn find_drama_by_title(&self, title: &str) -> StoreResult<Option<Drama>> {
        let drama = sqlx::query_as::<_, Drama>("SELECT * FROM dramas WHERE title = $1 ORDER BY id LIMIT 1")
            .bind(title)
            .fetch_optional(&self.pool)
            .await?;
        Ok(drama)
    }

    async fn find_drama_by_director(&self, name: &str) -> StoreResult<Option<Drama>> {
        let drama = sqlx::query_as::<_, Drama>(
            "SELECT * FROM dramas WHERE director->>'Name' = $1 ORDER BY title, id LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(drama)
    }

    async fn upsert_drama(&self, drama: &Drama) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO dramas
                (id, title, description, genre, release_year, episodes, director, writer, image_path, featured)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                description = EXCLUDED.description,
                genre = EXCLUDED.genre,
                release_year = EXCLUDED.release_year,
                episodes = EXCLUDED.episodes,
                director = EXCLUDED.director,
                writer = EXCLUDED.writer,
                image_path = EXCLUDED.image_path,
                featured = EXCLUDED.featured
            "#,
        )
        .bind(drama.id)
        .bind(&drama.title)
        .bind(&drama.description)
        .bind(&drama.genre)
        .bind(&drama.release_year)
        .bind(&drama.episodes)
        .bind(Json(&drama.director))
        .bind(&drama.writer)
        .bind(&drama.image_path)
        .bind(drama.featured)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_genres(&self) -> StoreResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>("SELECT id, name, description FROM genres ORDER BY name, id")
            .fetch_all(&self.pool)
            .await?;
        Ok(genres)
    }

    async fn find_genre_by_name(&self, name: &str) -> StoreResult<Option<Genre>> {
        let genre = sqlx::query_as::<_, Genre>(
            "SELECT id, name, description FROM genres WHERE name = $1 ORDER BY id LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;
        Ok(genre)
    }

    async fn find_genres_by_ids(&self, ids: &[Uuid]) -> StoreResult<Vec<Genre>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let genres = sqlx::query_as::<_, Genre>("SELECT id, name, description FROM genres WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;
        Ok(genres)
    }

    async fn upsert_genre(&self, genre: &Genre) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO genres (id, name, description) VALUES ($1, $2, $3)
            ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, description = EXCLUDED.description
            "#,
        )
            .bind(genre.id)
            .bind(&genre.name)
            .bind(&genre.description)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE username = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create_user(&self, user: NewUser) -> StoreResult<User> {
        let sql = format!(
            "INSERT INTO users (id, username, password, email, birthday) VALUES ($1, $2, $3, $4, $5) RETURNING {}",
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.email)
            .bind(user.birthday)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| username_conflict(e, &user.username))
    }

    async fn update_user(&self, username: &str, changes: UserChanges) -> StoreResult<Option<User>> {
        let sql = format!(
            r#"
            UPDATE users
            SET username = $2, password = $3, email = $4, birthday = COALESCE($5, birthday)
            WHERE username = $1
            RETURNING {}
            "#,
            USER_COLUMNS
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .bind(&changes.username)
            .bind(&changes.password_hash)
            .bind(&changes.email)
            .bind(changes.birthday)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| username_conflict(e, &changes.username))
    }

    async fn push_favorite(&self, username: &str, drama_id: Uuid) -> StoreResult<Option<User>> {
        let sql = format!(
            "UPDATE users SET fav_dramas = array_append(fav_dramas, $2) WHERE username = $1 RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .bind(drama_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn pull_favorite(&self, username: &str, drama_id: Uuid) -> StoreResult<Option<User>> {
        let sql = format!(
            "UPDATE users SET fav_dramas = array_remove(fav_dramas, $2) WHERE username = $1 RETURNING {}",
            USER_COLUMNS
        );
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .bind(drama_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn delete_user(&self, username: &str) -> StoreResult<Option<User>> {
        let sql = format!("DELETE FROM users WHERE username = $1 RETURNING {}", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}
