use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::config::AppConfig;
use crate::database::{CatalogStore, Drama, Genre};

/// Catalog fixture: genres first so drama references resolve.
#[derive(Debug, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub dramas: Vec<Drama>,
}

pub async fn handle(config: AppConfig, path: PathBuf) -> anyhow::Result<()> {
    if config.database.uses_memory_store() {
        anyhow::bail!("the in-memory store does not outlive this command; use `serve --seed` instead");
    }
    let fixture = read_fixture(&path).await?;

    let store = crate::database::connect(&config.database).await?;
    let (genres, dramas) = load(store.as_ref(), &fixture).await?;

    tracing::info!("Seeded {} genres and {} dramas from {}", genres, dramas, path.display());
    Ok(())
}

pub async fn read_fixture(path: &Path) -> anyhow::Result<Fixture> {
    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid fixture {}", path.display()))
}

/// Writes the fixture and returns how many genres and dramas it holds.
///
/// Documents are upserted by id, so loading the same fixture again is harmless.
pub async fn load(store: &dyn CatalogStore, fixture: &Fixture) -> anyhow::Result<(usize, usize)> {
    for genre in &fixture.genres {
        store
            .upsert_genre(genre)
            .await
            .with_context(|| format!("failed to insert genre {}", genre.name))?;
    }

    for drama in &fixture.dramas {
        let unknown = drama
            .genre
            .iter()
            .filter(|id| !fixture.genres.iter().any(|g| g.id == **id))
            .count();
        if unknown > 0 {
            tracing::warn!("Drama '{}' references {} genre(s) not in this fixture", drama.title, unknown);
        }
        store
            .upsert_drama(drama)
            .await
            .with_context(|| format!("failed to insert drama {}", drama.title))?;
    }

    Ok((fixture.genres.len(), fixture.dramas.len()))
}
