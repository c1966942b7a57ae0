use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::genre::Genre;

/// Director details embedded in every drama they directed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Director {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth: Option<String>,
}

/// A drama as stored, with genres held as ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Drama {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub genre: Vec<Uuid>,
    #[serde(default)]
    pub release_year: Option<String>,
    #[serde(default)]
    pub episodes: Option<String>,
    #[serde(default)]
    pub director: Director,
    #[serde(default)]
    pub writer: Vec<String>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

/// A drama with its genre references expanded into genre documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DramaView {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub genre: Vec<Genre>,
    pub release_year: Option<String>,
    pub episodes: Option<String>,
    pub director: Director,
    pub writer: Vec<String>,
    pub image_path: Option<String>,
    pub featured: bool,
}

/// Projection of a drama down to its director.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectorView {
    #[serde(rename = "Director")]
    pub director: Director,
}

impl Drama {
    /// Replaces genre ids with the matching entries of `genres`, keeping the
    /// reference order. Ids without a matching genre are dropped.
    pub fn populate(self, genres: &[Genre]) -> DramaView {
        let genre = self
            .genre
            .iter()
            .filter_map(|id| genres.iter().find(|g| g.id == *id).cloned())
            .collect();

        DramaView {
            id: self.id,
            title: self.title,
            description: self.description,
            genre,
            release_year: self.release_year,
            episodes: self.episodes,
            director: self.director,
            writer: self.writer,
            image_path: self.image_path,
            featured: self.featured,
        }
    }
}

impl From<Drama> for DirectorView {
    fn from(drama: Drama) -> Self {
        Self { director: drama.director }
    }
}
