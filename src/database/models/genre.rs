use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct Genre {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Genre {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self { id: Uuid::new_v4(), name: name.into(), description: description.into() }
    }
}
