use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered user. `password` always holds a bcrypt hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub password: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
    pub fav_dramas: Vec<Uuid>,
}

/// Fields needed to create a user; the id is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
}

/// Fields overwritten by a profile update. A `None` birthday keeps the stored one.
#[derive(Debug, Clone)]
pub struct UserChanges {
    pub username: String,
    pub password_hash: String,
    pub email: String,
    pub birthday: Option<NaiveDate>,
}

/// Projection of a user down to its favorites list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoritesView {
    #[serde(rename = "FavDramas")]
    pub fav_dramas: Vec<Uuid>,
}

impl NewUser {
    pub fn into_user(self, id: Uuid) -> User {
        User {
            id,
            username: self.username,
            password: self.password_hash,
            email: self.email,
            birthday: self.birthday,
            fav_dramas: Vec::new(),
        }
    }
}

impl User {
    pub fn apply(&mut self, changes: UserChanges) {
        self.username = changes.username;
        self.password = changes.password_hash;
        self.email = changes.email;
        if let Some(birthday) = changes.birthday {
            self.birthday = Some(birthday);
        }
    }
}

impl From<User> for FavoritesView {
    fn from(user: User) -> Self {
        Self { fav_dramas: user.fav_dramas }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> User {
        NewUser {
            username: "dramafan1".to_string(),
            password_hash: "$2b$04$hash".to_string(),
            email: "a@b.com".to_string(),
            birthday: NaiveDate::from_ymd_opt(1990, 5, 17),
        }
        .into_user(Uuid::new_v4())
    }

    #[test]
    fn serializes_with_document_field_names() {
        let user = sample();
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["_id"], user.id.to_string());
        assert_eq!(value["Username"], "dramafan1");
        assert_eq!(value["Birthday"], "1990-05-17");
        assert_eq!(value["FavDramas"], serde_json::json!([]));
    }

    #[test]
    fn apply_keeps_birthday_when_not_supplied() {
        let mut user = sample();
        user.apply(UserChanges {
            username: "dramafan2".to_string(),
            password_hash: "$2b$04$other".to_string(),
            email: "c@d.com".to_string(),
            birthday: None,
        });
        assert_eq!(user.username, "dramafan2");
        assert_eq!(user.email, "c@d.com");
        assert_eq!(user.birthday, NaiveDate::from_ymd_opt(1990, 5, 17));
    }
}
