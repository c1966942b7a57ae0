mod common;

use anyhow::Result;
use kdrama_api::database::{CatalogStore, Genre};
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

#[tokio::test]
async fn list_dramas_expands_genres() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.signup("dramafan1").await?;
    let (signal_genre, signal) = server.seed_drama("Signal", "Kim Won-seok").await?;
    let (_, crash) = server.seed_drama("Crash Landing on You", "Lee Jeong-hyo").await?;

    let res = server.get_authed("/korean-dramas", &token).await?;

    assert_eq!(StatusCode::CREATED, res.status());
    let body = res.json::<Value>().await?;
    let dramas = body.as_array().expect("array of dramas");
    assert_eq!(2, dramas.len());
    assert_eq!(crash.title, dramas[0]["Title"]);
    assert_eq!(signal.title, dramas[1]["Title"]);
    assert_eq!(
        json!([{ "_id": signal_genre.id, "Name": signal_genre.name, "Description": signal_genre.description }]),
        dramas[1]["Genre"]
    );
    Ok(())
}

#[tokio::test]
async fn get_drama_by_title() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.signup("dramafan1").await?;
    let (genre, drama) = server.seed_drama("Signal", "Kim Won-seok").await?;

    let res = server.get_authed("/korean-dramas/Signal", &token).await?;

    assert_eq!(StatusCode::CREATED, res.status());
    let body = res.json::<Value>().await?;
    assert_eq!(drama.id.to_string(), body["_id"]);
    assert_eq!("Signal description", body["Description"]);
    assert_eq!(genre.name, body["Genre"][0]["Name"]);
    assert_eq!("Kim Won-seok", body["Director"]["Name"]);

    let res = server.get_authed("/korean-dramas/Missing%20Drama", &token).await?;
    assert_eq!(StatusCode::NOT_FOUND, res.status());
    assert_eq!("Missing Drama was not found", res.text().await?);
    Ok(())
}

#[tokio::test]
async fn dangling_genre_references_are_skipped() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.signup("dramafan1").await?;
    let (genre, mut drama) = server.seed_drama("Signal", "Kim Won-seok").await?;
    drama.id = Uuid::new_v4();
    drama.title = "Signal 2".to_string();
    drama.genre = vec![Uuid::new_v4(), genre.id];
    server.store.upsert_drama(&drama).await?;

    let res = server.get_authed("/korean-dramas/Signal%202", &token).await?;

    let body = res.json::<Value>().await?;
    assert_eq!(1, body["Genre"].as_array().map(Vec::len).unwrap_or_default());
    assert_eq!(genre.id.to_string(), body["Genre"][0]["_id"]);
    Ok(())
}

#[tokio::test]
async fn genres_list_and_lookup() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.signup("dramafan1").await?;
    let thriller = Genre::new("Thriller", "Suspense");
    let romance = Genre::new("Romance", "Love");
    server.store.upsert_genre(&thriller).await?;
    server.store.upsert_genre(&romance).await?;

    let res = server.get_authed("/genres", &token).await?;
    assert_eq!(StatusCode::CREATED, res.status());
    let names: Vec<String> = res
        .json::<Vec<Value>>()
        .await?
        .iter()
        .filter_map(|g| g["Name"].as_str().map(str::to_string))
        .collect();
    assert_eq!(vec!["Romance", "Thriller"], names);

    let res = server.get_authed("/genres/Thriller", &token).await?;
    assert_eq!(StatusCode::CREATED, res.status());
    assert_eq!(
        json!({ "_id": thriller.id, "Name": "Thriller", "Description": "Suspense" }),
        res.json::<Value>().await?
    );

    let res = server.get_authed("/genres/Horror", &token).await?;
    assert_eq!(StatusCode::NOT_FOUND, res.status());
    Ok(())
}

#[tokio::test]
async fn director_lookup_projects_director_fields() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = server.signup("dramafan1").await?;
    server.seed_drama("Signal", "Kim Won-seok").await?;

    let res = server.get_authed("/directors/Kim%20Won-seok", &token).await?;

    assert_eq!(StatusCode::CREATED, res.status());
    assert_eq!(
        json!({ "Director": { "Name": "Kim Won-seok", "Bio": "Director bio", "Birth": "1970" } }),
        res.json::<Value>().await?
    );

    let res = server.get_authed("/directors/Nobody", &token).await?;
    assert_eq!(StatusCode::NOT_FOUND, res.status());
    Ok(())
}
