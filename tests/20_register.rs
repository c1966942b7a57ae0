mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn register_stores_hashed_password() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.register("dramafan1", "pw123", "a@b.com").await?;

    assert_eq!(StatusCode::CREATED, res.status());
    let body = res.json::<Value>().await?;
    assert_eq!("dramafan1", body["Username"]);
    assert_eq!("a@b.com", body["Email"]);
    assert_eq!(json!([]), body["FavDramas"]);
    assert!(body["_id"].is_string());
    let stored = body["Password"].as_str().unwrap();
    assert_ne!("pw123", stored);
    assert!(stored.starts_with("$2"));
    Ok(())
}

#[tokio::test]
async fn register_accepts_birthday() -> Result<()> {
    let server = common::spawn_server().await?;

    let body = json!({
        "Username": "dramafan1",
        "Password": "pw123",
        "Email": "a@b.com",
        "Birthday": "1990-05-17"
    });
    let res = server.client.post(server.url("/users")).json(&body).send().await?;

    assert_eq!(StatusCode::CREATED, res.status());
    assert_eq!("1990-05-17", res.json::<Value>().await?["Birthday"]);
    Ok(())
}

async fn expect_validation_error(username: &str, email: &str, param: &str, msg: &str) -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.register(username, "pw123", email).await?;

    assert_eq!(StatusCode::UNPROCESSABLE_ENTITY, res.status());
    let body = res.json::<Value>().await?;
    let errors = body["errors"].as_array().expect("errors array");
    assert!(
        errors.iter().any(|e| e["param"] == param && e["msg"] == msg),
        "missing {} error in {}",
        param,
        body
    );
    assert_eq!(0, server.store.count_users(username).await);
    Ok(())
}

#[tokio::test]
async fn register_rejects_short_username() -> Result<()> {
    expect_validation_error("abcd", "a@b.com", "Username", "Username is required").await
}

#[tokio::test]
async fn register_rejects_non_alphanumeric_username() -> Result<()> {
    expect_validation_error(
        "drama-fan",
        "a@b.com",
        "Username",
        "Username contains non alphanumeric characters - not allowed.",
    )
    .await
}

#[tokio::test]
async fn register_rejects_invalid_email() -> Result<()> {
    expect_validation_error("dramafan1", "a-at-b.com", "Email", "Email does not appear to be valid").await
}

#[tokio::test]
async fn register_rejects_empty_password() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.register("dramafan1", "", "a@b.com").await?;

    assert_eq!(StatusCode::UNPROCESSABLE_ENTITY, res.status());
    let body = res.json::<Value>().await?;
    assert_eq!("Password", body["errors"][0]["param"]);
    assert_eq!("Password is required", body["errors"][0]["msg"]);
    assert_eq!(0, server.store.count_users("dramafan1").await);
    Ok(())
}

#[tokio::test]
async fn register_twice_is_rejected() -> Result<()> {
    let server = common::spawn_server().await?;

    let first = server.register("dramafan1", "pw123", "a@b.com").await?;
    assert_eq!(StatusCode::CREATED, first.status());

    let second = server.register("dramafan1", "other", "c@d.com").await?;
    assert_eq!(StatusCode::BAD_REQUEST, second.status());
    assert_eq!("dramafan1 already exists", second.text().await?);

    assert_eq!(1, server.store.count_users("dramafan1").await);
    Ok(())
}

#[tokio::test]
async fn register_accepts_timestamp_birthday() -> Result<()> {
    let server = common::spawn_server().await?;

    let body = json!({
        "Username": "dramafan1",
        "Password": "pw123",
        "Email": "a@b.com",
        "Birthday": "1990-05-17T00:00:00.000Z"
    });
    let res = server.client.post(server.url("/users")).json(&body).send().await?;

    assert_eq!(StatusCode::CREATED, res.status());
    assert_eq!("1990-05-17", res.json::<Value>().await?["Birthday"]);
    Ok(())
}

#[tokio::test]
async fn register_reports_mistyped_fields() -> Result<()> {
    let server = common::spawn_server().await?;

    let body = json!({
        "Username": 12345,
        "Password": "pw123",
        "Email": "a@b.com",
        "Birthday": "next tuesday"
    });
    let res = server.client.post(server.url("/users")).json(&body).send().await?;

    assert_eq!(StatusCode::UNPROCESSABLE_ENTITY, res.status());
    let body = res.json::<Value>().await?;
    let errors = body["errors"].as_array().expect("errors array");
    assert_eq!(2, errors.len(), "{}", body);
    assert_eq!(json!("body"), errors[0]["location"]);
    assert_eq!(json!("Username"), errors[0]["param"]);
    assert_eq!(json!("Birthday"), errors[1]["param"]);
    assert_eq!(json!("Birthday is not a valid date"), errors[1]["msg"]);
    assert_eq!(0, server.store.count_users("12345").await);
    Ok(())
}

#[tokio::test]
async fn register_reports_unreadable_body() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .post(server.url("/users"))
        .header("content-type", "application/json")
        .body("{\"Username\": ")
        .send()
        .await?;

    assert_eq!(StatusCode::UNPROCESSABLE_ENTITY, res.status());
    let body = res.json::<Value>().await?;
    assert_eq!(json!("body"), body["errors"][0]["param"]);
    Ok(())
}

#[tokio::test]
async fn register_accepts_urlencoded_body() -> Result<()> {
    let server = common::spawn_server().await?;

    let form = [("Username", "dramafan1"), ("Password", "pw123"), ("Email", "a@b.com"), ("Birthday", "")];
    let res = server.client.post(server.url("/users")).form(&form).send().await?;

    assert_eq!(StatusCode::CREATED, res.status());
    let body = res.json::<Value>().await?;
    assert_eq!("dramafan1", body["Username"]);
    assert_eq!(Value::Null, body["Birthday"]);
    Ok(())
}
