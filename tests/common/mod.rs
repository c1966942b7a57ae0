#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use kdrama_api::auth::TokenService;
use kdrama_api::config::AppConfig;
use kdrama_api::database::{CatalogStore, Director, Drama, Genre, MemoryStore};
use kdrama_api::AppState;
use reqwest::{Response, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

pub const PASSWORD: &str = "pw123";

pub struct TestServer {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub client: reqwest::Client,
}

/// Starts a server backed by a fresh in-memory store.
pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(&[]).await
}

/// Like [`spawn_server`], with extra configuration variables.
pub async fn spawn_server_with(overrides: &[(&str, &str)]) -> Result<TestServer> {
    let mut vars: HashMap<String, String> = HashMap::new();
    vars.insert("DATABASE_URL".to_string(), "memory:".to_string());
    vars.insert("JWT_SECRET".to_string(), "integration-test-secret".to_string());
    // Keep hashing cheap in tests
    vars.insert("SECURITY_BCRYPT_COST".to_string(), "4".to_string());
    for (name, value) in overrides {
        vars.insert(name.to_string(), value.to_string());
    }
    let config = AppConfig::from_vars(|name| vars.get(name).cloned())?;

    let store = Arc::new(MemoryStore::new());
    let tokens = TokenService::from_config(&config.security)?;
    let app = kdrama_api::app(AppState::new(store.clone(), tokens, config));

    // Pick an unused port for isolation
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind test listener")?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("test server stopped: {}", e);
        }
    });

    Ok(TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        store,
        client: reqwest::Client::new(),
    })
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn register(&self, username: &str, password: &str, email: &str) -> Result<Response> {
        let body = json!({ "Username": username, "Password": password, "Email": email });
        Ok(self.client.post(self.url("/users")).json(&body).send().await?)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<Response> {
        let body = json!({ "Username": username, "Password": password });
        Ok(self.client.post(self.url("/login")).json(&body).send().await?)
    }

    /// Registers `username` with [`PASSWORD`] and returns a bearer token for it.
    pub async fn signup(&self, username: &str) -> Result<String> {
        let res = self.register(username, PASSWORD, &format!("{}@example.com", username)).await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());

        let res = self.login(username, PASSWORD).await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        let body = res.json::<Value>().await?;
        body["token"].as_str().map(str::to_string).context("login response without token")
    }

    pub async fn get_authed(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).bearer_auth(token).send().await?)
    }

    /// Inserts a genre and a drama referencing it, returning both.
    pub async fn seed_drama(&self, title: &str, director: &str) -> Result<(Genre, Drama)> {
        let genre = Genre::new(format!("{} genre", title), "Seeded for tests");
        let drama = Drama {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: format!("{} description", title),
            genre: vec![genre.id],
            release_year: Some("2020".to_string()),
            episodes: Some("16".to_string()),
            director: Director {
                name: Some(director.to_string()),
                bio: Some("Director bio".to_string()),
                birth: Some("1970".to_string()),
            },
            writer: vec!["Some Writer".to_string()],
            image_path: None,
            featured: false,
        };
        self.store.upsert_genre(&genre).await?;
        self.store.upsert_drama(&drama).await?;
        Ok((genre, drama))
    }
}
