#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Response, StatusCode};
use serde_json::Value;

use hotel_reservation::config::AppConfig;
use hotel_reservation::database::models::User;
use hotel_reservation::database::Store;
use hotel_reservation::middleware::TOKEN_HEADER;
use hotel_reservation::state::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";

/// An in-process server backed by its own in-memory store.
pub struct TestServer {
    pub base_url: String,
    pub state: AppState,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn store(&self) -> &Store {
        &self.state.store
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.state.config.security.bcrypt_cost
    }

    pub fn token_for(&self, user: &User) -> String {
        self.state.tokens.mint(user).expect("mint token")
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<Response> {
        let mut req = self.client.get(self.url(path));
        if let Some(token) = token {
            req = req.header(TOKEN_HEADER, token);
        }
        Ok(req.send().await?)
    }

    pub async fn post(&self, path: &str, token: Option<&str>, body: &Value) -> Result<Response> {
        let mut req = self.client.post(self.url(path)).json(body);
        if let Some(token) = token {
            req = req.header(TOKEN_HEADER, token);
        }
        Ok(req.send().await?)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Start a fresh server on an unused port. Each call gets an isolated store.
pub async fn spawn_server() -> Result<TestServer> {
    spawn_server_with(|_| {}).await
}

/// Like [`spawn_server`], with a hook to adjust the configuration first.
pub async fn spawn_server_with(configure: impl FnOnce(&mut AppConfig)) -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let mut config = AppConfig::for_tests(TEST_SECRET);
    configure(&mut config);
    config.api.port = port;

    let state = AppState::new(config, Store::memory())?;
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    let app = hotel_reservation::app(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let server = TestServer {
        base_url,
        state,
        client: reqwest::Client::new(),
    };
    server.wait_ready(Duration::from_secs(5)).await?;
    Ok(server)
}

/// Assert the error envelope and return its message.
pub async fn expect_error(resp: Response, status: StatusCode) -> Result<String> {
    assert_eq!(resp.status(), status);
    let body: Value = resp.json().await?;
    assert_eq!(body["type"], "error");
    Ok(body["msg"].as_str().unwrap_or_default().to_string())
}
