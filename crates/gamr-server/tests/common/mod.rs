use std::net::SocketAddr;
use std::time::Duration;

use gamr_core::game::NewGame;
use gamr_core::test_helpers::sample_catalog;

use gamr_server::config::ServerConfig;
use gamr_server::state::AppState;
use gamr_server::build_app;

pub struct TestServer {
    pub addr: SocketAddr,
    pub state: AppState,
    _shutdown: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// Start a test server over an in-memory store seeded with the sample catalog.
    pub async fn new() -> Self {
        Self::with_games(&sample_catalog()).await
    }

    /// Start a test server over an empty in-memory store.
    pub async fn empty() -> Self {
        Self::with_games(&[]).await
    }

    pub async fn with_games(games: &[NewGame]) -> Self {
        let config = ServerConfig {
            listen_addr: "127.0.0.1:0".to_string(),
            database_url: ":memory:".to_string(),
            ..ServerConfig::default()
        };

        let listener = tokio::net::TcpListener::bind(&config.listen_addr)
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();

        let (app, state) = build_app(config).unwrap();
        state.store.seed_if_empty(games).unwrap();

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Give the server a moment to start accepting
        tokio::time::sleep(Duration::from_millis(20)).await;

        Self {
            addr,
            state,
            _shutdown: handle,
        }
    }

    pub fn api_url(&self, path: &str) -> String {
        format!("http://{}/api{path}", self.addr)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// GET a game and return its `data` object.
pub async fn fetch_game(client: &reqwest::Client, server: &TestServer, id: i64) -> serde_json::Value {
    let resp = client
        .get(server.api_url(&format!("/games/{id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    body["data"].clone()
}

/// PUT a vote with the given form fields and return the status code.
pub async fn put_vote(
    client: &reqwest::Client,
    server: &TestServer,
    id: &str,
    form: &[(&str, &str)],
) -> u16 {
    client
        .put(server.api_url(&format!("/games/{id}/vote")))
        .form(form)
        .send()
        .await
        .unwrap()
        .status()
        .as_u16()
}
