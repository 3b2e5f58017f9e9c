//! Local stand-ins for the upstream HTTP services.

use std::sync::{Arc, Mutex};

use axum::{
    http::{header, HeaderMap, StatusCode, Uri},
    Json, Router,
};
use serde_json::Value;
use tokio::net::TcpListener;

use crate::config::Config;

pub const USER_AGENT: &str = "navigation-map-tests/1.0";

/// The client the services would get in production, with a known `User-Agent`.
pub fn client() -> reqwest::Client {
    let config =
        Config::from_lookup(|key| (key == "USER_AGENT").then(|| USER_AGENT.to_string())).unwrap();
    super::http_client(&config).unwrap()
}

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
    format!("http://{}", addr)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub path: String,
    pub query: Option<String>,
    pub user_agent: Option<String>,
}

/// Answers every request with the same canned JSON and remembers what it
/// was asked.
pub struct Upstream {
    pub base_url: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl Upstream {
    pub async fn spawn(status: StatusCode, body: Value) -> Upstream {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let recorder = Arc::clone(&requests);
        let router = Router::new().fallback(move |uri: Uri, headers: HeaderMap| {
            let recorder = Arc::clone(&recorder);
            let body = body.clone();
            async move {
                recorder.lock().unwrap().push(Recorded {
                    path: uri.path().to_string(),
                    query: uri.query().map(str::to_string),
                    user_agent: headers
                        .get(header::USER_AGENT)
                        .and_then(|value| value.to_str().ok())
                        .map(str::to_string),
                });
                (status, Json(body))
            }
        });

        Upstream {
            base_url: serve(router).await,
            requests,
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }
}
