//! Fake keys service for end-to-end tests.
//!
//! Serves `/keys` on an ephemeral port, writing through a [`MemoryStore`]
//! handle shared with the runner so the oracle sees what the service did.

#![allow(dead_code, clippy::unwrap_used)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::any;
use kvconform_application::ports::KeyValueStore;
use kvconform_infrastructure::MemoryStore;
use serde_json::json;
use tokio::net::TcpListener;

/// Token the fake service accepts.
pub const TOKEN: &str = "secret";

/// How the fake service behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Implements the keys contract.
    Conforming,
    /// Reproduces the known defects: POST overwrites, DELETE keeps the key,
    /// GET and parameterless POST succeed, `%25` is decoded before storing.
    Buggy,
    /// Conforming, but every response is delayed.
    Slow(Duration),
    /// Conforming, but error bodies are plain text.
    PlainTextErrors,
}

struct Service {
    store: MemoryStore,
    behavior: Behavior,
}

/// A running fake service.
pub struct FakeService {
    addr: SocketAddr,
}

impl FakeService {
    /// Starts the service on 127.0.0.1 with its own store handle.
    pub async fn start(store: &MemoryStore, behavior: Behavior) -> Self {
        let service = Arc::new(Service {
            store: store.share(),
            behavior,
        });
        let app = Router::new()
            .route("/keys", any(keys))
            .with_state(service);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self { addr }
    }

    /// Base URL, without the `/keys` path.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Fully-qualified keys endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}/keys", self.base_url())
    }
}

/// Endpoint on a port nothing listens on.
pub async fn unreachable_endpoint() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}/keys")
}

/// Splits a raw query without decoding it.
fn param<'a>(query: &'a str, name: &str) -> Option<&'a str> {
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| v)
}

fn error(behavior: Behavior, status: StatusCode, message: &str) -> Response {
    if behavior == Behavior::PlainTextErrors {
        (status, message.to_string()).into_response()
    } else {
        (status, axum::Json(json!({ "error": message }))).into_response()
    }
}

async fn keys(
    State(service): State<Arc<Service>>,
    method: Method,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    let behavior = service.behavior;
    if let Behavior::Slow(delay) = behavior {
        tokio::time::sleep(delay).await;
    }

    if headers.get("token").and_then(|v| v.to_str().ok()) != Some(TOKEN) {
        return error(behavior, StatusCode::UNAUTHORIZED, "Unauthorized");
    }

    let buggy = behavior == Behavior::Buggy;
    if method == Method::GET {
        return if buggy {
            StatusCode::OK.into_response()
        } else {
            StatusCode::METHOD_NOT_ALLOWED.into_response()
        };
    }

    let query = query.unwrap_or_default();
    let key = param(&query, "name").map(|k| {
        if buggy {
            k.replace("%25", "%")
        } else {
            k.to_string()
        }
    });
    let value = param(&query, "value").map(str::to_string);

    let store = &service.store;
    match (method, key, value) {
        (Method::POST, Some(key), Some(value)) => {
            if !buggy && store.get(&key).await.unwrap().is_some() {
                return error(behavior, StatusCode::BAD_REQUEST, "Key already exists");
            }
            store.set(&key, &value).await.unwrap();
            StatusCode::OK.into_response()
        }
        (Method::PUT, Some(key), Some(value)) => {
            if store.get(&key).await.unwrap().is_none() {
                return error(behavior, StatusCode::BAD_REQUEST, "Key does not exist");
            }
            store.set(&key, &value).await.unwrap();
            StatusCode::OK.into_response()
        }
        (Method::DELETE, Some(key), _) => {
            if store.get(&key).await.unwrap().is_none() {
                return error(behavior, StatusCode::BAD_REQUEST, "Key does not exist");
            }
            if !buggy {
                store.delete(&key).await.unwrap();
            }
            StatusCode::OK.into_response()
        }
        (Method::POST | Method::PUT | Method::DELETE, _, _) => {
            if buggy {
                StatusCode::OK.into_response()
            } else {
                error(
                    behavior,
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "Missing parameters",
                )
            }
        }
        _ => StatusCode::METHOD_NOT_ALLOWED.into_response(),
    }
}
