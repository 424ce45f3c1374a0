use std::{collections::HashMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    routing::{any, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Item {
    pub id: u64,
    pub name: String,
}

#[derive(Deserialize)]
pub struct CreateItem {
    pub name: String,
}

#[derive(Deserialize)]
pub struct UpdateItem {
    pub name: Option<String>,
}

/// A request as `/echo` saw it. Header names are lower-case.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn header_count(&self, name: &str) -> usize {
        self.headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case(name))
            .count()
    }
}

#[derive(Clone, Default)]
pub struct AppState {
    pub items: Arc<RwLock<HashMap<u64, Item>>>,
    pub journal: Arc<RwLock<Vec<RecordedRequest>>>,
}

impl AppState {
    /// State with the single item `{"id":1,"name":"foo"}`.
    pub fn seeded() -> Self {
        let state = Self::default();
        if let Ok(mut items) = state.items.try_write() {
            items.insert(
                1,
                Item {
                    id: 1,
                    name: "foo".to_string(),
                },
            );
        }
        state
    }
}

pub fn app() -> Router {
    app_with_state(AppState::seeded())
}

pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .route("/items", post(create_item))
        .route(
            "/items/{id}",
            get(get_item).patch(update_item).delete(delete_item),
        )
        .route("/echo", any(echo))
        .route("/journal", get(journal))
        .route("/status/{code}", any(status))
        .route("/malformed", get(malformed))
        .route("/hang", any(hang))
        .route("/large/{bytes}", get(large))
        .route("/redirect", get(redirect))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "mock server listening");
    }
    axum::serve(listener, app()).await
}

async fn create_item(
    State(state): State<AppState>,
    Json(input): Json<CreateItem>,
) -> (StatusCode, Json<Item>) {
    let mut items = state.items.write().await;
    let id = items.keys().max().copied().unwrap_or(0) + 1;
    let item = Item {
        id,
        name: input.name,
    };
    items.insert(id, item.clone());
    (StatusCode::CREATED, Json(item))
}

async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Item>, StatusCode> {
    let items = state.items.read().await;
    items.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(input): Json<UpdateItem>,
) -> Result<Json<Item>, StatusCode> {
    let mut items = state.items.write().await;
    let item = items.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(name) = input.name {
        item.name = name;
    }
    Ok(Json(item.clone()))
}

async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, StatusCode> {
    let mut items = state.items.write().await;
    items
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn echo(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Json<RecordedRequest> {
    let recorded = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        headers: headers
            .iter()
            .map(|(k, v)| {
                (
                    k.as_str().to_string(),
                    String::from_utf8_lossy(v.as_bytes()).into_owned(),
                )
            })
            .collect(),
        body: body.to_vec(),
    };
    tracing::debug!(method = %recorded.method, bytes = recorded.body.len(), "echo");
    state.journal.write().await.push(recorded.clone());
    Json(recorded)
}

async fn journal(State(state): State<AppState>) -> Json<Vec<RecordedRequest>> {
    Json(state.journal.read().await.clone())
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, String), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, format!(r#"{{"code":{code}}}"#)))
}

async fn malformed() -> &'static str {
    "this is not json"
}

/// Where `/redirect` points. Port 9 (discard) is closed on test hosts.
pub const REDIRECT_TARGET: &str = "http://127.0.0.1:9/gone";

async fn large(Path(bytes): Path<usize>) -> Vec<u8> {
    vec![b'x'; bytes]
}

async fn redirect() -> (StatusCode, [(header::HeaderName, &'static str); 1]) {
    (StatusCode::FOUND, [(header::LOCATION, REDIRECT_TARGET)])
}

async fn hang() -> StatusCode {
    std::future::pending::<()>().await;
    StatusCode::OK
}
