//! Shared test utilities: an in-process mock Files gateway.
//!
//! The mock speaks the service's wire contract: the REST routes under
//! `/v1/files`, the multipart upload route, and the generic rpc POST routes
//! for the worker/internal facades. Responses use the gateway's marshaling
//! conventions (snake_case names, int64 as json strings), except the upload
//! route, which marshals plain numbers the way the real one does.
//!
//! Every request is recorded (method, path, query, body) so tests can
//! assert the exact shape the client puts on the wire.
#![cfg(test)]
#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::{Value, json};
use tokio::task::JoinHandle;

use llmfiles::prelude::*;

const DEFAULT_PAGE_LIMIT: usize = 20;
const CREATED_AT_BASE: i64 = 1_700_000_000;

/// One request as seen by the gateway.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: String,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct FileRec {
    pub id: String,
    pub bytes: i64,
    pub created_at: i64,
    pub filename: String,
    pub purpose: String,
    pub content: Vec<u8>,
    pub object_path: String,
}

#[derive(Default)]
struct Inner {
    files: Vec<FileRec>,
    log: Vec<RecordedRequest>,
    counter: u64,
    require_key: Option<String>,
    force_status: Option<u16>,
}

#[derive(Clone, Default)]
pub struct MockState {
    inner: Arc<Mutex<Inner>>,
}

impl MockState {
    fn record(&self, method: &str, path: String, query: String, body: String) {
        self.inner.lock().unwrap().log.push(RecordedRequest {
            method: method.to_string(),
            path,
            query,
            body,
        });
    }

    /// Auth check and forced-error hook, run by every handler after
    /// recording the request. Returns Some(response) to short-circuit.
    fn intercept(&self, headers: &HeaderMap) -> Option<Response> {
        let (require_key, forced) = {
            let mut inner = self.inner.lock().unwrap();
            (inner.require_key.clone(), inner.force_status.take())
        };
        if let Some(code) = forced {
            let code = StatusCode::from_u16(code).unwrap();
            return Some((code, "forced error").into_response());
        }
        if let Some(key) = require_key {
            let expected = format!("Bearer {key}");
            let authorized = headers
                .get("authorization")
                .and_then(|value| value.to_str().ok())
                .map(|value| value == expected)
                .unwrap_or(false);
            if !authorized {
                return Some((StatusCode::UNAUTHORIZED, "unauthorized").into_response());
            }
        }
        None
    }

    fn next_file_id(&self) -> String {
        let mut inner = self.inner.lock().unwrap();
        inner.counter += 1;
        format!("file-{:08x}", inner.counter)
    }

    fn insert(&self, file: FileRec) {
        self.inner.lock().unwrap().files.push(file);
    }
}

/// Handle to a running mock gateway.
pub struct MockGateway {
    pub addr: SocketAddr,
    pub state: MockState,
    task: JoinHandle<()>,
}

impl MockGateway {
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = router(state.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock gateway");
        let addr = listener.local_addr().expect("local addr");
        let task = tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve mock gateway");
        });
        Self { addr, state, task }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Creates a FilesClient pointed at this gateway, with no api key.
    pub fn client(&self) -> FilesClient {
        let mut config = ClientConfig::default()
            .app_name("llmfiles-test")
            .base_url(self.url());
        config.api_key = None;
        FilesClient::with_config(config).expect("create client")
    }

    /// Requires `Authorization: Bearer <key>` on subsequent requests.
    pub fn require_key(&self, key: &str) {
        self.state.inner.lock().unwrap().require_key = Some(key.to_string());
    }

    /// Forces the next request to fail with the given status code.
    pub fn force_status(&self, code: u16) {
        self.state.inner.lock().unwrap().force_status = Some(code);
    }

    /// Adds a file directly to the store, bypassing the http surface.
    pub fn seed_file(&self, id: &str, filename: &str, purpose: &str, content: &[u8]) {
        let created_at = CREATED_AT_BASE + self.state.inner.lock().unwrap().files.len() as i64;
        self.state.insert(FileRec {
            id: id.to_string(),
            bytes: content.len() as i64,
            created_at,
            filename: filename.to_string(),
            purpose: purpose.to_string(),
            content: content.to_vec(),
            object_path: format!("test-tenant/{id}"),
        });
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.inner.lock().unwrap().log.clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests().last().expect("at least one request").clone()
    }

    pub fn file_count(&self) -> usize {
        self.state.inner.lock().unwrap().files.len()
    }

    pub async fn shutdown(self) {
        self.task.abort();
    }
}

fn router(state: MockState) -> Router {
    Router::new()
        .route("/v1/files", get(list_files).post(create_file))
        .route("/v1/files:createFromObjectPath", post(create_from_object_path))
        .route("/v1/files/{id}", get(get_file).delete(delete_file))
        .route("/v1/files/{id}/content", get(get_file_content))
        .route(
            "/llmariner.files.server.v1.FilesWorkerService/GetFilePath",
            post(get_file_path),
        )
        .route(
            "/llmariner.files.server.v1.FilesInternalService/GetFilePath",
            post(get_file_path),
        )
        .route(
            "/llmoperator.files.server.v1.FilesWorkerService/GetFilePath",
            post(get_file_path),
        )
        .with_state(state)
}

// gateway marshaling: proto names, int64 as strings
fn pb_file_json(file: &FileRec) -> Value {
    json!({
        "id": file.id,
        "bytes": file.bytes.to_string(),
        "created_at": file.created_at.to_string(),
        "filename": file.filename,
        "object": "file",
        "purpose": file.purpose,
    })
}

// upload-route marshaling: plain numbers
fn upload_file_json(file: &FileRec) -> Value {
    json!({
        "id": file.id,
        "bytes": file.bytes,
        "created_at": file.created_at,
        "filename": file.filename,
        "object": "file",
        "purpose": file.purpose,
    })
}

fn valid_purpose(purpose: &str) -> bool {
    matches!(purpose, "fine-tune" | "assistants")
}

async fn list_files(
    State(state): State<MockState>,
    headers: HeaderMap,
    RawQuery(raw): RawQuery,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.record(
        "GET",
        "/v1/files".to_string(),
        raw.unwrap_or_default(),
        String::new(),
    );
    if let Some(resp) = state.intercept(&headers) {
        return resp;
    }

    if let Some(purpose) = params.get("purpose")
        && !valid_purpose(purpose)
    {
        return (StatusCode::BAD_REQUEST, "invalid purpose").into_response();
    }

    let inner = state.inner.lock().unwrap();
    let mut files: Vec<FileRec> = inner
        .files
        .iter()
        .filter(|file| {
            params
                .get("purpose")
                .map(|purpose| &file.purpose == purpose)
                .unwrap_or(true)
        })
        .cloned()
        .collect();
    drop(inner);

    let total = files.len();
    // newest first unless asked otherwise
    if params.get("order").map(String::as_str) != Some("asc") {
        files.reverse();
    }
    if let Some(after) = params.get("after") {
        match files.iter().position(|file| &file.id == after) {
            Some(pos) => files = files.split_off(pos + 1),
            None => files.clear(),
        }
    }
    let limit = params
        .get("limit")
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(DEFAULT_PAGE_LIMIT);
    let has_more = files.len() > limit;
    files.truncate(limit);

    let data: Vec<Value> = files.iter().map(pb_file_json).collect();
    Json(json!({
        "object": "list",
        "data": data,
        "has_more": has_more,
        "total": total.to_string(),
    }))
    .into_response()
}

async fn create_file(
    State(state): State<MockState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    let mut purpose = String::new();
    let mut filename = String::new();
    let mut content: Vec<u8> = Vec::new();
    let mut saw_file_part = false;

    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        match field.name() {
            Some("purpose") => purpose = field.text().await.expect("purpose text"),
            Some("file") => {
                saw_file_part = true;
                filename = field.file_name().unwrap_or_default().to_string();
                content = field.bytes().await.expect("file bytes").to_vec();
            }
            _ => {}
        }
    }

    state.record(
        "POST",
        "/v1/files".to_string(),
        String::new(),
        format!(
            "multipart purpose={purpose} filename={filename} bytes={}",
            content.len()
        ),
    );
    if let Some(resp) = state.intercept(&headers) {
        return resp;
    }

    if purpose.is_empty() {
        return (StatusCode::BAD_REQUEST, "purpose is required").into_response();
    }
    if !valid_purpose(&purpose) {
        return (StatusCode::BAD_REQUEST, "invalid purpose").into_response();
    }
    if !saw_file_part {
        return (StatusCode::BAD_REQUEST, "file is required").into_response();
    }

    let id = state.next_file_id();
    let created_at = CREATED_AT_BASE + state.inner.lock().unwrap().files.len() as i64;
    let file = FileRec {
        id: id.clone(),
        bytes: content.len() as i64,
        created_at,
        filename,
        purpose,
        content,
        object_path: format!("test-tenant/{id}"),
    };
    let body = upload_file_json(&file);
    state.insert(file);
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn create_from_object_path(
    State(state): State<MockState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    state.record(
        "POST",
        "/v1/files:createFromObjectPath".to_string(),
        String::new(),
        body.clone(),
    );
    if let Some(resp) = state.intercept(&headers) {
        return resp;
    }

    let parsed: Value = serde_json::from_str(&body).expect("json body");
    let object_path = parsed["object_path"].as_str().unwrap_or_default();
    let purpose = parsed["purpose"].as_str().unwrap_or_default();
    if object_path.is_empty() {
        return (StatusCode::BAD_REQUEST, "object_path is required").into_response();
    }
    if !valid_purpose(purpose) {
        return (StatusCode::BAD_REQUEST, "invalid purpose").into_response();
    }

    let id = state.next_file_id();
    let created_at = CREATED_AT_BASE + state.inner.lock().unwrap().files.len() as i64;
    let filename = object_path.rsplit('/').next().unwrap_or_default().to_string();
    let file = FileRec {
        id,
        bytes: 0,
        created_at,
        filename,
        purpose: purpose.to_string(),
        content: Vec::new(),
        object_path: object_path.to_string(),
    };
    let body = pb_file_json(&file);
    state.insert(file);
    Json(body).into_response()
}

async fn get_file(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    RawQuery(raw): RawQuery,
) -> Response {
    state.record(
        "GET",
        format!("/v1/files/{id}"),
        raw.unwrap_or_default(),
        String::new(),
    );
    if let Some(resp) = state.intercept(&headers) {
        return resp;
    }

    let inner = state.inner.lock().unwrap();
    match inner.files.iter().find(|file| file.id == id) {
        Some(file) => Json(pb_file_json(file)).into_response(),
        None => (StatusCode::NOT_FOUND, format!("file {id:?} not found")).into_response(),
    }
}

async fn delete_file(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    state.record("DELETE", format!("/v1/files/{id}"), String::new(), String::new());
    if let Some(resp) = state.intercept(&headers) {
        return resp;
    }

    let mut inner = state.inner.lock().unwrap();
    let before = inner.files.len();
    inner.files.retain(|file| file.id != id);
    if inner.files.len() == before {
        return (StatusCode::NOT_FOUND, format!("file {id:?} not found")).into_response();
    }
    Json(json!({
        "id": id,
        "object": "file",
        "deleted": true,
    }))
    .into_response()
}

async fn get_file_content(
    State(state): State<MockState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    state.record(
        "GET",
        format!("/v1/files/{id}/content"),
        String::new(),
        String::new(),
    );
    if let Some(resp) = state.intercept(&headers) {
        return resp;
    }

    let inner = state.inner.lock().unwrap();
    match inner.files.iter().find(|file| file.id == id) {
        Some(file) => file.content.clone().into_response(),
        None => (StatusCode::NOT_FOUND, format!("file {id:?} not found")).into_response(),
    }
}

// Shared by the worker, internal, and legacy-worker rpc routes; the route
// path is what distinguishes them, and it is recorded for assertions.
async fn get_file_path(
    State(state): State<MockState>,
    headers: HeaderMap,
    uri: axum::http::Uri,
    body: String,
) -> Response {
    state.record("POST", uri.path().to_string(), String::new(), body.clone());
    if let Some(resp) = state.intercept(&headers) {
        return resp;
    }

    let parsed: Value = serde_json::from_str(&body).expect("json body");
    let id = parsed["id"].as_str().unwrap_or_default();

    let inner = state.inner.lock().unwrap();
    match inner.files.iter().find(|file| file.id == id) {
        Some(file) => Json(json!({
            "path": file.object_path,
            "filename": file.filename,
        }))
        .into_response(),
        None => (StatusCode::NOT_FOUND, format!("file {id:?} not found")).into_response(),
    }
}
