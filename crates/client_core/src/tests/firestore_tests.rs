use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch},
    Json, Router,
};
use serde_json::{json, Value};
use shared::{domain::TodoId, error::StoreError};
use tokio::net::TcpListener;

use crate::{config::Settings, firestore::FirestoreStore, store::RemoteStore};

#[derive(Clone, Default)]
struct FirestoreServerState {
    docs: Arc<Mutex<Vec<(String, String)>>>,
    next_id: Arc<Mutex<u64>>,
    force_status: Option<StatusCode>,
    captured_queries: Arc<Mutex<Vec<HashMap<String, String>>>>,
}

impl FirestoreServerState {
    fn seeded(docs: &[(&str, &str)]) -> Self {
        let state = Self::default();
        {
            let mut guard = state.docs.lock().expect("docs lock");
            for (id, text) in docs {
                guard.push(((*id).to_string(), (*text).to_string()));
            }
        }
        state
    }

    fn forcing_status(mut self, status: StatusCode) -> Self {
        self.force_status = Some(status);
        self
    }

    fn docs(&self) -> Vec<(String, String)> {
        self.docs.lock().expect("docs lock").clone()
    }

    fn queries(&self) -> Vec<HashMap<String, String>> {
        self.captured_queries.lock().expect("queries lock").clone()
    }
}

fn document_json(project: &str, database: &str, collection: &str, id: &str, text: &str) -> Value {
    json!({
        "name": format!("projects/{project}/databases/{database}/documents/{collection}/{id}"),
        "fields": { "text": { "stringValue": text } },
    })
}

async fn handle_list(
    State(state): State<FirestoreServerState>,
    Path((project, database, collection)): Path<(String, String, String)>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    state.captured_queries.lock().expect("queries lock").push(query);
    if let Some(status) = state.force_status {
        return (status, Json(json!({})));
    }

    let docs = state.docs.lock().expect("docs lock");
    if docs.is_empty() {
        // Firestore omits `documents` entirely for an empty collection.
        return (StatusCode::OK, Json(json!({})));
    }
    let documents: Vec<Value> = docs
        .iter()
        .map(|(id, text)| document_json(&project, &database, &collection, id, text))
        .collect();
    (StatusCode::OK, Json(json!({ "documents": documents })))
}

async fn handle_create(
    State(state): State<FirestoreServerState>,
    Path((project, database, collection)): Path<(String, String, String)>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.captured_queries.lock().expect("queries lock").push(query);
    if let Some(status) = state.force_status {
        return (status, Json(json!({})));
    }

    let text = body["fields"]["text"]["stringValue"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    let id = {
        let mut next_id = state.next_id.lock().expect("next id lock");
        *next_id += 1;
        format!("doc-{next_id}")
    };
    state
        .docs
        .lock()
        .expect("docs lock")
        .push((id.clone(), text.clone()));
    (
        StatusCode::OK,
        Json(document_json(&project, &database, &collection, &id, &text)),
    )
}

async fn handle_update(
    State(state): State<FirestoreServerState>,
    Path((project, database, collection, doc_id)): Path<(String, String, String, String)>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.captured_queries.lock().expect("queries lock").push(query);
    if let Some(status) = state.force_status {
        return (status, Json(json!({})));
    }

    let text = body["fields"]["text"]["stringValue"]
        .as_str()
        .unwrap_or_default()
        .to_string();
    let mut docs = state.docs.lock().expect("docs lock");
    match docs.iter_mut().find(|(id, _)| *id == doc_id) {
        Some((_, doc_text)) => {
            *doc_text = text.clone();
            (
                StatusCode::OK,
                Json(document_json(&project, &database, &collection, &doc_id, &text)),
            )
        }
        None => (StatusCode::NOT_FOUND, Json(json!({}))),
    }
}

async fn handle_delete(
    State(state): State<FirestoreServerState>,
    Path((_project, _database, _collection, doc_id)): Path<(String, String, String, String)>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    state.captured_queries.lock().expect("queries lock").push(query);
    if let Some(status) = state.force_status {
        return (status, Json(json!({})));
    }

    let mut docs = state.docs.lock().expect("docs lock");
    let before = docs.len();
    docs.retain(|(id, _)| *id != doc_id);
    if docs.len() == before {
        return (StatusCode::NOT_FOUND, Json(json!({})));
    }
    (StatusCode::OK, Json(json!({})))
}

async fn spawn_firestore_server(state: FirestoreServerState) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let app = Router::new()
        .route(
            "/v1/projects/:project/databases/:database/documents/:collection",
            get(handle_list).post(handle_create),
        )
        .route(
            "/v1/projects/:project/databases/:database/documents/:collection/:doc_id",
            patch(handle_update).delete(handle_delete),
        )
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

fn store_for(base_url: &str) -> FirestoreStore {
    let settings = Settings {
        base_url: Some(base_url.to_string()),
        ..Settings::default()
    };
    FirestoreStore::new(&settings).expect("store")
}

#[tokio::test]
async fn list_all_maps_documents_and_ids() {
    let state = FirestoreServerState::seeded(&[("abc", "milk"), ("def", "eggs")]);
    let base_url = spawn_firestore_server(state).await;

    let records = store_for(&base_url).list_all().await.expect("list");

    assert_eq!(
        records,
        vec![
            (TodoId::new("abc"), "milk".to_string()),
            (TodoId::new("def"), "eggs".to_string()),
        ]
    );
}

#[tokio::test]
async fn list_all_of_empty_collection_returns_no_records() {
    let base_url = spawn_firestore_server(FirestoreServerState::default()).await;

    let records = store_for(&base_url).list_all().await.expect("list");

    assert!(records.is_empty());
}

#[tokio::test]
async fn create_returns_store_assigned_id_and_persists_text() {
    let state = FirestoreServerState::default();
    let base_url = spawn_firestore_server(state.clone()).await;

    let id = store_for(&base_url).create("milk").await.expect("create");

    assert_eq!(id, TodoId::new("doc-1"));
    assert_eq!(state.docs(), vec![("doc-1".to_string(), "milk".to_string())]);
}

#[tokio::test]
async fn update_rewrites_text_and_masks_to_the_text_field() {
    let state = FirestoreServerState::seeded(&[("abc", "milk")]);
    let base_url = spawn_firestore_server(state.clone()).await;

    store_for(&base_url)
        .update(&TodoId::new("abc"), "bread")
        .await
        .expect("update");

    assert_eq!(state.docs(), vec![("abc".to_string(), "bread".to_string())]);
    let queries = state.queries();
    assert_eq!(
        queries[0].get("updateMask.fieldPaths").map(String::as_str),
        Some("text")
    );
}

#[tokio::test]
async fn update_of_missing_document_is_not_found() {
    let base_url = spawn_firestore_server(FirestoreServerState::default()).await;

    let err = store_for(&base_url)
        .update(&TodoId::new("ghost"), "bread")
        .await
        .expect_err("must fail");

    match err {
        StoreError::NotFound { id } => assert_eq!(id, TodoId::new("ghost")),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn delete_removes_document() {
    let state = FirestoreServerState::seeded(&[("abc", "milk"), ("def", "eggs")]);
    let base_url = spawn_firestore_server(state.clone()).await;

    store_for(&base_url)
        .delete(&TodoId::new("abc"))
        .await
        .expect("delete");

    assert_eq!(state.docs(), vec![("def".to_string(), "eggs".to_string())]);
}

#[tokio::test]
async fn delete_of_missing_document_is_not_found() {
    let base_url = spawn_firestore_server(FirestoreServerState::default()).await;

    let err = store_for(&base_url)
        .delete(&TodoId::new("ghost"))
        .await
        .expect_err("must fail");

    assert!(err.is_not_found());
}

#[tokio::test]
async fn server_errors_map_to_remote_unavailable_even_for_known_ids() {
    let state = FirestoreServerState::seeded(&[("abc", "milk")])
        .forcing_status(StatusCode::SERVICE_UNAVAILABLE);
    let base_url = spawn_firestore_server(state).await;
    let store = store_for(&base_url);

    let list_err = store.list_all().await.expect_err("list must fail");
    assert!(matches!(list_err, StoreError::RemoteUnavailable { .. }));

    let delete_err = store
        .delete(&TodoId::new("abc"))
        .await
        .expect_err("delete must fail");
    assert!(matches!(delete_err, StoreError::RemoteUnavailable { .. }));
}

#[tokio::test]
async fn unreachable_server_maps_to_remote_unavailable() {
    // Port 1 is never serving; the connection itself fails.
    let store = store_for("http://127.0.0.1:1");

    let err = store.list_all().await.expect_err("must fail");
    assert!(matches!(err, StoreError::RemoteUnavailable { .. }));
}

#[tokio::test]
async fn api_key_rides_along_as_a_query_parameter() {
    let state = FirestoreServerState::default();
    let base_url = spawn_firestore_server(state.clone()).await;
    let settings = Settings {
        base_url: Some(base_url),
        api_key: Some("secret-key".to_string()),
        ..Settings::default()
    };
    let store = FirestoreStore::new(&settings).expect("store");

    store.create("milk").await.expect("create");

    let queries = state.queries();
    assert_eq!(queries[0].get("key").map(String::as_str), Some("secret-key"));
}
