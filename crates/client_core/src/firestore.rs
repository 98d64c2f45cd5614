//! Firestore REST v1 implementation of the remote store.

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use shared::{domain::TodoId, error::StoreError};
use tracing::debug;
use url::Url;

use crate::{
    config::Settings,
    store::{RemoteStore, StoreResult},
};

pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StringValue {
    #[serde(rename = "stringValue")]
    string_value: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TodoFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<StringValue>,
}

impl TodoFields {
    fn with_text(text: &str) -> Self {
        Self {
            text: Some(StringValue {
                string_value: text.to_string(),
            }),
        }
    }

    fn into_text(self) -> String {
        self.text.map(|value| value.string_value).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Document {
    /// Full resource name; the trailing segment is the document id.
    name: String,
    #[serde(default)]
    fields: Option<TodoFields>,
}

#[derive(Debug, Serialize)]
struct DocumentWrite {
    fields: TodoFields,
}

#[derive(Debug, Default, Deserialize)]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
}

fn id_from_name(name: &str) -> TodoId {
    TodoId::new(name.rsplit('/').next().unwrap_or(name))
}

fn transport_error(err: reqwest::Error) -> StoreError {
    StoreError::unavailable(err.to_string())
}

/// Document-collection CRUD over the Firestore REST v1 API. Every record is
/// a document with the single field `text`.
pub struct FirestoreStore {
    http: Client,
    collection_url: String,
    api_key: Option<String>,
}

impl FirestoreStore {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let base = settings
            .base_url
            .as_deref()
            .unwrap_or(DEFAULT_BASE_URL)
            .trim_end_matches('/')
            .to_string();
        Url::parse(&base).with_context(|| format!("invalid Firestore base url: {base}"))?;

        let collection_url = format!(
            "{base}/v1/projects/{}/databases/{}/documents/{}",
            settings.project_id, settings.database_id, settings.collection
        );
        debug!(%collection_url, "firestore store configured");

        Ok(Self {
            http: Client::new(),
            collection_url,
            api_key: settings.api_key.clone(),
        })
    }

    fn document_url(&self, id: &TodoId) -> String {
        format!("{}/{}", self.collection_url, id)
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        let mut request = self.http.request(method, url);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key)]);
        }
        request
    }

    /// 404 means the target document vanished server-side; everything else
    /// non-success is treated as the store being unavailable.
    fn map_status(status: StatusCode, target: Option<&TodoId>) -> StoreError {
        match (status, target) {
            (StatusCode::NOT_FOUND, Some(id)) => StoreError::not_found(id.clone()),
            _ => StoreError::unavailable(format!("remote store returned status {status}")),
        }
    }
}

#[async_trait]
impl RemoteStore for FirestoreStore {
    async fn list_all(&self) -> StoreResult<Vec<(TodoId, String)>> {
        let response = self
            .request(Method::GET, self.collection_url.clone())
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Self::map_status(status, None));
        }

        let listing: ListDocumentsResponse = response.json().await.map_err(transport_error)?;
        Ok(listing
            .documents
            .into_iter()
            .map(|document| {
                let id = id_from_name(&document.name);
                let text = document.fields.unwrap_or_default().into_text();
                (id, text)
            })
            .collect())
    }

    async fn create(&self, text: &str) -> StoreResult<TodoId> {
        let response = self
            .request(Method::POST, self.collection_url.clone())
            .json(&DocumentWrite {
                fields: TodoFields::with_text(text),
            })
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Self::map_status(status, None));
        }

        let created: Document = response.json().await.map_err(transport_error)?;
        Ok(id_from_name(&created.name))
    }

    async fn update(&self, id: &TodoId, text: &str) -> StoreResult<()> {
        let response = self
            .request(Method::PATCH, self.document_url(id))
            .query(&[("updateMask.fieldPaths", "text")])
            .json(&DocumentWrite {
                fields: TodoFields::with_text(text),
            })
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Self::map_status(status, Some(id)));
        }
        Ok(())
    }

    async fn delete(&self, id: &TodoId) -> StoreResult<()> {
        let response = self
            .request(Method::DELETE, self.document_url(id))
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Self::map_status(status, Some(id)));
        }
        Ok(())
    }
}
