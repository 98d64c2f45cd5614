use async_trait::async_trait;
use shared::{domain::TodoId, error::StoreError};

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Document-collection CRUD consumed by the controller. Records carry exactly
/// one field, `text`; the store assigns every durable id.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetches the whole collection in one call, in the store's listing order.
    async fn list_all(&self) -> StoreResult<Vec<(TodoId, String)>>;

    /// Creates a record and returns its store-assigned id.
    async fn create(&self, text: &str) -> StoreResult<TodoId>;

    /// Rewrites the `text` field of an existing record.
    async fn update(&self, id: &TodoId, text: &str) -> StoreResult<()>;

    /// Deletes an existing record.
    async fn delete(&self, id: &TodoId) -> StoreResult<()>;
}
