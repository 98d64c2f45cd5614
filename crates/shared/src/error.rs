use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::TodoId;

/// Failure taxonomy for the remote document store. Validation failures
/// (empty/whitespace input) never reach the store and have no variant here.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("remote store unavailable: {message}")]
    RemoteUnavailable { message: String },
    #[error("document {id} not found in remote store")]
    NotFound { id: TodoId },
}

impl StoreError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::RemoteUnavailable {
            message: message.into(),
        }
    }

    pub fn not_found(id: impl Into<TodoId>) -> Self {
        Self::NotFound { id: id.into() }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    RemoteUnavailable,
    NotFound,
}

impl StoreError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::RemoteUnavailable { .. } => ErrorCode::RemoteUnavailable,
            Self::NotFound { .. } => ErrorCode::NotFound,
        }
    }
}
