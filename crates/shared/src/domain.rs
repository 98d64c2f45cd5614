use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix reserved for ids minted locally while a create round trip is in
/// flight. Server-assigned document ids never start with it.
pub const LOCAL_ID_PREFIX: &str = "local-";

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TodoId(pub String);

impl TodoId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mints a placeholder id for an optimistic insert awaiting its
    /// server-assigned id.
    pub fn local(sequence: u64) -> Self {
        Self(format!("{LOCAL_ID_PREFIX}{sequence}"))
    }

    pub fn is_local(&self) -> bool {
        self.0.starts_with(LOCAL_ID_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TodoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TodoId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: TodoId,
    pub text: String,
}

impl TodoItem {
    pub fn new(id: impl Into<TodoId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

impl From<String> for TodoId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_ids_carry_reserved_prefix() {
        let id = TodoId::local(7);
        assert_eq!(id.as_str(), "local-7");
        assert!(id.is_local());
        assert!(!TodoId::new("a1B2c3").is_local());
    }
}
