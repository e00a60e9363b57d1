//! Acknowledgement payloads returned by the write endpoints.

use serde::{Deserialize, Serialize};

/// `{"message": ..., "id": ...}` returned by create and update endpoints.
///
/// Create endpoints carry the generated `id`; update endpoints return only a
/// status `message`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl IdResponse {
    /// A response carrying a generated id.
    pub fn created(id: impl Into<String>) -> Self {
        Self {
            message: None,
            id: Some(id.into()),
        }
    }

    /// A status-only response.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            id: None,
        }
    }

    /// The generated id, if present and non-blank.
    pub fn usable_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.trim().is_empty())
    }
}
