use serde::{Deserialize, Serialize};

/// Error body the backend sends with non-2xx responses, e.g.
/// `{"error": "Team member not found"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

impl ApiErrorBody {
    /// Best-effort extraction of a readable message from a failed response body.
    pub fn message_from(body: &str) -> String {
        match serde_json::from_str::<Self>(body) {
            Ok(parsed) => parsed.error,
            Err(_) => body.trim().to_string(),
        }
    }
}
