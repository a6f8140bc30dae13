use serde::{Deserialize, Serialize};

/// Body of a failed catalog API call. The server fills `error` with a
/// human readable message on 500 responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    /// Best-effort extraction of the server message from a raw body.
    /// Some endpoints return the message as a bare JSON string.
    pub fn message_from_body(body: &str) -> Option<String> {
        if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
            return parsed.error;
        }
        serde_json::from_str::<String>(body).ok()
    }
}
