use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API request failed: {status} - {message}")]
    Status { status: StatusCode, message: String },

    #[error("response is missing `{0}`")]
    MissingField(&'static str),

    #[error("{0} not configured")]
    NotConfigured(&'static str),
}

impl ApiError {
    /// Builds a status error from a non-2xx body: the JSON `message` field if
    /// present, the raw text otherwise, the status reason as a last resort.
    pub fn from_body(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_string))
            .or_else(|| {
                let trimmed = body.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Error API").to_string());
        ApiError::Status { status, message }
    }

    /// The request never reached the server (DNS, refused connection, timeout).
    pub fn is_offline(&self) -> bool {
        match self {
            ApiError::Transport(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            _ => false,
        }
    }
}
