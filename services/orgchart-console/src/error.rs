//! Error types for the org chart console

/// Errors that can occur in the org chart console
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Non-2xx answer from the backend. Displays as the backend's own message.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Client-side form validation failure
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConsoleError {
    /// Build the error for a non-2xx response. An empty body falls back to the status code.
    pub fn from_status(status: u16, body: &str) -> Self {
        let trimmed = body.trim();
        let message = if trimmed.is_empty() {
            format!("HTTP {}", status)
        } else {
            trimmed.to_string()
        };
        ConsoleError::Api { status, message }
    }
}

/// Result type alias for console operations
pub type Result<T> = std::result::Result<T, ConsoleError>;
