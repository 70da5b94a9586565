// ABOUTME: Error types for platform API calls.
// ABOUTME: Separates transport failures from API-reported failures.

/// Errors from the platform API client.
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// The request never produced a response.
    #[error("request to platform failed: {0}")]
    Transport(String),

    /// The access token was missing or rejected.
    #[error("not authorized: {0}")]
    Unauthorized(String),

    /// The platform answered with a non-success status.
    #[error("platform returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("invalid response from platform: {0}")]
    Decode(String),
}

impl PlatformError {
    /// Whether the failure happened before the platform could answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, PlatformError::Transport(_))
    }
}

impl From<reqwest::Error> for PlatformError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            PlatformError::Decode(err.to_string())
        } else {
            PlatformError::Transport(err.to_string())
        }
    }
}
