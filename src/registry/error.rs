// ABOUTME: Error types for registry manifest resolution.
// ABOUTME: Distinguishes missing manifests from auth and transport failures.

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("manifest not found: {0}")]
    NotFound(String),

    #[error("registry denied access to {0}")]
    Unauthorized(String),

    #[error("registry returned {status} for {url}")]
    Status { status: u16, url: String },

    /// The registry answered with an error the client could not classify.
    #[error("registry rejected the request: {0}")]
    Rejected(String),

    #[error("registry request failed: {0}")]
    Transport(String),
}
