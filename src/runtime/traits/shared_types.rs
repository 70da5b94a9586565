// ABOUTME: Shared types used across daemon trait definitions.
// ABOUTME: ImageSummary, RegistryAuth, RuntimeMetadata, and push progress reporting.

use crate::types::ImageId;

/// A locally resolved image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSummary {
    /// Image ID (e.g. `sha256:abc...`).
    pub id: ImageId,
    /// Repository tags currently pointing at the image.
    pub tags: Vec<String>,
}

/// Registry authentication credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryAuth {
    /// Username.
    pub username: String,
    /// Password or token.
    pub password: String,
    /// Registry server (e.g., "ghcr.io").
    pub server: Option<String>,
}

impl RegistryAuth {
    /// Credentials for the platform registry, which accepts any username
    /// alongside a platform access token.
    pub fn platform_token(server: &str, token: &str) -> Self {
        Self {
            username: "x".to_string(),
            password: token.to_string(),
            server: Some(server.to_string()),
        }
    }
}

/// Runtime metadata.
#[derive(Debug, Clone)]
pub struct RuntimeMetadata {
    /// Runtime name (e.g., "docker", "podman").
    pub name: String,
    /// Runtime version.
    pub version: String,
    /// API version.
    pub api_version: String,
    /// Operating system.
    pub os: String,
    /// Architecture.
    pub arch: String,
}

/// One progress event from an image push.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PushProgress {
    /// Status line ("Pushing", "Pushed", "Layer already exists", ...).
    pub status: String,
    /// Human-readable progress bar, if the daemon sent one.
    pub detail: Option<String>,
}

/// Receives push progress events.
pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, event: &PushProgress);
}

/// Progress sink that forwards events to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn on_progress(&self, event: &PushProgress) {
        tracing::debug!(
            detail = event.detail.as_deref().unwrap_or(""),
            "{}",
            event.status
        );
    }
}
