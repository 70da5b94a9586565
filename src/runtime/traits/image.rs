// ABOUTME: Image operations trait for the local container daemon.
// ABOUTME: Resolve, tag, push, and clean up deployment-scoped image tags.

use super::shared_types::{ImageSummary, ProgressSink, RegistryAuth};
use crate::types::{AppName, DeploymentTag, ImageId, ImageRef};
use async_trait::async_trait;

/// Image operations used by the daemon deploy path.
#[async_trait]
pub trait ImageOps: Send + Sync {
    /// Resolve a user reference to a local image, pulling it if needed.
    ///
    /// Returns `Ok(None)` when the image cannot be found locally or remotely.
    async fn resolve_image(&self, reference: &ImageRef) -> Result<Option<ImageSummary>, ImageError>;

    /// Apply `tag` to the local image `id`.
    async fn tag_image(&self, id: &ImageId, tag: &DeploymentTag) -> Result<(), ImageError>;

    /// Push `tag` to its registry, reporting progress to `progress`.
    async fn push_image(
        &self,
        tag: &DeploymentTag,
        auth: Option<&RegistryAuth>,
        progress: &dyn ProgressSink,
    ) -> Result<(), ImageError>;

    /// Remove every local deployment tag for `app` on `registry`.
    ///
    /// Returns the number of tags removed.
    async fn delete_deployment_tags(
        &self,
        registry: &str,
        app: &AppName,
    ) -> Result<usize, ImageError>;
}

/// Errors from image operations.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("image not found: {0}")]
    NotFound(String),

    #[error("authentication failed for registry: {0}")]
    AuthenticationFailed(String),

    #[error("pull failed: {0}")]
    PullFailed(String),

    #[error("tag failed: {0}")]
    TagFailed(String),

    #[error("push failed: {0}")]
    PushFailed(String),

    #[error("image in use, cannot remove: {0}")]
    InUse(String),

    #[error("runtime error: {0}")]
    Runtime(String),
}
