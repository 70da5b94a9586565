// ABOUTME: Remote platform API: config validation, image optimization, releases.
// ABOUTME: PlatformOps is the seam the deploy pipeline talks through.

mod client;
mod error;
mod types;

pub use client::PlatformClient;
pub use error::PlatformError;
pub use types::{ConfigValidation, OptimizationStatus, Release, ReleaseInput};

use crate::config::Definition;
use crate::types::AppName;
use async_trait::async_trait;

/// Operations the deploy pipeline needs from the platform.
#[async_trait]
pub trait PlatformOps: Send + Sync {
    /// Validate a service definition, returning the canonical form.
    async fn validate_config(
        &self,
        app: &AppName,
        definition: &Definition,
    ) -> Result<ConfigValidation, PlatformError>;

    /// Start (or look up) optimization of `image` and report its status.
    async fn optimization_status(
        &self,
        app: &AppName,
        image: &str,
    ) -> Result<OptimizationStatus, PlatformError>;

    /// Create a release for an image.
    async fn create_release(&self, input: &ReleaseInput) -> Result<Release, PlatformError>;
}
