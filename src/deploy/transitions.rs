// ABOUTME: State transition methods for deployment orchestration.
// ABOUTME: Each method consumes self and returns the next state on success.

use tracing::debug;

use crate::config::Definition;
use crate::diagnostics::{Diagnostics, Warning};
use crate::platform::PlatformOps;
use crate::registry::ManifestOps;
use crate::runtime::{DaemonOps, ImageOps, ProgressSink};
use crate::types::ImageRef;

use super::Deployment;
use super::cancel::CancelSignal;
use super::error::DeployError;
use super::optimize::Optimizer;
use super::release::publish;
use super::source::ImageSource;
use super::state::{Completed, ImageReady, Initialized, Optimized, Released};

impl<S> Deployment<S> {
    fn transition<T>(self, state: T) -> Deployment<T> {
        Deployment {
            app: self.app,
            state,
        }
    }
}

// =============================================================================
// Initialized -> ImageReady
// =============================================================================

impl Deployment<Initialized> {
    /// Obtain a remote image identifier from `source`.
    ///
    /// # Errors
    ///
    /// Daemon path: `Resolution`, `Tagging`, `InvalidTag` or `Push`.
    /// Registry path: `ManifestResolution`.
    #[must_use = "deployment state must be used"]
    pub async fn acquire_image<D, M>(
        self,
        source: &ImageSource<'_, D, M>,
        reference: &ImageRef,
        progress: &dyn ProgressSink,
    ) -> Result<Deployment<ImageReady>, DeployError>
    where
        D: DaemonOps + ?Sized,
        M: ManifestOps + ?Sized,
    {
        let sourced = source.acquire(&self.app, reference, progress).await?;
        Ok(self.transition(ImageReady {
            image: sourced.image,
            tag: sourced.tag,
        }))
    }
}

// =============================================================================
// ImageReady -> Optimized
// =============================================================================

impl Deployment<ImageReady> {
    /// Wait for the platform to finish optimizing the image.
    ///
    /// # Errors
    ///
    /// Returns `Optimization` on a failed job or status error, `Cancelled`
    /// when `cancel` fires first.
    #[must_use = "deployment state must be used"]
    pub async fn optimize<P: PlatformOps + ?Sized>(
        self,
        optimizer: &Optimizer<'_, P>,
        cancel: &CancelSignal,
    ) -> Result<Deployment<Optimized>, DeployError> {
        optimizer.run(&self.app, &self.state.image, cancel).await?;
        let ImageReady { image, tag } = self.state;
        Ok(Deployment {
            app: self.app,
            state: Optimized { image, tag },
        })
    }
}

// =============================================================================
// Optimized -> Released
// =============================================================================

impl Deployment<Optimized> {
    /// Create the release.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Release` if the platform rejects the request.
    #[must_use = "deployment state must be used"]
    pub async fn release<P: PlatformOps + ?Sized>(
        self,
        platform: &P,
        definition: &Definition,
    ) -> Result<Deployment<Released>, DeployError> {
        let release = publish(platform, &self.app, &self.state.image, definition).await?;
        let tag = self.state.tag.clone();
        Ok(self.transition(Released { release, tag }))
    }
}

// =============================================================================
// Released -> Completed
// =============================================================================

impl Deployment<Released> {
    /// Remove this app's local deployment tags.
    ///
    /// Only runs when a deployment tag was pushed. Best effort and never
    /// retried: a failure becomes a warning in `diag`.
    pub async fn cleanup<D: ImageOps + ?Sized>(
        self,
        daemon: Option<&D>,
        registry_host: &str,
        diag: &mut Diagnostics,
    ) -> Deployment<Completed> {
        let mut tags_removed = 0;

        if let (Some(tag), Some(daemon)) = (&self.state.tag, daemon) {
            match daemon.delete_deployment_tags(registry_host, &self.app).await {
                Ok(count) => {
                    debug!(app = %self.app, last = %tag, count, "removed deployment tags");
                    tags_removed = count;
                }
                Err(e) => diag.warn(Warning::tag_cleanup(format!(
                    "failed to remove deployment tags for {}: {}",
                    self.app, e
                ))),
            }
        }

        let release = self.state.release.clone();
        self.transition(Completed {
            release,
            tags_removed,
        })
    }
}
