// ABOUTME: The two routes to a deployable image identifier.
// ABOUTME: Daemon path tags and pushes locally; registry path resolves a manifest digest.

use tracing::{debug, info};

use super::error::DeployError;
use crate::registry::ManifestOps;
use crate::runtime::{DaemonOps, ImageOps, ProgressSink, RegistryAuth};
use crate::types::{AppName, DeploymentTag, ImageRef};

/// Where the deployable image comes from.
///
/// Chosen once per deploy from the daemon ping; both variants feed the same
/// optimize and release tail.
pub enum ImageSource<'a, D: ?Sized, M: ?Sized> {
    /// Resolve, tag and push through the local daemon.
    Daemon {
        daemon: &'a D,
        registry_host: &'a str,
        auth: Option<RegistryAuth>,
    },
    /// Resolve the manifest directly against the image's registry.
    Registry { registry: &'a M },
}

/// Result of acquiring an image from a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcedImage {
    /// Identifier the platform will optimize and release.
    pub image: String,
    /// Tag that must be cleaned up afterwards (daemon path only).
    pub tag: Option<DeploymentTag>,
}

impl<D, M> ImageSource<'_, D, M>
where
    D: DaemonOps + ?Sized,
    M: ManifestOps + ?Sized,
{
    pub fn is_daemon(&self) -> bool {
        matches!(self, ImageSource::Daemon { .. })
    }

    /// Produce a remote image identifier for `reference`.
    pub async fn acquire(
        &self,
        app: &AppName,
        reference: &ImageRef,
        progress: &dyn ProgressSink,
    ) -> Result<SourcedImage, DeployError> {
        match self {
            ImageSource::Daemon {
                daemon,
                registry_host,
                auth,
            } => {
                let summary = daemon
                    .resolve_image(reference)
                    .await
                    .map_err(|e| DeployError::Resolution(format!("{}: {}", reference, e)))?
                    .ok_or_else(|| {
                        DeployError::Resolution(format!("image not found: {}", reference))
                    })?;
                debug!(image = %reference, id = %summary.id, "resolved local image");

                let tag = DeploymentTag::generate(registry_host, app);
                daemon
                    .tag_image(&summary.id, &tag)
                    .await
                    .map_err(|e| DeployError::Tagging(e.to_string()))?;

                let tag = push_deployment_tag(*daemon, tag.as_str(), auth.as_ref(), progress)
                    .await?;
                info!(tag = %tag, "pushed deployment tag");

                Ok(SourcedImage {
                    image: tag.to_string(),
                    tag: Some(tag),
                })
            }
            ImageSource::Registry { registry } => {
                let remote = registry
                    .resolve_remote_manifest(reference, None)
                    .await
                    .map_err(|e| DeployError::ManifestResolution(e.to_string()))?;
                info!(image = %remote.remote(), "resolved remote manifest");

                Ok(SourcedImage {
                    image: remote.remote(),
                    tag: None,
                })
            }
        }
    }
}

/// Push a deployment tag given in its raw form.
///
/// Malformed tags are rejected with `InvalidTag` before the daemon is contacted.
pub async fn push_deployment_tag<D: ImageOps + ?Sized>(
    daemon: &D,
    raw_tag: &str,
    auth: Option<&RegistryAuth>,
    progress: &dyn ProgressSink,
) -> Result<DeploymentTag, DeployError> {
    let tag = DeploymentTag::parse(raw_tag).map_err(|e| DeployError::InvalidTag(e.to_string()))?;

    daemon
        .push_image(&tag, auth, progress)
        .await
        .map_err(|e| DeployError::Push(e.to_string()))?;

    Ok(tag)
}
