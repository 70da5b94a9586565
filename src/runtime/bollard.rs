// ABOUTME: Bollard-based local daemon implementation.
// ABOUTME: Supports both Docker and Podman via the Docker-compatible API.

use crate::runtime::detection::detect_local;
use crate::runtime::error::RuntimeError;
use crate::runtime::traits::{
    ImageError, ImageOps, ImageSummary, ProgressSink, PushProgress, RegistryAuth, RuntimeInfo,
    RuntimeInfoError, RuntimeMetadata,
};
use crate::runtime::detection::{DetectedRuntime, RuntimeType};
use crate::types::{AppName, DeploymentTag, ImageId, ImageRef};
use async_trait::async_trait;
use bollard::Docker;
use bollard::auth::DockerCredentials;
use bollard::models::ProgressDetail;
use bollard::query_parameters::{
    CreateImageOptions, ListImagesOptions, PushImageOptions, RemoveImageOptions, TagImageOptions,
};
use futures::StreamExt;
use std::collections::HashMap;

/// Seconds before a daemon request is abandoned.
const DAEMON_TIMEOUT_SECS: u64 = 120;

// =============================================================================
// Error Mapping Helpers
// =============================================================================

fn is_not_found(e: &bollard::errors::Error) -> bool {
    matches!(
        e,
        bollard::errors::Error::DockerResponseServerError {
            status_code: 404,
            ..
        }
    )
}

fn map_image_pull_error(e: bollard::errors::Error, image_name: &str) -> ImageError {
    match &e {
        bollard::errors::Error::DockerResponseServerError {
            status_code: 401 | 403,
            ..
        } => ImageError::AuthenticationFailed(image_name.to_string()),
        _ => ImageError::PullFailed(format!("{}: {}", image_name, e)),
    }
}

fn map_tag_error(e: bollard::errors::Error, image_id: &str) -> ImageError {
    match &e {
        bollard::errors::Error::DockerResponseServerError {
            status_code: 404,
            ..
        } => ImageError::NotFound(image_id.to_string()),
        _ => ImageError::TagFailed(format!("{}: {}", image_id, e)),
    }
}

fn map_push_error(e: bollard::errors::Error, tag: &str) -> ImageError {
    match &e {
        bollard::errors::Error::DockerResponseServerError {
            status_code: 404,
            ..
        } => ImageError::NotFound(tag.to_string()),
        bollard::errors::Error::DockerResponseServerError {
            status_code: 401 | 403,
            ..
        } => ImageError::AuthenticationFailed(tag.to_string()),
        _ => ImageError::PushFailed(format!("{}: {}", tag, e)),
    }
}

fn map_image_remove_error(e: bollard::errors::Error, image_name: &str) -> ImageError {
    match &e {
        bollard::errors::Error::DockerResponseServerError {
            status_code: 404,
            ..
        } => ImageError::NotFound(image_name.to_string()),
        bollard::errors::Error::DockerResponseServerError {
            status_code: 409,
            ..
        } => ImageError::InUse(image_name.to_string()),
        _ => ImageError::Runtime(format!("failed to remove {}: {}", image_name, e)),
    }
}

/// Render push progress as `current/total` when the daemon reports both.
fn progress_text(detail: Option<&ProgressDetail>) -> Option<String> {
    let detail = detail?;
    match (detail.current, detail.total) {
        (Some(current), Some(total)) => Some(format!("{}/{}", current, total)),
        _ => None,
    }
}

/// Fold per-tag removal failures into one result.
fn removal_outcome(removed: usize, mut failures: Vec<ImageError>) -> Result<usize, ImageError> {
    match failures.len() {
        0 => Ok(removed),
        1 => Err(failures.remove(0)),
        n => {
            let details: Vec<String> = failures.iter().map(ToString::to_string).collect();
            Err(ImageError::Runtime(format!(
                "failed to remove {} deployment tags ({} removed): {}",
                n,
                removed,
                details.join("; ")
            )))
        }
    }
}

fn credentials(auth: Option<&RegistryAuth>) -> Option<DockerCredentials> {
    auth.map(|a| DockerCredentials {
        username: Some(a.username.clone()),
        password: Some(a.password.clone()),
        serveraddress: a.server.clone(),
        ..Default::default()
    })
}

// =============================================================================
// BollardRuntime
// =============================================================================

/// Local daemon client using bollard.
pub struct BollardRuntime {
    client: Docker,
    runtime_type: RuntimeType,
}

impl BollardRuntime {
    /// Create a new BollardRuntime from a Docker client.
    pub fn new(client: Docker, runtime_type: RuntimeType) -> Self {
        Self {
            client,
            runtime_type,
        }
    }

    /// Connect to a detected runtime socket.
    pub fn connect(info: &DetectedRuntime) -> Result<Self, RuntimeInfoError> {
        let client = Docker::connect_with_unix(
            &info.socket_path,
            DAEMON_TIMEOUT_SECS,
            bollard::API_DEFAULT_VERSION,
        )
        .map_err(|e| RuntimeInfoError::ConnectionFailed(e.to_string()))?;
        Ok(Self::new(client, info.runtime_type))
    }

    /// Detect and connect to the local runtime.
    ///
    /// Connecting does not talk to the daemon; use `ping()` to check liveness.
    pub fn connect_local() -> Result<Self, RuntimeError> {
        let info = detect_local()?;
        tracing::debug!(
            runtime = %info.runtime_type,
            socket = %info.socket_path,
            "detected local runtime"
        );
        Ok(Self::connect(&info)?)
    }

    /// Get the runtime type (Docker or Podman).
    pub fn runtime_type(&self) -> RuntimeType {
        self.runtime_type
    }

    /// Inspect a local image, mapping 404 to `None`.
    async fn find_image(&self, image_name: &str) -> Result<Option<ImageSummary>, ImageError> {
        match self.client.inspect_image(image_name).await {
            Ok(details) => Ok(details.id.map(|id| ImageSummary {
                id: ImageId::new(id),
                tags: details.repo_tags.unwrap_or_default(),
            })),
            Err(e) if is_not_found(&e) => Ok(None),
            Err(e) => Err(ImageError::Runtime(format!(
                "failed to inspect {}: {}",
                image_name, e
            ))),
        }
    }

    /// Pull an image. Returns `Ok(false)` when the registry does not have it.
    async fn pull_image(&self, image_name: &str) -> Result<bool, ImageError> {
        let opts = CreateImageOptions {
            from_image: Some(image_name.to_string()),
            ..Default::default()
        };

        // Pull returns a stream of progress updates - consume it
        let mut stream = self.client.create_image(Some(opts), None, None);
        while let Some(result) = stream.next().await {
            match result {
                Ok(_) => {}
                Err(e) if is_not_found(&e) => return Ok(false),
                Err(e) => return Err(map_image_pull_error(e, image_name)),
            }
        }

        Ok(true)
    }
}

#[async_trait]
impl RuntimeInfo for BollardRuntime {
    async fn info(&self) -> Result<RuntimeMetadata, RuntimeInfoError> {
        let info = self
            .client
            .info()
            .await
            .map_err(|e| RuntimeInfoError::ConnectionFailed(e.to_string()))?;

        let name = match self.runtime_type {
            RuntimeType::Docker => "Docker".to_string(),
            RuntimeType::Podman => "Podman".to_string(),
        };

        Ok(RuntimeMetadata {
            name,
            version: info.server_version.unwrap_or_default(),
            api_version: bollard::API_DEFAULT_VERSION.to_string(),
            os: info.operating_system.unwrap_or_default(),
            arch: info.architecture.unwrap_or_default(),
        })
    }

    async fn ping(&self) -> Result<(), RuntimeInfoError> {
        self.client
            .ping()
            .await
            .map_err(|e| RuntimeInfoError::ConnectionFailed(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl ImageOps for BollardRuntime {
    async fn resolve_image(&self, reference: &ImageRef) -> Result<Option<ImageSummary>, ImageError> {
        let image_name = reference.to_string();

        if let Some(image) = self.find_image(&image_name).await? {
            return Ok(Some(image));
        }

        tracing::debug!(image = %image_name, "image not found locally, pulling");
        if !self.pull_image(&image_name).await? {
            return Ok(None);
        }

        self.find_image(&image_name).await
    }

    async fn tag_image(&self, id: &ImageId, tag: &DeploymentTag) -> Result<(), ImageError> {
        let opts = TagImageOptions {
            repo: Some(tag.repository().to_string()),
            tag: tag.tag().map(str::to_string),
            ..Default::default()
        };

        self.client
            .tag_image(id.as_str(), Some(opts))
            .await
            .map_err(|e| map_tag_error(e, id.as_str()))
    }

    async fn push_image(
        &self,
        tag: &DeploymentTag,
        auth: Option<&RegistryAuth>,
        progress: &dyn ProgressSink,
    ) -> Result<(), ImageError> {
        let opts = PushImageOptions {
            tag: tag.tag().map(str::to_string),
            ..Default::default()
        };

        let mut stream = self
            .client
            .push_image(tag.repository(), Some(opts), credentials(auth));

        while let Some(result) = stream.next().await {
            let info = result.map_err(|e| map_push_error(e, tag.as_str()))?;
            if let Some(status) = info.status {
                progress.on_progress(&PushProgress {
                    status,
                    detail: progress_text(info.progress_detail.as_ref()),
                });
            }
        }

        Ok(())
    }

    async fn delete_deployment_tags(
        &self,
        registry: &str,
        app: &AppName,
    ) -> Result<usize, ImageError> {
        let pattern = format!("{}*", DeploymentTag::prefix(registry, app));
        let mut filters = HashMap::new();
        filters.insert("reference".to_string(), vec![pattern]);

        let opts = ListImagesOptions {
            filters: Some(filters),
            ..Default::default()
        };

        let images = self
            .client
            .list_images(Some(opts))
            .await
            .map_err(|e| ImageError::Runtime(format!("failed to list images: {}", e)))?;

        let tags: Vec<String> = images
            .into_iter()
            .flat_map(|image| image.repo_tags)
            .filter(|t| DeploymentTag::belongs_to(t, registry, app))
            .collect();

        let mut removed = 0;
        let mut failures = Vec::new();
        for tag in &tags {
            // Removing one of several tags only untags the image
            let opts = RemoveImageOptions {
                force: false,
                ..Default::default()
            };

            match self.client.remove_image(tag, Some(opts), None).await {
                Ok(_) => removed += 1,
                Err(e) if is_not_found(&e) => {}
                Err(e) => {
                    tracing::debug!(tag = %tag, error = %e, "failed to remove deployment tag");
                    failures.push(map_image_remove_error(e, tag));
                }
            }
        }

        removal_outcome(removed, failures)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_shows_bytes_when_known() {
        let detail = ProgressDetail {
            current: Some(512),
            total: Some(2048),
        };
        assert_eq!(progress_text(Some(&detail)).as_deref(), Some("512/2048"));
    }

    #[test]
    fn progress_without_total_is_omitted() {
        let detail = ProgressDetail {
            current: Some(512),
            total: None,
        };
        assert_eq!(progress_text(Some(&detail)), None);
        assert_eq!(progress_text(None), None);
    }

    #[test]
    fn removal_without_failures_reports_count() {
        assert_eq!(removal_outcome(3, Vec::new()).unwrap(), 3);
    }

    #[test]
    fn single_removal_failure_is_returned_as_is() {
        let err = removal_outcome(2, vec![ImageError::InUse("r/app:deployment-1".into())])
            .unwrap_err();
        assert!(matches!(err, ImageError::InUse(_)));
    }

    #[test]
    fn several_removal_failures_are_aggregated() {
        let err = removal_outcome(
            1,
            vec![
                ImageError::InUse("r/app:deployment-1".into()),
                ImageError::Runtime("daemon hiccup".into()),
            ],
        )
        .unwrap_err();

        let message = err.to_string();
        assert!(message.contains("failed to remove 2 deployment tags (1 removed)"));
        assert!(message.contains("r/app:deployment-1"));
        assert!(message.contains("daemon hiccup"));
    }

    #[test]
    fn credentials_carry_server() {
        let auth = RegistryAuth::platform_token("registry.test", "token");
        let creds = credentials(Some(&auth)).unwrap();
        assert_eq!(creds.username.as_deref(), Some("x"));
        assert_eq!(creds.serveraddress.as_deref(), Some("registry.test"));
        assert!(credentials(None).is_none());
    }
}
