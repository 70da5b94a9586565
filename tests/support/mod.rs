// ABOUTME: Test support utilities.
// ABOUTME: In-memory fakes for the daemon, platform, and registry collaborators.

// Each test binary only uses some of these helpers.
#![allow(dead_code)]

use async_trait::async_trait;
use hoist::config::{AppConfig, ClientSettings, Definition};
use hoist::platform::{
    ConfigValidation, OptimizationStatus, PlatformError, PlatformOps, Release, ReleaseInput,
};
use hoist::registry::{ManifestOps, RegistryError, RemoteImage};
use hoist::runtime::{
    ImageError, ImageOps, ImageSummary, ProgressSink, PushProgress, RegistryAuth, RuntimeInfo,
    RuntimeInfoError, RuntimeMetadata,
};
use hoist::types::{AppName, DeploymentTag, ImageId, ImageRef, ReleaseId};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::{Arc, Once};
use std::time::Duration;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("hoist=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub const REGISTRY_HOST: &str = "registry.test";

pub fn app() -> AppName {
    AppName::new("app-name").unwrap()
}

/// Config naming `app-name` with a one-key definition.
pub fn app_config() -> AppConfig {
    let mut definition = Definition::new();
    definition.insert(
        "services".to_string(),
        serde_json::json!([{ "internal_port": 8080 }]),
    );
    AppConfig {
        app: Some(app()),
        build: None,
        definition,
    }
}

pub fn settings() -> ClientSettings {
    ClientSettings {
        api_url: "http://platform.test".to_string(),
        access_token: Some("test-token".to_string()),
        registry_host: REGISTRY_HOST.to_string(),
        poll_interval: Duration::from_secs(1),
    }
}

// =============================================================================
// Journal
// =============================================================================

/// Ordered record of collaborator calls shared between fakes.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn record(&self, entry: impl Into<String>) {
        self.0.lock().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().clone()
    }

    /// Call names only (text before the first space).
    pub fn calls(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .map(|e| e.split(' ').next().unwrap_or_default().to_string())
            .collect()
    }

    pub fn count(&self, call: &str) -> usize {
        self.calls().iter().filter(|c| *c == call).count()
    }

    pub fn contains(&self, call: &str) -> bool {
        self.count(call) > 0
    }
}

// =============================================================================
// Daemon
// =============================================================================

#[derive(Debug, Clone)]
pub struct FakeDaemon {
    journal: Journal,
    alive: bool,
    image: Option<ImageSummary>,
    fail_tag: bool,
    fail_push: bool,
    fail_cleanup: bool,
}

impl FakeDaemon {
    /// A live daemon that has the requested image locally.
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            alive: true,
            image: Some(ImageSummary {
                id: ImageId::new("sha256:local"),
                tags: vec!["app-image:latest".to_string()],
            }),
            fail_tag: false,
            fail_push: false,
            fail_cleanup: false,
        }
    }

    pub fn unreachable(mut self) -> Self {
        self.alive = false;
        self
    }

    pub fn without_image(mut self) -> Self {
        self.image = None;
        self
    }

    pub fn failing_tag(mut self) -> Self {
        self.fail_tag = true;
        self
    }

    pub fn failing_push(mut self) -> Self {
        self.fail_push = true;
        self
    }

    pub fn failing_cleanup(mut self) -> Self {
        self.fail_cleanup = true;
        self
    }
}

#[async_trait]
impl RuntimeInfo for FakeDaemon {
    async fn info(&self) -> Result<RuntimeMetadata, RuntimeInfoError> {
        Ok(RuntimeMetadata {
            name: "fake".to_string(),
            version: "0".to_string(),
            api_version: "1.45".to_string(),
            os: "linux".to_string(),
            arch: "amd64".to_string(),
        })
    }

    async fn ping(&self) -> Result<(), RuntimeInfoError> {
        self.journal.record("ping");
        if self.alive {
            Ok(())
        } else {
            Err(RuntimeInfoError::ConnectionFailed("socket closed".to_string()))
        }
    }
}

#[async_trait]
impl ImageOps for FakeDaemon {
    async fn resolve_image(
        &self,
        reference: &ImageRef,
    ) -> Result<Option<ImageSummary>, ImageError> {
        self.journal.record(format!("resolve_image {}", reference));
        Ok(self.image.clone())
    }

    async fn tag_image(&self, id: &ImageId, tag: &DeploymentTag) -> Result<(), ImageError> {
        self.journal.record(format!("tag_image {} {}", id, tag));
        if self.fail_tag {
            return Err(ImageError::TagFailed(tag.to_string()));
        }
        Ok(())
    }

    async fn push_image(
        &self,
        tag: &DeploymentTag,
        _auth: Option<&RegistryAuth>,
        progress: &dyn ProgressSink,
    ) -> Result<(), ImageError> {
        self.journal.record(format!("push_image {}", tag));
        if self.fail_push {
            return Err(ImageError::PushFailed(tag.to_string()));
        }
        progress.on_progress(&PushProgress {
            status: "Pushed".to_string(),
            detail: None,
        });
        Ok(())
    }

    async fn delete_deployment_tags(
        &self,
        registry: &str,
        app: &AppName,
    ) -> Result<usize, ImageError> {
        self.journal
            .record(format!("delete_deployment_tags {} {}", registry, app));
        if self.fail_cleanup {
            return Err(ImageError::InUse("container running".to_string()));
        }
        Ok(1)
    }
}

// =============================================================================
// Platform
// =============================================================================

#[derive(Debug, Clone)]
pub struct FakePlatform {
    journal: Journal,
    statuses: Arc<Mutex<VecDeque<OptimizationStatus>>>,
    status_delay: Option<Duration>,
    fail_status: bool,
    validation: Option<ConfigValidation>,
    fail_validation_transport: bool,
    fail_release: bool,
    releases: Arc<Mutex<Vec<ReleaseInput>>>,
}

impl FakePlatform {
    /// A platform that accepts any config and finishes optimization at once.
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            statuses: Arc::new(Mutex::new(VecDeque::new())),
            status_delay: None,
            fail_status: false,
            validation: None,
            fail_validation_transport: false,
            fail_release: false,
            releases: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Report these statuses in order, then `done`.
    pub fn with_statuses(self, statuses: impl IntoIterator<Item = OptimizationStatus>) -> Self {
        self.statuses.lock().extend(statuses);
        self
    }

    /// Report `in_progress` this many times, then `done`.
    pub fn in_progress_times(self, n: usize) -> Self {
        self.with_statuses(std::iter::repeat_n(OptimizationStatus::InProgress, n))
    }

    /// Make every status check take this long.
    pub fn with_status_delay(mut self, delay: Duration) -> Self {
        self.status_delay = Some(delay);
        self
    }

    pub fn failing_status(mut self) -> Self {
        self.fail_status = true;
        self
    }

    pub fn rejecting_config(mut self, errors: &[&str]) -> Self {
        self.validation = Some(ConfigValidation {
            valid: false,
            definition: Definition::new(),
            errors: errors.iter().map(|e| e.to_string()).collect(),
        });
        self
    }

    /// Accept any config and answer with this canonical definition.
    pub fn canonicalizing_to(mut self, definition: Definition) -> Self {
        self.validation = Some(ConfigValidation {
            valid: true,
            definition,
            errors: Vec::new(),
        });
        self
    }

    pub fn failing_validation_transport(mut self) -> Self {
        self.fail_validation_transport = true;
        self
    }

    pub fn failing_release(mut self) -> Self {
        self.fail_release = true;
        self
    }

    pub fn releases(&self) -> Vec<ReleaseInput> {
        self.releases.lock().clone()
    }
}

#[async_trait]
impl PlatformOps for FakePlatform {
    async fn validate_config(
        &self,
        app: &AppName,
        definition: &Definition,
    ) -> Result<ConfigValidation, PlatformError> {
        self.journal.record(format!("validate_config {}", app));
        if self.fail_validation_transport {
            return Err(PlatformError::Transport("connection refused".to_string()));
        }
        Ok(self.validation.clone().unwrap_or_else(|| ConfigValidation {
            valid: true,
            definition: definition.clone(),
            errors: Vec::new(),
        }))
    }

    async fn optimization_status(
        &self,
        _app: &AppName,
        image: &str,
    ) -> Result<OptimizationStatus, PlatformError> {
        self.journal.record(format!("optimization_status {}", image));
        if let Some(delay) = self.status_delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail_status {
            return Err(PlatformError::Api {
                status: 500,
                message: "optimizer unavailable".to_string(),
            });
        }
        Ok(self
            .statuses
            .lock()
            .pop_front()
            .unwrap_or(OptimizationStatus::Done))
    }

    async fn create_release(&self, input: &ReleaseInput) -> Result<Release, PlatformError> {
        self.journal.record(format!("create_release {}", input.image));
        if self.fail_release {
            return Err(PlatformError::Api {
                status: 422,
                message: "image not optimized".to_string(),
            });
        }
        let version = {
            let mut releases = self.releases.lock();
            releases.push(input.clone());
            releases.len() as u64
        };
        Ok(Release {
            id: ReleaseId::new(format!("rel_{}", version)),
            version,
            image: Some(input.image.clone()),
            description: None,
            created_at: None,
        })
    }
}

// =============================================================================
// Registry
// =============================================================================

#[derive(Debug, Clone)]
pub struct FakeRegistry {
    journal: Journal,
    digest: Option<String>,
}

impl FakeRegistry {
    /// A registry where every reference resolves to `sha256:remote`.
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            digest: Some("sha256:remote".to_string()),
        }
    }

    pub fn missing(mut self) -> Self {
        self.digest = None;
        self
    }
}

#[async_trait]
impl ManifestOps for FakeRegistry {
    async fn resolve_remote_manifest(
        &self,
        reference: &ImageRef,
        auth: Option<&RegistryAuth>,
    ) -> Result<RemoteImage, RegistryError> {
        self.journal.record(format!(
            "resolve_remote_manifest {} auth={}",
            reference,
            auth.is_some()
        ));
        match &self.digest {
            Some(digest) => Ok(RemoteImage {
                reference: reference.with_digest(digest.clone()),
                digest: digest.clone(),
                media_type: None,
            }),
            None => Err(RegistryError::NotFound(reference.to_string())),
        }
    }
}
