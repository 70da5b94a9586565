// ABOUTME: Deployment orchestrator tying the pipeline stages together.
// ABOUTME: Picks the image source once, then runs acquire, optimize, release, cleanup.

use tracing::{debug, info};

use crate::config::{AppConfig, ClientSettings, Definition};
use crate::diagnostics::Diagnostics;
use crate::platform::{PlatformOps, Release};
use crate::registry::ManifestOps;
use crate::runtime::{DaemonOps, ProgressSink, RegistryAuth, TracingProgress};
use crate::types::{AppName, ImageRef};

use super::Deployment;
use super::cancel::CancelSignal;
use super::context::DeploymentContext;
use super::error::DeployError;
use super::optimize::Optimizer;
use super::release::validate;
use super::source::ImageSource;

/// A definition the platform accepted, in its canonical form.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    pub app: AppName,
    pub definition: Definition,
}

/// Runs one deployment against its collaborators.
pub struct Deployer<D, P, M> {
    context: DeploymentContext,
    settings: ClientSettings,
    daemon: Option<D>,
    platform: P,
    registry: M,
    progress: Box<dyn ProgressSink>,
    diagnostics: Diagnostics,
}

impl<D, P, M> Deployer<D, P, M>
where
    D: DaemonOps,
    P: PlatformOps,
    M: ManifestOps,
{
    /// Build a deployer, probing the daemon (if any) exactly once.
    ///
    /// # Errors
    ///
    /// Returns `DeployError::Config` when neither `app_override` nor the
    /// config names the app.
    pub async fn new(
        app_config: AppConfig,
        app_override: Option<AppName>,
        settings: ClientSettings,
        daemon: Option<D>,
        platform: P,
        registry: M,
        cancel: CancelSignal,
    ) -> Result<Self, DeployError> {
        let daemon_available = match &daemon {
            Some(daemon) => match daemon.ping().await {
                Ok(()) => true,
                Err(e) => {
                    debug!("container daemon unavailable: {}", e);
                    false
                }
            },
            None => false,
        };

        let context = DeploymentContext::new(app_config, app_override, daemon_available, cancel)?;

        Ok(Self {
            context,
            settings,
            daemon,
            platform,
            registry,
            progress: Box::new(TracingProgress),
            diagnostics: Diagnostics::default(),
        })
    }

    /// Send push progress to `sink` instead of the log.
    pub fn with_progress(mut self, sink: impl ProgressSink + 'static) -> Self {
        self.progress = Box::new(sink);
        self
    }

    pub fn app_name(&self) -> &AppName {
        self.context.app_name()
    }

    pub fn daemon_available(&self) -> bool {
        self.context.daemon_available()
    }

    pub fn context(&self) -> &DeploymentContext {
        &self.context
    }

    /// Warnings collected so far (tag cleanup failures).
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Hand over the warnings collected so far, leaving none behind.
    pub fn take_diagnostics(&mut self) -> Diagnostics {
        std::mem::take(&mut self.diagnostics)
    }

    /// Validate the app definition remotely.
    ///
    /// On success the stored definition is replaced with the canonical copy.
    /// On failure it is left untouched.
    pub async fn validate_config(&mut self) -> Result<ValidatedConfig, DeployError> {
        let app = self.context.app_name().clone();
        let definition = validate(&self.platform, &app, self.context.definition()).await?;
        self.context.replace_definition(definition.clone());
        info!(app = %app, "configuration validated");
        Ok(ValidatedConfig { app, definition })
    }

    /// Deploy `image_ref` and return the created release.
    ///
    /// Stages run strictly in order and the first failure aborts the rest.
    /// Tag cleanup afterwards is best effort and only ever adds a warning.
    pub async fn deploy(&mut self, image_ref: &str) -> Result<Release, DeployError> {
        let reference = ImageRef::parse(image_ref)
            .map_err(|e| DeployError::Resolution(format!("{}: {}", image_ref, e)))?;
        let app = self.context.app_name().clone();

        let ready = {
            let source = self.image_source();
            info!(
                app = %app,
                image = %reference,
                path = if source.is_daemon() { "daemon" } else { "registry" },
                "starting deployment"
            );
            Deployment::new(app)
                .acquire_image(&source, &reference, self.progress.as_ref())
                .await?
        };

        let optimizer = Optimizer::new(&self.platform).with_interval(self.settings.poll_interval);
        let optimized = ready.optimize(&optimizer, self.context.cancel()).await?;

        let released = optimized
            .release(&self.platform, self.context.definition())
            .await?;

        let completed = released
            .cleanup(
                self.daemon.as_ref(),
                &self.settings.registry_host,
                &mut self.diagnostics,
            )
            .await;

        Ok(completed.into_release())
    }

    fn image_source(&self) -> ImageSource<'_, D, M> {
        match (self.context.daemon_available(), self.daemon.as_ref()) {
            (true, Some(daemon)) => ImageSource::Daemon {
                daemon,
                registry_host: &self.settings.registry_host,
                auth: self
                    .settings
                    .access_token
                    .as_deref()
                    .map(|token| RegistryAuth::platform_token(&self.settings.registry_host, token)),
            },
            _ => ImageSource::Registry {
                registry: &self.registry,
            },
        }
    }
}
