// ABOUTME: Deployment state marker types for the type state pattern.
// ABOUTME: Each state carries the data the next transition needs.

use crate::platform::Release;
use crate::types::DeploymentTag;

/// Initial state: context built, nothing touched yet.
/// Available actions: `acquire_image()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Initialized;

/// Image ready: a deployable identifier exists remotely.
/// Available actions: `optimize()`
#[derive(Debug, Clone)]
pub struct ImageReady {
    pub(crate) image: String,
    pub(crate) tag: Option<DeploymentTag>,
}

/// Optimized: the platform finished optimizing the image.
/// Available actions: `release()`
#[derive(Debug, Clone)]
pub struct Optimized {
    pub(crate) image: String,
    pub(crate) tag: Option<DeploymentTag>,
}

/// Released: the platform recorded a release.
/// Available actions: `cleanup()`
#[derive(Debug, Clone)]
pub struct Released {
    pub(crate) release: Release,
    pub(crate) tag: Option<DeploymentTag>,
}

/// Completed: local deployment tags reconciled.
/// Available actions: `into_release()`
#[derive(Debug, Clone)]
pub struct Completed {
    pub(crate) release: Release,
    pub(crate) tags_removed: usize,
}
