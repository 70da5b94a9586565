// ABOUTME: Error types for the deploy pipeline.
// ABOUTME: Each error knows its kind and the pipeline stage that produced it.

use chrono::{DateTime, Utc};
use std::fmt;

use super::cancel::CancelReason;
use super::optimize::OptimizationError;
use crate::platform::PlatformError;

/// Errors that abort a deployment.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The image reference could not be resolved through the daemon.
    #[error("failed to resolve image: {0}")]
    Resolution(String),

    /// Applying the deployment tag failed.
    #[error("failed to tag image: {0}")]
    Tagging(String),

    /// A deployment tag was malformed.
    #[error("invalid deployment tag: {0}")]
    InvalidTag(String),

    /// Pushing the deployment tag failed.
    #[error("failed to push image: {0}")]
    Push(String),

    /// The remote registry manifest could not be resolved.
    #[error("failed to resolve remote manifest: {0}")]
    ManifestResolution(String),

    /// Remote optimization failed or its status could not be read.
    #[error("image optimization failed: {0}")]
    Optimization(#[from] OptimizationError),

    /// The platform rejected the app configuration.
    #[error("invalid configuration: {}", .0.join("; "))]
    Validation(Vec<String>),

    /// The validation request itself failed.
    #[error("configuration validation request failed: {0}")]
    Platform(#[source] PlatformError),

    /// Release creation failed.
    #[error("failed to create release: {0}")]
    Release(#[source] PlatformError),

    /// The caller cancelled the deployment.
    #[error("deployment cancelled: {0}")]
    Cancelled(CancelReason),

    /// Deployment context could not be built.
    #[error("configuration error: {0}")]
    Config(String),

    /// Another process holds the deploy lock.
    #[error("{0}")]
    LockHeld(LockHolderInfo),

    /// The deploy lock could not be acquired or released.
    #[error("deploy lock error: {0}")]
    Lock(String),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    Resolution,
    Tagging,
    InvalidTag,
    Push,
    ManifestResolution,
    Optimization,
    Validation,
    Platform,
    Release,
    Cancelled,
    Config,
    LockHeld,
    Lock,
}

/// Pipeline stage at which a deployment failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Setup,
    Lock,
    Validation,
    Resolution,
    Tagging,
    Push,
    Optimization,
    Release,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Setup => "setup",
            Stage::Lock => "lock",
            Stage::Validation => "validation",
            Stage::Resolution => "resolution",
            Stage::Tagging => "tagging",
            Stage::Push => "push",
            Stage::Optimization => "optimization",
            Stage::Release => "release",
        };
        f.write_str(name)
    }
}

/// Who holds a contested deploy lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockHolderInfo {
    pub holder: String,
    pub pid: u32,
    pub started_at: DateTime<Utc>,
}

impl fmt::Display for LockHolderInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "deploy lock held by {} (pid {}) since {}; use --force to override",
            self.holder, self.pid, self.started_at
        )
    }
}

impl DeployError {
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Resolution(_) => DeployErrorKind::Resolution,
            DeployError::Tagging(_) => DeployErrorKind::Tagging,
            DeployError::InvalidTag(_) => DeployErrorKind::InvalidTag,
            DeployError::Push(_) => DeployErrorKind::Push,
            DeployError::ManifestResolution(_) => DeployErrorKind::ManifestResolution,
            DeployError::Optimization(_) => DeployErrorKind::Optimization,
            DeployError::Validation(_) => DeployErrorKind::Validation,
            DeployError::Platform(_) => DeployErrorKind::Platform,
            DeployError::Release(_) => DeployErrorKind::Release,
            DeployError::Cancelled(_) => DeployErrorKind::Cancelled,
            DeployError::Config(_) => DeployErrorKind::Config,
            DeployError::LockHeld(_) => DeployErrorKind::LockHeld,
            DeployError::Lock(_) => DeployErrorKind::Lock,
        }
    }

    /// The stage that produced this error.
    pub fn stage(&self) -> Stage {
        match self.kind() {
            DeployErrorKind::Config => Stage::Setup,
            DeployErrorKind::LockHeld | DeployErrorKind::Lock => Stage::Lock,
            DeployErrorKind::Validation | DeployErrorKind::Platform => Stage::Validation,
            DeployErrorKind::Resolution | DeployErrorKind::ManifestResolution => Stage::Resolution,
            DeployErrorKind::Tagging => Stage::Tagging,
            DeployErrorKind::InvalidTag | DeployErrorKind::Push => Stage::Push,
            // cancellation is only observed while polling
            DeployErrorKind::Optimization | DeployErrorKind::Cancelled => Stage::Optimization,
            DeployErrorKind::Release => Stage::Release,
        }
    }

    /// Server-side validation messages, if this is a validation failure.
    pub fn validation_errors(&self) -> Option<&[String]> {
        match self {
            DeployError::Validation(errors) => Some(errors),
            _ => None,
        }
    }

    /// Lock holder details, if this is a contested lock.
    pub fn lock_holder_info(&self) -> Option<&LockHolderInfo> {
        match self {
            DeployError::LockHeld(info) => Some(info),
            _ => None,
        }
    }

    pub(crate) fn lock_held(holder: String, pid: u32, started_at: DateTime<Utc>) -> Self {
        DeployError::LockHeld(LockHolderInfo {
            holder,
            pid,
            started_at,
        })
    }

    pub(crate) fn lock_error(message: impl Into<String>) -> Self {
        DeployError::Lock(message.into())
    }
}
