// ABOUTME: Liveness and version queries against the local container daemon.
// ABOUTME: The deployer pings once at startup; `status` also reports the version.

use super::shared_types::RuntimeMetadata;
use async_trait::async_trait;

#[async_trait]
pub trait RuntimeInfo: Send + Sync {
    /// Daemon name, version and platform.
    async fn info(&self) -> Result<RuntimeMetadata, RuntimeInfoError>;

    /// Succeeds only when the daemon answers. A failure selects the registry path.
    async fn ping(&self) -> Result<(), RuntimeInfoError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeInfoError {
    /// The socket could not be opened or did not answer.
    #[error("daemon unreachable: {0}")]
    ConnectionFailed(String),

    /// The daemon answered with an error.
    #[error("daemon error: {0}")]
    Runtime(String),
}
