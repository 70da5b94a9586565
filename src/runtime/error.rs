// ABOUTME: Errors raised while locating and connecting to the local daemon.
// ABOUTME: Either kind means the deploy falls back to resolving images in their registry.

use snafu::Snafu;

use super::detection::DetectionError;
use super::traits::RuntimeInfoError;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RuntimeError {
    #[snafu(display("no local daemon: {source}"))]
    Detection { source: DetectionError },

    #[snafu(display("cannot open daemon socket: {source}"))]
    Connection { source: RuntimeInfoError },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeErrorKind {
    /// No daemon socket exists on this machine.
    Absent,
    /// A socket exists but the client could not be set up.
    Unusable,
}

impl RuntimeError {
    pub fn kind(&self) -> RuntimeErrorKind {
        match self {
            RuntimeError::Detection { .. } => RuntimeErrorKind::Absent,
            RuntimeError::Connection { .. } => RuntimeErrorKind::Unusable,
        }
    }
}

impl From<DetectionError> for RuntimeError {
    fn from(source: DetectionError) -> Self {
        RuntimeError::Detection { source }
    }
}

impl From<RuntimeInfoError> for RuntimeError {
    fn from(source: RuntimeInfoError) -> Self {
        RuntimeError::Connection { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_socket_is_absent() {
        let err = RuntimeError::from(DetectionError::NoRuntimeFound);
        assert_eq!(err.kind(), RuntimeErrorKind::Absent);
        assert!(err.to_string().starts_with("no local daemon"));
    }

    #[test]
    fn client_setup_failure_is_unusable() {
        let err = RuntimeError::from(RuntimeInfoError::ConnectionFailed("bad path".into()));
        assert_eq!(err.kind(), RuntimeErrorKind::Unusable);
    }
}
