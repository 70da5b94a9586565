// ABOUTME: Local container daemon access for Docker and Podman.
// ABOUTME: Detects the local socket and exposes image operations via bollard.

mod bollard;
mod detection;
mod error;
pub mod traits;

pub use self::bollard::BollardRuntime;
pub use detection::{DetectedRuntime, DetectionError, RuntimeType, detect_local};
pub use error::{RuntimeError, RuntimeErrorKind};
pub use traits::*;
