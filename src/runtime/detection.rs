// ABOUTME: Local container runtime detection.
// ABOUTME: Honours DOCKER_HOST, then checks Podman sockets before Docker.

use std::fmt;
use std::path::Path;

/// Which daemon implementation owns the socket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeType {
    Docker,
    Podman,
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeType::Docker => f.write_str("docker"),
            RuntimeType::Podman => f.write_str("podman"),
        }
    }
}

/// A daemon socket found on this machine.
#[derive(Debug, Clone)]
pub struct DetectedRuntime {
    pub runtime_type: RuntimeType,
    pub socket_path: String,
}

/// Error during runtime detection.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("no container runtime found (checked DOCKER_HOST, Podman and Docker sockets)")]
    NoRuntimeFound,
}

const ROOTFUL_PODMAN: &str = "/run/podman/podman.sock";
const DOCKER_SOCKET: &str = "/var/run/docker.sock";

/// Detect the container runtime on the local system.
///
/// Detection order:
/// 1. `DOCKER_HOST` pointing at a unix socket
/// 2. Rootless Podman socket (`/run/user/$UID/podman/podman.sock`)
/// 3. Rootful Podman socket (`/run/podman/podman.sock`)
/// 4. Docker socket (`/var/run/docker.sock`)
pub fn detect_local() -> Result<DetectedRuntime, DetectionError> {
    if let Some(socket) = docker_host_socket() {
        let runtime_type = if socket.contains("podman") {
            RuntimeType::Podman
        } else {
            RuntimeType::Docker
        };
        return Ok(DetectedRuntime {
            runtime_type,
            socket_path: socket,
        });
    }

    if let Some(uid) = get_uid() {
        let rootless_socket = format!("/run/user/{}/podman/podman.sock", uid);
        if Path::new(&rootless_socket).exists() {
            return Ok(DetectedRuntime {
                runtime_type: RuntimeType::Podman,
                socket_path: rootless_socket,
            });
        }
    }

    if Path::new(ROOTFUL_PODMAN).exists() {
        return Ok(DetectedRuntime {
            runtime_type: RuntimeType::Podman,
            socket_path: ROOTFUL_PODMAN.to_string(),
        });
    }

    if Path::new(DOCKER_SOCKET).exists() {
        return Ok(DetectedRuntime {
            runtime_type: RuntimeType::Docker,
            socket_path: DOCKER_SOCKET.to_string(),
        });
    }

    Err(DetectionError::NoRuntimeFound)
}

fn docker_host_socket() -> Option<String> {
    let host = std::env::var("DOCKER_HOST").ok()?;
    parse_unix_socket(&host)
}

/// Extract the socket path from a `unix://` URL.
fn parse_unix_socket(host: &str) -> Option<String> {
    host.strip_prefix("unix://")
        .filter(|path| !path.is_empty())
        .map(|path| path.to_string())
}

fn get_uid() -> Option<String> {
    std::env::var("UID").ok().or_else(|| {
        // Fall back to reading /proc/self/status
        std::fs::read_to_string("/proc/self/status")
            .ok()
            .and_then(|s| {
                s.lines()
                    .find(|l| l.starts_with("Uid:"))
                    .and_then(|l| l.split_whitespace().nth(1))
                    .map(|s| s.to_string())
            })
    })
}
