// ABOUTME: Registry manifest resolution for the daemon-less deploy path.
// ABOUTME: ManifestOps turns a tag reference into a digest-pinned remote image.

mod client;
mod error;

pub use client::RegistryClient;
pub use error::RegistryError;

use crate::runtime::RegistryAuth;
use crate::types::ImageRef;
use async_trait::async_trait;

/// An image located in a remote registry, pinned by digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteImage {
    /// The input reference with its tag replaced by the digest.
    pub reference: ImageRef,
    /// Manifest digest (`sha256:...`).
    pub digest: String,
    /// Manifest media type, when the registry reported one.
    pub media_type: Option<String>,
}

impl RemoteImage {
    /// Fully qualified `registry/repository@digest` string.
    ///
    /// Docker Hub shorthand is expanded, so `nginx` becomes
    /// `registry-1.docker.io/library/nginx@sha256:...`.
    pub fn remote(&self) -> String {
        format!(
            "{}/{}@{}",
            self.reference.registry_host(),
            self.reference.repository(),
            self.digest
        )
    }
}

/// Resolve image references against remote registries.
#[async_trait]
pub trait ManifestOps: Send + Sync {
    /// Locate the manifest for `reference`.
    ///
    /// `auth` overrides whatever credentials the client would otherwise use;
    /// `None` means anonymous access.
    async fn resolve_remote_manifest(
        &self,
        reference: &ImageRef,
        auth: Option<&RegistryAuth>,
    ) -> Result<RemoteImage, RegistryError>;
}
