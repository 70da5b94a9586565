// ABOUTME: OCI registry client that resolves tags to manifest digests.
// ABOUTME: Built on oci-client, which handles the registry token handshake.

use async_trait::async_trait;
use oci_client::Reference;
use oci_client::client::{Client, ClientConfig, ClientProtocol};
use oci_client::errors::OciDistributionError;
use oci_client::secrets::RegistryAuth as OciAuth;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use super::error::RegistryError;
use super::{ManifestOps, RemoteImage};
use crate::runtime::RegistryAuth;
use crate::types::ImageRef;

const MANIFEST_TYPES: &[&str] = &[
    "application/vnd.oci.image.index.v1+json",
    "application/vnd.oci.image.manifest.v1+json",
    "application/vnd.docker.distribution.manifest.list.v2+json",
    "application/vnd.docker.distribution.manifest.v2+json",
];

/// Client for resolving image references against OCI-compatible registries.
pub struct RegistryClient {
    https: Client,
    /// Loopback registries only
    http: Client,
}

impl RegistryClient {
    pub fn new() -> Self {
        Self {
            https: Client::new(ClientConfig {
                protocol: ClientProtocol::Https,
                ..Default::default()
            }),
            http: Client::new(ClientConfig {
                protocol: ClientProtocol::Http,
                ..Default::default()
            }),
        }
    }

    fn client_for(&self, host: &str) -> &Client {
        if is_loopback(host) {
            &self.http
        } else {
            &self.https
        }
    }
}

impl Default for RegistryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ManifestOps for RegistryClient {
    async fn resolve_remote_manifest(
        &self,
        reference: &ImageRef,
        auth: Option<&RegistryAuth>,
    ) -> Result<RemoteImage, RegistryError> {
        let target = oci_reference(reference);
        let credentials = match auth {
            Some(auth) => OciAuth::Basic(auth.username.clone(), auth.password.clone()),
            None => OciAuth::Anonymous,
        };

        let (body, _) = self
            .client_for(reference.registry_host())
            .pull_manifest_raw(&target, &credentials, MANIFEST_TYPES)
            .await
            .map_err(|e| map_oci_error(e, reference))?;

        let digest = match reference.digest() {
            Some(pinned) => pinned.to_string(),
            None => manifest_digest(body.as_ref()),
        };
        let media_type = serde_json::from_slice::<ManifestHead>(body.as_ref())
            .ok()
            .and_then(|head| head.media_type);

        debug!(image = %reference, digest = %digest, "resolved remote manifest");

        Ok(RemoteImage {
            reference: reference.with_digest(digest.clone()),
            digest,
            media_type,
        })
    }
}

fn oci_reference(reference: &ImageRef) -> Reference {
    let registry = reference.registry_host().to_string();
    let repository = reference.repository();
    match reference.digest() {
        Some(digest) => Reference::with_digest(registry, repository, digest.to_string()),
        None => Reference::with_tag(registry, repository, reference.reference().to_string()),
    }
}

/// Content digest of a manifest as the registry would address it.
pub(crate) fn manifest_digest(body: &[u8]) -> String {
    format!("sha256:{:x}", Sha256::digest(body))
}

fn map_oci_error(err: OciDistributionError, reference: &ImageRef) -> RegistryError {
    match err {
        OciDistributionError::ImageManifestNotFoundError(_) => {
            RegistryError::NotFound(reference.to_string())
        }
        OciDistributionError::ServerError { code: 404, .. } => {
            RegistryError::NotFound(reference.to_string())
        }
        OciDistributionError::ServerError { code, url, .. } => {
            RegistryError::Status { status: code, url }
        }
        OciDistributionError::AuthenticationFailure(_)
        | OciDistributionError::UnauthorizedError { .. } => {
            RegistryError::Unauthorized(reference.to_string())
        }
        OciDistributionError::RequestError(e) => RegistryError::Transport(e.to_string()),
        other => RegistryError::Rejected(other.to_string()),
    }
}

/// Plain HTTP is only used for loopback registries.
fn is_loopback(host: &str) -> bool {
    let hostname = host.rsplit_once(':').map(|(h, _)| h).unwrap_or(host);
    matches!(hostname, "localhost" | "127.0.0.1" | "[::1]")
}

#[derive(Debug, Deserialize)]
struct ManifestHead {
    #[serde(rename = "mediaType")]
    media_type: Option<String>,
}
