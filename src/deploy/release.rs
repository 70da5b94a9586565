// ABOUTME: Release creation and remote config validation.
// ABOUTME: Single request each; no retries.

use tracing::debug;

use super::error::DeployError;
use crate::config::Definition;
use crate::platform::{PlatformOps, Release, ReleaseInput};
use crate::types::AppName;

/// Create a release for `image`.
///
/// The definition is attached only when it has at least one key.
pub async fn publish<P: PlatformOps + ?Sized>(
    platform: &P,
    app: &AppName,
    image: &str,
    definition: &Definition,
) -> Result<Release, DeployError> {
    let input = ReleaseInput {
        app: app.clone(),
        image: image.to_string(),
        definition: (!definition.is_empty()).then(|| definition.clone()),
    };

    let release = platform
        .create_release(&input)
        .await
        .map_err(DeployError::Release)?;
    debug!(app = %app, release = %release.id, version = release.version, "release created");
    Ok(release)
}

/// Ask the platform to validate `definition`, returning its canonical form.
pub async fn validate<P: PlatformOps + ?Sized>(
    platform: &P,
    app: &AppName,
    definition: &Definition,
) -> Result<Definition, DeployError> {
    let result = platform
        .validate_config(app, definition)
        .await
        .map_err(DeployError::Platform)?;

    if !result.valid {
        let errors = if result.errors.is_empty() {
            vec!["rejected by the platform".to_string()]
        } else {
            result.errors
        };
        return Err(DeployError::Validation(errors));
    }

    Ok(result.definition)
}
