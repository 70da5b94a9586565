// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: App names, image references, deployment tags, and opaque IDs.

mod app_name;
mod deployment_tag;
mod id;
mod image_ref;

pub use app_name::{AppName, AppNameError};
pub use deployment_tag::{DeploymentTag, DeploymentTagError};
pub use id::{ImageId, ReleaseId};
pub use image_ref::{DOCKER_HUB_HOST, ImageRef, ParseImageRefError};
