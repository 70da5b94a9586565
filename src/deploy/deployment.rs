// ABOUTME: Generic deployment struct parameterized by state marker.
// ABOUTME: State types carry their own data for compile-time guarantees.

use crate::platform::Release;
use crate::types::{AppName, DeploymentTag};

use super::state::{Completed, ImageReady, Initialized, Optimized, Released};

/// A deployment in progress, parameterized by its current state.
///
/// Only `Deployment<ImageReady>` can be optimized and only
/// `Deployment<Optimized>` can be released, so a release can never reference
/// an image that was not pushed or resolved first.
#[derive(Debug)]
pub struct Deployment<S> {
    pub(crate) app: AppName,
    pub(crate) state: S,
}

impl Deployment<Initialized> {
    pub fn new(app: AppName) -> Self {
        Deployment {
            app,
            state: Initialized,
        }
    }
}

impl<S> Deployment<S> {
    pub fn app(&self) -> &AppName {
        &self.app
    }
}

impl Deployment<ImageReady> {
    /// Image identifier handed to the platform.
    pub fn image(&self) -> &str {
        &self.state.image
    }

    /// Deployment tag pushed on the daemon path.
    pub fn deployment_tag(&self) -> Option<&DeploymentTag> {
        self.state.tag.as_ref()
    }
}

impl Deployment<Optimized> {
    pub fn image(&self) -> &str {
        &self.state.image
    }
}

impl Deployment<Released> {
    pub fn release(&self) -> &Release {
        &self.state.release
    }
}

impl Deployment<Completed> {
    pub fn release(&self) -> &Release {
        &self.state.release
    }

    /// Number of local deployment tags removed during cleanup.
    pub fn tags_removed(&self) -> usize {
        self.state.tags_removed
    }

    pub fn into_release(self) -> Release {
        self.state.release
    }
}
