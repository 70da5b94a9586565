// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Exports the deployer, state markers, poller, and deploy lock.

mod cancel;
mod context;
mod deployer;
mod deployment;
mod error;
mod lock;
mod optimize;
mod release;
mod source;
mod state;
mod transitions;

pub use cancel::{CancelReason, CancelSignal};
pub use context::DeploymentContext;
pub use deployer::{Deployer, ValidatedConfig};
pub use deployment::Deployment;
pub use error::{DeployError, DeployErrorKind, LockHolderInfo, Stage};
pub use lock::{DeployLock, LockInfo, state_dir};
pub use optimize::{OptimizationError, Optimizer, PollState};
pub use release::{publish, validate};
pub use source::{ImageSource, SourcedImage, push_deployment_tag};
pub use state::{Completed, ImageReady, Initialized, Optimized, Released};
