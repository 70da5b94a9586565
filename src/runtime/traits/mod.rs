// ABOUTME: Capability traits for the local container daemon.
// ABOUTME: Defines ImageOps, RuntimeInfo, and the combined DaemonOps bound.

mod image;
mod runtime_info;
mod shared_types;

pub use image::{ImageError, ImageOps};
pub use runtime_info::{RuntimeInfo, RuntimeInfoError};
pub use shared_types::*;

/// Everything the deploy pipeline needs from a local daemon.
///
/// Auto-implemented for any type providing both capabilities.
pub trait DaemonOps: ImageOps + RuntimeInfo {}

impl<T: ImageOps + RuntimeInfo> DaemonOps for T {}
