// ABOUTME: Library root for hoist - exposes the deploy pipeline and its collaborators.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod deploy;
pub mod diagnostics;
pub mod error;
pub mod output;
pub mod platform;
pub mod registry;
pub mod runtime;
pub mod types;
