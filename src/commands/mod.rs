// ABOUTME: Command module aggregator for the hoist CLI.
// ABOUTME: Re-exports deploy, validate, and status command handlers.

mod deploy;
mod setup;
mod status;
mod validate;

pub use deploy::deploy;
pub use status::status;
pub use validate::validate;
