// ABOUTME: Validate command implementation.
// ABOUTME: Sends the app definition to the platform and prints the canonical form.

use super::setup::build_deployer;
use hoist::deploy::CancelSignal;
use hoist::error::Result;
use hoist::output::{Output, OutputMode};
use std::env;
use std::path::Path;

pub async fn validate(config: Option<&Path>, app: Option<&str>, output: Output) -> Result<()> {
    let cwd = env::current_dir()?;
    let mut deployer = build_deployer(&cwd, config, app, CancelSignal::new(), &output).await?;

    let validated = deployer.validate_config().await?;

    if output.mode() == OutputMode::Normal && !validated.definition.is_empty() {
        print!("{}", serde_yaml::to_string(&validated.definition)?);
    }
    output.success(&format!("Configuration for {} is valid", validated.app));
    Ok(())
}
