// ABOUTME: Deploy command implementation.
// ABOUTME: Holds the app lock while validating config and running the pipeline.

use super::setup::{CliDeployer, build_deployer};
use hoist::deploy::{CancelSignal, DeployError, DeployLock};
use hoist::diagnostics::{Diagnostics, Warning};
use hoist::error::Result;
use hoist::output::Output;
use hoist::platform::Release;
use std::env;
use std::path::Path;
use std::time::Duration;

/// Deploy `image` for the app configured in the working directory.
pub async fn deploy(
    image: &str,
    config: Option<&Path>,
    app: Option<&str>,
    force: bool,
    timeout: Option<Duration>,
    mut output: Output,
) -> Result<()> {
    output.start_timer();
    let cwd = env::current_dir()?;
    let mut diag = Diagnostics::default();

    let cancel = match timeout {
        Some(timeout) => CancelSignal::with_timeout(timeout),
        None => CancelSignal::new(),
    };
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                cancel.cancel();
            }
        })
    };

    let mut deployer = build_deployer(&cwd, config, app, cancel, &output).await?;
    output.progress(&format!("Deploying {} as {}", image, deployer.app_name()));

    output.progress("  → Acquiring deploy lock...");
    let lock = DeployLock::acquire(deployer.app_name(), force)?;

    let result = run_pipeline(&mut deployer, image, &output).await;

    if let Err(e) = lock.release() {
        diag.warn(Warning::lock_release(e.to_string()));
    }
    interrupt.abort();

    let mut warnings = deployer.take_diagnostics();
    warnings.absorb(&mut diag);
    for warning in warnings.warnings() {
        output.warning(&warning.to_string());
    }

    let release = result?;
    output.success(&format!(
        "Released {} v{} ({})",
        deployer.app_name(),
        release.version,
        release.id
    ));
    Ok(())
}

async fn run_pipeline(
    deployer: &mut CliDeployer,
    image: &str,
    output: &Output,
) -> std::result::Result<Release, DeployError> {
    output.progress("  → Validating configuration...");
    deployer.validate_config().await?;

    if deployer.daemon_available() {
        output.progress("  → Tagging and pushing through the local daemon...");
    } else {
        output.progress("  → No local daemon, resolving image in its registry...");
    }
    output.progress("  → Waiting for image optimization...");

    deployer.deploy(image).await
}
