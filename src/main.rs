// ABOUTME: Entry point for the hoist CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use hoist::config;
use hoist::error::{Error, Result};
use hoist::output::{Output, OutputMode};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();

    let output = Output::new(OutputMode::from_flags(cli.quiet, cli.json));

    if let Err(e) = run(cli, output.clone()).await {
        let message = match &e {
            Error::Deploy(err) => format!("{} (stage: {})", err, err.stage()),
            _ => e.to_string(),
        };
        output.error(&message);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, output: Output) -> Result<()> {
    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Init { app, force } => {
            let cwd = env::current_dir()?;
            let path = config::init_config(&cwd, app.as_deref(), force)?;
            output.success(&format!("Created {}", path.display()));
            Ok(())
        }
        Commands::Deploy {
            image,
            app,
            force,
            timeout,
        } => commands::deploy(&image, config_path, app.as_deref(), force, timeout, output).await,
        Commands::Validate { app } => commands::validate(config_path, app.as_deref(), output).await,
        Commands::Status => commands::status(config_path).await,
    }
}
