// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "hoist")]
#[command(about = "Deploy container images to the hoist platform")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print the final result
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Print JSON lines instead of text
    #[arg(long, global = true)]
    pub json: bool,

    /// Config file, or a directory containing hoist.yml
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new hoist.yml configuration file
    Init {
        /// App name (defaults to the directory name)
        #[arg(long)]
        app: Option<String>,

        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Deploy an image as a new release
    Deploy {
        /// Image reference to deploy (e.g. nginx:1.27)
        image: String,

        /// App name (overrides `app` in the config file)
        #[arg(short, long)]
        app: Option<String>,

        /// Break an existing deploy lock
        #[arg(short, long)]
        force: bool,

        /// Give up after this long (e.g. 10m)
        #[arg(long, value_parser = humantime::parse_duration)]
        timeout: Option<Duration>,
    },

    /// Validate the app configuration with the platform
    Validate {
        /// App name (overrides `app` in the config file)
        #[arg(short, long)]
        app: Option<String>,
    },

    /// Show local deployment status
    Status,
}
