use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "homeserver")]
#[command(about = "Generate and check homeserver configuration")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level used when RUST_LOG is not set
    #[arg(long, global = true, env = "HOMESERVER_LOG", default_value = "warn")]
    pub log_level: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a commented default configuration file
    GenerateConfig(GenerateConfigArgs),
    /// Load a configuration file and print the resolved SSO settings
    CheckConfig(CheckConfigArgs),
    /// Check whether a redirect URL is trusted by the SSO client whitelist
    CheckRedirect(CheckRedirectArgs),
}

#[derive(clap::Args)]
pub struct GenerateConfigArgs {
    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct CheckConfigArgs {
    /// Configuration file
    #[arg(short, long, env = "HOMESERVER_CONFIG", default_value = "homeserver.toml")]
    pub config: PathBuf,
}

#[derive(clap::Args)]
pub struct CheckRedirectArgs {
    /// Configuration file
    #[arg(short, long, env = "HOMESERVER_CONFIG", default_value = "homeserver.toml")]
    pub config: PathBuf,
    /// Client redirect URL to check
    pub url: String,
}
