mod cli;
mod commands;
mod observability;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use output::print_error;

fn main() {
    if let Err(e) = run() {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    observability::init_tracing_with_level(&cli.log_level);

    match &cli.command {
        Commands::GenerateConfig(args) => {
            commands::config::generate(args.output.as_deref())?;
        }
        Commands::CheckConfig(args) => {
            commands::config::check(&args.config)?;
        }
        Commands::CheckRedirect(args) => {
            if !commands::redirect::check(&args.config, &args.url)? {
                std::process::exit(2);
            }
        }
    }

    Ok(())
}
