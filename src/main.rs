use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod config;
mod derive;
mod error;
mod fragment;
mod interpolate;
mod output;
mod ui;

use cli::{Cli, Commands};
use commands::{generate, setup};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging with LOGGING env var support
    // LOGGING=debug,info,warn,error or just LOGGING=debug
    let log_level = std::env::var("LOGGING")
        .or_else(|_| std::env::var("LOG_LEVEL"))
        .unwrap_or_else(|_| {
            if cli.verbose {
                "debug".to_string()
            } else {
                "info".to_string()
            }
        });

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(false)
        .init();

    let result = match cli.command {
        Commands::Generate {
            config,
            output_dir,
            yes,
        } => generate::execute(&config, &output_dir, yes),
        Commands::Setup { config, force } => setup::execute(&config, force),
    };

    if let Err(err) = result {
        ui::print_error(&format!("Error: {:#}", err));
        std::process::exit(1);
    }
    Ok(())
}
