//! CLI definitions for mirrorgen
//!
//! This module contains all CLI argument parsing structures using clap.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "mirrorgen",
    version,
    about = "Configuration generator for multi-registry container mirror environments",
    long_about = "Generates Docker Compose, Traefik and per-registry proxy configuration\nfrom a single declarative config.yaml. Runs once and exits; no daemon."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate all configuration files from config.yaml
    Generate {
        /// Path to the input document
        #[arg(long, default_value = "config.yaml")]
        config: String,

        /// Directory the generated files are written to
        #[arg(long, default_value = "compose")]
        output_dir: String,

        /// Answer yes to all prompts (e.g., removing the deprecated
        /// docker-compose.yml)
        #[arg(short, long)]
        yes: bool,
    },

    /// Interactively create a config.yaml
    Setup {
        /// Path the config document is written to
        #[arg(long, default_value = "config.yaml")]
        config: String,

        /// Overwrite an existing config without asking
        #[arg(long)]
        force: bool,
    },
}
