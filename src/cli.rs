//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

/// kshort - URL shortener front end
#[derive(Parser)]
#[command(name = "kshort")]
#[command(version)]
#[command(about = "URL shortener front end backed by a remote link API", long_about = None)]
pub struct Cli {
    /// Path to the TOML config file (missing file means defaults + env)
    #[arg(long, short = 'c', global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Resolve a short code once and print its destination
    Resolve {
        short_code: String,
    },

    /// Config file management
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Write a sample config with every default filled in
    Generate {
        /// Output path
        #[arg(default_value = DEFAULT_CONFIG_PATH)]
        output_path: String,
    },
}
