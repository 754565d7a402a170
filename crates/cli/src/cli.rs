//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Speedcast - motion-to-speed streaming pipeline
#[derive(Parser, Debug)]
#[command(
    name = "speedcast",
    author,
    version,
    about = "Motion-to-speed streaming pipeline",
    long_about = "Streams a smoothed, momentum-shaped speed scalar derived from \n\
                  accelerometer samples to a consumer over newline-delimited JSON.\n\n\
                  Ingests sensor notifications, maintains an RMS motion score, shapes \n\
                  it into a bounded speed and pushes it to one TCP consumer per tick."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SPEEDCAST_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "SPEEDCAST_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the broadcast pipeline
    Run(RunArgs),

    /// Watch a running broadcaster from the consumer side
    Watch(WatchArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, default_value = "config.toml", env = "SPEEDCAST_CONFIG")]
    pub config: PathBuf,

    /// Override bind host from configuration
    #[arg(long, env = "SPEEDCAST_HOST")]
    pub host: Option<String>,

    /// Override bind port from configuration
    #[arg(long, env = "SPEEDCAST_PORT")]
    pub port: Option<u16>,

    /// Stop after this many seconds (0 = run until Ctrl-C)
    #[arg(long, default_value = "0", env = "SPEEDCAST_DURATION")]
    pub duration: u64,

    /// Validate configuration and exit without running pipeline
    #[arg(long)]
    pub dry_run: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "9000", env = "SPEEDCAST_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `watch` command
#[derive(Parser, Debug, Clone)]
pub struct WatchArgs {
    /// Path to configuration file (falls back to defaults if absent)
    #[arg(short, long, default_value = "config.toml", env = "SPEEDCAST_CONFIG")]
    pub config: PathBuf,

    /// Override broadcaster host from configuration
    #[arg(long, env = "SPEEDCAST_HOST")]
    pub host: Option<String>,

    /// Override broadcaster port from configuration
    #[arg(long, env = "SPEEDCAST_PORT")]
    pub port: Option<u16>,

    /// Poll interval in milliseconds
    #[arg(long, default_value = "50")]
    pub interval_ms: u64,

    /// Stop after this many polls (0 = run until Ctrl-C)
    #[arg(long, default_value = "0")]
    pub count: u64,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
