//! Command-line interface definition.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sharpscan", version, about = "Security scanner for C# source files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a config file (defaults to ./.sharpscan.toml when present).
    #[arg(short, long, global = true, env = "SHARPSCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format: text or json.
    #[arg(short, long, global = true, default_value = "text")]
    pub format: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan C# files or directories.
    Scan {
        /// Files or directories to scan.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Write the report to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Drop findings below this severity.
        #[arg(long)]
        min_severity: Option<String>,

        /// Exit with code 1 when a finding at or above this severity exists.
        #[arg(long)]
        fail_on: Option<String>,

        /// Rule ids to disable, in addition to the config file.
        #[arg(long = "disable", value_name = "RULE")]
        disabled_rules: Vec<String>,
    },

    /// List the available rules.
    Rules {
        /// Show a single rule or check id (e.g. `csrf` or `CSRF-001`).
        rule: Option<String>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Write a default config file.
    Init {
        #[arg(default_value = ".sharpscan.toml")]
        output: PathBuf,
    },
}
