//! CLI command implementations.

pub mod changelog;
pub mod config;
pub mod permissions;
pub mod report;

use clap::{Args, Subcommand};

/// Arguments for the report command.
#[derive(Args)]
pub struct ReportArgs {
    /// Markdown file to write.
    #[arg(short, long, default_value = "STATUS.md")]
    pub output: String,

    /// Number of recent commits to include.
    #[arg(long, default_value = "10")]
    pub commits: usize,

    /// Skip the `cargo build` check.
    #[arg(long)]
    pub skip_build: bool,
}

/// Arguments for the permissions command.
#[derive(Args)]
pub struct PermissionsArgs {
    /// Role to inspect (e.g. `manager`).
    #[arg(short, long)]
    pub role: Option<String>,

    /// Permission to check (e.g. `orders.update`).
    #[arg(long)]
    pub check: Option<String>,
}

/// Arguments for the changelog command.
#[derive(Args)]
pub struct ChangelogArgs {
    /// Show every release instead of the latest.
    #[arg(short, long)]
    pub all: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration.
    Show,
    /// Write a starter `mobistore.toml`.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
