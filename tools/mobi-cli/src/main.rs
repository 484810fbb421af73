//! MobiStore CLI.
//!
//! Commands:
//! - `mobi report` - Write a Markdown status report for the repository
//! - `mobi permissions` - Print the role matrix or check one permission
//! - `mobi changelog` - Show the bundled release history
//! - `mobi config` - Manage `mobistore.toml`

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::{ChangelogArgs, ConfigArgs, PermissionsArgs, ReportArgs};

/// MobiStore CLI - Status reports, permissions and configuration
#[derive(Parser)]
#[command(name = "mobi")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a status report for the repository
    Report(ReportArgs),

    /// Show role permissions
    Permissions(PermissionsArgs),

    /// Show the release history
    Changelog(ChangelogArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = output::Output::new(cli.verbose, cli.json);
    let ctx = context::Context::load(cli.config.as_deref(), output)?;

    let result = match cli.command {
        Commands::Report(args) => commands::report::run(args, &ctx).await,
        Commands::Permissions(args) => commands::permissions::run(args, &ctx).await,
        Commands::Changelog(args) => commands::changelog::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
