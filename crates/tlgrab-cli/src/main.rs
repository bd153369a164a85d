//! tlgrab - prepare TeX Live package archives.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tlgrab_cli::config::Config;
use tlgrab_cli::{Cli, Commands, cmd};

#[tokio::main]
async fn main() -> Result<()> {
    // Log at info unless RUST_LOG says otherwise.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Resolve {
            root,
            snapshot,
            transitive,
            json,
        } => cmd::resolve::resolve(&root, snapshot.as_deref(), transitive, json, &config).await,
        Commands::Fetch {
            package,
            directory,
            jobs,
            transitive,
        } => cmd::fetch::fetch(&package, &directory, jobs, transitive, &config).await,
        Commands::Schemes => {
            cmd::schemes::schemes(&config);
            Ok(())
        }
    }
}
