//! tlgrab - prepare TeX Live package archives from a scheme name.
#![allow(clippy::missing_errors_doc)]
//!
//! The CLI is a thin surface over `tlgrab-core`: it locks a mirror, fetches
//! and verifies a database snapshot, resolves the requested scheme or
//! collection, downloads the resolved containers, and emits the support
//! files (`CONTENTS`, `.fmts`, `.maps`) next to the bundle archive.

pub mod cmd;
pub mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Command-line surface.
#[derive(Debug, Parser)]
#[command(
    name = "tlgrab",
    version,
    about = "Resolve TeX Live schemes and prepare package archives"
)]
pub struct Cli {
    /// Path to a tlgrab.toml configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Resolve a scheme or collection against a database snapshot.
    Resolve {
        /// Scheme or collection name, e.g. `scheme-medium`.
        root: String,

        /// Local snapshot file to parse instead of downloading one.
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Walk the full transitive closure instead of one depend-hop.
        #[arg(long)]
        transitive: bool,

        /// Print the full record map as JSON instead of bare names.
        #[arg(long)]
        json: bool,
    },

    /// Download a distribution package's containers and emit its support
    /// files.
    Fetch {
        /// Distribution package name, e.g. `texlive-core`.
        package: String,

        /// Directory to place the archive and generated files in.
        directory: PathBuf,

        /// Parallel downloads.
        #[arg(long, default_value_t = tlgrab_core::bundle::DEFAULT_JOBS)]
        jobs: usize,

        /// Walk the full transitive closure instead of one depend-hop.
        #[arg(long)]
        transitive: bool,
    },

    /// List the built-in package-to-scheme mappings.
    Schemes,
}
