//! Resolve command.

use std::path::Path;

use anyhow::Result;
use reqwest::Client;
use tracing::info;

use tlgrab_core::{DepthPolicy, build_package_info, resolver, snapshot};

use crate::config::Config;

/// Resolves a scheme or collection and prints the result: sorted package
/// names, or the full record map as JSON.
pub async fn resolve(
    root: &str,
    snapshot_path: Option<&Path>,
    transitive: bool,
    json: bool,
    config: &Config,
) -> Result<()> {
    let catalog = match snapshot_path {
        Some(path) => snapshot::load_catalog(path)?,
        None => {
            let client = Client::new();
            let mirror = super::acquire_mirror(&client, config).await?;
            let staging = tempfile::tempdir()?;
            let tlpdb = snapshot::fetch_tlpdb(&client, &mirror, staging.path()).await?;
            snapshot::load_catalog(&tlpdb)?
        }
    };

    let policy = if transitive {
        DepthPolicy::Transitive
    } else {
        DepthPolicy::OneHop
    };
    info!("resolving scheme {root}");
    let resolution = resolver::resolve_root(root, &catalog, policy)?;
    let info = build_package_info(&resolution.packages, &catalog)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        for name in info.keys() {
            println!("{name}");
        }
    }
    if !resolution.collections.is_empty() {
        info!("touched {} collections", resolution.collections.len());
    }
    Ok(())
}
