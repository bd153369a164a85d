//! Fetch command: the full archive-preparation pipeline.

use std::path::Path;

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{info, warn};

use tlgrab_core::{
    DepthPolicy, archive, build_package_info, bundle, emit, resolver, snapshot,
};

use crate::config::Config;

/// Prepares a distribution package: resolve its scheme, download and verify
/// every container, and write the bundle archive plus `.fmts` and `.maps`
/// into `directory`.
pub async fn fetch(
    package: &str,
    directory: &Path,
    jobs: usize,
    transitive: bool,
    config: &Config,
) -> Result<()> {
    let scheme = config
        .scheme_for(package)
        .with_context(|| format!("no scheme mapping for `{package}`"))?;
    info!("package: {package} (scheme {scheme})");

    let client = Client::new();
    let mirror = super::acquire_mirror(&client, config).await?;
    info!("using mirror: {}", mirror.base());

    let snapshot_dir = tempfile::tempdir().context("creating snapshot directory")?;
    // A failed snapshot gets one shot against the dated archive; the core
    // itself never retries the pipeline.
    let (mirror, tlpdb) =
        match snapshot::fetch_tlpdb(&client, &mirror, snapshot_dir.path()).await {
            Ok(path) => (mirror, path),
            Err(err) => {
                warn!("snapshot fetch failed ({err:#}); retrying via texlive.info");
                let fallback = tlgrab_core::mirror::find_fallback_mirror(&client).await?;
                let path = snapshot::fetch_tlpdb(&client, &fallback, snapshot_dir.path()).await?;
                (fallback, path)
            }
        };
    let catalog = snapshot::load_catalog(&tlpdb)?;

    let policy = if transitive {
        DepthPolicy::Transitive
    } else {
        DepthPolicy::OneHop
    };
    let resolution = resolver::resolve_root(scheme, &catalog, policy)?;
    let info = build_package_info(&resolution.packages, &catalog)?;
    info!("number of needed packages: {}", info.len());

    std::fs::create_dir_all(directory)
        .with_context(|| format!("creating {}", directory.display()))?;
    let staging = tempfile::tempdir().context("creating bundle staging directory")?;
    emit::write_contents(&mirror, &info, &staging.path().join("CONTENTS"))?;
    bundle::download_packages(&client, &mirror, &info, staging.path(), jobs).await?;

    let archive_path = directory.join(archive::archive_name(package));
    archive::create_archive(staging.path(), &archive_path)?;
    info!("wrote {}", archive_path.display());

    emit::write_fmts(&info, &directory.join(format!("{package}.fmts")))?;
    emit::write_maps(&info, &directory.join(format!("{package}.maps")))?;
    Ok(())
}
