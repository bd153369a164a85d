//! Downloading the resolved packages of one bundle.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use futures::{StreamExt, TryStreamExt, stream};
use reqwest::Client;
use tracing::info;

use tlgrab_db::Record;

use crate::fetch::download_with_retry;
use crate::mirror::Mirror;
use crate::verify::verify_sha512;

/// Default bound on concurrent package downloads.
pub const DEFAULT_JOBS: usize = 8;

/// Downloads every package of the resolved map into `dir`, verifying each
/// container against its `containerchecksum`. Downloads fan out with
/// bounded concurrency; the first failure aborts the bundle.
///
/// # Errors
///
/// Fails when any container cannot be downloaded after retries, lacks a
/// `containerchecksum` field, or does not match its published digest.
pub async fn download_packages(
    client: &Client,
    mirror: &Mirror,
    packages: &BTreeMap<String, Record>,
    dir: &Path,
    jobs: usize,
) -> Result<()> {
    info!("starting to download {} packages", packages.len());
    stream::iter(packages.iter())
        .map(|(name, record)| download_one(client, mirror, name, record, dir))
        .buffer_unordered(jobs.max(1))
        .try_collect::<Vec<PathBuf>>()
        .await?;
    Ok(())
}

async fn download_one(
    client: &Client,
    mirror: &Mirror,
    name: &str,
    record: &Record,
    dir: &Path,
) -> Result<PathBuf> {
    info!("downloading {name}");
    let url = mirror.package_url(name);
    let file = dir.join(format!("{name}.tar.xz"));
    download_with_retry(client, &url, &file)
        .await
        .with_context(|| format!("fetching {url}"))?;

    let expected = record
        .values("containerchecksum")
        .next()
        .with_context(|| format!("package `{name}` has no containerchecksum"))?;
    verify_sha512(&file, expected).with_context(|| format!("verifying container of `{name}`"))?;
    Ok(file)
}
