//! Fetching and verifying one database snapshot.
//!
//! A snapshot is `texlive.tlpdb` plus its published `.sha512` digest and the
//! detached `.sha512.asc` signature over that digest file. The tlpdb is only
//! persisted once both checks pass, so callers never see a half-validated
//! snapshot.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::info;

use tlgrab_db::Catalog;

use crate::fetch::download_with_retry;
use crate::mirror::Mirror;
use crate::verify::{gpg_available, import_key, verify_sha512, verify_signature};

/// File name of the database snapshot.
pub const TLPDB_FILE: &str = "texlive.tlpdb";

/// Where the distribution publishes its signing key. Imported into the
/// local keyring before the signature check, so a fresh host can still
/// verify.
pub const TEXLIVE_KEY_URL: &str = "https://tug.org/texlive/files/texlive.asc";

/// Downloads and verifies the snapshot from a mirror, persisting it to
/// `dest_dir` and returning the final path.
///
/// When gpg is present the distribution signing key is fetched from
/// [`TEXLIVE_KEY_URL`] and imported first, so verification does not depend
/// on the host's keyring state.
///
/// # Errors
///
/// Propagates download failures (after the retry loop), a rejected GPG
/// signature, and a tlpdb digest that disagrees with the published
/// `.sha512`. Callers typically react by retrying the whole pipeline against
/// the fallback mirror; no retry happens here.
pub async fn fetch_tlpdb(client: &Client, mirror: &Mirror, dest_dir: &Path) -> Result<PathBuf> {
    let tlpdb_url = mirror.tlpdb_url();
    let staging = tempfile::tempdir().context("creating snapshot staging directory")?;
    let tlpdb = staging.path().join(TLPDB_FILE);
    let checksum_file = staging.path().join("texlive.tlpdb.sha512");
    let signature = staging.path().join("texlive.tlpdb.sha512.asc");

    info!("downloading {TLPDB_FILE}");
    download_with_retry(client, &tlpdb_url, &tlpdb)
        .await
        .with_context(|| format!("{tlpdb_url} can't be downloaded"))?;
    download_with_retry(client, &format!("{tlpdb_url}.sha512"), &checksum_file).await?;
    download_with_retry(client, &format!("{tlpdb_url}.sha512.asc"), &signature).await?;

    // Without gpg the signature check downgrades to a logged skip, so the
    // key bootstrap would be wasted work.
    if gpg_available() {
        let key = staging.path().join("texlive.asc");
        download_with_retry(client, TEXLIVE_KEY_URL, &key)
            .await
            .with_context(|| format!("{TEXLIVE_KEY_URL} can't be downloaded"))?;
        import_key(&key).await?;
    }
    verify_signature(&checksum_file, &signature).await?;
    let expected = expected_digest(&checksum_file)?;
    verify_sha512(&tlpdb, &expected)?;
    info!("downloaded and verified {TLPDB_FILE}");

    let dest = dest_dir.join(TLPDB_FILE);
    tokio::fs::copy(&tlpdb, &dest)
        .await
        .with_context(|| format!("persisting snapshot to {}", dest.display()))?;
    Ok(dest)
}

/// Reads a snapshot from disk and builds the package catalog.
///
/// # Errors
///
/// Fails on unreadable files and on malformed records (see
/// [`tlgrab_db::CatalogError`]); a corrupt snapshot never yields a partial
/// catalog.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading snapshot {}", path.display()))?;
    info!("parsing {}", path.display());
    let catalog = Catalog::parse(&text)?;
    info!("parsed {} packages", catalog.len());
    Ok(catalog)
}

/// The digest is the first whitespace-delimited token of the `.sha512`
/// file (the rest is the file name it covers).
fn expected_digest(checksum_file: &Path) -> Result<String> {
    let contents = std::fs::read_to_string(checksum_file)
        .with_context(|| format!("reading {}", checksum_file.display()))?;
    contents
        .split_whitespace()
        .next()
        .map(ToString::to_string)
        .context("published checksum file is empty")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_the_first_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("texlive.tlpdb.sha512");
        std::fs::write(&path, "abc123  texlive.tlpdb\n").unwrap();
        assert_eq!(expected_digest(&path).unwrap(), "abc123");
    }

    #[test]
    fn empty_checksum_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("texlive.tlpdb.sha512");
        std::fs::write(&path, "\n").unwrap();
        assert!(expected_digest(&path).is_err());
    }

    #[test]
    fn load_catalog_surfaces_malformed_snapshots() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TLPDB_FILE);
        std::fs::write(&path, "category Package\n").unwrap();
        assert!(load_catalog(&path).is_err());
    }
}
