//! Mirror discovery.
//!
//! `mirror.ctan.org` redirects to a nearby CTAN mirror; we lock to wherever
//! the redirect lands for the whole run. Hopping between mirrors mid-run
//! risks downloading packages from snapshots taken at different times. The
//! final fallback is the dated `texlive.info` archive, which keeps one
//! frozen tree per day.

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate, Utc};
use reqwest::{Client, StatusCode};
use tracing::info;

use crate::fetch::get_with_retry;

const CTAN_REDIRECTOR: &str = "https://mirror.ctan.org";
const TEXLIVE_INFO_ARCHIVE: &str = "https://texlive.info/tlnet-archive";

/// A mirror base URL locked for the duration of one run. The base always
/// ends with a slash and points at the mirror's `tlnet` tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mirror {
    base: String,
}

impl Mirror {
    /// Wraps a base URL, normalizing the trailing slash.
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        Self { base }
    }

    /// The normalized base URL.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// URL of the database snapshot under this mirror.
    pub fn tlpdb_url(&self) -> String {
        format!("{}tlpkg/texlive.tlpdb", self.base)
    }

    /// URL of a package's container archive under this mirror.
    pub fn package_url(&self, name: &str) -> String {
        format!("{}archive/{name}.tar.xz", self.base)
    }
}

/// Locks to the CTAN mirror the redirector sends us to. Transient failures
/// reaching the redirector are retried with the default policy.
///
/// # Errors
///
/// Returns an error when the redirector stays unreachable or answers with an
/// error status; callers fall back to [`find_fallback_mirror`].
pub async fn find_mirror(client: &Client) -> Result<Mirror> {
    find_mirror_at(client, CTAN_REDIRECTOR).await
}

async fn find_mirror_at(client: &Client, redirector: &str) -> Result<Mirror> {
    let response = get_with_retry(client, redirector)
        .await
        .context("reaching the CTAN mirror redirector")?
        .error_for_status()
        .context("CTAN mirror redirector answered with an error")?;
    let mirror = Mirror::new(format!("{}systems/texlive/tlnet/", response.url()));
    info!("locked mirror {}", mirror.base());
    Ok(mirror)
}

/// The dated `texlive.info` archive for today (UTC), or yesterday when
/// today's tree has not been published yet. The discovery GET is retried
/// with the default policy.
///
/// # Errors
///
/// Returns an error when `texlive.info` stays unreachable or answers with a
/// non-404 error status.
pub async fn find_fallback_mirror(client: &Client) -> Result<Mirror> {
    let today = Utc::now().date_naive();
    let url = dated_archive_url(today);
    let response = get_with_retry(client, &url)
        .await
        .context("reaching texlive.info")?;
    if response.status() == StatusCode::NOT_FOUND {
        let yesterday = today
            .checked_sub_days(Days::new(1))
            .context("computing yesterday's date")?;
        return Ok(Mirror::new(dated_archive_url(yesterday)));
    }
    response.error_for_status().context("reaching texlive.info")?;
    Ok(Mirror::new(url))
}

fn dated_archive_url(date: NaiveDate) -> String {
    format!("{TEXLIVE_INFO_ARCHIVE}/{}/tlnet/", date.format("%Y/%m/%d"))
}
