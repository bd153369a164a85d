//! Streaming downloads with a fixed-interval retry loop.

use std::path::Path;
use std::time::Duration;

use futures::StreamExt;
use reqwest::Client;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Pause between retry attempts.
pub const RETRY_INTERVAL: Duration = Duration::from_secs(10);

/// Attempts made before giving up on a URL.
pub const RETRY_ATTEMPTS: u32 = 10;

/// Errors from a single download attempt.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Request construction, transport, or non-success status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Local filesystem failure while writing the body.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Streams a URL into a local file. One attempt, no retries.
///
/// # Errors
///
/// Fails on transport errors, a non-success status, or an IO failure while
/// writing the body.
pub async fn download(client: &Client, url: &str, dest: &Path) -> Result<(), FetchError> {
    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
        .send()
        .await?
        .error_for_status()?;

    let mut file = File::create(dest).await?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        file.write_all(&chunk?).await?;
    }
    file.flush().await?;
    Ok(())
}

/// [`download`] wrapped in the default retry policy.
///
/// # Errors
///
/// Returns the last attempt's error once all attempts are exhausted.
pub async fn download_with_retry(client: &Client, url: &str, dest: &Path) -> Result<(), FetchError> {
    download_with_policy(client, url, dest, RETRY_ATTEMPTS, RETRY_INTERVAL).await
}

/// Downloads with an explicit attempt count and pause. Transient failures
/// are logged and retried; the last error is returned once attempts are
/// exhausted.
///
/// # Errors
///
/// Returns the last attempt's error once all attempts are exhausted.
pub async fn download_with_policy(
    client: &Client,
    url: &str,
    dest: &Path,
    attempts: u32,
    interval: Duration,
) -> Result<(), FetchError> {
    info!("downloading {url} to {}", dest.display());
    for attempt in 1..attempts {
        debug!("try {attempt}/{attempts}");
        match download(client, url, dest).await {
            Ok(()) => return Ok(()),
            Err(err) => {
                debug!("attempt {attempt} failed: {err}");
                tokio::time::sleep(interval).await;
            }
        }
    }
    debug!("try {attempts}/{attempts}");
    download(client, url, dest).await.map_err(|err| {
        warn!("{url} can't be downloaded after {attempts} attempts");
        err
    })
}

/// [`get`] wrapped in the default retry policy. Mirror discovery goes
/// through this; status codes are returned untouched for the caller to
/// interpret, only transport failures are retried.
///
/// # Errors
///
/// Returns the last attempt's transport error once all attempts are
/// exhausted.
pub async fn get_with_retry(client: &Client, url: &str) -> Result<reqwest::Response, FetchError> {
    get_with_policy(client, url, RETRY_ATTEMPTS, RETRY_INTERVAL).await
}

/// GETs a URL with an explicit attempt count and pause.
///
/// # Errors
///
/// Returns the last attempt's transport error once all attempts are
/// exhausted.
pub async fn get_with_policy(
    client: &Client,
    url: &str,
    attempts: u32,
    interval: Duration,
) -> Result<reqwest::Response, FetchError> {
    debug!("getting {url}");
    for attempt in 1..attempts {
        match get(client, url).await {
            Ok(response) => return Ok(response),
            Err(err) => {
                debug!("attempt {attempt}/{attempts} failed: {err}");
                tokio::time::sleep(interval).await;
            }
        }
    }
    get(client, url).await.map_err(|err| {
        warn!("{url} can't be reached after {attempts} attempts");
        err
    })
}

async fn get(client: &Client, url: &str) -> Result<reqwest::Response, FetchError> {
    let response = client
        .get(url)
        .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
        .send()
        .await?;
    Ok(response)
}
