//! Subcommand implementations.

pub mod fetch;
pub mod resolve;
pub mod schemes;

use anyhow::Result;
use reqwest::Client;
use tracing::warn;

use tlgrab_core::mirror::{self, Mirror};

use crate::config::Config;

/// Locks a mirror for the run: the config override first, then the CTAN
/// redirector, then the dated `texlive.info` archive.
pub(crate) async fn acquire_mirror(client: &Client, config: &Config) -> Result<Mirror> {
    if let Some(base) = &config.mirror {
        return Ok(Mirror::new(base.clone()));
    }
    match mirror::find_mirror(client).await {
        Ok(mirror) => Ok(mirror),
        Err(err) => {
            warn!("mirror discovery failed ({err:#}); falling back to texlive.info");
            mirror::find_fallback_mirror(client).await
        }
    }
}
