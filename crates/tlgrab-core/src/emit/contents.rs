//! The CONTENTS manifest listing every bundled package and its upstream
//! revision.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use tlgrab_db::Record;

use crate::mirror::Mirror;

/// Writes the CONTENTS manifest: a header naming the mirror the containers
/// came from, then `name revision` per package in sorted order.
///
/// # Errors
///
/// Fails when a package lacks a `revision` field or `output` cannot be
/// written.
pub fn write_contents(
    mirror: &Mirror,
    packages: &BTreeMap<String, Record>,
    output: &Path,
) -> Result<()> {
    info!("creating {} file", output.display());
    let mut out = format!(
        "# These are the CTAN packages bundled in this package.\n\
         # They were downloaded from {url}archive/\n\
         # The svn revision number (on the TeXLive repository)\n\
         # on which each package is based is given in the 2nd column.\n\n",
        url = mirror.base()
    );
    for (name, record) in packages {
        let revision = record
            .values("revision")
            .next()
            .with_context(|| format!("package `{name}` has no revision"))?;
        writeln!(out, "{name} {revision}")?;
    }
    std::fs::write(output, &out).with_context(|| format!("writing {}", output.display()))?;
    Ok(())
}
