//! The `.maps` font-map file: the map directives of every `execute` field,
//! sorted.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use tlgrab_db::Record;

// Longest-first so `addMap` does not shadow the other two.
const MAP_DIRECTIVES: [&str; 3] = ["addMixedMap", "addKanjiMap", "addMap"];

/// Writes the `.maps` file: for every `addMap`/`addMixedMap`/`addKanjiMap`
/// execute directive, the directive with its `add` prefix stripped. Output
/// lines are sorted lexicographically.
///
/// # Errors
///
/// Fails when `output` cannot be written.
pub fn write_maps(packages: &BTreeMap<String, Record>, output: &Path) -> Result<()> {
    info!("creating {} file", output.display());
    let mut lines: Vec<&str> = Vec::new();
    for record in packages.values() {
        for execute in record.values("execute") {
            if let Some(line) = map_line(execute) {
                lines.push(line);
            }
        }
    }
    lines.sort_unstable();
    let mut out = lines.join("\n");
    out.push('\n');
    std::fs::write(output, &out).with_context(|| format!("writing {}", output.display()))?;
    info!("wrote {}", output.display());
    Ok(())
}

fn map_line(execute: &str) -> Option<&str> {
    for directive in MAP_DIRECTIVES {
        if let Some(pos) = execute.find(directive) {
            return Some(&execute[pos + "add".len()..]);
        }
    }
    None
}
