//! The `.fmts` format table: one line per `AddFormat` execute directive.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::info;

use tlgrab_db::Record;

static ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?P<key>\S+)=(?P<value>\S+)").expect("static regex"));

const COLUMNS: [&str; 4] = ["name", "engine", "patterns", "options"];

/// Writes the `.fmts` file: `name engine patterns options` per format, `-`
/// substituted for keys the directive does not carry, packages in sorted
/// order.
///
/// # Errors
///
/// Fails when `output` cannot be written.
pub fn write_fmts(packages: &BTreeMap<String, Record>, output: &Path) -> Result<()> {
    info!("creating {} file", output.display());
    let mut out = String::new();
    for record in packages.values() {
        for execute in record.values("execute") {
            if execute.contains("AddFormat") {
                out.push_str(&format_line(execute));
                out.push('\n');
            }
        }
    }
    std::fs::write(output, &out).with_context(|| format!("writing {}", output.display()))?;
    info!("wrote {}", output.display());
    Ok(())
}

/// Renders one `AddFormat` directive. Plain `key=value` tokens are scanned
/// first (values containing a quote are left to the quoted-span pass), then
/// the first quoted span becomes `options`.
fn format_line(directive: &str) -> String {
    let mut fields: HashMap<&str, &str> = HashMap::new();
    for caps in ASSIGNMENT.captures_iter(directive) {
        let (key, value) = (
            caps.name("key").map_or("", |m| m.as_str()),
            caps.name("value").map_or("", |m| m.as_str()),
        );
        if !value.contains('"') {
            fields.insert(key, value);
        }
    }
    if let Some(options) = quoted_span(directive) {
        fields.insert("options", options);
    }
    let mut line = String::new();
    for (i, column) in COLUMNS.iter().enumerate() {
        if i > 0 {
            line.push(' ');
        }
        line.push_str(fields.get(column).copied().unwrap_or("-"));
    }
    line
}

/// The contents of the first quoted span (single or double quotes), ignoring
/// backslash-escaped quote characters.
fn quoted_span(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut open: Option<(usize, u8)> = None;
    for (i, &byte) in bytes.iter().enumerate() {
        if (byte == b'"' || byte == b'\'') && (i == 0 || bytes[i - 1] != b'\\') {
            match open {
                None => open = Some((i, byte)),
                Some((start, quote)) if quote == byte => return Some(&text[start + 1..i]),
                Some(_) => {}
            }
        }
    }
    None
}
