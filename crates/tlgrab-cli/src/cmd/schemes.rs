//! Schemes command.

use crate::config::{BUILTIN_SCHEMES, Config};

/// Prints the package-to-scheme table, config overrides included.
pub fn schemes(config: &Config) {
    let mut rows: Vec<(&str, &str)> = BUILTIN_SCHEMES.to_vec();
    for (package, scheme) in &config.schemes {
        match rows.iter_mut().find(|(name, _)| *name == package.as_str()) {
            Some(row) => row.1 = scheme.as_str(),
            None => rows.push((package.as_str(), scheme.as_str())),
        }
    }
    rows.sort_unstable();
    for (package, scheme) in rows {
        println!("{package} -> {scheme}");
    }
}
