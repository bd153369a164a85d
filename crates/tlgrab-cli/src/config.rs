//! Optional `tlgrab.toml` configuration.
//!
//! Everything has a working default; the file only exists to pin a mirror
//! or extend the package-to-scheme table.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Built-in mapping from distribution package to the scheme or collection
/// it bundles. `texlive-core` is `scheme-medium` by convention; everything
/// else maps one-to-one onto a collection.
pub const BUILTIN_SCHEMES: &[(&str, &str)] = &[
    ("texlive-core", "scheme-medium"),
    ("texlive-bibtexextra", "collection-bibtexextra"),
    ("texlive-fontsextra", "collection-fontsextra"),
    ("texlive-formatsextra", "collection-formatsextra"),
    ("texlive-games", "collection-games"),
    ("texlive-humanities", "collection-humanities"),
    ("texlive-langchinese", "collection-langchinese"),
    ("texlive-langcyrillic", "collection-langcyrillic"),
    ("texlive-langgreek", "collection-langgreek"),
    ("texlive-langjapanese", "collection-langjapanese"),
    ("texlive-langkorean", "collection-langkorean"),
    ("texlive-latexextra", "collection-latexextra"),
    ("texlive-music", "collection-music"),
    ("texlive-pictures", "collection-pictures"),
    ("texlive-pstricks", "collection-pstricks"),
    ("texlive-publishers", "collection-publishers"),
    ("texlive-science", "collection-mathscience"),
];

/// Parsed `tlgrab.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Mirror base URL override; skips mirror discovery when set.
    pub mirror: Option<String>,

    /// Extra or overriding package-to-scheme mappings.
    #[serde(default)]
    pub schemes: HashMap<String, String>,
}

impl Config {
    /// Loads the configuration.
    ///
    /// With an explicit path the file must exist and parse; without one,
    /// `tlgrab.toml` in the working directory is used when present and the
    /// defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => {
                let default = Path::new("tlgrab.toml");
                if !default.exists() {
                    return Ok(Self::default());
                }
                default
            }
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// The scheme backing a distribution package; config entries shadow the
    /// built-in table.
    pub fn scheme_for(&self, package: &str) -> Option<&str> {
        self.schemes
            .get(package)
            .map(String::as_str)
            .or_else(|| builtin_scheme(package))
    }
}

/// Looks up the built-in package-to-scheme table.
pub fn builtin_scheme(package: &str) -> Option<&'static str> {
    BUILTIN_SCHEMES
        .iter()
        .find(|(name, _)| *name == package)
        .map(|(_, scheme)| *scheme)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_table_covers_core() {
        assert_eq!(builtin_scheme("texlive-core"), Some("scheme-medium"));
        assert_eq!(builtin_scheme("texlive-nonsense"), None);
    }

    #[test]
    fn config_overrides_shadow_builtins() {
        let config: Config = toml::from_str(
            "mirror = \"https://mirror.example/tlnet/\"\n\
             [schemes]\n\
             texlive-core = \"scheme-full\"\n\
             texlive-extra = \"collection-extra\"\n",
        )
        .unwrap();
        assert_eq!(config.mirror.as_deref(), Some("https://mirror.example/tlnet/"));
        assert_eq!(config.scheme_for("texlive-core"), Some("scheme-full"));
        assert_eq!(config.scheme_for("texlive-extra"), Some("collection-extra"));
        assert_eq!(config.scheme_for("texlive-music"), Some("collection-music"));
    }

    #[test]
    fn config_round_trips_through_toml() {
        let mut schemes = HashMap::new();
        schemes.insert("texlive-extra".to_string(), "collection-extra".to_string());
        let config = Config {
            mirror: Some("https://mirror.example/tlnet/".to_string()),
            schemes,
        };

        let serialized = toml::to_string(&config).unwrap();
        let reparsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(reparsed.mirror, config.mirror);
        assert_eq!(reparsed.schemes, config.schemes);
    }

    #[test]
    fn absent_default_file_yields_defaults() {
        let config = Config::load(None).unwrap();
        assert!(config.mirror.is_none());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        assert!(Config::load(Some(Path::new("/nonexistent/tlgrab.toml"))).is_err());
    }
}
