//! The package catalog: every paragraph of a database snapshot, keyed by
//! its `name` field.

use std::collections::HashMap;

use thiserror::Error;

use crate::record::{Record, parse_paragraph};

/// Errors produced while building or querying a [`Catalog`].
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A non-blank paragraph parsed to zero fields. A corrupt snapshot must
    /// not silently produce a partial catalog.
    #[error("malformed record in paragraph {index} (starts `{head}`): no fields parsed")]
    EmptyRecord {
        /// Zero-based paragraph index within the snapshot.
        index: usize,
        /// First line of the offending paragraph.
        head: String,
    },

    /// A paragraph has no usable `name` field to key it by.
    #[error("malformed record in paragraph {index} (starts `{head}`): missing `name` field")]
    MissingName {
        /// Zero-based paragraph index within the snapshot.
        index: usize,
        /// First line of the offending paragraph.
        head: String,
    },

    /// A requested package is absent from the catalog. Retrying the lookup
    /// against the same immutable snapshot cannot succeed, so this is fatal.
    #[error("package `{name}` not found in the database snapshot")]
    UnknownPackage {
        /// The name that failed to resolve.
        name: String,
    },
}

/// The complete package database for one snapshot.
///
/// Built once per snapshot and immutable afterwards. When two paragraphs
/// carry the same `name`, the last one wins outright; fields from the
/// earlier paragraph are never merged in.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    packages: HashMap<String, Record>,
}

impl Catalog {
    /// Parses a full database snapshot: paragraphs separated by blank lines,
    /// a trailing blank line terminating the final paragraph (runs of blank
    /// lines do not produce empty records).
    ///
    /// # Errors
    ///
    /// Fails fast on the first paragraph with zero fields or without a
    /// `name`, identifying the paragraph by index and first line.
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        let mut packages = HashMap::new();
        let paragraphs = text
            .split("\n\n")
            .filter(|paragraph| !paragraph.trim().is_empty());
        for (index, paragraph) in paragraphs.enumerate() {
            let record = parse_paragraph(paragraph);
            if record.is_empty() {
                return Err(CatalogError::EmptyRecord {
                    index,
                    head: head_of(paragraph),
                });
            }
            let Some(name) = record.name().map(ToString::to_string) else {
                return Err(CatalogError::MissingName {
                    index,
                    head: head_of(paragraph),
                });
            };
            packages.insert(name, record);
        }
        Ok(Self { packages })
    }

    /// Looks up a package by exact, case-sensitive name.
    pub fn get(&self, name: &str) -> Option<&Record> {
        self.packages.get(name)
    }

    /// Looks up a package, failing when absent. Resolution roots and
    /// resolved names go through this.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownPackage`] naming the missing package.
    pub fn require(&self, name: &str) -> Result<&Record, CatalogError> {
        self.get(name).ok_or_else(|| CatalogError::UnknownPackage {
            name: name.to_string(),
        })
    }

    /// True when the catalog knows the name.
    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// Number of packages in the snapshot.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// True for a snapshot with no paragraphs.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Iterates over all package names in unspecified order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }
}

fn head_of(paragraph: &str) -> String {
    paragraph
        .lines()
        .find(|line| !line.trim().is_empty())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = "\
name scheme-basic
category Scheme
depend collection-basic

name collection-basic
category Collection
depend tools

name tools
category Package
revision 1234
";

    #[test]
    fn parses_all_paragraphs() {
        let catalog = Catalog::parse(SNAPSHOT).unwrap();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.contains("scheme-basic"));
        assert_eq!(
            catalog.get("tools").unwrap().values("revision").next(),
            Some("1234")
        );
    }

    #[test]
    fn trailing_blank_line_is_a_terminator() {
        let catalog = Catalog::parse("name solo\n\n").unwrap();
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn blank_line_runs_produce_no_records() {
        let catalog = Catalog::parse("name a\n\n\n\nname b\n").unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn duplicate_name_last_wins_without_merging() {
        let text = "name dup\nrevision 1\nshortdesc first\n\nname dup\nrevision 2\n";
        let catalog = Catalog::parse(text).unwrap();
        let record = catalog.get("dup").unwrap();
        assert_eq!(record.values("revision").next(), Some("2"));
        // The earlier paragraph's fields must not leak into the survivor.
        assert_eq!(record.values("shortdesc").next(), None);
    }

    #[test]
    fn missing_name_fails_fast() {
        let err = Catalog::parse("category Package\nrevision 7\n").unwrap_err();
        assert!(matches!(err, CatalogError::MissingName { index: 0, .. }));
        assert!(err.to_string().contains("category Package"));
    }

    #[test]
    fn fieldless_paragraph_fails_fast() {
        // Lines without a space parse to nothing; the paragraph is malformed.
        let err = Catalog::parse("name first\n\njustonetoken\n").unwrap_err();
        assert!(matches!(err, CatalogError::EmptyRecord { index: 1, .. }));
    }

    #[test]
    fn unknown_package_is_fatal() {
        let catalog = Catalog::parse(SNAPSHOT).unwrap();
        let err = catalog.require("scheme-full").unwrap_err();
        assert!(err.to_string().contains("scheme-full"));
    }
}
