//! tlgrab-db - parsed representation of the TeX Live package database.
//!
//! The tlpdb is a flat UTF-8 text file: one paragraph per package, paragraphs
//! separated by blank lines, each line a `key value` pair. This crate turns a
//! snapshot of that file into typed records and a keyed catalog, and provides
//! the dependency-name classification the resolver is built on.
//!
//! No I/O happens here; callers hand in already-loaded text and get either a
//! [`Catalog`] or a typed [`CatalogError`] back.

pub mod catalog;
pub mod depend;
pub mod record;

// Re-exports
pub use catalog::{Catalog, CatalogError};
pub use depend::{DepClass, classify};
pub use record::{FieldValue, Record, parse_paragraph};
