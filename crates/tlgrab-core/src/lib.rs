//! tlgrab-core - scheme resolution and bundle preparation for TeX Live.
//!
//! The pipeline: a database snapshot is fetched and verified
//! ([`snapshot`]), parsed into a catalog (`tlgrab-db`), walked by the
//! [`resolver`], and the resolved package map drives the downloaders
//! ([`bundle`]) and the file emitters ([`emit`]).

pub mod archive;
pub mod bundle;
pub mod emit;
pub mod fetch;
pub mod mirror;
pub mod resolver;
pub mod snapshot;
pub mod verify;

pub use resolver::{DepthPolicy, Resolution, build_package_info, resolve, resolve_root};

/// User Agent string for core operations
pub const USER_AGENT: &str = concat!("tlgrab/", env!("CARGO_PKG_VERSION"));
