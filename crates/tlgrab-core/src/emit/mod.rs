//! Downstream file emitters.
//!
//! Every emitter consumes the name-sorted record map produced by
//! [`crate::resolver::build_package_info`] and tolerates both single- and
//! multi-valued fields. No resolution logic lives here; these are pure
//! formatting layers over already-resolved data.

mod contents;
mod fmts;
mod maps;

pub use contents::write_contents;
pub use fmts::write_fmts;
pub use maps::write_maps;
