//! Classification of dependency names.
//!
//! Every name appearing in a `depend` field falls into exactly one of three
//! classes, checked in priority order: architecture-pinned, meta
//! (collection/scheme), regular.

/// Marker for architecture-specific package variants, e.g.
/// `ctan-o-mat.ARCH`. These are expanded per-platform by the upstream
/// installer and are always excluded from generic resolution.
pub const ARCH_MARKER: &str = ".ARCH";

const META_MARKERS: [&str; 2] = ["collection-", "scheme-"];

/// The class of a dependency name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepClass {
    /// Contains [`ARCH_MARKER`]: never looked up, never fetched.
    ArchPinned,
    /// A collection or scheme meta package: recorded separately, not fetched
    /// as a regular dependency.
    Meta,
    /// A regular package with downloadable content.
    Regular,
}

/// Classifies a dependency name.
///
/// The `.ARCH` marker takes priority over the meta markers. Meta detection
/// is substring containment of `collection-` or `scheme-`, not a prefix
/// check; the real dataset contains no regular package that this
/// misclassifies, and the permissive match is kept deliberately.
pub fn classify(name: &str) -> DepClass {
    if name.contains(ARCH_MARKER) {
        DepClass::ArchPinned
    } else if META_MARKERS.iter().any(|marker| name.contains(marker)) {
        DepClass::Meta
    } else {
        DepClass::Regular
    }
}
