//! Dependency resolution: walks `depend` edges from resolution roots
//! against a catalog to produce the resolved package map.

use std::collections::{BTreeMap, HashSet};

use anyhow::{Context, Result};
use tlgrab_db::{Catalog, DepClass, Record, classify};

/// How far to walk `depend` edges from a resolution root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DepthPolicy {
    /// Expand only the root's immediate `depend` list. Callers request each
    /// scheme or collection individually, so nested meta packages are
    /// recorded but not drilled into.
    #[default]
    OneHop,
    /// Follow `depend` edges through every regular package and into each
    /// meta package once, producing the full closure.
    Transitive,
}

/// The outcome of resolving one or more roots against a catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Package names to fetch, in discovery order, deduplicated within each
    /// root's walk. Under [`DepthPolicy::Transitive`] this includes the meta
    /// packages themselves (their containers are real, tiny archives).
    pub packages: Vec<String>,
    /// Meta packages touched during the walk, in discovery order,
    /// deduplicated. Used to suppress re-expansion.
    pub collections: Vec<String>,
}

/// Resolves several roots independently and concatenates their results.
///
/// Each root gets freshly allocated accumulator state; nothing is shared
/// across roots or across calls, so the combined `packages` list may repeat
/// a name that two roots both pull in. Deduplicate via
/// [`build_package_info`] when a union is wanted.
///
/// # Errors
///
/// Returns an error if any non-arch-pinned root is absent from the catalog.
pub fn resolve(roots: &[&str], catalog: &Catalog, policy: DepthPolicy) -> Result<Resolution> {
    let mut combined = Resolution::default();
    for root in roots {
        let resolution = resolve_root(root, catalog, policy)?;
        combined.packages.extend(resolution.packages);
        combined.collections.extend(resolution.collections);
    }
    Ok(combined)
}

/// Resolves a single root name.
///
/// An architecture-pinned root resolves to nothing without a catalog lookup.
/// Any other root must exist in the catalog; a missing root means the
/// snapshot is corrupt or mismatched and is a hard error, not a skip. A root
/// without a `depend` field is a leaf and resolves to nothing.
///
/// # Errors
///
/// Returns an error if the root (or, under [`DepthPolicy::Transitive`], any
/// package walked into) is absent from the catalog.
pub fn resolve_root(root: &str, catalog: &Catalog, policy: DepthPolicy) -> Result<Resolution> {
    if classify(root) == DepClass::ArchPinned {
        return Ok(Resolution::default());
    }
    let mut walk = Walk::default();
    walk.visit(root, catalog, policy)
        .with_context(|| format!("resolving `{root}`"))?;
    Ok(walk.finish())
}

/// Builds the sorted name-to-record map handed to downstream emitters.
///
/// Iteration order of the returned map is ascending byte-order on the name;
/// emitters rely on this for reproducible outputs. Duplicate input names
/// collapse onto one key.
///
/// # Errors
///
/// Returns an error if a resolved name is absent from the catalog, which
/// indicates the resolver and catalog have gone out of sync.
pub fn build_package_info(
    names: &[String],
    catalog: &Catalog,
) -> Result<BTreeMap<String, Record>> {
    let mut info = BTreeMap::new();
    for name in names {
        let record = catalog
            .require(name)
            .context("resolved name missing from catalog; resolver/catalog desync")?;
        info.insert(name.clone(), record.clone());
    }
    Ok(info)
}

/// Accumulator state for one root's walk. Allocated per call; never shared.
#[derive(Default)]
struct Walk {
    packages: Vec<String>,
    collections: Vec<String>,
    seen_packages: HashSet<String>,
    seen_collections: HashSet<String>,
}

impl Walk {
    fn visit(&mut self, name: &str, catalog: &Catalog, policy: DepthPolicy) -> Result<()> {
        let record = catalog.require(name)?;
        for dep in record.values("depend") {
            match classify(dep) {
                DepClass::ArchPinned => {}
                DepClass::Meta => {
                    if self.seen_collections.insert(dep.to_string()) {
                        self.collections.push(dep.to_string());
                        if policy == DepthPolicy::Transitive {
                            self.push_package(dep);
                            self.visit(dep, catalog, policy)?;
                        }
                    }
                }
                DepClass::Regular => {
                    if self.seen_packages.insert(dep.to_string()) {
                        self.packages.push(dep.to_string());
                        if policy == DepthPolicy::Transitive {
                            self.visit(dep, catalog, policy)?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn push_package(&mut self, name: &str) {
        if self.seen_packages.insert(name.to_string()) {
            self.packages.push(name.to_string());
        }
    }

    fn finish(self) -> Resolution {
        Resolution {
            packages: self.packages,
            collections: self.collections,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(paragraphs: &[&str]) -> Catalog {
        Catalog::parse(&paragraphs.join("\n\n")).unwrap()
    }

    #[test]
    fn one_hop_stops_at_the_first_level() {
        let catalog = catalog(&[
            "name A\ndepend B",
            "name B\ndepend collection-x\ndepend C",
            "name C\ncategory Package",
            "name collection-x\ndepend C",
        ]);

        let resolution = resolve_root("A", &catalog, DepthPolicy::OneHop).unwrap();
        assert_eq!(resolution.packages, vec!["B"]);
        assert!(resolution.collections.is_empty());
    }

    #[test]
    fn transitive_reaches_the_full_closure() {
        let catalog = catalog(&[
            "name A\ndepend B",
            "name B\ndepend collection-x\ndepend C",
            "name C\ncategory Package",
            "name collection-x\ndepend D",
            "name D\ncategory Package",
        ]);

        let resolution = resolve_root("A", &catalog, DepthPolicy::Transitive).unwrap();
        assert_eq!(resolution.packages, vec!["B", "collection-x", "D", "C"]);
        assert_eq!(resolution.collections, vec!["collection-x"]);
    }

    #[test]
    fn arch_pinned_root_resolves_empty_without_lookup() {
        // Deliberately not in the catalog: no lookup may happen.
        let catalog = catalog(&["name unrelated\ncategory Package"]);
        let resolution = resolve_root("tlperl.ARCH", &catalog, DepthPolicy::OneHop).unwrap();
        assert_eq!(resolution, Resolution::default());
    }

    #[test]
    fn arch_pinned_dependencies_are_silently_skipped() {
        let catalog = catalog(&["name scheme-tiny\ndepend latex\ndepend tlperl.ARCH"]);
        let resolution = resolve_root("scheme-tiny", &catalog, DepthPolicy::OneHop).unwrap();
        assert_eq!(resolution.packages, vec!["latex"]);
    }

    #[test]
    fn leaf_root_resolves_empty() {
        let catalog = catalog(&["name leaf\ncategory Package"]);
        let resolution = resolve_root("leaf", &catalog, DepthPolicy::OneHop).unwrap();
        assert!(resolution.packages.is_empty());
    }

    #[test]
    fn unknown_root_is_a_hard_error() {
        let catalog = catalog(&["name here\ncategory Package"]);
        let err = resolve_root("gone", &catalog, DepthPolicy::OneHop).unwrap_err();
        assert!(format!("{err:#}").contains("gone"));
    }

    #[test]
    fn duplicate_dependencies_are_recorded_once() {
        let catalog = catalog(&[
            "name scheme-dup\ndepend latex\ndepend latex\ndepend collection-a\ndepend collection-a",
        ]);
        let resolution = resolve_root("scheme-dup", &catalog, DepthPolicy::OneHop).unwrap();
        assert_eq!(resolution.packages, vec!["latex"]);
        assert_eq!(resolution.collections, vec!["collection-a"]);
    }

    #[test]
    fn depend_order_is_preserved() {
        let catalog = catalog(&["name scheme-ord\ndepend zzz\ndepend aaa\ndepend mmm"]);
        let resolution = resolve_root("scheme-ord", &catalog, DepthPolicy::OneHop).unwrap();
        assert_eq!(resolution.packages, vec!["zzz", "aaa", "mmm"]);
    }

    #[test]
    fn repeated_calls_share_no_state() {
        let catalog = catalog(&["name scheme-a\ndepend one", "name one\ncategory Package"]);
        let first = resolve_root("scheme-a", &catalog, DepthPolicy::OneHop).unwrap();
        let second = resolve_root("scheme-a", &catalog, DepthPolicy::OneHop).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn multiple_roots_concatenate() {
        let catalog = catalog(&[
            "name collection-a\ndepend shared\ndepend only-a",
            "name collection-b\ndepend shared",
            "name shared\ncategory Package",
            "name only-a\ncategory Package",
        ]);
        let resolution = resolve(
            &["collection-a", "collection-b"],
            &catalog,
            DepthPolicy::OneHop,
        )
        .unwrap();
        // Dedup is per root; `shared` appears once per root that pulled it.
        assert_eq!(resolution.packages, vec!["shared", "only-a", "shared"]);
    }

    #[test]
    fn transitive_cycles_terminate() {
        let catalog = catalog(&["name a\ndepend b", "name b\ndepend a"]);
        let resolution = resolve_root("a", &catalog, DepthPolicy::Transitive).unwrap();
        assert_eq!(resolution.packages, vec!["b", "a"]);
    }

    #[test]
    fn package_info_is_sorted_and_deduplicated() {
        let catalog = catalog(&[
            "name zeta\nrevision 1",
            "name alpha\nrevision 2",
            "name mid\nrevision 3",
        ]);
        let names = vec![
            "zeta".to_string(),
            "alpha".to_string(),
            "mid".to_string(),
            "zeta".to_string(),
        ];
        let info = build_package_info(&names, &catalog).unwrap();
        let keys: Vec<&str> = info.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn package_info_rejects_dangling_names() {
        let catalog = catalog(&["name real\nrevision 1"]);
        let err = build_package_info(&["phantom".to_string()], &catalog).unwrap_err();
        assert!(format!("{err:#}").contains("phantom"));
    }

    #[test]
    fn resolved_names_are_a_subset_of_catalog_keys() {
        let catalog = catalog(&[
            "name scheme-s\ndepend a\ndepend b\ndepend c.ARCH",
            "name a\ncategory Package",
            "name b\ncategory Package",
        ]);
        let resolution = resolve_root("scheme-s", &catalog, DepthPolicy::OneHop).unwrap();
        assert!(resolution.packages.iter().all(|name| catalog.contains(name)));
    }
}
