//! Shared test utilities for the image-props test suite.
//!
//! Fixture writers for element directories and small extractors for
//! option groups and scan manifests.
//!
//! ```text
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_element(tmp.path(), "home/hero.json", json!({"src": {"literal": "hero.jpg"}}));
//! let manifest = scan(tmp.path()).unwrap();
//! assert_eq!(find_entry(&manifest, "home/hero.json").props.src, "hero.jpg");
//! ```

use std::path::Path;

use crate::props::{Destination, OptionGroup, PROP_ROUTES};
use crate::scan::{ElementEntry, Manifest};

// =========================================================================
// Fixture setup
// =========================================================================

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// Write a `StaticImage` element file with the given attribute map.
pub fn write_element(root: &Path, relative: &str, attributes: serde_json::Value) {
    let element = serde_json::json!({
        "element": "StaticImage",
        "attributes": attributes,
    });
    write_file(root, relative, &element.to_string());
}

// =========================================================================
// Lookups
// =========================================================================

/// Find a scanned element by its relative path. Panics if missing.
pub fn find_entry<'a>(manifest: &'a Manifest, path: &str) -> &'a ElementEntry {
    manifest
        .elements
        .iter()
        .find(|e| e.path == path)
        .unwrap_or_else(|| panic!("element '{}' not found in manifest", path))
}

/// Names of every prop the routing table knows, except `src`.
pub fn every_known_prop() -> Vec<&'static str> {
    PROP_ROUTES
        .iter()
        .filter(|(_, dest)| *dest != Destination::Source)
        .map(|(name, _)| *name)
        .collect()
}

/// Keys of an option group, in serialization order.
pub fn keys_of(group: &OptionGroup) -> Vec<String> {
    group.keys().map(String::from).collect()
}
