//! Element directory scanning and manifest generation.
//!
//! Walks a directory of static image element descriptions (JSON files, one
//! element each), extracts the image attributes, splits them into option
//! groups, and fingerprints each element's artifacts:
//!
//! ```text
//! elements/
//! ├── config.toml            # Scan configuration (optional)
//! ├── home/
//! │   ├── hero.json          # { "element": "StaticImage", "attributes": { ... } }
//! │   └── avatar.json
//! └── blog/
//!     └── cover.json
//! ```
//!
//! ## Per-element steps
//!
//! 1. Parse the file as a [`StaticElement`]; a previously written
//!    [`Manifest`] (an object with `elements` and no `attributes`) is skipped
//!    whatever its file name
//! 2. Keep only image attributes, collecting the ones that cannot be resolved
//!    (an error in strict mode)
//! 3. Require a string `src`
//! 4. Split with the configured default variant
//! 5. Compute the cache key
//!
//! Elements are independent and processed in parallel on a rayon pool sized
//! by `processing.max_processes`. The
//! resulting [`Manifest`] lists them sorted by relative path so output is
//! reproducible.

use crate::attributes::{StaticElement, evaluate_image_attributes};
use crate::config::{self, CONFIG_FILENAME, PropsConfig};
use crate::hash::HashError;
use crate::props::{MergedProps, SplitProps, Variant, split_props_with};
use rayon::prelude::*;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Default file name the CLI writes the manifest to.
pub const MANIFEST_FILENAME: &str = "manifest.json";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid element file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Element has no static string `src`: {0}")]
    MissingSource(PathBuf),
    #[error("Attribute `{attribute}` cannot be resolved at build time in {path}")]
    UnresolvedAttribute { path: PathBuf, attribute: String },
    #[error("Cache key failed for {path}: {source}")]
    Hash { path: PathBuf, source: HashError },
    #[error("Worker pool failed to start: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Manifest output from the scan.
#[derive(Debug, Serialize)]
pub struct Manifest {
    pub elements: Vec<ElementEntry>,
    pub config: PropsConfig,
}

/// One scanned element.
#[derive(Debug, Serialize)]
pub struct ElementEntry {
    /// Element file path relative to the scan root.
    pub path: String,
    /// Component name from the element file.
    pub element: String,
    pub variant: Variant,
    pub cache_key: String,
    /// Image attributes dropped because they could not be resolved.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<String>,
    pub props: SplitProps,
}

/// Scan `root` for element files.
pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;
    let files = find_element_files(root)?;
    tracing::debug!(root = %root.display(), count = files.len(), "found element files");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config::effective_threads(&config.processing))
        .build()?;
    let mut elements: Vec<ElementEntry> = pool
        .install(|| {
            files
                .par_iter()
                .map(|path| scan_element(root, path, &config))
                .collect::<Result<Vec<_>, _>>()
        })?
        .into_iter()
        .flatten()
        .collect();
    elements.sort_by(|a, b| a.path.cmp(&b.path));

    tracing::info!(elements = elements.len(), "scan complete");
    Ok(Manifest { elements, config })
}

/// All `*.json` files under `root`.
fn find_element_files(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// Whether a parsed JSON file is a manifest written by an earlier scan.
fn is_manifest(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|obj| obj.contains_key("elements") && !obj.contains_key("attributes"))
}

/// Parse one element file and process it. `Ok(None)` for skipped manifests.
fn scan_element(
    root: &Path,
    path: &Path,
    config: &PropsConfig,
) -> Result<Option<ElementEntry>, ScanError> {
    let content = fs::read_to_string(path)?;
    let json_error = |source: serde_json::Error| ScanError::Json {
        path: path.to_path_buf(),
        source,
    };
    let value: Value = serde_json::from_str(&content).map_err(json_error)?;
    if is_manifest(&value) {
        tracing::debug!(path = %path.display(), "skipping previously written manifest");
        return Ok(None);
    }
    let element: StaticElement = serde_json::from_value(value).map_err(json_error)?;
    let relative = path
        .strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/");
    let entry = process_element(&relative, element, config).map_err(|err| match err {
        ElementError::MissingSource => ScanError::MissingSource(path.to_path_buf()),
        ElementError::Unresolved(attribute) => ScanError::UnresolvedAttribute {
            path: path.to_path_buf(),
            attribute,
        },
        ElementError::Hash(source) => ScanError::Hash {
            path: path.to_path_buf(),
            source,
        },
    })?;
    Ok(Some(entry))
}

/// Failure of a single element, before it is tied to a file path.
#[derive(Debug)]
enum ElementError {
    MissingSource,
    Unresolved(String),
    Hash(HashError),
}

/// Filter, split, and fingerprint one element.
fn process_element(
    path: &str,
    element: StaticElement,
    config: &PropsConfig,
) -> Result<ElementEntry, ElementError> {
    let mut unresolved = Vec::new();
    let mut report = |name: &str| unresolved.push(name.to_string());
    let mut values = evaluate_image_attributes(&element, Some(&mut report));

    if let Some(first) = unresolved.first() {
        if config.attributes.strict {
            return Err(ElementError::Unresolved(first.clone()));
        }
        tracing::warn!(path, attributes = ?unresolved, "dropping unresolved image attributes");
    }

    let src = match values.remove("src") {
        Some(Value::String(src)) => src,
        _ => return Err(ElementError::MissingSource),
    };
    let merged = MergedProps { src, props: values };
    let props = split_props_with(merged, config.variant.default);
    let cache_key = props.cache_key().map_err(ElementError::Hash)?;
    tracing::debug!(path, variant = %props.variant(), cache_key = %cache_key, "scanned element");

    Ok(ElementEntry {
        path: path.to_string(),
        element: element.element,
        variant: props.variant(),
        cache_key,
        unresolved,
        props,
    })
}

/// Whether `root` carries a scan config file.
pub fn has_config(root: &Path) -> bool {
    root.join(CONFIG_FILENAME).exists()
}
