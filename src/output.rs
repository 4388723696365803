//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.
//!
//! ## Scan
//!
//! ```text
//! Elements
//! 001 home/hero.json (StaticImage)
//!     Source: images/hero.jpg
//!     Variant: fluid
//!     Cache key: 3f9a0c1d2e4b5a67
//!     Unresolved: width
//!
//! Config
//!     config.toml
//! ```
//!
//! ## Split
//!
//! ```text
//! Source: a.jpg
//! Variant: fixed
//! Common: quality
//! Fixed: width
//! Fluid: (none)
//! Image: webP
//! Wrapper: alt, onLoad
//! ```

use crate::props::{OptionGroup, SplitProps};
use crate::scan::Manifest;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Comma-separated group keys, or `(none)`.
fn group_keys(group: &OptionGroup) -> String {
    if group.is_empty() {
        "(none)".to_string()
    } else {
        group.keys().collect::<Vec<_>>().join(", ")
    }
}

/// Format scan results.
pub fn format_scan_output(manifest: &Manifest, has_config: bool) -> Vec<String> {
    let mut lines = vec!["Elements".to_string()];
    if manifest.elements.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, entry) in manifest.elements.iter().enumerate() {
        if entry.element.is_empty() {
            lines.push(format!("{} {}", format_index(i + 1), entry.path));
        } else {
            lines.push(format!(
                "{} {} ({})",
                format_index(i + 1),
                entry.path,
                entry.element
            ));
        }
        lines.push(format!("{}Source: {}", indent(1), entry.props.src));
        lines.push(format!("{}Variant: {}", indent(1), entry.variant));
        lines.push(format!("{}Cache key: {}", indent(1), entry.cache_key));
        if !entry.unresolved.is_empty() {
            lines.push(format!(
                "{}Unresolved: {}",
                indent(1),
                entry.unresolved.join(", ")
            ));
        }
    }
    if has_config {
        lines.push(String::new());
        lines.push("Config".to_string());
        lines.push(format!("{}config.toml", indent(1)));
    }
    lines
}

pub fn print_scan_output(manifest: &Manifest, has_config: bool) {
    for line in format_scan_output(manifest, has_config) {
        println!("{}", line);
    }
}

/// Format a split as one line per destination group.
pub fn format_split_output(split: &SplitProps) -> Vec<String> {
    vec![
        format!("Source: {}", split.src),
        format!("Variant: {}", split.variant()),
        format!("Common: {}", group_keys(&split.common_options)),
        format!("Fixed: {}", group_keys(&split.fixed_options.sizing)),
        format!("Fluid: {}", group_keys(&split.fluid_options.sizing)),
        format!("Image: {}", group_keys(&split.image_options)),
        format!("Wrapper: {}", group_keys(&split.wrapper_props)),
    ]
}

pub fn print_split_output(split: &SplitProps) {
    for line in format_split_output(split) {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PropsConfig;
    use crate::props::{MergedProps, split_props};
    use crate::scan::ElementEntry;

    fn entry(path: &str, unresolved: Vec<String>) -> ElementEntry {
        let props = split_props(MergedProps::new("hero.jpg").with("fluid", true));
        ElementEntry {
            path: path.to_string(),
            element: "StaticImage".to_string(),
            variant: props.variant(),
            cache_key: "0123456789abcdef".to_string(),
            unresolved,
            props,
        }
    }

    #[test]
    fn scan_output_lists_elements() {
        let manifest = Manifest {
            elements: vec![entry("home/hero.json", vec!["width".into()])],
            config: PropsConfig::default(),
        };
        let lines = format_scan_output(&manifest, true);
        assert_eq!(
            lines,
            vec![
                "Elements",
                "001 home/hero.json (StaticImage)",
                "    Source: hero.jpg",
                "    Variant: fluid",
                "    Cache key: 0123456789abcdef",
                "    Unresolved: width",
                "",
                "Config",
                "    config.toml",
            ]
        );
    }

    #[test]
    fn scan_output_empty_manifest() {
        let manifest = Manifest {
            elements: Vec::new(),
            config: PropsConfig::default(),
        };
        assert_eq!(format_scan_output(&manifest, false), vec!["Elements", "    (none)"]);
    }

    #[test]
    fn split_output_lists_groups() {
        let split = split_props(
            MergedProps::new("a.jpg")
                .with("width", 100)
                .with("quality", 80)
                .with("webP", true)
                .with("onLoad", "handler")
                .with("alt", "A"),
        );
        assert_eq!(
            format_split_output(&split),
            vec![
                "Source: a.jpg",
                "Variant: fixed",
                "Common: quality",
                "Fixed: width",
                "Fluid: (none)",
                "Image: webP",
                "Wrapper: alt, onLoad",
            ]
        );
    }
}
