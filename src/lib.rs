//! # image-props
//!
//! Shapes the props of a responsive image component for the stages that
//! consume them. A caller writes one flat prop set:
//!
//! ```text
//! <StaticImage src="hero.jpg" fluid maxWidth={1200} quality={70} alt="Hero" onLoad={track} />
//! ```
//!
//! and several independent consumers each need a different slice of it: the
//! image transform engine wants sizing and quality, the artifact selector
//! wants the WebP/placeholder flags, the renderer wants everything else, and
//! the artifact cache wants a stable key for what is about to be generated.
//!
//! ```text
//! element ──▶ attributes ──▶ props::split_props ──▶ common / fluid / fixed  → transform engine
//!              (allow-list)                     ├──▶ image options         → artifact selection
//!                                               ├──▶ wrapper props         → renderer
//!                                               └──▶ hash::hash_options    → artifact cache key
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`attributes`] | Build-time extraction of the image attributes of a static element |
//! | [`props`] | Routing table and the split of merged props into option groups |
//! | [`hash`] | Deterministic short fingerprints of serializable options |
//! | [`config`] | `config.toml` loading, merging over stock defaults, validation |
//! | [`scan`] | Walks a directory of element files into a JSON manifest |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Routing by Name
//!
//! Props are routed to their group by name through a static table
//! ([`props::PROP_ROUTES`]), never by value. The table can be audited and
//! tested on its own, and anything it does not name falls through to the
//! renderer untouched.
//!
//! ## One Active Variant
//!
//! Every split yields exactly one active variant. An explicit `fixed` wins,
//! then an explicit `fluid`, then the configured default (fixed out of the
//! box). See [`props::resolve_variant`].
//!
//! ## Order-Independent Fingerprints
//!
//! Fingerprints hash a canonical JSON form in which object keys are sorted,
//! so two option maps built in a different order address the same artifacts.

pub mod attributes;
pub mod config;
pub mod hash;
pub mod output;
pub mod props;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
