//! Splitting merged image props into per-consumer option groups.
//!
//! A responsive image component accepts one flat prop surface that mixes
//! options for several consumers. [`split_props`] routes every prop, by name,
//! to exactly one destination:
//!
//! | Destination | Props | Consumer |
//! |---|---|---|
//! | source | `src` | artifact lookup |
//! | variant | `fixed`, `fluid` | variant selection (consumed) |
//! | [`CommonOptions`] | `quality`, `jpegQuality`, `pngQuality`, `webpQuality`, `grayscale`, `toFormat`, `cropFocus`, `pngCompressionSpeed`, `rotate`, `duotone` | transform engine |
//! | [`FluidOptions`] | `maxWidth`, `maxHeight`, `srcSetBreakpoints`, `fit`, `background` | transform engine |
//! | [`FixedOptions`] | `width`, `height` | transform engine |
//! | [`ImageOptions`] | `webP`, `base64`, `tracedSVG` | artifact selection |
//! | [`WrapperProps`] | everything else | renderer |
//!
//! The table lives in [`PROP_ROUTES`]. Common options are embedded verbatim
//! in both the fluid and the fixed group, so either variant's group is
//! self-contained for the transform engine.
//!
//! ## Variant selection
//!
//! Exactly one variant is active per call:
//!
//! 1. `fixed` truthy → fixed
//! 2. `fluid` truthy → fluid
//! 3. `fixed` present and falsy → fluid
//! 4. otherwise the default variant (fixed unless configured otherwise)
//!
//! Values are never validated here; a negative width is the transform
//! engine's problem.

use crate::hash::{HashError, hash_options};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Where a prop is routed by [`split_props`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Source,
    Variant,
    Common,
    Fluid,
    Fixed,
    Image,
}

/// Prop name → destination. Names not listed here are wrapper props.
pub static PROP_ROUTES: &[(&str, Destination)] = &[
    ("src", Destination::Source),
    ("fixed", Destination::Variant),
    ("fluid", Destination::Variant),
    ("quality", Destination::Common),
    ("jpegQuality", Destination::Common),
    ("pngQuality", Destination::Common),
    ("webpQuality", Destination::Common),
    ("grayscale", Destination::Common),
    ("toFormat", Destination::Common),
    ("cropFocus", Destination::Common),
    ("pngCompressionSpeed", Destination::Common),
    ("rotate", Destination::Common),
    ("duotone", Destination::Common),
    ("maxWidth", Destination::Fluid),
    ("maxHeight", Destination::Fluid),
    ("srcSetBreakpoints", Destination::Fluid),
    ("fit", Destination::Fluid),
    ("background", Destination::Fluid),
    ("width", Destination::Fixed),
    ("height", Destination::Fixed),
    ("webP", Destination::Image),
    ("base64", Destination::Image),
    ("tracedSVG", Destination::Image),
];

/// Look up the destination of a known prop name.
pub fn route(name: &str) -> Option<Destination> {
    PROP_ROUTES
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, dest)| *dest)
}

/// Rendering variant of a responsive image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Absolute width/height, density-based srcset.
    #[default]
    Fixed,
    /// Constrained by max width/height, breakpoint-based srcset.
    Fluid,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed"),
            Self::Fluid => write!(f, "fluid"),
        }
    }
}

/// JavaScript-style truthiness of a prop value.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Pick the active variant from the raw `fixed` / `fluid` props.
///
/// `null` counts as unset.
pub fn resolve_variant(fixed: Option<&Value>, fluid: Option<&Value>, default: Variant) -> Variant {
    let fixed = fixed.filter(|v| !v.is_null());
    if fixed.is_some_and(is_truthy) {
        Variant::Fixed
    } else if fluid.is_some_and(is_truthy) || fixed.is_some() {
        Variant::Fluid
    } else {
        default
    }
}

/// Every prop a caller supplied, with the mandatory source.
///
/// Deserializes from a flat JSON object; a missing or non-string `src` is a
/// deserialization error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedProps {
    pub src: String,
    #[serde(flatten)]
    pub props: Map<String, Value>,
}

impl MergedProps {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            props: Map::new(),
        }
    }

    /// Add a prop, builder style.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.props.insert(name.to_string(), value.into());
        self
    }
}

/// A named set of prop values. Serializes as a flat JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionGroup(Map<String, Value>);

impl OptionGroup {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn insert(&mut self, name: String, value: Value) {
        self.0.insert(name, value);
    }
}

/// Options meaningful to both variants.
pub type CommonOptions = OptionGroup;
/// Auxiliary artifact flags (WebP, base64 and traced-SVG placeholders).
pub type ImageOptions = OptionGroup;
/// Props passed through to the rendering wrapper untouched.
pub type WrapperProps = OptionGroup;

/// Options for building the fluid variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FluidOptions {
    /// Whether fluid is the active variant.
    pub fluid: bool,
    #[serde(flatten)]
    pub sizing: OptionGroup,
    #[serde(flatten)]
    pub common: CommonOptions,
}

/// Options for building the fixed variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FixedOptions {
    /// Whether fixed is the active variant.
    pub fixed: bool,
    #[serde(flatten)]
    pub sizing: OptionGroup,
    #[serde(flatten)]
    pub common: CommonOptions,
}

/// Result of [`split_props`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SplitProps {
    pub src: String,
    pub common_options: CommonOptions,
    pub fluid_options: FluidOptions,
    pub fixed_options: FixedOptions,
    pub image_options: ImageOptions,
    /// Serialized as `gatsbyImageProps`, the name the image component's
    /// renderer reads.
    #[serde(rename = "gatsbyImageProps")]
    pub wrapper_props: WrapperProps,
    pub is_fixed: bool,
    pub is_fluid: bool,
}

/// The options the transform engine needs for the active variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TransformOptions<'a> {
    Fixed(&'a FixedOptions),
    Fluid(&'a FluidOptions),
}

/// What identifies a generated artifact: the source, the active variant's
/// transform options, and the auxiliary artifact flags.
#[derive(Serialize)]
struct ArtifactKey<'a> {
    src: &'a str,
    options: TransformOptions<'a>,
    image: &'a ImageOptions,
}

impl SplitProps {
    pub fn variant(&self) -> Variant {
        if self.is_fluid {
            Variant::Fluid
        } else {
            Variant::Fixed
        }
    }

    pub fn transform_options(&self) -> TransformOptions<'_> {
        match self.variant() {
            Variant::Fixed => TransformOptions::Fixed(&self.fixed_options),
            Variant::Fluid => TransformOptions::Fluid(&self.fluid_options),
        }
    }

    /// Fingerprint of everything that affects the generated artifacts.
    ///
    /// Wrapper props never contribute: changing `alt` or `className` must not
    /// invalidate cached images.
    pub fn cache_key(&self) -> Result<String, HashError> {
        hash_options(&ArtifactKey {
            src: &self.src,
            options: self.transform_options(),
            image: &self.image_options,
        })
    }
}

/// Split merged props with fixed as the default variant.
pub fn split_props(props: MergedProps) -> SplitProps {
    split_props_with(props, Variant::default())
}

/// Split merged props, using `default` when neither `fixed` nor `fluid`
/// decides the variant.
pub fn split_props_with(props: MergedProps, default: Variant) -> SplitProps {
    let MergedProps { src, props } = props;

    let mut common = CommonOptions::default();
    let mut fluid_sizing = OptionGroup::default();
    let mut fixed_sizing = OptionGroup::default();
    let mut image = ImageOptions::default();
    let mut wrapper = WrapperProps::default();
    let mut fixed_flag = None;
    let mut fluid_flag = None;

    for (name, value) in props {
        match route(&name) {
            Some(Destination::Common) => common.insert(name, value),
            Some(Destination::Fluid) => fluid_sizing.insert(name, value),
            Some(Destination::Fixed) => fixed_sizing.insert(name, value),
            Some(Destination::Image) => image.insert(name, value),
            Some(Destination::Variant) if name == "fixed" => fixed_flag = Some(value),
            Some(Destination::Variant) => fluid_flag = Some(value),
            // `src` is a struct field on MergedProps; a duplicate in the map
            // can only come from hand-built input and is dropped.
            Some(Destination::Source) => {}
            None => wrapper.insert(name, value),
        }
    }

    let variant = resolve_variant(fixed_flag.as_ref(), fluid_flag.as_ref(), default);
    let is_fixed = variant == Variant::Fixed;
    let is_fluid = variant == Variant::Fluid;

    SplitProps {
        fluid_options: FluidOptions {
            fluid: is_fluid,
            sizing: fluid_sizing,
            common: common.clone(),
        },
        fixed_options: FixedOptions {
            fixed: is_fixed,
            sizing: fixed_sizing,
            common: common.clone(),
        },
        common_options: common,
        image_options: image,
        wrapper_props: wrapper,
        is_fixed,
        is_fluid,
        src,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::IMAGE_ATTRIBUTES;
    use crate::test_helpers::{every_known_prop, keys_of};
    use serde_json::json;
    use std::collections::BTreeSet;

    // =========================================================================
    // Routing table
    // =========================================================================

    #[test]
    fn routing_table_has_no_duplicate_names() {
        let names: BTreeSet<&str> = PROP_ROUTES.iter().map(|(n, _)| *n).collect();
        assert_eq!(names.len(), PROP_ROUTES.len());
    }

    #[test]
    fn every_image_attribute_is_routed() {
        for name in IMAGE_ATTRIBUTES {
            assert!(route(name).is_some(), "{name} has no route");
        }
    }

    #[test]
    fn unknown_names_have_no_route() {
        assert_eq!(route("onLoad"), None);
        assert_eq!(route("alt"), None);
    }

    // =========================================================================
    // Variant selection
    // =========================================================================

    #[test]
    fn variant_defaults_to_fixed_when_unset() {
        assert_eq!(resolve_variant(None, None, Variant::Fixed), Variant::Fixed);
    }

    #[test]
    fn variant_fixed_wins_when_both_truthy() {
        let t = json!(true);
        assert_eq!(resolve_variant(Some(&t), Some(&t), Variant::Fluid), Variant::Fixed);
    }

    #[test]
    fn variant_fluid_when_requested() {
        let t = json!(true);
        assert_eq!(resolve_variant(None, Some(&t), Variant::Fixed), Variant::Fluid);
    }

    #[test]
    fn variant_fluid_when_fixed_explicitly_false() {
        let f = json!(false);
        assert_eq!(resolve_variant(Some(&f), None, Variant::Fixed), Variant::Fluid);
    }

    #[test]
    fn variant_null_counts_as_unset() {
        let null = Value::Null;
        assert_eq!(resolve_variant(Some(&null), Some(&null), Variant::Fixed), Variant::Fixed);
        assert_eq!(resolve_variant(Some(&null), None, Variant::Fluid), Variant::Fluid);
    }

    #[test]
    fn variant_fluid_false_falls_back_to_default() {
        let f = json!(false);
        assert_eq!(resolve_variant(None, Some(&f), Variant::Fixed), Variant::Fixed);
    }

    #[test]
    fn variant_uses_js_truthiness() {
        assert_eq!(
            resolve_variant(Some(&json!(0)), Some(&json!("yes")), Variant::Fixed),
            Variant::Fluid
        );
        assert_eq!(resolve_variant(Some(&json!(1)), None, Variant::Fluid), Variant::Fixed);
        assert_eq!(resolve_variant(None, Some(&json!("")), Variant::Fixed), Variant::Fixed);
    }

    #[test]
    fn exactly_one_variant_is_active() {
        let values = [None, Some(json!(true)), Some(json!(false)), Some(Value::Null)];
        for fixed in &values {
            for fluid in &values {
                for default in [Variant::Fixed, Variant::Fluid] {
                    let mut props = MergedProps::new("a.jpg");
                    if let Some(v) = fixed {
                        props = props.with("fixed", v.clone());
                    }
                    if let Some(v) = fluid {
                        props = props.with("fluid", v.clone());
                    }
                    let split = split_props_with(props, default);
                    assert_ne!(split.is_fixed, split.is_fluid);
                    assert_eq!(split.fixed_options.fixed, split.is_fixed);
                    assert_eq!(split.fluid_options.fluid, split.is_fluid);
                }
            }
        }
    }

    // =========================================================================
    // Partitioning
    // =========================================================================

    #[test]
    fn fixed_scenario() {
        let props = MergedProps::new("a.jpg")
            .with("fixed", true)
            .with("width", 100)
            .with("quality", 80)
            .with("onLoad", "handleLoad");

        let split = split_props(props);

        assert_eq!(split.src, "a.jpg");
        assert!(split.is_fixed);
        assert!(!split.is_fluid);
        assert_eq!(split.fixed_options.sizing.get("width"), Some(&json!(100)));
        assert_eq!(split.fixed_options.sizing.get("height"), None);
        assert_eq!(split.fixed_options.common.get("quality"), Some(&json!(80)));
        assert_eq!(keys_of(&split.wrapper_props), vec!["onLoad"]);
        assert!(split.image_options.is_empty());

        assert_eq!(
            serde_json::to_value(&split.fixed_options).unwrap(),
            json!({ "fixed": true, "width": 100, "quality": 80 })
        );
    }

    #[test]
    fn neither_flag_defaults_to_fixed() {
        let split = split_props(MergedProps::new("a.jpg").with("maxWidth", 800));
        assert!(split.is_fixed);
        assert_eq!(split.variant(), Variant::Fixed);
        // Fluid sizing is still routed, just not active
        assert_eq!(split.fluid_options.sizing.get("maxWidth"), Some(&json!(800)));
        assert!(!split.fluid_options.fluid);
    }

    #[test]
    fn configured_default_applies_when_neither_flag_set() {
        let split = split_props_with(MergedProps::new("a.jpg"), Variant::Fluid);
        assert!(split.is_fluid);
        assert_eq!(split.variant(), Variant::Fluid);
    }

    #[test]
    fn fluid_scenario() {
        let props = MergedProps::new("b.png")
            .with("fluid", true)
            .with("maxWidth", 1200)
            .with("srcSetBreakpoints", json!([480, 960]))
            .with("toFormat", "WEBP")
            .with("webP", true)
            .with("alt", "A dog");

        let split = split_props(props);

        assert!(split.is_fluid);
        assert_eq!(
            serde_json::to_value(&split.fluid_options).unwrap(),
            json!({
                "fluid": true,
                "maxWidth": 1200,
                "srcSetBreakpoints": [480, 960],
                "toFormat": "WEBP",
            })
        );
        assert_eq!(split.image_options.get("webP"), Some(&json!(true)));
        assert_eq!(split.wrapper_props.get("alt"), Some(&json!("A dog")));
    }

    #[test]
    fn common_options_shared_by_both_variants() {
        let split = split_props(
            MergedProps::new("a.jpg")
                .with("grayscale", true)
                .with("rotate", 90)
                .with("cropFocus", "ATTENTION"),
        );
        assert_eq!(split.fluid_options.common, split.common_options);
        assert_eq!(split.fixed_options.common, split.common_options);
        assert_eq!(split.common_options.len(), 3);
    }

    #[test]
    fn groups_are_disjoint_and_complete() {
        let mut props = MergedProps::new("a.jpg");
        for name in every_known_prop() {
            props = props.with(name, 1);
        }
        props = props
            .with("fadeIn", false)
            .with("style", json!({"margin": 0}))
            .with("Tag", "section");

        let split = split_props(props.clone());

        let groups = [
            keys_of(&split.common_options),
            keys_of(&split.fluid_options.sizing),
            keys_of(&split.fixed_options.sizing),
            keys_of(&split.image_options),
            keys_of(&split.wrapper_props),
        ];
        let mut seen = BTreeSet::new();
        for group in &groups {
            for key in group {
                assert!(seen.insert(key.clone()), "{key} routed twice");
            }
        }

        // Nothing lost: every input prop except the variant flags lands somewhere
        let expected: BTreeSet<String> = props
            .props
            .keys()
            .filter(|k| route(k) != Some(Destination::Variant))
            .cloned()
            .collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn values_pass_through_unvalidated() {
        let split = split_props(
            MergedProps::new("a.jpg")
                .with("width", -5)
                .with("quality", "very high"),
        );
        assert_eq!(split.fixed_options.sizing.get("width"), Some(&json!(-5)));
        assert_eq!(split.common_options.get("quality"), Some(&json!("very high")));
    }

    #[test]
    fn split_is_deterministic() {
        let props = MergedProps::new("a.jpg")
            .with("fluid", true)
            .with("maxWidth", 640)
            .with("title", "x");
        assert_eq!(split_props(props.clone()), split_props(props));
    }

    #[test]
    fn wrapper_props_serialize_under_renderer_key() {
        let split = split_props(MergedProps::new("a.jpg").with("alt", "A"));
        let value = serde_json::to_value(&split).unwrap();
        assert_eq!(value["gatsbyImageProps"], json!({"alt": "A"}));
        assert!(value.get("wrapperProps").is_none());
    }

    #[test]
    fn merged_props_from_flat_json() {
        let props: MergedProps = serde_json::from_value(json!({
            "src": "a.jpg",
            "width": 300,
            "onLoad": "handler",
        }))
        .unwrap();
        assert_eq!(props.src, "a.jpg");
        assert_eq!(props.props.len(), 2);
        assert!(!props.props.contains_key("src"));
    }

    #[test]
    fn merged_props_requires_src() {
        let result: Result<MergedProps, _> = serde_json::from_value(json!({ "width": 300 }));
        assert!(result.is_err());
    }

    // =========================================================================
    // Cache key
    // =========================================================================

    #[test]
    fn cache_key_ignores_wrapper_props() {
        let a = split_props(MergedProps::new("a.jpg").with("width", 100).with("alt", "one"));
        let b = split_props(MergedProps::new("a.jpg").with("width", 100).with("alt", "two"));
        assert_eq!(a.cache_key().unwrap(), b.cache_key().unwrap());
    }

    #[test]
    fn cache_key_ignores_inactive_variant_options() {
        let a = split_props(MergedProps::new("a.jpg").with("width", 100));
        let b = split_props(MergedProps::new("a.jpg").with("width", 100).with("maxWidth", 9));
        assert_eq!(a.cache_key().unwrap(), b.cache_key().unwrap());
    }

    #[test]
    fn cache_key_changes_with_transform_options() {
        let a = split_props(MergedProps::new("a.jpg").with("width", 100));
        let b = split_props(MergedProps::new("a.jpg").with("width", 200));
        let c = split_props(MergedProps::new("b.jpg").with("width", 100));
        let d = split_props(MergedProps::new("a.jpg").with("width", 100).with("webP", true));
        let keys: BTreeSet<String> = [a, b, c, d]
            .iter()
            .map(|s| s.cache_key().unwrap())
            .collect();
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn transform_options_follow_variant() {
        let fixed = split_props(MergedProps::new("a.jpg"));
        assert!(matches!(fixed.transform_options(), TransformOptions::Fixed(_)));
        let fluid = split_props(MergedProps::new("a.jpg").with("fluid", true));
        assert!(matches!(fluid.transform_options(), TransformOptions::Fluid(_)));
    }

    #[test]
    fn variant_display_and_serde() {
        assert_eq!(Variant::Fluid.to_string(), "fluid");
        assert_eq!(serde_json::to_value(Variant::Fixed).unwrap(), json!("fixed"));
        let v: Variant = serde_json::from_value(json!("fluid")).unwrap();
        assert_eq!(v, Variant::Fluid);
    }
}
