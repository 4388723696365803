//! Build-time attribute extraction for static image elements.
//!
//! A static image element (`<StaticImage src="..." quality={80} />`) carries a
//! mix of attributes: the ones the image pipeline needs to generate artifacts,
//! and everything else (event handlers, styling, accessibility text) that only
//! the renderer cares about. Only the former can be, and need to be, resolved
//! at build time.
//!
//! This module owns the allow-list of image attributes and the filter applied
//! to a node. Resolving an attribute's value is the node's job, expressed by
//! the [`ElementAttributes`] trait:
//!
//! | Attribute | Outcome |
//! |---|---|
//! | not in [`IMAGE_ATTRIBUTES`] | skipped silently, never reported |
//! | allow-listed, resolves | included in the result |
//! | allow-listed, fails to resolve | reported via `on_error`, missing from the result |
//!
//! [`StaticElement`] is a serde-friendly node description used by the
//! [`scan`](crate::scan) stage and tests.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Attributes the image pipeline consumes. The set is closed: anything else
/// on an element is never forwarded to image processing.
pub const IMAGE_ATTRIBUTES: [&str; 22] = [
    "src",
    "quality",
    "jpegQuality",
    "pngQuality",
    "webpQuality",
    "grayscale",
    "toFormat",
    "cropFocus",
    "pngCompressionSpeed",
    "rotate",
    "duotone",
    "fluid",
    "fixed",
    "maxWidth",
    "maxHeight",
    "srcSetBreakpoints",
    "fit",
    "background",
    "width",
    "height",
    "tracedSVG",
    "webP",
];

/// Whether `name` belongs to [`IMAGE_ATTRIBUTES`].
pub fn is_image_attribute(name: &str) -> bool {
    IMAGE_ATTRIBUTES.contains(&name)
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EvaluateError {
    #[error("attribute `{0}` is not present on the element")]
    Missing(String),
    #[error("attribute `{name}` is not statically analyzable: {expression}")]
    NotStatic { name: String, expression: String },
}

/// A syntax node whose attributes can be enumerated and evaluated.
///
/// Implementations decide what "evaluate" means: a literal is returned as-is,
/// an expression that cannot be folded at build time is an error.
pub trait ElementAttributes {
    /// Names of all attributes present on the node, in source order.
    fn attribute_names(&self) -> Vec<&str>;

    /// Resolve one attribute to a JSON value.
    fn evaluate(&self, name: &str) -> Result<Value, EvaluateError>;
}

/// Extract the image-relevant attribute values from `node`.
///
/// Names outside the allow-list are dropped without being evaluated.
/// Evaluation failures of allow-listed names are passed to `on_error` by
/// attribute name; the caller decides whether that is fatal.
pub fn evaluate_image_attributes<N>(
    node: &N,
    mut on_error: Option<&mut dyn FnMut(&str)>,
) -> Map<String, Value>
where
    N: ElementAttributes + ?Sized,
{
    let mut values = Map::new();
    for name in node.attribute_names() {
        if !is_image_attribute(name) {
            continue;
        }
        match node.evaluate(name) {
            Ok(value) => {
                values.insert(name.to_string(), value);
            }
            Err(err) => {
                tracing::debug!(attribute = name, error = %err, "unresolved image attribute");
                if let Some(report) = on_error.as_deref_mut() {
                    report(name);
                }
            }
        }
    }
    values
}

/// Value of one attribute as written on a static element.
///
/// ```json
/// { "literal": 80 }              // quality={80}
/// "flag"                         // grayscale (bare attribute)
/// { "expression": "props.src" }  // src={props.src}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeValue {
    Literal(Value),
    Flag,
    Expression(String),
}

/// A static image element as described in an element file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticElement {
    /// Component name, e.g. `StaticImage`.
    #[serde(default)]
    pub element: String,
    pub attributes: BTreeMap<String, AttributeValue>,
}

impl ElementAttributes for StaticElement {
    fn attribute_names(&self) -> Vec<&str> {
        self.attributes.keys().map(String::as_str).collect()
    }

    fn evaluate(&self, name: &str) -> Result<Value, EvaluateError> {
        match self.attributes.get(name) {
            Some(AttributeValue::Literal(value)) => Ok(value.clone()),
            Some(AttributeValue::Flag) => Ok(Value::Bool(true)),
            Some(AttributeValue::Expression(expression)) => Err(EvaluateError::NotStatic {
                name: name.to_string(),
                expression: expression.clone(),
            }),
            None => Err(EvaluateError::Missing(name.to_string())),
        }
    }
}
