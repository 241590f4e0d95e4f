//! Shape classification for HAL values
//!
//! Decides whether an arbitrary JSON value is a Resource (has a self
//! link with an href), a Reference (an object carrying nothing but a
//! self link), or an ordinary value. All predicates are total: anything
//! that doesn't match simply isn't that shape.

use serde_json::Value;

/// Check if a value is a HAL Resource Object
///
/// True iff `value._links.self.href` is present and non-null. Primitives,
/// arrays and plain objects without a self link are not resources and
/// pass through the pipeline unchanged.
pub fn is_resource(value: &Value) -> bool {
    self_link(value)
        .and_then(|link| link.get("href"))
        .map(|href| !href.is_null())
        .unwrap_or(false)
}

/// Check if a value is a bare Reference
///
/// A reference is a degenerate resource whose only key is `_links`,
/// whose only link relation is `self`. It says "same entity, look it up
/// by identifier" without repeating any attributes.
pub fn is_reference(value: &Value) -> bool {
    has_single_key(value, "_links")
        && value
            .get("_links")
            .map(|links| has_single_key(links, "self"))
            .unwrap_or(false)
}

/// Check if a value is a single Link object (exactly one key, `href`)
///
/// Distinguishes a standalone collection link from a link array when
/// reconciling embedded collections.
pub fn is_single_link(value: &Value) -> bool {
    has_single_key(value, "href")
}

fn has_single_key(value: &Value, key: &str) -> bool {
    value
        .as_object()
        .map(|obj| obj.len() == 1 && obj.contains_key(key))
        .unwrap_or(false)
}

/// Get a resource's self link, if any
pub fn self_link(value: &Value) -> Option<&Value> {
    value.get("_links")?.get("self")
}

/// Get a resource's self href as a string, if any
pub fn self_href(value: &Value) -> Option<&str> {
    self_link(value)?.get("href")?.as_str()
}

/// JavaScript-style truthiness, used for the `templated` flag and `href`
/// presence checks so documents produced by loose serializers behave the
/// same as in the reference implementation.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
