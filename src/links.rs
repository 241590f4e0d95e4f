//! Link extraction and normalization
//!
//! Walks a resource's `_links` map and produces the per-relation link
//! map for its table entry: every relation except `self`, each link
//! deep-copied and its href passed through the caller's URI normalizer.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::camel::camel_case;
use crate::classify::is_truthy;
use crate::normalize::NormalizeOptions;

/// A HAL Link object
///
/// `href` is required, everything else optional. Unknown keys are kept
/// in `extra` so links survive a serialize round trip intact. Mainly a
/// convenience for callers building documents programmatically; the
/// pipeline itself operates on raw JSON values so arbitrary shapes pass
/// through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub templated: Option<bool>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deprecation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hreflang: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Link {
            href: href.into(),
            ..Default::default()
        }
    }
}

/// Normalize a single link value
///
/// A value without a truthy `href` is returned unchanged (it isn't a
/// usable link). A templated link is returned unchanged too: its href is
/// a URI template, not a concrete URI, so it must never be rewritten.
/// Otherwise the link is deep-copied and its href passed through the
/// caller's URI normalizer exactly once.
pub fn normalize_link(link: &Value, options: &NormalizeOptions) -> Value {
    let href = match link.get("href") {
        Some(href) if is_truthy(href) => href,
        _ => return link.clone(),
    };
    if link.get("templated").map(is_truthy).unwrap_or(false) {
        return link.clone();
    }

    let mut copy = link.clone();
    if let (Some(href_str), Some(obj)) = (href.as_str(), copy.as_object_mut()) {
        obj.insert("href".to_string(), Value::String(options.uri(href_str)));
    }
    copy
}

/// Normalize a link value that may be a single Link or an ordered array
pub fn extract_links(links: &Value, options: &NormalizeOptions) -> Value {
    match links {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|link| normalize_link(link, options))
                .collect(),
        ),
        single => normalize_link(single, options),
    }
}

/// Extract the full link map for one resource
///
/// Returns a one-entry table `{uri: {relation: Link | [Link]}}` covering
/// every relation except `self` (the self href becomes the table key and
/// is recorded under the meta key instead). Relation names are camelized
/// when enabled; link contents are not, per the HAL link object spec.
pub fn extract_all_links(json: &Value, uri: &str, options: &NormalizeOptions) -> Value {
    let mut relations = Map::new();

    if let Some(links) = json.get("_links").and_then(Value::as_object) {
        for (relation, value) in links {
            if relation == "self" {
                continue;
            }
            let key = if options.camelize_keys {
                camel_case(relation)
            } else {
                relation.clone()
            };
            relations.insert(key, extract_links(value, options));
        }
    }

    let mut table = Map::new();
    table.insert(uri.to_string(), Value::Object(relations));
    Value::Object(table)
}
