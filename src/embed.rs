//! Embedded resource extraction
//!
//! Walks a resource's `_embedded` map. Each embedded resource is
//! recursively normalized through [`extract_resource`], its partial
//! table merged into the shared output, and the embedded value replaced
//! in the owning record by the embedded resource's normalized self link
//! (null when it has none). This module is the recursion driver: an
//! embedded resource re-enters the whole pipeline before its owner's
//! record is finished.

use serde_json::{Map, Value};

use crate::camel::{camel_case, camelize_nested_keys};
use crate::classify::{is_reference, self_link};
use crate::links::normalize_link;
use crate::merge::deep_merge;
use crate::normalize::{extract_resource, NormalizeOptions};

/// Normalize one embedded resource into the shared table
///
/// Returns the link that replaces the embedded resource in its owner's
/// record. With reference filtering enabled, a bare reference skips the
/// recursive normalization (it has no attributes to contribute) but
/// still yields its link pointer.
pub fn extract_single_embed(embed: &Value, table: &mut Value, options: &NormalizeOptions) -> Value {
    if !(options.filter_references && is_reference(embed)) {
        let extracted = extract_resource(embed, options);
        // non-resource embeds come back unchanged; only object shapes
        // can contribute table entries
        if extracted.is_object() {
            deep_merge(table, &extracted);
        }
    }

    match self_link(embed) {
        Some(link) => normalize_link(link, options),
        None => Value::Null,
    }
}

/// Normalize an embedded value that may be a single resource or an array
pub fn extract_embeds(embeds: &Value, table: &mut Value, options: &NormalizeOptions) -> Value {
    match embeds {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|embed| extract_single_embed(embed, table, options))
                .collect(),
        ),
        single => extract_single_embed(single, table, options),
    }
}

/// Extract the full embed map for one resource
///
/// Returns a table containing the owning resource's embedded-relation
/// record plus one entry per recursively normalized embedded resource.
/// When camelization is enabled it applies to the relation name and to
/// the extracted value's nested keys.
pub fn extract_all_embedded(json: &Value, uri: &str, options: &NormalizeOptions) -> Value {
    let mut table = Map::new();
    table.insert(uri.to_string(), Value::Object(Map::new()));
    let mut out = Value::Object(table);

    if let Some(embedded) = json.get("_embedded").and_then(Value::as_object) {
        for (relation, value) in embedded {
            let extracted = extract_embeds(value, &mut out, options);
            let (key, extracted) = if options.camelize_keys {
                (camel_case(relation), camelize_nested_keys(&extracted))
            } else {
                (relation.clone(), extracted)
            };
            if let Some(record) = out.get_mut(uri).and_then(Value::as_object_mut) {
                record.insert(key, extracted);
            }
        }
    }

    out
}
