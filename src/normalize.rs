//! Top-level normalization
//!
//! The orchestrator: strips `_links`/`_embedded` from the attribute
//! copy, runs link and embed extraction, reconciles embedded collections
//! when configured, and stamps each entry's meta `self`. The whole table
//! is built fresh per call; nothing is shared across invocations.

use serde_json::{Map, Value};

use crate::camel::{camel_case, camelize_nested_keys};
use crate::classify::{is_reference, is_resource, self_href};
use crate::embed::extract_all_embedded;
use crate::error::NormalizeError;
use crate::links::extract_all_links;
use crate::merge::deep_merge;
use crate::reconcile::merge_standalone_collections;

/// Caller-supplied URI canonicalization, e.g. stripping a host prefix.
/// Called exactly once per non-templated href, including each resource's
/// own self href. A panicking normalizer propagates to the caller.
pub type UriNormalizer = Box<dyn Fn(&str) -> String>;

/// Options for normalization
///
/// Each option toggles one independent piece of behavior; unrecognized
/// concerns simply don't exist here. `embedded_standalone_list_key`
/// doubles as the switch for the collection reconciler: when unset,
/// embedded arrays stay plain link arrays on their owning relation.
pub struct NormalizeOptions {
    /// Camelize attribute and relation keys (default true)
    pub camelize_keys: bool,
    /// URI canonicalization hook (default: identity)
    pub normalize_uri: Option<UriNormalizer>,
    /// Key under which per-resource metadata is attached (default "_meta")
    pub meta_key: String,
    /// Suppress attribute contribution from bare references (default false)
    pub filter_references: bool,
    /// Key under which reconciled collection contents are stored; enables
    /// the collection reconciler
    pub embedded_standalone_list_key: Option<String>,
    /// Synthesize `<uri>#<relation>` identifiers for embedded collections
    /// without a standalone link
    pub virtual_self_links: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            camelize_keys: true,
            normalize_uri: None,
            meta_key: "_meta".to_string(),
            filter_references: false,
            embedded_standalone_list_key: None,
            virtual_self_links: false,
        }
    }
}

impl NormalizeOptions {
    /// Run a href through the caller's URI normalizer
    pub(crate) fn uri(&self, href: &str) -> String {
        match &self.normalize_uri {
            Some(normalize) => normalize(href),
            None => href.to_string(),
        }
    }
}

/// Normalize a HAL+JSON document into a flat identifier-keyed table
///
/// Every resource reachable through `_embedded` becomes one table entry
/// keyed by its (normalized) self href; embedded resources are replaced
/// by links into the table. A root that is a bare reference under
/// `filter_references` yields an empty table. A root that is not a
/// resource at all is returned unchanged.
pub fn normalize(document: &Value, options: &NormalizeOptions) -> Value {
    if options.filter_references && is_reference(document) {
        return Value::Object(Map::new());
    }
    extract_resource(document, options)
}

/// Normalize one resource and everything embedded in it
///
/// Mutually recursive with the embed extractor: each embedded resource
/// re-enters here before its owner's record is complete.
pub(crate) fn extract_resource(json: &Value, options: &NormalizeOptions) -> Value {
    if !is_resource(json) {
        return json.clone();
    }
    let href = match self_href(json) {
        Some(href) => href,
        // href present but not a string: nothing to key the entry by
        None => return json.clone(),
    };
    let uri = options.uri(href);

    let mut record = Map::new();
    if let Some(obj) = json.as_object() {
        for (key, value) in obj {
            if key == "_links" || key == "_embedded" {
                continue;
            }
            if options.camelize_keys {
                // the meta key keeps its own name; its contents camelize
                let record_key = if *key == options.meta_key {
                    options.meta_key.clone()
                } else {
                    camel_case(key)
                };
                record.insert(record_key, camelize_nested_keys(value));
            } else {
                record.insert(key.clone(), value.clone());
            }
        }
    }

    let mut table = Map::new();
    table.insert(uri.clone(), Value::Object(record));
    let mut out = Value::Object(table);

    let embedded = extract_all_embedded(json, &uri, options);
    let links = extract_all_links(json, &uri, options);

    if options.embedded_standalone_list_key.is_some() {
        let reconciled = merge_standalone_collections(&embedded, &links, options);
        deep_merge(&mut out, &reconciled);
    } else {
        deep_merge(&mut out, &links);
        deep_merge(&mut out, &embedded);
    }

    if let Some(entry) = out.get_mut(&uri).and_then(Value::as_object_mut) {
        let meta = entry
            .entry(options.meta_key.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !meta.is_object() {
            *meta = Value::Object(Map::new());
        }
        if let Some(meta_obj) = meta.as_object_mut() {
            meta_obj.insert("self".to_string(), Value::String(uri.clone()));
        }
    }

    out
}

/// Parse a HAL+JSON document from a string
pub fn parse_document(content: &str) -> Result<Value, NormalizeError> {
    Ok(serde_json::from_str(content)?)
}

/// Serialize a normalized table to a JSON string
pub fn to_json_string(table: &Value, pretty: bool) -> Result<String, NormalizeError> {
    if pretty {
        Ok(serde_json::to_string_pretty(table)?)
    } else {
        Ok(serde_json::to_string(table)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_attribute_loss() {
        let document = json!({
            "_links": {"self": {"href": "/orders/1"}},
            "a": 1,
            "b": 2
        });

        let table = normalize(&document, &NormalizeOptions::default());
        assert_eq!(
            table,
            json!({
                "/orders/1": {"a": 1, "b": 2, "_meta": {"self": "/orders/1"}}
            })
        );
    }

    #[test]
    fn test_self_consistency() {
        let document = json!({
            "_links": {"self": {"href": "/orders/1"}},
            "_embedded": {
                "items": [
                    {"_links": {"self": {"href": "/items/1"}}, "n": 1},
                    {"_links": {"self": {"href": "/items/2"}}, "n": 2}
                ]
            }
        });

        let mut options = NormalizeOptions::default();
        options.embedded_standalone_list_key = Some("content".to_string());
        options.virtual_self_links = true;

        let table = normalize(&document, &options);
        for (key, entry) in table.as_object().unwrap() {
            assert_eq!(entry["_meta"]["self"], json!(key), "entry {}", key);
        }
    }

    #[test]
    fn test_non_resource_root_passes_through() {
        let options = NormalizeOptions::default();
        let document = json!({"just": "data"});
        assert_eq!(normalize(&document, &options), document);
        assert_eq!(normalize(&json!(42), &options), json!(42));
    }

    #[test]
    fn test_filtered_root_reference_yields_empty_table() {
        let mut options = NormalizeOptions::default();
        options.filter_references = true;

        let document = json!({"_links": {"self": {"href": "/orders/1"}}});
        assert_eq!(normalize(&document, &options), json!({}));
    }

    #[test]
    fn test_unfiltered_root_reference_yields_entry() {
        let document = json!({"_links": {"self": {"href": "/orders/1"}}});
        let table = normalize(&document, &NormalizeOptions::default());
        assert_eq!(
            table,
            json!({"/orders/1": {"_meta": {"self": "/orders/1"}}})
        );
    }

    #[test]
    fn test_attribute_keys_camelized_meta_key_kept() {
        let document = json!({
            "_links": {"self": {"href": "/orders/1"}},
            "order_total": 30.0,
            "_meta": {"fetched_at": "2024-01-01"}
        });

        let table = normalize(&document, &NormalizeOptions::default());
        let entry = &table["/orders/1"];
        assert_eq!(entry["orderTotal"], json!(30.0));
        // meta key name preserved, contents camelized
        assert_eq!(entry["_meta"]["fetchedAt"], json!("2024-01-01"));
        assert_eq!(entry["_meta"]["self"], json!("/orders/1"));
    }

    #[test]
    fn test_camelization_disabled() {
        let mut options = NormalizeOptions::default();
        options.camelize_keys = false;

        let document = json!({
            "_links": {"self": {"href": "/orders/1"}, "line_items": {"href": "/i"}},
            "order_total": 30.0
        });

        let table = normalize(&document, &options);
        assert_eq!(table["/orders/1"]["order_total"], json!(30.0));
        assert_eq!(table["/orders/1"]["line_items"], json!({"href": "/i"}));
    }

    #[test]
    fn test_self_href_passed_through_normalizer() {
        let mut options = NormalizeOptions::default();
        options.normalize_uri = Some(Box::new(|href| {
            href.strip_prefix("https://api.example.com")
                .unwrap_or(href)
                .to_string()
        }));

        let document = json!({
            "_links": {
                "self": {"href": "https://api.example.com/orders/1"},
                "next": {"href": "https://api.example.com/orders/2"}
            }
        });

        let table = normalize(&document, &options);
        assert_eq!(
            table["/orders/1"]["next"],
            json!({"href": "/orders/2"})
        );
        assert_eq!(table["/orders/1"]["_meta"]["self"], json!("/orders/1"));
    }

    #[test]
    fn test_embedded_and_linked_same_identifier_merge() {
        // the same order appears once embedded with attributes and once
        // embedded as a bare reference: one entry, attributes kept
        let document = json!({
            "_links": {"self": {"href": "/users/7"}},
            "_embedded": {
                "latest_order": {
                    "_links": {"self": {"href": "/orders/1"}},
                    "total": 30.0
                },
                "pinned": {
                    "_links": {"self": {"href": "/orders/1"}}
                }
            }
        });

        let table = normalize(&document, &NormalizeOptions::default());
        assert_eq!(table["/orders/1"]["total"], json!(30.0));
        assert_eq!(table["/users/7"]["latestOrder"], json!({"href": "/orders/1"}));
        assert_eq!(table["/users/7"]["pinned"], json!({"href": "/orders/1"}));
    }

    #[test]
    fn test_array_attributes_merge_by_index_across_embeds() {
        let document = json!({
            "_links": {"self": {"href": "/users/7"}},
            "_embedded": {
                "a": {"_links": {"self": {"href": "/orders/1"}}, "tags": [1, 2]},
                "b": {"_links": {"self": {"href": "/orders/1"}}, "tags": [9]}
            }
        });

        let table = normalize(&document, &NormalizeOptions::default());
        assert_eq!(table["/orders/1"]["tags"], json!([9, 2]));
    }

    #[test]
    fn test_virtual_key_synthesis_end_to_end() {
        let document = json!({
            "_links": {"self": {"href": "/orders/1"}},
            "_embedded": {
                "items": [
                    {"_links": {"self": {"href": "/items/1"}}, "n": 1},
                    {"_links": {"self": {"href": "/items/2"}}, "n": 2}
                ]
            }
        });

        let mut options = NormalizeOptions::default();
        options.embedded_standalone_list_key = Some("content".to_string());
        options.virtual_self_links = true;

        let table = normalize(&document, &options);
        assert_eq!(
            table["/orders/1#items"]["content"],
            json!([{"href": "/items/1"}, {"href": "/items/2"}])
        );
        assert_eq!(
            table["/orders/1"]["items"],
            json!({"href": "/orders/1#items", "virtual": true})
        );
        assert_eq!(table["/items/1"]["n"], json!(1));
        assert_eq!(table["/items/2"]["n"], json!(2));
    }

    #[test]
    fn test_standalone_collection_preference_end_to_end() {
        let document = json!({
            "_links": {
                "self": {"href": "/orders/1"},
                "items": {"href": "/orders/1/items"}
            },
            "_embedded": {
                "items": [
                    {"_links": {"self": {"href": "/items/1"}}, "n": 1},
                    {"_links": {"self": {"href": "/items/2"}}, "n": 2}
                ]
            }
        });

        let mut options = NormalizeOptions::default();
        options.embedded_standalone_list_key = Some("content".to_string());
        options.virtual_self_links = true;

        let table = normalize(&document, &options);
        assert_eq!(
            table["/orders/1/items"]["content"],
            json!([{"href": "/items/1"}, {"href": "/items/2"}])
        );
        assert_eq!(
            table["/orders/1"]["items"],
            json!({"href": "/orders/1/items"})
        );
        assert!(table.get("/orders/1#items").is_none());
    }

    #[test]
    fn test_custom_meta_key_name_preserved() {
        let mut options = NormalizeOptions::default();
        options.meta_key = "meta_info".to_string();

        let document = json!({
            "_links": {"self": {"href": "/orders/1"}},
            "meta_info": {"fetched_at": "2024-01-01"},
            "order_total": 30.0
        });

        let table = normalize(&document, &options);
        let entry = &table["/orders/1"];
        // the configured meta key keeps its exact name while other
        // attribute keys camelize
        assert_eq!(entry["meta_info"]["fetchedAt"], json!("2024-01-01"));
        assert_eq!(entry["meta_info"]["self"], json!("/orders/1"));
        assert_eq!(entry["orderTotal"], json!(30.0));
        assert!(entry.get("metaInfo").is_none());
    }

    #[test]
    fn test_recursive_embed_array_attribute_virtualized() {
        // reconciliation scans every identifier in the embed map, so an
        // array-valued attribute of a recursively embedded resource gets
        // its own virtual entry too
        let document = json!({
            "_links": {"self": {"href": "/orders/1"}},
            "_embedded": {
                "items": [
                    {"_links": {"self": {"href": "/items/1"}}, "tags": ["a", "b"]}
                ]
            }
        });

        let mut options = NormalizeOptions::default();
        options.embedded_standalone_list_key = Some("content".to_string());
        options.virtual_self_links = true;

        let table = normalize(&document, &options);
        assert_eq!(table["/items/1#tags"]["content"], json!(["a", "b"]));
        assert_eq!(
            table["/items/1"]["tags"],
            json!({"href": "/items/1#tags", "virtual": true})
        );
        assert_eq!(
            table["/orders/1"]["items"],
            json!({"href": "/orders/1#items", "virtual": true})
        );
        // every entry, virtual ones included, keys itself
        for (key, entry) in table.as_object().unwrap() {
            assert_eq!(entry["_meta"]["self"], json!(key), "entry {}", key);
        }
    }

    #[test]
    fn test_parse_document() {
        assert!(parse_document(r#"{"a": 1}"#).is_ok());
        assert!(parse_document("not json").is_err());
    }

    #[test]
    fn test_to_json_string() {
        let table = json!({"/a": {"_meta": {"self": "/a"}}});
        let compact = to_json_string(&table, false).unwrap();
        assert!(!compact.contains('\n'));
        let pretty = to_json_string(&table, true).unwrap();
        assert!(pretty.contains('\n'));
    }
}
