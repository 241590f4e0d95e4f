//! Collection reconciliation and virtual-key synthesis
//!
//! Merges the link map and embed map for a resource and gives embedded
//! collections an addressable identity. An embedded array whose relation
//! also carries a single standalone link is stored under that link's
//! href (the authoritative collection URI). An embedded array with no
//! standalone link gets a synthesized virtual identifier
//! `<uri>#<relation>`, and the owning relation is rewritten to point at
//! it. Link-only array relations (collections linked but never embedded)
//! are virtualized the same way. This is the only place the pipeline
//! invents identifiers; every other table key comes from a self link in
//! the source document.

use serde_json::{Map, Value};

use crate::classify::is_single_link;
use crate::merge::deep_merge;
use crate::normalize::NormalizeOptions;

/// Build the table fragment for one virtual collection
///
/// Produces the `<uri>#<relation>` entry holding the collection contents
/// under the configured list key, with meta recording that the entry is
/// virtual and which resource/relation produced it, plus the rewritten
/// owning relation: a `{href, virtual: true}` link.
pub fn virtual_entry(
    uri: &str,
    relation: &str,
    content: &Value,
    options: &NormalizeOptions,
) -> Value {
    let virtual_key = format!("{}#{}", uri, relation);
    let list_key = options
        .embedded_standalone_list_key
        .clone()
        .unwrap_or_default();

    let mut meta = Map::new();
    meta.insert("self".to_string(), Value::String(virtual_key.clone()));
    meta.insert("virtual".to_string(), Value::Bool(true));
    meta.insert("owningResource".to_string(), Value::String(uri.to_string()));
    meta.insert(
        "owningRelation".to_string(),
        Value::String(relation.to_string()),
    );

    let mut entry = Map::new();
    entry.insert(list_key, content.clone());
    entry.insert(options.meta_key.clone(), Value::Object(meta));

    let mut link = Map::new();
    link.insert("href".to_string(), Value::String(virtual_key.clone()));
    link.insert("virtual".to_string(), Value::Bool(true));

    let mut owner = Map::new();
    owner.insert(relation.to_string(), Value::Object(link));

    let mut table = Map::new();
    table.insert(virtual_key, Value::Object(entry));
    table.insert(uri.to_string(), Value::Object(owner));
    Value::Object(table)
}

fn remove_relation(table: &mut Value, uri: &str, relation: &str) {
    if let Some(record) = table.get_mut(uri).and_then(Value::as_object_mut) {
        record.remove(relation);
    }
}

fn set_relation(table: &mut Value, uri: &str, relation: &str, value: Value) {
    if let Some(record) = table.get_mut(uri).and_then(Value::as_object_mut) {
        record.insert(relation.to_string(), value);
    }
}

/// Reconcile the embed map and link map into one table
///
/// Starts from their union (links first, embeds merged on top) and then
/// rewrites array-valued relations per the rules above. Scans every
/// identifier present in the embed map, so collections of recursively
/// embedded resources are reconciled too.
pub fn merge_standalone_collections(
    embedded: &Value,
    links: &Value,
    options: &NormalizeOptions,
) -> Value {
    let list_key = options.embedded_standalone_list_key.as_deref().unwrap_or("");

    let mut out = links.clone();
    deep_merge(&mut out, embedded);

    let embedded_map = match embedded.as_object() {
        Some(map) => map,
        None => return out,
    };

    for (uri, record) in embedded_map {
        let relations = match record.as_object() {
            Some(map) => map,
            None => continue,
        };

        for (relation, value) in relations {
            if !value.is_array() {
                continue;
            }

            let standalone = links
                .get(uri)
                .and_then(|r| r.get(relation))
                .filter(|link| is_single_link(link));

            if let Some(link) = standalone {
                // standalone link provided: store the embedded list under
                // the collection's own href
                let href = match link.get("href").and_then(Value::as_str) {
                    Some(href) => href.to_string(),
                    None => continue,
                };
                set_relation(&mut out, uri, relation, link.clone());

                let mut meta = Map::new();
                meta.insert("self".to_string(), Value::String(href.clone()));
                let mut entry = Map::new();
                entry.insert(list_key.to_string(), value.clone());
                entry.insert(options.meta_key.clone(), Value::Object(meta));
                if let Some(table) = out.as_object_mut() {
                    table.insert(href, Value::Object(entry));
                }
            } else if options.virtual_self_links && relation != list_key {
                // no standalone link: synthesize a virtual key
                remove_relation(&mut out, uri, relation);
                deep_merge(&mut out, &virtual_entry(uri, relation, value, options));
            }
        }

        // link-only collections: relations carrying a link array that
        // were never embedded under the same name
        if options.virtual_self_links {
            if let Some(link_relations) = links.get(uri).and_then(Value::as_object) {
                for (relation, value) in link_relations {
                    if relations.contains_key(relation) || relation == list_key {
                        continue;
                    }
                    if value.is_array() {
                        remove_relation(&mut out, uri, relation);
                        deep_merge(&mut out, &virtual_entry(uri, relation, value, options));
                    }
                }
            }
        }
    }

    out
}
