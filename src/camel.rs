//! Key camelization
//!
//! Converts relation and attribute keys to lowerCamelCase following the
//! word-splitting rules of lodash `camelCase`: words break on
//! non-alphanumeric separators, lower-to-upper case transitions,
//! letter/digit transitions, and the end of an uppercase run followed by
//! a lowercase letter ("HTMLParser" -> "htmlParser"). Each word is
//! lowercased before the non-initial ones are capitalized.

use serde_json::Value;

/// Convert a key to lowerCamelCase
pub fn camel_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for (i, word) in split_words(input).iter().enumerate() {
        let lower = word.to_lowercase();
        if i == 0 {
            out.push_str(&lower);
        } else {
            let mut chars = lower.chars();
            if let Some(first) = chars.next() {
                out.extend(first.to_uppercase());
                out.push_str(chars.as_str());
            }
        }
    }
    out
}

fn split_words(input: &str) -> Vec<String> {
    let chars: Vec<char> = input.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            flush(&mut current, &mut words);
            continue;
        }
        if !current.is_empty() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).map_or(false, |n| n.is_lowercase());
            let boundary = (prev.is_lowercase() && c.is_uppercase())
                || (prev.is_alphabetic() && c.is_numeric())
                || (prev.is_numeric() && c.is_alphabetic())
                || (prev.is_uppercase() && c.is_uppercase() && next_lower);
            if boundary {
                flush(&mut current, &mut words);
            }
        }
        current.push(c);
    }
    flush(&mut current, &mut words);
    words
}

fn flush(current: &mut String, words: &mut Vec<String>) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

/// Recursively camelize every object key inside a value
///
/// Arrays are mapped element-wise, objects get their keys camelized and
/// their values recursed into, scalars are returned as-is. Applied to
/// attribute values and to extracted embed links so nested payload keys
/// come out camelized too.
pub fn camelize_nested_keys(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(camelize_nested_keys).collect()),
        Value::Object(obj) => Value::Object(
            obj.iter()
                .map(|(key, v)| (camel_case(key), camelize_nested_keys(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}
