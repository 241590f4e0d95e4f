//! Deep merge with positional array semantics
//!
//! The merge used whenever a partial table is folded into the growing
//! output. Objects merge recursively key-by-key; arrays merge
//! element-by-element by index, the shorter array being extended by the
//! longer one's tail; scalars and mismatched shapes are overwritten by
//! the source. Positional array merging is load-bearing: two partial
//! records for the same identifier with array-valued attributes `[1, 2]`
//! and `[9]` merge to `[9, 2]`, never `[1, 2, 9]`.

use serde_json::Value;

/// Merge `source` into `dest` in place
pub fn deep_merge(dest: &mut Value, source: &Value) {
    match (dest, source) {
        (Value::Object(dest_obj), Value::Object(source_obj)) => {
            for (key, value) in source_obj {
                match dest_obj.get_mut(key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        dest_obj.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (Value::Array(dest_arr), Value::Array(source_arr)) => {
            for (i, value) in source_arr.iter().enumerate() {
                if i < dest_arr.len() {
                    deep_merge(&mut dest_arr[i], value);
                } else {
                    dest_arr.push(value.clone());
                }
            }
        }
        (dest, source) => {
            *dest = source.clone();
        }
    }
}
