//! HAL+JSON Normalization Library
//!
//! This library normalizes a HAL+JSON hypermedia document (a tree of
//! resources linked via `_links` and embedded via `_embedded`) into a
//! flat table keyed by resource identifier, the shape consumed by
//! normalized client-side caches and reactive state stores.
//!
//! # Overview
//!
//! One pipeline, four cooperating stages, applied recursively:
//!
//! 1. Classifying each JSON value as a resource (has a self link with an
//!    href), a bare reference (an object containing only a self link),
//!    or an ordinary value
//! 2. Extracting each resource's link relations into a per-relation map
//!    of normalized links, with `self` recorded under the meta key
//! 3. Recursively normalizing embedded resources and replacing each with
//!    a link pointing at its table entry
//! 4. Reconciling embedded collections: storing them under their
//!    standalone link's href when one exists, or synthesizing a virtual
//!    `<uri>#<relation>` identifier when enabled
//!
//! Resources reached twice (once embedded, once merely linked) are
//! merged into a single entry; array-valued attributes merge
//! positionally, index by index.
//!
//! # Usage
//!
//! ```
//! use hal_normalize::{normalize, NormalizeOptions};
//! use serde_json::json;
//!
//! let document = json!({
//!     "_links": {"self": {"href": "/orders/1"}},
//!     "_embedded": {
//!         "items": [
//!             {"_links": {"self": {"href": "/items/1"}}, "n": 1}
//!         ]
//!     },
//!     "total": 30.0
//! });
//!
//! let table = normalize(&document, &NormalizeOptions::default());
//!
//! assert_eq!(table["/orders/1"]["total"], json!(30.0));
//! assert_eq!(table["/orders/1"]["items"], json!([{"href": "/items/1"}]));
//! assert_eq!(table["/items/1"]["n"], json!(1));
//! ```

pub mod camel;
pub mod classify;
pub mod embed;
pub mod error;
pub mod links;
pub mod merge;
pub mod normalize;
pub mod reconcile;

// Re-export main types for convenience
pub use crate::classify::{is_reference, is_resource, is_single_link};
pub use crate::error::NormalizeError;
pub use crate::links::Link;
pub use crate::normalize::{
    normalize, parse_document, to_json_string, NormalizeOptions, UriNormalizer,
};
