//! simplexml - XML to generic value trees and back
//!
//! Converts configuration-style XML documents into a dynamically shaped
//! tree of text scalars, maps, and lists, and converts such trees back
//! into pretty-printed XML:
//!
//! ```
//! use simplexml::{parse, stringify};
//!
//! let tree = parse("<config><name>demo</name><port>8080</port></config>")?;
//! let map = tree.as_map().unwrap();
//! assert_eq!(map.get("port").and_then(|v| v.as_text()), Some("8080"));
//!
//! let xml = stringify(&tree, "config");
//! assert!(xml.starts_with("<?xml version=\"1.0\"?>"));
//! # Ok::<(), simplexml::Error>(())
//! ```
//!
//! Repeated same-name siblings merge into a list; attributes flatten
//! into the element's map, or route to a nested `_Attribs` map with
//! [`Options::preserve_attributes`]; an element carrying both structure
//! and direct text stores the text under `_Data`. The outermost element
//! is elided: its contents become the returned tree directly.
//!
//! Serialization re-sorts map keys alphabetically (case-insensitively)
//! for deterministic output; list order is preserved.

mod core;
mod error;
mod options;
mod reader;
mod tree;

pub use crate::core::entities::{decode_entities, encode_attrib_entities, encode_entities};
pub use error::{Error, Position};
pub use options::Options;
pub use tree::value::{
    always_array, first_key, hash_keys, is_array, is_hash, num_keys, Map, Value, ATTRIBS_KEY,
    DATA_KEY,
};

use std::path::Path;
use tracing::{debug, trace};

/// Parse an XML document with default options.
pub fn parse(input: &str) -> Result<Value, Error> {
    parse_with(input, &Options::default())
}

/// Parse an XML document.
///
/// The returned tree is the contents of the document's outermost
/// element; the element's own name does not appear in it.
pub fn parse_with(input: &str, options: &Options) -> Result<Value, Error> {
    trace!(len = input.len(), "parsing document");
    let tree = tree::TreeBuilder::new(input.as_bytes(), *options).build()?;
    debug!(root = tree.type_name(), "parsed document");
    Ok(tree)
}

/// Read a file in full and parse it with default options.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Value, Error> {
    parse_file_with(path, &Options::default())
}

/// Read a file in full and parse it.
///
/// The read is a single blocking operation before parsing begins; file
/// system failures surface as [`Error::Io`].
pub fn parse_file_with(path: impl AsRef<Path>, options: &Options) -> Result<Value, Error> {
    let path = path.as_ref();
    trace!(path = %path.display(), "reading document");
    let input = std::fs::read_to_string(path)?;
    parse_with(&input, options)
}

/// Serialize a tree to pretty-printed XML under the given root element
/// name. Never fails for well-formed trees.
pub fn stringify(value: &Value, root: &str) -> String {
    let out = tree::writer::stringify(value, root);
    trace!(len = out.len(), "serialized document");
    out
}
