//! Generic tree values
//!
//! The dynamically shaped tree both sides of the conversion share:
//! text scalars, maps keyed by element/attribute name, and lists of
//! repeated same-name siblings. A list never nests directly inside
//! another list; it only ever appears as the value bound to a map key.

use std::collections::BTreeMap;

/// Key under which mixed-content text is stored alongside attributes
/// and child elements. Inserted lower-cased when case folding is on.
pub const DATA_KEY: &str = "_Data";

/// Key under which attributes are stored when attribute preservation is
/// on. Inserted lower-cased when case folding is on.
pub const ATTRIBS_KEY: &str = "_Attribs";

/// Ordered unique-key mapping of element/attribute names to values.
pub type Map = BTreeMap<String, Value>;

/// A node in the generic tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Decoded character data, held verbatim; never type-coerced
    Text(String),
    /// An element with attributes and/or child elements
    Map(Map),
    /// Two or more same-name siblings, in document order
    List(Vec<Value>),
}

impl Value {
    /// Returns true if this is a text scalar
    pub fn is_text(&self) -> bool {
        matches!(self, Value::Text(_))
    }

    /// Returns true if this is a map
    pub fn is_map(&self) -> bool {
        matches!(self, Value::Map(_))
    }

    /// Returns true if this is a list
    pub fn is_list(&self) -> bool {
        matches!(self, Value::List(_))
    }

    /// The variant name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Map(_) => "map",
            Value::List(_) => "list",
        }
    }

    /// Attempts to view this value as text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to view this value as a map
    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Attempts to view this value as a mutable map
    pub fn as_map_mut(&mut self) -> Option<&mut Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Attempts to view this value as a list
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Attempts to view this value as a mutable list
    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

/// True if the key is the mixed-content text marker, in either casing.
pub(crate) fn is_data_key(key: &str) -> bool {
    key == DATA_KEY || key == "_data"
}

/// True if the key is the attribute sub-map marker, in either casing.
pub(crate) fn is_attribs_key(key: &str) -> bool {
    key == ATTRIBS_KEY || key == "_attribs"
}

/// Return a value's list contents, wrapping a non-list value in a
/// one-element vector. Total; never fails.
pub fn always_array(value: Value) -> Vec<Value> {
    match value {
        Value::List(items) => items,
        other => vec![other],
    }
}

/// A map's keys in enumeration order. Callers needing another order
/// sort separately.
pub fn hash_keys(map: &Map) -> Vec<&str> {
    map.keys().map(String::as_str).collect()
}

/// True if the value is a map
pub fn is_hash(value: &Value) -> bool {
    value.is_map()
}

/// True if the value is a list
pub fn is_array(value: &Value) -> bool {
    value.is_list()
}

/// Number of keys in a map
pub fn num_keys(map: &Map) -> usize {
    map.len()
}

/// An arbitrary (enumeration-order) key from a map, or `None` when the
/// map is empty.
pub fn first_key(map: &Map) -> Option<&str> {
    map.keys().next().map(String::as_str)
}
