//! Helpers for reading interchange nodes.
//!
//! A commit object is an untyped JSON tree. Objects carrying a
//! `speckle_type` field are *typed* nodes; their children live either in
//! dynamic properties (names starting with `@`) or in a few well-known
//! fields. Everything here reads the tree; nothing mutates it.

use serde_json::{Map, Value};

/// Field holding the discriminator of a typed node.
pub const SPECKLE_TYPE_KEY: &str = "speckle_type";

/// Field holding the unit tag of a node.
pub const UNITS_KEY: &str = "units";

/// Prefix marking dynamic (detached or extension) properties.
pub const DYNAMIC_PROPERTY_PREFIX: &str = "@";

/// Well-known child-bearing fields of a typed node, in traversal order.
pub const CHILD_PROPERTIES: [&str; 3] = ["displayMesh", "displayValue", "data"];

/// Return the object if `node` is a typed node.
pub fn as_typed(node: &Value) -> Option<&Map<String, Value>> {
    node.as_object().filter(|obj| obj.contains_key(SPECKLE_TYPE_KEY))
}

/// Discriminator of a typed node, if it is a string.
pub fn speckle_type(node: &Value) -> Option<&str> {
    as_typed(node)?.get(SPECKLE_TYPE_KEY)?.as_str()
}

/// Check whether a field name marks a dynamic property.
pub fn is_dynamic_property(name: &str) -> bool {
    name.starts_with(DYNAMIC_PROPERTY_PREFIX)
}

/// Child-bearing values of a typed node.
///
/// Dynamic properties come first in declaration order, followed by the
/// well-known fields in the fixed order of [`CHILD_PROPERTIES`].
pub fn child_properties(obj: &Map<String, Value>) -> Vec<&Value> {
    let mut children: Vec<&Value> = obj
        .iter()
        .filter(|(name, _)| is_dynamic_property(name))
        .map(|(_, value)| value)
        .collect();

    children.extend(CHILD_PROPERTIES.iter().filter_map(|name| obj.get(*name)));
    children
}

/// Read a numeric field.
pub fn get_f64(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    obj.get(key)?.as_f64()
}

/// Read a string field.
pub fn get_str<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    obj.get(key)?.as_str()
}

/// Read a flat array of numbers. Returns `None` if any entry is not a number.
pub fn numbers(value: &Value) -> Option<Vec<f64>> {
    value.as_array()?.iter().map(Value::as_f64).collect()
}
