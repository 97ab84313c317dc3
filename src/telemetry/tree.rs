//! Dotted-path access into a device parameter tree.
//!
//! The device-management server returns a schema-less nested document whose
//! leaves are encoded as `[value, timestamp, type]`. Some servers use the
//! object form `{"_value": .., "_timestamp": .., "_type": ..}` instead; both are
//! accepted here so the rest of the crate never has to care.
//!
//! Every lookup is total: a missing segment, a leaf where a node was expected,
//! or an unexpected JSON shape all resolve to [`Param::Missing`] / `None`.

use serde_json::{Map, Value};

/// Metadata key prefix used by ACS documents (`_object`, `_writable`, ...).
const META_PREFIX: char = '_';

/// Typed view of a single position in the parameter tree.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Param<'a> {
    /// A terminal value with its optional timestamp and type tag
    Leaf(Leaf<'a>),
    /// An intermediate object holding further parameters
    Node(&'a Map<String, Value>),
    /// Nothing at this path
    Missing,
}

/// A decoded leaf.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leaf<'a> {
    pub value: &'a Value,
    pub timestamp: Option<&'a Value>,
    pub type_tag: Option<&'a str>,
}

impl<'a> Param<'a> {
    /// Classify a raw JSON value.
    pub fn from_value(value: &'a Value) -> Self {
        match value {
            Value::Array(items) if items.len() == 3 => Param::Leaf(Leaf {
                value: &items[0],
                timestamp: Some(&items[1]),
                type_tag: items[2].as_str(),
            }),
            Value::Object(map) => match map.get("_value") {
                Some(inner) => Param::Leaf(Leaf {
                    value: inner,
                    timestamp: map.get("_timestamp"),
                    type_tag: map.get("_type").and_then(Value::as_str),
                }),
                None => Param::Node(map),
            },
            Value::Null => Param::Missing,
            other => Param::Leaf(Leaf {
                value: other,
                timestamp: None,
                type_tag: None,
            }),
        }
    }

    /// The unwrapped leaf value, if this is a leaf.
    pub fn value(&self) -> Option<&'a Value> {
        match self {
            Param::Leaf(leaf) => Some(leaf.value),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Param::Missing)
    }
}

/// Walk `tree` by a dotted path and unwrap the leaf encoding.
///
/// Returns the raw value of a `[value, timestamp, type]` leaf, or the value
/// found at the path as-is when it is not a leaf. Missing segments yield `None`.
pub fn extract<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    let found = walk(tree, path)?;
    match Param::from_value(found) {
        Param::Leaf(leaf) => Some(leaf.value),
        Param::Node(_) => Some(found),
        Param::Missing => None,
    }
}

fn walk<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(tree);
    }
    path.split('.')
        .try_fold(tree, |current, segment| current.as_object()?.get(segment))
}

/// Owned parameter tree for a single device.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterTree {
    root: Value,
}

impl ParameterTree {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Typed lookup of a dotted path.
    pub fn lookup(&self, path: &str) -> Param<'_> {
        walk(&self.root, path).map_or(Param::Missing, Param::from_value)
    }

    /// See [`extract`].
    pub fn extract(&self, path: &str) -> Option<&Value> {
        extract(&self.root, path)
    }

    /// Leaf value rendered as text. Numbers and booleans are stringified,
    /// empty strings count as missing.
    pub fn text(&self, path: &str) -> Option<String> {
        match self.lookup(path).value()? {
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// Leaf value as a float, accepting numeric strings.
    pub fn number(&self, path: &str) -> Option<f64> {
        match self.lookup(path).value()? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Leaf value as an unsigned integer, accepting numeric strings.
    pub fn unsigned(&self, path: &str) -> Option<u64> {
        match self.lookup(path).value()? {
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Truthiness of a flag leaf: boolean `true` or the string `"true"`.
    pub fn flag(&self, path: &str) -> bool {
        match self.lookup(path).value() {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.trim().eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    /// Numeric child keys of the node at `path`, ascending.
    ///
    /// Metadata keys and non-numeric keys are skipped.
    pub fn indices(&self, path: &str) -> Vec<u32> {
        let Param::Node(map) = self.lookup(path) else {
            return Vec::new();
        };
        let mut indices: Vec<u32> = map
            .keys()
            .filter(|k| !k.starts_with(META_PREFIX))
            .filter_map(|k| k.parse().ok())
            .collect();
        indices.sort_unstable();
        indices
    }
}

impl From<Value> for ParameterTree {
    fn from(root: Value) -> Self {
        Self::new(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "InternetGatewayDevice": {
                "DeviceInfo": {
                    "Manufacturer": ["Huawei", "2024-05-01T10:00:00Z", "xsd:string"],
                    "UpTime": [3600, "2024-05-01T10:00:00Z", "xsd:unsignedInt"],
                    "Plain": "raw",
                    "Object": {"_value": "obj", "_timestamp": "t", "_type": "xsd:string"}
                },
                "Hosts": {
                    "_object": true,
                    "2": {},
                    "10": {},
                    "1": {},
                    "name": {}
                }
            }
        })
    }

    #[test]
    fn test_extract_unwraps_leaf_tuple() {
        let tree = sample();
        let value = extract(&tree, "InternetGatewayDevice.DeviceInfo.Manufacturer");
        assert_eq!(value, Some(&json!("Huawei")));
    }

    #[test]
    fn test_extract_returns_non_leaf_as_is() {
        let tree = sample();
        assert_eq!(
            extract(&tree, "InternetGatewayDevice.DeviceInfo.Plain"),
            Some(&json!("raw"))
        );
        let node = extract(&tree, "InternetGatewayDevice.DeviceInfo").unwrap();
        assert!(node.is_object());
    }

    #[test]
    fn test_extract_missing_segment_is_none() {
        let tree = sample();
        assert!(extract(&tree, "InternetGatewayDevice.Nope.Manufacturer").is_none());
        assert!(extract(&tree, "InternetGatewayDevice.DeviceInfo.Manufacturer.Deeper").is_none());
        assert!(extract(&json!("scalar"), "a.b").is_none());
        assert!(extract(&json!(null), "a").is_none());
    }

    #[test]
    fn test_extract_accepts_object_leaf_encoding() {
        let tree = sample();
        assert_eq!(
            extract(&tree, "InternetGatewayDevice.DeviceInfo.Object"),
            Some(&json!("obj"))
        );
    }

    #[test]
    fn test_two_element_array_is_not_a_leaf() {
        let tree = json!({"A": [1, 2]});
        assert_eq!(extract(&tree, "A"), Some(&json!([1, 2])));
    }

    #[test]
    fn test_lookup_classifies_positions() {
        let tree = ParameterTree::new(sample());
        assert!(matches!(
            tree.lookup("InternetGatewayDevice.DeviceInfo"),
            Param::Node(_)
        ));
        match tree.lookup("InternetGatewayDevice.DeviceInfo.UpTime") {
            Param::Leaf(leaf) => {
                assert_eq!(leaf.value, &json!(3600));
                assert_eq!(leaf.type_tag, Some("xsd:unsignedInt"));
                assert!(leaf.timestamp.is_some());
            }
            other => panic!("expected leaf, got {other:?}"),
        }
        assert!(tree.lookup("Missing.Path").is_missing());
    }

    #[test]
    fn test_typed_accessors() {
        let tree = ParameterTree::new(json!({
            "Num": ["-18.5", "t", "xsd:string"],
            "Int": [42, "t", "xsd:int"],
            "Empty": ["  ", "t", "xsd:string"],
            "Yes": ["true", "t", "xsd:string"],
            "YesBool": [true, "t", "xsd:boolean"],
            "No": [false, "t", "xsd:boolean"]
        }));
        assert_eq!(tree.number("Num"), Some(-18.5));
        assert_eq!(tree.unsigned("Int"), Some(42));
        assert_eq!(tree.text("Int").as_deref(), Some("42"));
        assert_eq!(tree.text("Empty"), None);
        assert!(tree.flag("Yes"));
        assert!(tree.flag("YesBool"));
        assert!(!tree.flag("No"));
        assert!(!tree.flag("Absent"));
    }

    #[test]
    fn test_indices_sorted_and_filtered() {
        let tree = ParameterTree::new(sample());
        assert_eq!(tree.indices("InternetGatewayDevice.Hosts"), vec![1, 2, 10]);
        assert!(tree.indices("InternetGatewayDevice.Absent").is_empty());
    }
}
