//! Document tree nodes
//!
//! [`Node`] is the tree JSON documents parse into. Values can be scalars
//! (string, int, float, bool, null), sequences (arrays), or mappings
//! (objects). [`NodeKind`] names the shape of a node in any format and is
//! what traversal errors report.

use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;

/// A node of a parsed document
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
#[serde(untagged)]
pub enum Node {
    /// Null value
    #[default]
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
    /// Sequence of nodes
    Sequence(Vec<Node>),
    /// Mapping of string keys to nodes, in document order
    Mapping(IndexMap<String, Node>),
}

/// Shape of a node, independent of format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Null,
    Bool,
    Number,
    String,
    Sequence,
    Mapping,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Null => NodeKind::Null,
            Node::Bool(_) => NodeKind::Bool,
            Node::Integer(_) | Node::Float(_) => NodeKind::Number,
            Node::String(_) => NodeKind::String,
            Node::Sequence(_) => NodeKind::Sequence,
            Node::Mapping(_) => NodeKind::Mapping,
        }
    }

    /// Check if this node is null
    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    /// Get as slice if this is a Sequence
    pub fn as_sequence(&self) -> Option<&[Node]> {
        match self {
            Node::Sequence(s) => Some(s),
            _ => None,
        }
    }

    /// Get as mapping if this is a Mapping
    pub fn as_mapping(&self) -> Option<&IndexMap<String, Node>> {
        match self {
            Node::Mapping(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Null => "null",
            NodeKind::Bool => "boolean",
            NodeKind::Number => "number",
            NodeKind::String => "string",
            NodeKind::Sequence => "sequence",
            NodeKind::Mapping => "mapping",
        };
        f.write_str(name)
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Node::Bool(b)
    }
}

impl From<i64> for Node {
    fn from(i: i64) -> Self {
        Node::Integer(i)
    }
}

impl From<f64> for Node {
    fn from(f: f64) -> Self {
        Node::Float(f)
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::String(s)
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::String(s.to_string())
    }
}

impl<T: Into<Node>> From<Vec<T>> for Node {
    fn from(v: Vec<T>) -> Self {
        Node::Sequence(v.into_iter().map(Into::into).collect())
    }
}

impl From<IndexMap<String, Node>> for Node {
    fn from(m: IndexMap<String, Node>) -> Self {
        Node::Mapping(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_deserialize_json_shapes() {
        let node: Node =
            serde_json::from_str(r#"{"s":"x","i":1,"f":1.5,"b":true,"n":null,"l":[1]}"#).unwrap();
        let map = node.as_mapping().unwrap();

        assert_eq!(map["s"].kind(), NodeKind::String);
        assert_eq!(map["i"], Node::Integer(1));
        assert_eq!(map["f"], Node::Float(1.5));
        assert_eq!(map["b"], Node::Bool(true));
        assert!(map["n"].is_null());
        assert_eq!(map["l"].as_sequence().unwrap().len(), 1);
    }

    #[test]
    fn test_mapping_keeps_document_order() {
        let node: Node = serde_json::from_str(r#"{"z":"1","a":"2","m":"3"}"#).unwrap();
        let keys: Vec<_> = node.as_mapping().unwrap().keys().cloned().collect();

        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Node::Null.kind(), NodeKind::Null);
        assert_eq!(Node::from(true).kind(), NodeKind::Bool);
        assert_eq!(Node::from(3i64).kind(), NodeKind::Number);
        assert_eq!(Node::from(2.5).kind(), NodeKind::Number);
        assert_eq!(Node::from("x").kind(), NodeKind::String);
        assert_eq!(Node::from(vec!["a"]).kind(), NodeKind::Sequence);
        assert_eq!(Node::from(IndexMap::new()).kind(), NodeKind::Mapping);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(NodeKind::Bool.to_string(), "boolean");
        assert_eq!(NodeKind::Mapping.to_string(), "mapping");
    }
}
