//! Generic descriptor tree.
//!
//! A deserialized descriptor is a tree of text, lists and string-keyed maps.
//! Map order follows document order.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// String-keyed, order-preserving map of child nodes.
pub type NodeMap = IndexMap<String, Node>;

/// One value in a descriptor tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// Element with neither text, attributes nor children
    #[default]
    Null,
    Text(String),
    List(Vec<Node>),
    Map(NodeMap),
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&NodeMap> {
        match self {
            Node::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Child lookup on a map node; `None` for every other shape.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Short human-readable summary used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Node::Null => "<empty>".to_string(),
            Node::Text(s) => format!("{:?}", s),
            Node::List(items) => format!("<list of {}>", items.len()),
            Node::Map(m) => {
                let keys: Vec<&str> = m.keys().map(String::as_str).collect();
                format!("<map {{{}}}>", keys.join(", "))
            }
        }
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Node::Text(value.to_string())
    }
}

impl From<NodeMap> for Node {
    fn from(value: NodeMap) -> Self {
        Node::Map(value)
    }
}
