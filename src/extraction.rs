//! Shape normalization for descriptor values.
//!
//! Descriptor trees carry wrapper elements and attribute markers that have
//! nothing to do with the value a field holds. The helpers here peel those
//! layers off so callers only need to handle text, lists and structured maps.

use crate::node::{Node, NodeMap};

/// Attribute that marks a field as optional for the game's XML loader.
pub const IGNORE_IF_NO_MATCHING_FIELD: &str = "@IgnoreIfNoMatchingField";

/// Key holding an element's text when it also has attributes.
pub const TEXT_KEY: &str = "#text";

/// Element name used for list items.
pub const LIST_ITEM_TAG: &str = "li";

/// The normalized shape of a descriptor value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Extracted<'a> {
    Text(&'a str),
    List(&'a [Node]),
    /// Structured content left for the caller to interpret
    Map(&'a NodeMap),
    Empty,
}

impl<'a> Extracted<'a> {
    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            Extracted::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&'a [Node]> {
        match self {
            Extracted::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Extract the value held by a descriptor node.
///
/// Stops at the outermost text or list. A map with a single entry is a
/// wrapper and is recursed into; a map holding just the
/// `IgnoreIfNoMatchingField` attribute and text yields the text. Any other
/// map is returned as is.
///
/// # Example
/// ```
/// use modmeta::{extract_value, Extracted, Node};
///
/// let node: Node = serde_json::from_str(r#"{"li": ["1.4", "1.5"]}"#).unwrap();
/// assert!(matches!(extract_value(&node), Extracted::List(items) if items.len() == 2));
/// ```
pub fn extract_value(node: &Node) -> Extracted<'_> {
    match node {
        Node::Null => Extracted::Empty,
        Node::Text(s) => Extracted::Text(s),
        Node::List(items) => Extracted::List(items),
        Node::Map(map) => {
            if map.len() == 1 {
                if let Some((_, inner)) = map.first() {
                    return extract_value(inner);
                }
            }
            if is_marked_text(map) {
                if let Some(text) = map.get(TEXT_KEY) {
                    return extract_value(text);
                }
            }
            Extracted::Map(map)
        }
    }
}

/// Extract `key` from a map, `None` when the key is absent.
pub fn extract_field<'a>(map: &'a NodeMap, key: &str) -> Option<Extracted<'a>> {
    map.get(key).map(extract_value)
}

/// Text value of `key`, if present and text-shaped.
pub fn extract_text<'a>(map: &'a NodeMap, key: &str) -> Option<&'a str> {
    extract_field(map, key).and_then(|v| v.as_text())
}

/// Flatten a collection-shaped field into its entries.
///
/// `li` wrappers are unwrapped at any depth, lists yield their items, and a
/// bare text or structured map counts as a one-entry collection.
pub fn collect_entries(node: &Node) -> Vec<&Node> {
    match node {
        Node::Null => Vec::new(),
        Node::Text(_) => vec![node],
        Node::List(items) => items.iter().flat_map(collect_list_item).collect(),
        Node::Map(map) => {
            if map.len() == 1 {
                if let Some(items) = map.get(LIST_ITEM_TAG) {
                    return collect_entries(items);
                }
            }
            if is_marked_text(map) {
                return map.get(TEXT_KEY).into_iter().collect();
            }
            vec![node]
        }
    }
}

// Items of a list are entries themselves; only nested lists and `li`
// wrappers are flattened further.
fn collect_list_item(node: &Node) -> Vec<&Node> {
    match node {
        Node::List(_) => collect_entries(node),
        Node::Map(map) if map.len() == 1 && map.contains_key(LIST_ITEM_TAG) => {
            collect_entries(node)
        }
        Node::Null => Vec::new(),
        _ => vec![node],
    }
}

fn is_marked_text(map: &NodeMap) -> bool {
    map.len() == 2 && map.contains_key(IGNORE_IF_NO_MATCHING_FIELD) && map.contains_key(TEXT_KEY)
}
