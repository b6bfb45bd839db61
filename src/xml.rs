//! XML to [`Node`] conversion.
//!
//! Conventions:
//! - an element with only text becomes [`Node::Text`]
//! - an empty element becomes [`Node::Null`]
//! - attributes become `@name` keys and mixed-in text becomes `#text`
//! - repeated sibling elements are folded into a [`Node::List`]

use crate::extraction::TEXT_KEY;
use crate::node::{Node, NodeMap};
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::path::Path;

/// Error type for XML reading
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("malformed XML: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("malformed XML attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("unexpected closing tag </{0}>")]
    UnbalancedClose(String),

    #[error("document ended inside <{0}>")]
    Unclosed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Default)]
struct Element {
    name: String,
    children: NodeMap,
    text: String,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> Result<Self, XmlError> {
        let mut element = Element {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            ..Element::default()
        };

        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = format!("@{}", String::from_utf8_lossy(attribute.key.as_ref()));
            let value = attribute.unescape_value()?.into_owned();
            element.children.insert(key, Node::Text(value));
        }

        Ok(element)
    }

    fn add_child(&mut self, name: String, node: Node) {
        match self.children.get_mut(&name) {
            Some(Node::List(items)) => items.push(node),
            Some(existing) => {
                let first = std::mem::take(existing);
                *existing = Node::List(vec![first, node]);
            }
            None => {
                self.children.insert(name, node);
            }
        }
    }

    fn close(self) -> (String, Node) {
        let Element {
            name,
            mut children,
            text,
        } = self;

        let node = if children.is_empty() {
            if text.is_empty() {
                Node::Null
            } else {
                Node::Text(text)
            }
        } else {
            if !text.is_empty() {
                children.insert(TEXT_KEY.to_string(), Node::Text(text));
            }
            Node::Map(children)
        };

        (name, node)
    }
}

/// Parse an XML document into a map of its top-level elements.
pub fn xml_str_to_node(content: &str) -> Result<NodeMap, XmlError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut root = Element::default();
    let mut stack: Vec<Element> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(Element::open(&start)?),
            Event::Empty(start) => {
                let (name, node) = Element::open(&start)?.close();
                stack.last_mut().unwrap_or(&mut root).add_child(name, node);
            }
            Event::End(end) => {
                let element = stack.pop().ok_or_else(|| {
                    XmlError::UnbalancedClose(String::from_utf8_lossy(end.name().as_ref()).into_owned())
                })?;
                let (name, node) = element.close();
                stack.last_mut().unwrap_or(&mut root).add_child(name, node);
            }
            Event::Text(text) => {
                if let Some(element) = stack.last_mut() {
                    element.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(element) = stack.last_mut() {
                    element.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed(open.name));
    }

    Ok(root.children)
}

/// Read and parse an XML file. See [`xml_str_to_node`].
pub fn xml_path_to_node(path: impl AsRef<Path>) -> Result<NodeMap, XmlError> {
    let content = std::fs::read_to_string(path.as_ref())?;
    xml_str_to_node(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_elements_become_text() {
        let doc = xml_str_to_node("<ModMetaData><name>Foo</name><empty/></ModMetaData>").unwrap();
        let meta = doc.get("ModMetaData").unwrap();

        assert_eq!(meta.get("name"), Some(&Node::text("Foo")));
        assert_eq!(meta.get("empty"), Some(&Node::Null));
    }

    #[test]
    fn test_repeated_elements_become_list() {
        let doc = xml_str_to_node(
            "<root><versions><li>1.4</li><li>1.5</li><li>1.6</li></versions></root>",
        )
        .unwrap();
        let versions = doc.get("root").and_then(|r| r.get("versions")).unwrap();

        assert_eq!(
            versions.get("li"),
            Some(&Node::List(vec![
                Node::text("1.4"),
                Node::text("1.5"),
                Node::text("1.6")
            ]))
        );
    }

    #[test]
    fn test_attributes_and_text() {
        let doc = xml_str_to_node(
            r#"<root><name IgnoreIfNoMatchingField="True">Foo &amp; Bar</name></root>"#,
        )
        .unwrap();
        let name = doc.get("root").and_then(|r| r.get("name")).unwrap();

        assert_eq!(name.get("@IgnoreIfNoMatchingField"), Some(&Node::text("True")));
        assert_eq!(name.get("#text"), Some(&Node::text("Foo & Bar")));
    }

    #[test]
    fn test_declaration_comments_and_bom_are_skipped() {
        let doc = xml_str_to_node(
            "\u{feff}<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!-- about -->\n<ModMetaData>\n  <packageId>a.b</packageId>\n</ModMetaData>\n",
        )
        .unwrap();

        assert_eq!(
            doc.get("ModMetaData").and_then(|m| m.get("packageId")),
            Some(&Node::text("a.b"))
        );
    }

    #[test]
    fn test_cdata_is_text() {
        let doc = xml_str_to_node("<root><description><![CDATA[<b>bold</b>]]></description></root>")
            .unwrap();
        assert_eq!(
            doc.get("root").and_then(|r| r.get("description")),
            Some(&Node::text("<b>bold</b>"))
        );
    }

    #[test]
    fn test_mismatched_tags_fail() {
        assert!(xml_str_to_node("<root><a></b></root>").is_err());
        assert!(matches!(
            xml_str_to_node("<root><a>"),
            Err(XmlError::Unclosed(_)) | Err(XmlError::Syntax(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = xml_path_to_node("/definitely/not/here/About.xml");
        assert!(matches!(result, Err(XmlError::Io(_))));
    }
}
