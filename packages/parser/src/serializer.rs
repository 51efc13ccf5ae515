use crate::ast::{Element, Fragment, Node};
use crate::entities::{escape_attribute, escape_text};
use crate::tags::{is_raw_text_tag, is_void_tag};

/// Serializer converts a fragment back to markup.
///
/// Output matches what a browser reports as `innerHTML` for the same tree, so
/// a canonical source string survives `parse` → `serialize` unchanged.
pub struct Serializer {
    buffer: String,
}

impl Serializer {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    pub fn serialize(mut self, fragment: &Fragment) -> String {
        self.write_nodes(&fragment.children, false);
        self.buffer
    }

    pub fn serialize_nodes(mut self, nodes: &[Node]) -> String {
        self.write_nodes(nodes, false);
        self.buffer
    }

    fn write_nodes(&mut self, nodes: &[Node], raw: bool) {
        for node in nodes {
            match node {
                Node::Text(text) if raw => self.buffer.push_str(text),
                Node::Text(text) => self.buffer.push_str(&escape_text(text)),
                Node::Element(el) => self.write_element(el),
            }
        }
    }

    fn write_element(&mut self, el: &Element) {
        self.buffer.push('<');
        self.buffer.push_str(&el.tag);
        for attr in &el.attributes {
            self.buffer.push(' ');
            self.buffer.push_str(&attr.name);
            self.buffer.push_str("=\"");
            self.buffer.push_str(&escape_attribute(&attr.value));
            self.buffer.push('"');
        }
        self.buffer.push('>');

        if is_void_tag(&el.tag) {
            return;
        }

        self.write_nodes(&el.children, is_raw_text_tag(&el.tag));

        self.buffer.push_str("</");
        self.buffer.push_str(&el.tag);
        self.buffer.push('>');
    }
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a fragment to markup
pub fn serialize(fragment: &Fragment) -> String {
    Serializer::new().serialize(fragment)
}

/// Serialize a run of sibling nodes to markup
pub fn serialize_nodes(nodes: &[Node]) -> String {
    Serializer::new().serialize_nodes(nodes)
}
