use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tags::{is_block_tag, is_void_tag};

/// Path from the fragment root to a node, as child indices.
///
/// The empty path addresses the fragment root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath(pub Vec<usize>);

impl NodePath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Index of the addressed node within its parent
    pub fn last(&self) -> Option<usize> {
        self.0.last().copied()
    }

    pub fn parent(&self) -> Option<NodePath> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    pub fn child(&self, index: usize) -> NodePath {
        let mut path = self.0.clone();
        path.push(index);
        Self(path)
    }

    /// Truncate to the first `depth` indices
    pub fn ancestor(&self, depth: usize) -> NodePath {
        Self(self.0[..depth.min(self.0.len())].to_vec())
    }

    pub fn starts_with(&self, other: &NodePath) -> bool {
        self.0.starts_with(&other.0)
    }

    /// Length of the shared prefix of two paths
    pub fn common_prefix_len(&self, other: &NodePath) -> usize {
        self.0
            .iter()
            .zip(other.0.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/")?;
        let parts: Vec<String> = self.0.iter().map(|i| i.to_string()).collect();
        write!(f, "{}", parts.join("/"))
    }
}

/// Element attribute (source order is preserved)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Element node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children = children;
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing the value in place if it already exists
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let pos = self.attributes.iter().position(|a| a.name == name)?;
        Some(self.attributes.remove(pos).value)
    }

    pub fn is_void(&self) -> bool {
        is_void_tag(&self.tag)
    }

    pub fn is_block(&self) -> bool {
        is_block_tag(&self.tag)
    }

    /// A shallow copy: same tag and attributes, no children
    pub fn clone_empty(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            attributes: self.attributes.clone(),
            children: Vec::new(),
        }
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }
}

/// Document fragment node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    Text(String),
    Element(Element),
}

impl Node {
    pub fn text(content: impl Into<String>) -> Self {
        Node::Text(content.into())
    }

    pub fn element(element: Element) -> Self {
        Node::Element(element)
    }

    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(content) => Some(content),
            Node::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        }
    }

    pub fn tag(&self) -> Option<&str> {
        self.as_element().map(|el| el.tag.as_str())
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Element(el) => &el.children,
            Node::Text(_) => &[],
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Element(el) => Some(&mut el.children),
            Node::Text(_) => None,
        }
    }

    pub fn is_block(&self) -> bool {
        self.as_element().map(Element::is_block).unwrap_or(false)
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    /// Length of the text content in chars
    pub fn text_len(&self) -> usize {
        match self {
            Node::Text(content) => content.chars().count(),
            Node::Element(el) => el.children.iter().map(Node::text_len).sum(),
        }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(content) => out.push_str(content),
            Node::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// Root of an editable document: an ordered list of top-level nodes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub children: Vec<Node>,
}

impl Fragment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_children(children: Vec<Node>) -> Self {
        Self { children }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn text_content(&self) -> String {
        self.children.iter().map(Node::text_content).collect()
    }

    pub fn text_len(&self) -> usize {
        self.children.iter().map(Node::text_len).sum()
    }

    /// Node addressed by `path`. The root path addresses no node.
    pub fn node_at(&self, path: &NodePath) -> Option<&Node> {
        let (first, rest) = path.as_slice().split_first()?;
        let mut node = self.children.get(*first)?;
        for index in rest {
            node = node.children().get(*index)?;
        }
        Some(node)
    }

    pub fn node_at_mut(&mut self, path: &NodePath) -> Option<&mut Node> {
        let (first, rest) = path.as_slice().split_first()?;
        let mut node = self.children.get_mut(*first)?;
        for index in rest {
            node = node.children_mut()?.get_mut(*index)?;
        }
        Some(node)
    }

    /// Child list of the root or of the element at `path`; `None` for text nodes
    pub fn children_at(&self, path: &NodePath) -> Option<&Vec<Node>> {
        if path.is_root() {
            return Some(&self.children);
        }
        match self.node_at(path)? {
            Node::Element(el) => Some(&el.children),
            Node::Text(_) => None,
        }
    }

    pub fn children_at_mut(&mut self, path: &NodePath) -> Option<&mut Vec<Node>> {
        if path.is_root() {
            return Some(&mut self.children);
        }
        self.node_at_mut(path)?.children_mut()
    }

    /// Whether `path` addresses an existing text node
    pub fn is_text_at(&self, path: &NodePath) -> bool {
        matches!(self.node_at(path), Some(Node::Text(_)))
    }

    /// Paths of every text node, in document order
    pub fn text_paths(&self) -> Vec<NodePath> {
        fn walk(nodes: &[Node], prefix: &mut Vec<usize>, out: &mut Vec<NodePath>) {
            for (i, node) in nodes.iter().enumerate() {
                prefix.push(i);
                match node {
                    Node::Text(_) => out.push(NodePath(prefix.clone())),
                    Node::Element(el) => walk(&el.children, prefix, out),
                }
                prefix.pop();
            }
        }

        let mut out = Vec::new();
        walk(&self.children, &mut Vec::new(), &mut out);
        out
    }
}
