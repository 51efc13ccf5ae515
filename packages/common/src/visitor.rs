use autoletter_parser::ast::*;

/// Visitor pattern for traversing fragment nodes immutably
///
/// This trait provides default implementations that walk the entire tree.
/// Override specific visit_* methods to perform custom actions on nodes.
pub trait Visitor: Sized {
    fn visit_fragment(&mut self, fragment: &Fragment) {
        walk_fragment(self, fragment);
    }

    fn visit_node(&mut self, node: &Node) {
        walk_node(self, node);
    }

    fn visit_element(&mut self, element: &Element) {
        walk_element(self, element);
    }

    fn visit_attribute(&mut self, _element: &Element, _attribute: &Attribute) {
        // Leaf, no children to walk
    }

    fn visit_text(&mut self, _text: &str) {
        // Leaf, no children to walk
    }
}

/// Mutable visitor pattern for transforming fragments
///
/// `visit_children_mut` receives whole child lists so implementations can
/// replace, remove or splice nodes, not just edit them in place.
pub trait VisitorMut: Sized {
    fn visit_fragment_mut(&mut self, fragment: &mut Fragment) {
        walk_fragment_mut(self, fragment);
    }

    fn visit_children_mut(&mut self, children: &mut Vec<Node>) {
        walk_children_mut(self, children);
    }

    fn visit_element_mut(&mut self, element: &mut Element) {
        walk_element_mut(self, element);
    }

    fn visit_text_mut(&mut self, _text: &mut String) {
        // Leaf, no children to walk
    }
}

// Default walk implementations for immutable visitor

pub fn walk_fragment<V: Visitor>(visitor: &mut V, fragment: &Fragment) {
    for node in &fragment.children {
        visitor.visit_node(node);
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &Node) {
    match node {
        Node::Text(text) => visitor.visit_text(text),
        Node::Element(element) => visitor.visit_element(element),
    }
}

pub fn walk_element<V: Visitor>(visitor: &mut V, element: &Element) {
    for attribute in &element.attributes {
        visitor.visit_attribute(element, attribute);
    }
    for child in &element.children {
        visitor.visit_node(child);
    }
}

// Default walk implementations for mutable visitor

pub fn walk_fragment_mut<V: VisitorMut>(visitor: &mut V, fragment: &mut Fragment) {
    visitor.visit_children_mut(&mut fragment.children);
}

pub fn walk_children_mut<V: VisitorMut>(visitor: &mut V, children: &mut Vec<Node>) {
    for child in children.iter_mut() {
        match child {
            Node::Text(text) => visitor.visit_text_mut(text),
            Node::Element(element) => visitor.visit_element_mut(element),
        }
    }
}

pub fn walk_element_mut<V: VisitorMut>(visitor: &mut V, element: &mut Element) {
    visitor.visit_children_mut(&mut element.children);
}
