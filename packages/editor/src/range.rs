//! # Range Surgery
//!
//! Low-level tree edits shared by the mutations: splitting the tree along
//! boundary points until the selected content is a run of siblings,
//! wrapping and unwrapping runs, deleting them, and inserting at a point.
//!
//! Splits never produce empty halves: a boundary that already sits at the
//! edge of a node moves past the node instead.

use crate::format::FormatTag;
use crate::selection::{BoundaryPoint, Selection};
use autoletter_parser::tags::is_phrasing_block;
use autoletter_parser::{Element, Fragment, Node, NodePath};

/// A run `children[start..end]` of the container at `parent`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ChildRange {
    pub parent: NodePath,
    pub start: usize,
    pub end: usize,
    /// The sibling before the run was cut from a partially selected node
    pub start_partial: bool,
    /// The sibling after the run was cut from a partially selected node
    pub end_partial: bool,
}

/// Adding or removing an inline format over a run of nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FormatAction {
    Apply(FormatTag),
    Remove(FormatTag),
}

/// How partially selected elements are treated while isolating a range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Isolate {
    /// Split every partially selected element
    Extract,
    /// Split inline elements, but format the selected part of a partially
    /// selected block in place instead of splitting the block
    FormatInBlocks(FormatAction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Start,
    End,
}

pub(crate) fn char_to_byte(text: &str, offset: usize) -> usize {
    text.char_indices()
        .nth(offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

/// Element (or root) whose children the point sits between
fn container_of(fragment: &Fragment, point: &BoundaryPoint) -> NodePath {
    if fragment.is_text_at(&point.path) {
        point.path.parent().unwrap_or_default()
    } else {
        point.path.clone()
    }
}

/// Deepest element (or the root) containing both boundaries
pub(crate) fn common_container(fragment: &Fragment, selection: &Selection) -> NodePath {
    let start = &selection.start().path;
    let end = &selection.end().path;
    let prefix = start.ancestor(start.common_prefix_len(end));
    if fragment.is_text_at(&prefix) {
        prefix.parent().unwrap_or_default()
    } else {
        prefix
    }
}

/// Both boundaries sit directly inside the same container, so splitting
/// text alone turns the selection into a run of siblings
pub(crate) fn is_contiguous(fragment: &Fragment, selection: &Selection) -> bool {
    container_of(fragment, selection.start()) == container_of(fragment, selection.end())
}

/// Deepest node containing the whole selection
pub(crate) fn anchor_node(fragment: &Fragment, selection: &Selection) -> NodePath {
    let (start, end) = (selection.start(), selection.end());
    if start.path == end.path {
        if fragment.is_text_at(&start.path) {
            return start.path.clone();
        }
        // Exactly one child selected
        if end.offset == start.offset + 1 {
            return start.path.child(start.offset);
        }
        return start.path.clone();
    }
    common_container(fragment, selection)
}

/// Nearest element enclosing the selection that satisfies `predicate`
pub(crate) fn find_ancestor(
    fragment: &Fragment,
    selection: &Selection,
    predicate: impl Fn(&Element) -> bool,
) -> Option<NodePath> {
    let mut path = anchor_node(fragment, selection);
    while !path.is_root() {
        if let Some(Node::Element(el)) = fragment.node_at(&path) {
            if predicate(el) {
                return Some(path);
            }
        }
        path = path.parent()?;
    }
    None
}

/// Split the text node at `path` at char `offset`.
/// Returns the boundary's index among the siblings and whether a split happened.
fn split_text(fragment: &mut Fragment, path: &NodePath, offset: usize) -> Option<(usize, bool)> {
    let index = path.last()?;
    let parent = path.parent()?;
    let tail = match fragment.node_at_mut(path)? {
        Node::Text(text) => {
            let len = text.chars().count();
            if offset == 0 {
                return Some((index, false));
            }
            if offset >= len {
                return Some((index + 1, false));
            }
            let byte = char_to_byte(text, offset);
            text.split_off(byte)
        }
        Node::Element(_) => return None,
    };
    fragment
        .children_at_mut(&parent)?
        .insert(index + 1, Node::Text(tail));
    Some((index + 1, true))
}

/// Split the element at `path` before child `at`, moving the tail into a
/// shallow clone inserted right after it
fn split_element(fragment: &mut Fragment, path: &NodePath, at: usize) -> Option<(usize, bool)> {
    let index = path.last()?;
    let parent = path.parent()?;
    let clone = match fragment.node_at_mut(path)? {
        Node::Element(el) => {
            if at == 0 {
                return Some((index, false));
            }
            if at >= el.children.len() {
                return Some((index + 1, false));
            }
            let mut clone = el.clone_empty();
            clone.children = el.children.split_off(at);
            clone
        }
        Node::Text(_) => return None,
    };
    fragment
        .children_at_mut(&parent)?
        .insert(index + 1, Node::Element(clone));
    Some((index + 1, true))
}

/// Split along `point` up to the container at `depth`
fn split_up_to(
    fragment: &mut Fragment,
    point: &BoundaryPoint,
    depth: usize,
    mode: Isolate,
    side: Side,
) -> Option<(usize, bool)> {
    let (mut container, mut index, mut partial) = if fragment.is_text_at(&point.path) {
        let (index, partial) = split_text(fragment, &point.path, point.offset)?;
        (point.path.parent()?, index, partial)
    } else {
        (point.path.clone(), point.offset, false)
    };

    while container.depth() > depth {
        let own = container.last()?;
        let parent = container.parent()?;

        let block_len = match (mode, fragment.node_at(&container)?) {
            (Isolate::FormatInBlocks(_), Node::Element(el)) if el.is_block() => {
                Some(el.children.len())
            }
            _ => None,
        };

        match (mode, block_len) {
            (Isolate::FormatInBlocks(action), Some(len)) => {
                let children = fragment.children_at_mut(&container)?;
                index = match side {
                    Side::Start if index == 0 => own,
                    Side::Start => {
                        format_run(children, index, len, action);
                        own + 1
                    }
                    Side::End if index >= len => own + 1,
                    Side::End => {
                        format_run(children, 0, index, action);
                        own
                    }
                };
                partial = false;
            }
            _ => {
                let (split_index, split) = split_element(fragment, &container, index)?;
                index = split_index;
                partial = split;
            }
        }
        container = parent;
    }

    Some((index, partial))
}

/// Split the tree so the selected content becomes a run of siblings of the
/// common container. The end is split first so start paths stay valid.
pub(crate) fn isolate(fragment: &mut Fragment, selection: &Selection, mode: Isolate) -> Option<ChildRange> {
    let parent = common_container(fragment, selection);
    let depth = parent.depth();

    let (end, end_partial) = split_up_to(fragment, selection.end(), depth, mode, Side::End)?;
    let before = fragment.children_at(&parent)?.len();
    let (start, start_partial) = split_up_to(fragment, selection.start(), depth, mode, Side::Start)?;
    let after = fragment.children_at(&parent)?.len();
    let end = (end + after.saturating_sub(before)).max(start);

    Some(ChildRange {
        parent,
        start,
        end,
        start_partial,
        end_partial,
    })
}

fn is_blank(nodes: &[Node]) -> bool {
    nodes
        .iter()
        .all(|node| matches!(node, Node::Text(text) if text.trim().is_empty()))
}

/// Replace every element carrying `format` with its children
fn strip_format(nodes: Vec<Node>, format: FormatTag) -> Vec<Node> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Element(mut el) => {
                let children = strip_format(std::mem::take(&mut el.children), format);
                if format.matches(&el.tag) {
                    out.extend(children);
                } else {
                    el.children = children;
                    out.push(Node::Element(el));
                }
            }
            text => out.push(text),
        }
    }
    out
}

pub(crate) fn format_run(children: &mut Vec<Node>, from: usize, to: usize, action: FormatAction) {
    match action {
        FormatAction::Apply(format) => wrap_run(children, from, to, format),
        FormatAction::Remove(format) => {
            let to = to.min(children.len());
            let run: Vec<Node> = children.drain(from..to).collect();
            let stripped = strip_format(run, format);
            children.splice(from..from, stripped);
        }
    }
}

/// Whether every non-blank text node in the selection already carries
/// `format` below the common container
pub(crate) fn is_fully_formatted(fragment: &Fragment, selection: &Selection, format: FormatTag) -> bool {
    fn check(nodes: &[Node], format: FormatTag, inside: bool, seen: &mut bool) -> bool {
        nodes.iter().all(|node| match node {
            Node::Text(text) if text.trim().is_empty() => true,
            Node::Text(_) => {
                *seen = true;
                inside
            }
            Node::Element(el) => check(&el.children, format, inside || format.matches(&el.tag), seen),
        })
    }

    let mut scratch = fragment.clone();
    let nodes = match isolate(&mut scratch, selection, Isolate::Extract) {
        Some(range) => match scratch.children_at(&range.parent) {
            Some(children) => children.get(range.start..range.end).unwrap_or_default().to_vec(),
            None => return false,
        },
        None => return false,
    };

    let mut seen = false;
    check(&nodes, format, false, &mut seen) && seen
}

/// Wrap `children[from..to]` in format elements. Consecutive inline nodes
/// share one wrapper; block elements are descended into so the wrapper
/// never contains a block.
pub(crate) fn wrap_run(children: &mut Vec<Node>, from: usize, to: usize, format: FormatTag) {
    let mut i = from;
    let mut end = to.min(children.len());

    while i < end {
        if children[i].is_block() {
            if let Some(el) = children[i].as_element_mut() {
                let len = el.children.len();
                wrap_run(&mut el.children, 0, len, format);
            }
            i += 1;
            continue;
        }

        let run_end = (i..end).find(|&j| children[j].is_block()).unwrap_or(end);
        if is_blank(&children[i..run_end]) {
            i = run_end;
            continue;
        }

        let run: Vec<Node> = children.drain(i..run_end).collect();
        let wrapper = Element::new(format.tag()).with_children(strip_format(run, format));
        children.insert(i, Node::Element(wrapper));
        end = end + 1 - (run_end - i);
        i += 1;
    }
}

/// Replace the element at `path` with its children
pub(crate) fn unwrap_element(fragment: &mut Fragment, path: &NodePath) -> Option<usize> {
    let index = path.last()?;
    let parent = path.parent()?;
    let children = fragment.children_at_mut(&parent)?;
    let inner = match children.get_mut(index)? {
        Node::Element(el) => std::mem::take(&mut el.children),
        Node::Text(_) => return None,
    };
    let count = inner.len();
    children.splice(index..index + 1, inner);
    Some(count)
}

/// Text chars in the fragment before the node at `path`
fn text_before(fragment: &Fragment, path: &NodePath) -> usize {
    let mut offset = 0;
    let mut current = path.clone();
    while let (Some(index), Some(parent)) = (current.last(), current.parent()) {
        if let Some(children) = fragment.children_at(&parent) {
            offset += children.iter().take(index).map(Node::text_len).sum::<usize>();
        }
        current = parent;
    }
    offset
}

fn can_merge(left: &Node, right: &Node) -> bool {
    match (left, right) {
        (Node::Text(_), Node::Text(_)) => true,
        (Node::Element(a), Node::Element(b)) => {
            !a.is_block() && !a.is_void() && a.tag == b.tag && a.attributes == b.attributes
        }
        _ => false,
    }
}

/// Rejoin what splitting cut apart at the flat text offsets `seams` inside
/// the container at `container`. Only nodes meeting exactly at a seam are
/// merged; identical siblings elsewhere keep their own elements. Adjacent
/// text nodes are joined throughout the container.
pub(crate) fn merge_seams(fragment: &mut Fragment, container: &NodePath, seams: &[usize]) {
    let base = text_before(fragment, container);
    if let Some(children) = fragment.children_at_mut(container) {
        for &seam in seams {
            if let Some(offset) = seam.checked_sub(base) {
                merge_seam(children, offset);
            }
        }
        merge_text_nodes(children);
    }
}

fn merge_seam(children: &mut Vec<Node>, offset: usize) {
    let mut before = 0;
    let mut i = 0;
    while i < children.len() {
        let len = children[i].text_len();
        if before == offset && i > 0 && can_merge(&children[i - 1], &children[i]) {
            let right = children.remove(i);
            match (&mut children[i - 1], right) {
                (Node::Text(left), Node::Text(right)) => left.push_str(&right),
                (Node::Element(left), Node::Element(right)) => {
                    let inner = left.children.iter().map(Node::text_len).sum();
                    left.children.extend(right.children);
                    merge_seam(&mut left.children, inner);
                }
                _ => {}
            }
            return;
        }
        if before < offset && offset < before + len {
            if let Node::Element(el) = &mut children[i] {
                merge_seam(&mut el.children, offset - before);
            }
            return;
        }
        before += len;
        i += 1;
    }
}

fn merge_text_nodes(children: &mut Vec<Node>) {
    let mut out: Vec<Node> = Vec::with_capacity(children.len());
    for mut node in std::mem::take(children) {
        if let (Some(Node::Text(prev)), Node::Text(text)) = (out.last_mut(), &node) {
            prev.push_str(text);
            continue;
        }
        if let Node::Element(el) = &mut node {
            merge_text_nodes(&mut el.children);
        }
        out.push(node);
    }
    *children = out;
}

/// Remove the selected content and return where it was
pub(crate) fn delete_contents(fragment: &mut Fragment, selection: &Selection) -> Option<BoundaryPoint> {
    if selection.is_collapsed() {
        return Some(selection.start().clone());
    }

    let range = isolate(fragment, selection, Isolate::Extract)?;
    fragment
        .children_at_mut(&range.parent)?
        .drain(range.start..range.end);

    if range.start_partial && range.end_partial {
        join_at(fragment, &range.parent, range.start)
    } else {
        Some(BoundaryPoint::new(range.parent, range.start))
    }
}

/// Merge the two siblings meeting at `index` when they are both text or
/// both copies of the same element, and return the junction point
fn join_at(fragment: &mut Fragment, parent: &NodePath, index: usize) -> Option<BoundaryPoint> {
    let children = fragment.children_at_mut(parent)?;
    if index == 0 || index >= children.len() {
        return Some(BoundaryPoint::new(parent.clone(), index));
    }

    let mergeable = match (&children[index - 1], &children[index]) {
        (Node::Text(_), Node::Text(_)) => true,
        (Node::Element(a), Node::Element(b)) => {
            a.tag == b.tag && a.attributes == b.attributes && !a.is_void()
        }
        _ => false,
    };
    if !mergeable {
        return Some(BoundaryPoint::new(parent.clone(), index));
    }

    let right = children.remove(index);
    let left_path = parent.child(index - 1);
    let junction = match (&mut children[index - 1], right) {
        (Node::Text(left), Node::Text(right)) => {
            let junction = left.chars().count();
            left.push_str(&right);
            return Some(BoundaryPoint::new(left_path, junction));
        }
        (Node::Element(left), Node::Element(right)) => {
            let junction = left.children.len();
            left.children.extend(right.children);
            junction
        }
        _ => return None,
    };
    join_at(fragment, &left_path, junction)
}

// Points addressing a void element mean "before it"
fn normalize_insertion(fragment: &Fragment, point: &BoundaryPoint) -> Option<BoundaryPoint> {
    match fragment.node_at(&point.path) {
        Some(Node::Element(el)) if el.is_void() => {
            Some(BoundaryPoint::new(point.path.parent()?, point.path.last()?))
        }
        _ => Some(point.clone()),
    }
}

/// Insert plain text at `point`, merging into neighbouring text.
/// Returns the point right after the inserted text.
pub(crate) fn insert_text_at(fragment: &mut Fragment, point: &BoundaryPoint, text: &str) -> Option<BoundaryPoint> {
    let point = normalize_insertion(fragment, point)?;
    if text.is_empty() {
        return Some(point);
    }
    let added = text.chars().count();

    if let Some(Node::Text(existing)) = fragment.node_at_mut(&point.path) {
        let byte = char_to_byte(existing, point.offset);
        existing.insert_str(byte, text);
        return Some(BoundaryPoint::new(point.path, point.offset + added));
    }

    let container = point.path;
    let index = point.offset;
    let children = fragment.children_at_mut(&container)?;

    if index > 0 {
        if let Some(Node::Text(prev)) = children.get_mut(index - 1) {
            let len = prev.chars().count();
            prev.push_str(text);
            return Some(BoundaryPoint::new(container.child(index - 1), len + added));
        }
    }
    if let Some(Node::Text(next)) = children.get_mut(index) {
        next.insert_str(0, text);
        return Some(BoundaryPoint::new(container.child(index), added));
    }

    let index = index.min(children.len());
    children.insert(index, Node::text(text));
    Some(BoundaryPoint::new(container.child(index), added))
}

/// Insert a node at `point`, splitting a text node if needed.
/// Returns the new node's path.
pub(crate) fn insert_node_at(fragment: &mut Fragment, point: &BoundaryPoint, node: Node) -> Option<NodePath> {
    let point = normalize_insertion(fragment, point)?;
    let (container, index) = if fragment.is_text_at(&point.path) {
        let (index, _) = split_text(fragment, &point.path, point.offset)?;
        (point.path.parent()?, index)
    } else {
        (point.path, point.offset)
    };

    let children = fragment.children_at_mut(&container)?;
    let index = index.min(children.len());
    children.insert(index, node);
    Some(container.child(index))
}

/// Move an insertion point out of inline elements and paragraph-like blocks
/// so a block such as a list can be inserted there. Containers emptied by
/// a preceding deletion are removed on the way out.
pub(crate) fn lift_for_block(fragment: &mut Fragment, point: &BoundaryPoint) -> Option<BoundaryPoint> {
    let point = normalize_insertion(fragment, point)?;
    let (mut container, mut index) = if fragment.is_text_at(&point.path) {
        let (index, _) = split_text(fragment, &point.path, point.offset)?;
        (point.path.parent()?, index)
    } else {
        (point.path, point.offset)
    };

    while !container.is_root() {
        let own = container.last()?;
        let parent = container.parent()?;
        let (holds_blocks, empty) = match fragment.node_at(&container)? {
            Node::Element(el) => (
                el.is_block() && !is_phrasing_block(&el.tag),
                el.children.is_empty(),
            ),
            Node::Text(_) => return None,
        };
        if holds_blocks {
            break;
        }

        if empty {
            fragment.children_at_mut(&parent)?.remove(own);
            index = own;
        } else {
            index = split_element(fragment, &container, index)?.0;
        }
        container = parent;
    }

    Some(BoundaryPoint::new(container, index))
}

/// Text of the selected content. With `line_breaks`, `<br>` and block
/// boundaries become newlines.
pub(crate) fn selected_text(fragment: &Fragment, selection: &Selection, line_breaks: bool) -> Option<String> {
    if selection.is_collapsed() {
        return Some(String::new());
    }

    let mut scratch = fragment.clone();
    let range = isolate(&mut scratch, selection, Isolate::Extract)?;
    let nodes = scratch.children_at(&range.parent)?.get(range.start..range.end)?;

    if !line_breaks {
        return Some(nodes.iter().map(Node::text_content).collect());
    }
    let mut out = String::new();
    push_lines(nodes, &mut out);
    Some(out)
}

fn push_lines(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) if el.tag == "br" => out.push('\n'),
            Node::Element(el) if el.is_block() => {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                push_lines(&el.children, out);
                if !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            Node::Element(el) => push_lines(&el.children, out),
        }
    }
}
