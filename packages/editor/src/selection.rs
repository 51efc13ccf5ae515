//! # Selections
//!
//! A selection is a pair of boundary points inside a [`Fragment`]. A point
//! either sits inside a text node (`offset` counts chars) or between the
//! children of an element or of the root (`offset` is a child index).
//!
//! Selections are plain values: they are passed into every mutation and
//! returned from it, and they go stale as soon as the fragment they were
//! taken from changes.

use autoletter_parser::{Fragment, Node, NodePath};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Position between two characters or between two sibling nodes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundaryPoint {
    pub path: NodePath,
    pub offset: usize,
}

impl BoundaryPoint {
    pub fn new(path: impl Into<NodePath>, offset: usize) -> Self {
        Self {
            path: path.into(),
            offset,
        }
    }

    /// Whether the point addresses an existing node and an in-range offset
    pub fn resolves_in(&self, fragment: &Fragment) -> bool {
        if self.path.is_root() {
            return self.offset <= fragment.children.len();
        }
        match fragment.node_at(&self.path) {
            Some(Node::Text(text)) => self.offset <= text.chars().count(),
            Some(Node::Element(el)) => self.offset <= el.children.len(),
            None => false,
        }
    }

    // Node path followed by the offset. Comparing keys lexicographically
    // (a prefix sorts first) gives document order.
    fn order_key(&self) -> Vec<usize> {
        let mut key = self.path.0.clone();
        key.push(self.offset);
        key
    }
}

impl PartialOrd for BoundaryPoint {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BoundaryPoint {
    fn cmp(&self, other: &Self) -> Ordering {
        self.order_key().cmp(&other.order_key())
    }
}

/// Which neighbouring text node an ambiguous text offset resolves into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affinity {
    /// End of the preceding text node
    Upstream,
    /// Start of the following text node
    Downstream,
}

#[derive(Deserialize)]
struct SelectionParts {
    start: BoundaryPoint,
    end: BoundaryPoint,
}

impl From<SelectionParts> for Selection {
    fn from(parts: SelectionParts) -> Self {
        Selection::new(parts.start, parts.end)
    }
}

/// Ordered pair of boundary points (`start <= end`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SelectionParts")]
pub struct Selection {
    start: BoundaryPoint,
    end: BoundaryPoint,
}

impl Selection {
    /// Build a selection from two points in either order
    pub fn new(a: BoundaryPoint, b: BoundaryPoint) -> Self {
        if b < a {
            Self { start: b, end: a }
        } else {
            Self { start: a, end: b }
        }
    }

    pub fn collapsed(point: BoundaryPoint) -> Self {
        Self {
            start: point.clone(),
            end: point,
        }
    }

    /// Selection covering flat text offsets `start..end` of the fragment
    pub fn from_text_offsets(fragment: &Fragment, start: usize, end: usize) -> Self {
        let (start, end) = if end < start { (end, start) } else { (start, end) };
        if start == end {
            return Self::caret_at_text_offset(fragment, start);
        }
        Self::new(
            point_at_text_offset(fragment, start, Affinity::Downstream),
            point_at_text_offset(fragment, end, Affinity::Upstream),
        )
    }

    pub fn caret_at_text_offset(fragment: &Fragment, offset: usize) -> Self {
        Self::collapsed(point_at_text_offset(fragment, offset, Affinity::Upstream))
    }

    /// Collapsed selection at the end of the fragment
    pub fn end_of(fragment: &Fragment) -> Self {
        Self::collapsed(end_point(fragment))
    }

    pub fn start(&self) -> &BoundaryPoint {
        &self.start
    }

    pub fn end(&self) -> &BoundaryPoint {
        &self.end
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    pub fn resolves_in(&self, fragment: &Fragment) -> bool {
        self.start.resolves_in(fragment) && self.end.resolves_in(fragment)
    }

    /// Flat text offsets covered by the selection
    pub fn text_offsets(&self, fragment: &Fragment) -> Option<(usize, usize)> {
        Some((
            text_offset_of(fragment, &self.start)?,
            text_offset_of(fragment, &self.end)?,
        ))
    }
}

/// Number of text chars before `point`
pub fn text_offset_of(fragment: &Fragment, point: &BoundaryPoint) -> Option<usize> {
    if !point.resolves_in(fragment) {
        return None;
    }

    let in_text = fragment.is_text_at(&point.path);
    let key = if in_text {
        point.path.0.clone()
    } else {
        point.order_key()
    };

    let mut offset = 0;
    for path in fragment.text_paths() {
        if path.0 >= key {
            break;
        }
        offset += fragment.node_at(&path).map(Node::text_len).unwrap_or(0);
    }

    if in_text {
        offset += point.offset;
    }
    Some(offset)
}

/// Point at flat text offset `offset` (clamped to the text length)
pub fn point_at_text_offset(fragment: &Fragment, offset: usize, affinity: Affinity) -> BoundaryPoint {
    let mut texts = Vec::new();
    let mut start = 0;
    for path in fragment.text_paths() {
        let len = fragment.node_at(&path).map(Node::text_len).unwrap_or(0);
        if len > 0 {
            texts.push((path, start, len));
        }
        start += len;
    }

    let offset = offset.min(start);
    let upstream = || {
        texts
            .iter()
            .find(|(_, s, len)| *s < offset && offset <= s + len)
            .map(|(path, s, _)| BoundaryPoint::new(path.clone(), offset - s))
    };
    let downstream = || {
        texts
            .iter()
            .find(|(_, s, len)| *s <= offset && offset < s + len)
            .map(|(path, s, _)| BoundaryPoint::new(path.clone(), offset - s))
    };

    let found = match affinity {
        Affinity::Upstream => upstream().or_else(downstream),
        Affinity::Downstream => downstream().or_else(upstream),
    };

    found.unwrap_or_else(|| {
        if offset == 0 {
            BoundaryPoint::new(NodePath::root(), 0)
        } else {
            end_point(fragment)
        }
    })
}

/// Deepest position at the end of the fragment: the end of its last text
/// node, or inside the last non-void element
pub fn end_point(fragment: &Fragment) -> BoundaryPoint {
    let mut path = NodePath::root();
    loop {
        let children = match fragment.children_at(&path) {
            Some(children) => children,
            None => return BoundaryPoint::new(path, 0),
        };
        let last = children.len().saturating_sub(1);
        match children.last() {
            Some(Node::Text(text)) => {
                return BoundaryPoint::new(path.child(last), text.chars().count());
            }
            Some(Node::Element(el)) if !el.is_void() => path = path.child(last),
            _ => return BoundaryPoint::new(path, children.len()),
        }
    }
}
