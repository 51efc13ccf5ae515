//! # Mutations
//!
//! One operation per toolbar action, applied to a fragment at a selection.
//!
//! ## Semantics
//!
//! ### ToggleFormat
//! - Looks for an enclosing element of the same format, starting at the
//!   deepest node containing the selection
//! - Found: the element is unwrapped, even for a collapsed selection
//! - Not found: the selected content is wrapped, or unwrapped when every
//!   selected character already carries the format; a collapsed selection
//!   is a no-op (formatting is never "armed" for the next typed character)
//! - Selections inside one container are wrapped directly; anything else
//!   takes the extract-and-rewrap path, which never splits blocks
//!
//! ### InsertList
//! - One item per non-blank line of the selected text, or a single empty
//!   item when there is none
//! - The list replaces the selection and is lifted out of paragraphs
//!
//! ### InsertLink
//! - Requires a non-blank URL
//! - Anchor text is the selected text, or the URL for a collapsed selection
//! - Always opens in a new tab with `rel="noopener noreferrer"`
//!
//! ### InsertVariable / PasteText
//! - Plain text insertion replacing the selection
//! - A variable with no selection goes to the end of the document
//!
//! Every operation is pure: [`Mutation::apply`] works on a copy and either
//! returns the whole edit or an error with nothing changed.

use crate::format::{FormatState, FormatTag};
use crate::range::{self, FormatAction, Isolate};
use crate::selection::{
    end_point, point_at_text_offset, text_offset_of, Affinity, BoundaryPoint, Selection,
};
use autoletter_common::MergeVariable;
use autoletter_parser::{serialize, Element, Fragment, Node, NodePath};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Editing operations
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum Mutation {
    /// Wrap the selection in a format, or remove an enclosing one
    ToggleFormat { tag: FormatTag },

    /// Replace the selection with a list built from its lines
    InsertList { ordered: bool },

    /// Replace the selection with a new-tab anchor
    InsertLink { url: String },

    /// Remove the anchor enclosing the selection
    Unlink,

    /// Insert a `{{name}}` placeholder
    InsertVariable { name: String },

    /// Replace the selection with plain clipboard text
    PasteText { text: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("No valid selection or insertion point")]
    NoSelection,

    #[error("Saved selection no longer resolves against the document")]
    InvalidSelection,

    #[error("Unknown merge variable: {0}")]
    UnknownVariable(String),

    #[error("Link URL is empty")]
    EmptyUrl,
}

/// Successful mutation: the new fragment, its markup and where the cursor goes
#[derive(Debug, Clone, PartialEq)]
pub struct Edit {
    pub fragment: Fragment,
    pub html: String,
    pub cursor: Selection,
}

pub type MutationResult = Result<Edit, MutationError>;

impl Mutation {
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::ToggleFormat { .. } => "toggleFormat",
            Mutation::InsertList { .. } => "insertList",
            Mutation::InsertLink { .. } => "insertLink",
            Mutation::Unlink => "unlink",
            Mutation::InsertVariable { .. } => "insertVariable",
            Mutation::PasteText { .. } => "pasteText",
        }
    }

    /// Check arguments and selection without touching the fragment
    pub fn validate(&self, fragment: &Fragment, selection: Option<&Selection>) -> Result<(), MutationError> {
        match self {
            Mutation::InsertLink { url } if url.trim().is_empty() => {
                return Err(MutationError::EmptyUrl);
            }
            Mutation::InsertVariable { name } => {
                if MergeVariable::lookup(name).is_none() {
                    return Err(MutationError::UnknownVariable(name.clone()));
                }
                if selection.is_none() {
                    return Ok(());
                }
            }
            _ => {}
        }

        match selection {
            Some(selection) if selection.resolves_in(fragment) => Ok(()),
            _ => Err(MutationError::NoSelection),
        }
    }

    /// Apply to a copy of `fragment` at `selection`
    pub fn apply(&self, fragment: &Fragment, selection: Option<&Selection>) -> MutationResult {
        // Validate first
        self.validate(fragment, selection)?;

        let mut working = fragment.clone();
        let cursor = match (self, selection) {
            (Mutation::InsertVariable { name }, None) => {
                let at = end_point(&working);
                Self::apply_insert_text(&mut working, &Selection::collapsed(at), &format!("{{{{{}}}}}", name))
            }
            (_, None) => None,
            (Mutation::ToggleFormat { tag }, Some(sel)) => Self::apply_toggle_format(&mut working, sel, *tag),
            (Mutation::InsertList { ordered }, Some(sel)) => Self::apply_insert_list(&mut working, sel, *ordered),
            (Mutation::InsertLink { url }, Some(sel)) => Self::apply_insert_link(&mut working, sel, url.trim()),
            (Mutation::Unlink, Some(sel)) => Self::apply_unlink(&mut working, sel),
            (Mutation::InsertVariable { name }, Some(sel)) => {
                Self::apply_insert_text(&mut working, sel, &format!("{{{{{}}}}}", name))
            }
            (Mutation::PasteText { text }, Some(sel)) => {
                Self::apply_insert_text(&mut working, sel, &text.replace("\r\n", "\n").replace('\r', "\n"))
            }
        };
        let cursor = cursor.ok_or(MutationError::NoSelection)?;

        let html = serialize(&working);
        debug!(mutation = self.name(), cursor = %cursor.path, offset = cursor.offset, "applied mutation");

        Ok(Edit {
            fragment: working,
            html,
            cursor: Selection::collapsed(cursor),
        })
    }

    fn apply_toggle_format(fragment: &mut Fragment, selection: &Selection, tag: FormatTag) -> Option<BoundaryPoint> {
        if let Some(path) = range::find_ancestor(fragment, selection, |el| tag.matches(&el.tag)) {
            debug!(format = tag.tag(), at = %path, "removing enclosing format");
            return Self::unwrap_keeping_cursor(fragment, &path);
        }

        if selection.is_collapsed() {
            return Some(selection.start().clone());
        }

        let (start, end) = selection.text_offsets(fragment)?;
        let action = if range::is_fully_formatted(fragment, selection, tag) {
            debug!(format = tag.tag(), "selection already formatted, removing");
            FormatAction::Remove(tag)
        } else {
            FormatAction::Apply(tag)
        };

        let range = if range::is_contiguous(fragment, selection) {
            debug!(format = tag.tag(), "formatting contiguous selection");
            range::isolate(fragment, selection, Isolate::Extract)?
        } else {
            debug!(format = tag.tag(), "selection crosses elements, extracting and rewrapping");
            range::isolate(fragment, selection, Isolate::FormatInBlocks(action))?
        };

        let children = fragment.children_at_mut(&range.parent)?;
        range::format_run(children, range.start, range.end, action);
        range::merge_seams(fragment, &range.parent, &[start, end]);

        Some(point_at_text_offset(fragment, end, Affinity::Upstream))
    }

    fn apply_unlink(fragment: &mut Fragment, selection: &Selection) -> Option<BoundaryPoint> {
        match range::find_ancestor(fragment, selection, |el| el.tag == "a") {
            Some(path) => Self::unwrap_keeping_cursor(fragment, &path),
            None => Some(selection.end().clone()),
        }
    }

    // Cursor lands at the end of what the element held
    fn unwrap_keeping_cursor(fragment: &mut Fragment, path: &NodePath) -> Option<BoundaryPoint> {
        let len = fragment.children_at(path)?.len();
        let start = text_offset_of(fragment, &BoundaryPoint::new(path.clone(), 0))?;
        let end = text_offset_of(fragment, &BoundaryPoint::new(path.clone(), len))?;
        range::unwrap_element(fragment, path)?;
        range::merge_seams(fragment, &path.parent()?, &[start, end]);
        Some(point_at_text_offset(fragment, end, Affinity::Upstream))
    }

    fn apply_insert_list(fragment: &mut Fragment, selection: &Selection, ordered: bool) -> Option<BoundaryPoint> {
        let text = range::selected_text(fragment, selection, true)?;
        let items: Vec<Node> = text
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| Node::element(Element::new("li").with_children(vec![Node::text(line)])))
            .collect();
        let items = if items.is_empty() {
            vec![Node::element(Element::new("li"))]
        } else {
            items
        };

        let at = range::delete_contents(fragment, selection)?;
        let at = range::lift_for_block(fragment, &at)?;

        let list = Element::new(if ordered { "ol" } else { "ul" }).with_children(items);
        let list_path = range::insert_node_at(fragment, &at, Node::element(list))?;

        let first_item = list_path.child(0);
        match fragment.node_at(&first_item.child(0)) {
            Some(Node::Text(text)) => Some(BoundaryPoint::new(first_item.child(0), text.chars().count())),
            _ => Some(BoundaryPoint::new(first_item, 0)),
        }
    }

    fn apply_insert_link(fragment: &mut Fragment, selection: &Selection, url: &str) -> Option<BoundaryPoint> {
        // Links never nest: an enclosing link is replaced by the new one
        let unlinked;
        let selection = match range::find_ancestor(fragment, selection, |el| el.tag == "a") {
            Some(path) => {
                let (start, end) = selection.text_offsets(fragment)?;
                debug!(at = %path, "replacing enclosing link");
                Self::unwrap_keeping_cursor(fragment, &path)?;
                unlinked = Selection::from_text_offsets(fragment, start, end);
                &unlinked
            }
            None => selection,
        };

        let text = range::selected_text(fragment, selection, false)?;
        let text = if text.is_empty() { url.to_string() } else { text };

        let at = range::delete_contents(fragment, selection)?;
        let anchor = Element::new("a")
            .with_attribute("href", url)
            .with_attribute("target", "_blank")
            .with_attribute("rel", "noopener noreferrer")
            .with_children(vec![Node::text(text)]);
        let path = range::insert_node_at(fragment, &at, Node::element(anchor))?;

        Some(BoundaryPoint::new(path.parent()?, path.last()? + 1))
    }

    fn apply_insert_text(fragment: &mut Fragment, selection: &Selection, text: &str) -> Option<BoundaryPoint> {
        let at = range::delete_contents(fragment, selection)?;
        range::insert_text_at(fragment, &at, text)
    }
}

/// Formats enclosing the selection, for toolbar state
pub fn format_state(fragment: &Fragment, selection: Option<&Selection>) -> FormatState {
    let selection = match selection {
        Some(selection) if selection.resolves_in(fragment) => selection,
        _ => return FormatState::default(),
    };
    let encloses = |predicate: &dyn Fn(&Element) -> bool| {
        range::find_ancestor(fragment, selection, predicate).is_some()
    };

    FormatState {
        bold: encloses(&|el: &Element| FormatTag::Bold.matches(&el.tag)),
        italic: encloses(&|el: &Element| FormatTag::Italic.matches(&el.tag)),
        link: encloses(&|el: &Element| el.tag == "a"),
    }
}
