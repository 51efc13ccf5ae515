//! # Autoletter Editor
//!
//! Selection-scoped rich-text editing engine for message bodies.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ parser: HTML body → Fragment                │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor                                      │
//! │  - SelectionTracker: live/saved selections  │
//! │  - Mutation: pure edits at a selection      │
//! │  - Document: commits edits, serves HTML     │
//! │  - EditSession: link dialog flow            │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ preview: substitute tokens, sanitize        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Selections are values**: every mutation takes one and returns a cursor
//! 2. **Mutations are pure**: they work on a copy and succeed whole or not at all
//! 3. **The tracker owns host state**: nothing else reads the live selection
//!
//! ## Usage
//!
//! ```rust
//! use autoletter_editor::{Document, FormatTag, Selection};
//!
//! let mut doc = Document::from_html("<p>hello</p>").unwrap();
//! let selection = Selection::from_text_offsets(doc.fragment(), 0, 5);
//!
//! let edit = doc.toggle_format(Some(&selection), FormatTag::Bold).unwrap();
//! assert_eq!(edit.html, "<p><strong>hello</strong></p>");
//! ```

mod document;
mod errors;
mod format;
mod mutations;
mod range;
mod selection;
mod session;
mod tracker;

pub use document::Document;
pub use errors::EditorError;
pub use format::{FormatState, FormatTag};
pub use mutations::{format_state, Edit, Mutation, MutationError, MutationResult};
pub use selection::{end_point, point_at_text_offset, text_offset_of, Affinity, BoundaryPoint, Selection};
pub use session::{EditSession, LinkFlow};
pub use tracker::{SavedSelection, SelectionTracker};

// Re-export common types for convenience
pub use autoletter_common::MergeVariable;
pub use autoletter_parser::{Fragment, Node, NodePath};
