//! # Document Handle
//!
//! The editing surface: owns the live fragment and commits mutation results.
//!
//! ## Lifecycle
//!
//! ```text
//! set_html → Parse → Mutations → html()
//!     ↓        ↓         ↓          ↓
//!   markup  Fragment  Fragment   markup
//! ```
//!
//! Persisting the markup is the caller's job.

use crate::format::{FormatState, FormatTag};
use crate::mutations::{format_state, Edit, Mutation};
use crate::selection::Selection;
use crate::EditorError;
use autoletter_parser::{parse, serialize, Fragment};
use tracing::debug;

/// Editable message body
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Current version number (increments on each committed change)
    pub version: u64,

    fragment: Fragment,

    /// Serialization of `fragment`, kept in sync on every commit
    html: String,
}

impl Document {
    /// Empty document
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_html(html: &str) -> Result<Self, EditorError> {
        let fragment = parse(html)?;
        let html = serialize(&fragment);
        Ok(Self {
            version: 0,
            fragment,
            html,
        })
    }

    pub fn fragment(&self) -> &Fragment {
        &self.fragment
    }

    /// Current markup
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn text_content(&self) -> String {
        self.fragment.text_content()
    }

    /// Replace the content wholesale. Returns `false` without touching
    /// anything when the markup equals the current content.
    pub fn set_html(&mut self, html: &str) -> Result<bool, EditorError> {
        if html == self.html {
            return Ok(false);
        }

        let fragment = parse(html)?;
        let canonical = serialize(&fragment);
        if canonical == self.html {
            return Ok(false);
        }

        self.fragment = fragment;
        self.html = canonical;
        self.version += 1;
        debug!(version = self.version, "replaced document content");
        Ok(true)
    }

    /// Apply mutation and commit the result. On failure nothing changes.
    pub fn apply(&mut self, mutation: &Mutation, selection: Option<&Selection>) -> Result<Edit, EditorError> {
        let edit = mutation.apply(&self.fragment, selection)?;

        self.fragment = edit.fragment.clone();
        self.html = edit.html.clone();
        self.version += 1;

        Ok(edit)
    }

    pub fn toggle_format(&mut self, selection: Option<&Selection>, tag: FormatTag) -> Result<Edit, EditorError> {
        self.apply(&Mutation::ToggleFormat { tag }, selection)
    }

    pub fn insert_list(&mut self, selection: Option<&Selection>, ordered: bool) -> Result<Edit, EditorError> {
        self.apply(&Mutation::InsertList { ordered }, selection)
    }

    pub fn insert_link(&mut self, selection: Option<&Selection>, url: &str) -> Result<Edit, EditorError> {
        self.apply(&Mutation::InsertLink { url: url.to_string() }, selection)
    }

    pub fn unlink(&mut self, selection: Option<&Selection>) -> Result<Edit, EditorError> {
        self.apply(&Mutation::Unlink, selection)
    }

    pub fn insert_variable(&mut self, selection: Option<&Selection>, name: &str) -> Result<Edit, EditorError> {
        self.apply(&Mutation::InsertVariable { name: name.to_string() }, selection)
    }

    pub fn paste_text(&mut self, selection: Option<&Selection>, text: &str) -> Result<Edit, EditorError> {
        self.apply(&Mutation::PasteText { text: text.to_string() }, selection)
    }

    pub fn format_state(&self, selection: Option<&Selection>) -> FormatState {
        format_state(&self.fragment, selection)
    }
}
