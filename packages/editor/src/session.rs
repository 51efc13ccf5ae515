//! # Edit Session Management
//!
//! One composer's view of a document: the document itself, the selection
//! tracker standing in for host focus, and the link dialog flow.
//!
//! ```text
//! Idle ──begin_link──▶ AwaitingUrl(saved) ──confirm_link──▶ Idle
//!                           │
//!                           └──────cancel_link─────────────▶ Idle
//! ```

use crate::mutations::{Edit, Mutation, MutationError};
use crate::selection::Selection;
use crate::tracker::{SavedSelection, SelectionTracker};
use crate::{Document, EditorError};
use tracing::{debug, warn};

/// Where the link dialog stands
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LinkFlow {
    #[default]
    Idle,
    /// Dialog open, selection saved until the URL comes back
    AwaitingUrl(SavedSelection),
}

/// Single edit session
pub struct EditSession {
    /// Unique session identifier
    pub id: String,

    /// Document being edited
    pub document: Document,

    tracker: SelectionTracker,

    link_flow: LinkFlow,
}

impl EditSession {
    /// Create new edit session
    pub fn new(id: impl Into<String>, document: Document) -> Self {
        Self {
            id: id.into(),
            document,
            tracker: SelectionTracker::new(),
            link_flow: LinkFlow::Idle,
        }
    }

    pub fn tracker(&self) -> &SelectionTracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut SelectionTracker {
        &mut self.tracker
    }

    pub fn link_flow(&self) -> &LinkFlow {
        &self.link_flow
    }

    /// Host reported a selection change
    pub fn set_selection(&mut self, selection: Selection) {
        self.tracker.set_live(selection);
    }

    /// Live selection, if any
    pub fn selection(&self) -> Option<Selection> {
        self.tracker.capture()
    }

    /// Replace the content; the live selection is dropped when it changed
    pub fn set_html(&mut self, html: &str) -> Result<bool, EditorError> {
        let changed = self.document.set_html(html)?;
        if changed {
            self.tracker.clear();
        }
        Ok(changed)
    }

    /// Apply mutation at the live selection and move the selection to the
    /// returned cursor
    pub fn apply(&mut self, mutation: &Mutation) -> Result<Edit, EditorError> {
        let selection = self.tracker.capture();
        let edit = self.document.apply(mutation, selection.as_ref())?;
        self.tracker.set_live(edit.cursor.clone());
        Ok(edit)
    }

    /// Open the link dialog: save the live selection and let focus go
    pub fn begin_link(&mut self) -> Result<(), MutationError> {
        let selection = self.tracker.capture().ok_or(MutationError::NoSelection)?;
        let saved = self
            .tracker
            .save(&selection, false)
            .ok_or(MutationError::NoSelection)?;

        self.tracker.blur();
        self.link_flow = LinkFlow::AwaitingUrl(saved);
        debug!(session = %self.id, "awaiting link url");
        Ok(())
    }

    /// Dialog confirmed. A blank URL keeps the dialog open.
    pub fn confirm_link(&mut self, url: &str) -> Result<Edit, EditorError> {
        let saved = match &self.link_flow {
            LinkFlow::AwaitingUrl(saved) => saved.clone(),
            LinkFlow::Idle => return Err(MutationError::NoSelection.into()),
        };
        if url.trim().is_empty() {
            return Err(MutationError::EmptyUrl.into());
        }
        self.link_flow = LinkFlow::Idle;

        let selection = match self.tracker.restore(saved, self.document.fragment()) {
            Ok(selection) => selection,
            Err(err) => {
                warn!(session = %self.id, error = %err, "inserting link at end of document");
                let fallback = Selection::end_of(self.document.fragment());
                self.tracker.set_live(fallback.clone());
                fallback
            }
        };

        let mutation = Mutation::InsertLink {
            url: url.to_string(),
        };
        let edit = self.document.apply(&mutation, Some(&selection))?;
        self.tracker.set_live(edit.cursor.clone());
        Ok(edit)
    }

    /// Dialog dismissed: drop the saved selection, leave the document alone
    pub fn cancel_link(&mut self) {
        if let LinkFlow::AwaitingUrl(_) = std::mem::take(&mut self.link_flow) {
            debug!(session = %self.id, "link cancelled");
            self.tracker.focus();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(html: &str) -> EditSession {
        EditSession::new("test", Document::from_html(html).unwrap())
    }

    #[test]
    fn test_begin_link_without_selection() {
        let mut session = session("<p>x</p>");
        assert_eq!(session.begin_link(), Err(MutationError::NoSelection));
        assert_eq!(session.link_flow(), &LinkFlow::Idle);
    }

    #[test]
    fn test_begin_link_blurs_surface() {
        let mut session = session("<p>x</p>");
        let selection = Selection::from_text_offsets(session.document.fragment(), 0, 1);
        session.set_selection(selection);

        session.begin_link().unwrap();
        assert!(matches!(session.link_flow(), LinkFlow::AwaitingUrl(_)));
        assert_eq!(session.selection(), None);
    }

    #[test]
    fn test_blank_url_keeps_dialog_open() {
        let mut session = session("<p>x</p>");
        let selection = Selection::from_text_offsets(session.document.fragment(), 0, 1);
        session.set_selection(selection);
        session.begin_link().unwrap();

        let err = session.confirm_link("  ").unwrap_err();
        assert_eq!(err, EditorError::Mutation(MutationError::EmptyUrl));
        assert!(matches!(session.link_flow(), LinkFlow::AwaitingUrl(_)));
        assert_eq!(session.document.html(), "<p>x</p>");
    }

    #[test]
    fn test_cancel_discards_saved_selection() {
        let mut session = session("<p>x</p>");
        let selection = Selection::from_text_offsets(session.document.fragment(), 0, 1);
        session.set_selection(selection);
        session.begin_link().unwrap();

        session.cancel_link();
        assert_eq!(session.link_flow(), &LinkFlow::Idle);
        assert_eq!(session.document.version, 0);
        assert!(session.confirm_link("https://x.com").is_err());
    }

    #[test]
    fn test_confirm_after_content_replaced_falls_back_to_end() {
        let mut session = session("<p>one</p><p>two</p>");
        let selection = Selection::from_text_offsets(session.document.fragment(), 4, 6);
        session.set_selection(selection);
        session.begin_link().unwrap();

        session.set_html("<p>one</p>").unwrap();
        let edit = session.confirm_link("https://x.com").unwrap();

        assert_eq!(
            edit.html,
            r#"<p>one<a href="https://x.com" target="_blank" rel="noopener noreferrer">https://x.com</a></p>"#
        );
    }
}
