//! # Selection Tracker
//!
//! The only place that holds the host's live selection. Everything else gets
//! selections passed in as values.
//!
//! Focus moving away from the editing surface (a URL dialog, say) drops the
//! live selection. Operations that need to survive that gap save a copy
//! first and restore it afterwards.

use crate::mutations::MutationError;
use crate::selection::Selection;
use autoletter_parser::Fragment;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Owned copy of a selection, held while the live one is lost
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedSelection {
    selection: Selection,
}

impl SavedSelection {
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_collapsed(&self) -> bool {
        self.selection.is_collapsed()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionTracker {
    live: Option<Selection>,
    focused: bool,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    /// Focus left the editing surface; the live selection goes with it
    pub fn blur(&mut self) {
        self.focused = false;
        self.live = None;
    }

    /// Host reported a new selection inside the editing surface
    pub fn set_live(&mut self, selection: Selection) {
        self.focused = true;
        self.live = Some(selection);
    }

    pub fn clear(&mut self) {
        self.live = None;
    }

    /// Current live selection, if the surface is focused and has one
    pub fn capture(&self) -> Option<Selection> {
        if self.focused {
            self.live.clone()
        } else {
            None
        }
    }

    /// Copy a selection for later. Returns `None` for a collapsed selection
    /// when the caller needs content to act on.
    pub fn save(&self, selection: &Selection, require_non_empty: bool) -> Option<SavedSelection> {
        if require_non_empty && selection.is_collapsed() {
            return None;
        }
        Some(SavedSelection {
            selection: selection.clone(),
        })
    }

    /// Focus the surface and make `saved` the live selection again.
    ///
    /// Fails with `InvalidSelection` when the fragment changed so that the
    /// saved points no longer exist; the saved copy is consumed either way.
    pub fn restore(&mut self, saved: SavedSelection, fragment: &Fragment) -> Result<Selection, MutationError> {
        self.focus();

        if !saved.selection.resolves_in(fragment) {
            warn!(
                start = %saved.selection.start().path,
                end = %saved.selection.end().path,
                "saved selection no longer resolves"
            );
            self.live = None;
            return Err(MutationError::InvalidSelection);
        }

        debug!("restored saved selection");
        self.live = Some(saved.selection.clone());
        Ok(saved.selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::BoundaryPoint;
    use autoletter_parser::parse;

    #[test]
    fn test_capture_requires_focus() {
        let fragment = parse("<p>hello</p>").unwrap();
        let mut tracker = SelectionTracker::new();
        assert_eq!(tracker.capture(), None);

        let selection = Selection::from_text_offsets(&fragment, 0, 5);
        tracker.set_live(selection.clone());
        assert_eq!(tracker.capture(), Some(selection));

        tracker.blur();
        assert_eq!(tracker.capture(), None);
    }

    #[test]
    fn test_save_rejects_collapsed_when_content_required() {
        let tracker = SelectionTracker::new();
        let caret = Selection::collapsed(BoundaryPoint::new(vec![0, 0], 1));

        assert!(tracker.save(&caret, true).is_none());
        assert!(tracker.save(&caret, false).unwrap().is_collapsed());
    }

    #[test]
    fn test_restore_after_blur() {
        let fragment = parse("<p>click here</p>").unwrap();
        let mut tracker = SelectionTracker::new();
        let selection = Selection::from_text_offsets(&fragment, 0, 10);
        tracker.set_live(selection.clone());

        let saved = tracker.save(&tracker.capture().unwrap(), true).unwrap();
        tracker.blur();

        assert_eq!(tracker.restore(saved, &fragment), Ok(selection.clone()));
        assert!(tracker.is_focused());
        assert_eq!(tracker.capture(), Some(selection));
    }

    #[test]
    fn test_restore_against_changed_fragment() {
        let before = parse("<p>one</p><p>two</p>").unwrap();
        let after = parse("<p>one</p>").unwrap();
        let mut tracker = SelectionTracker::new();

        let saved = tracker
            .save(&Selection::from_text_offsets(&before, 3, 6), true)
            .unwrap();

        assert_eq!(tracker.restore(saved, &after), Err(MutationError::InvalidSelection));
        assert_eq!(tracker.capture(), None);
    }
}
