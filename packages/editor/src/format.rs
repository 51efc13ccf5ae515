//! Inline formats the toolbar can toggle, and the format state reported for a selection.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FormatTag {
    Bold,
    Italic,
}

impl FormatTag {
    /// Tag used when wrapping
    pub fn tag(&self) -> &'static str {
        match self {
            FormatTag::Bold => "strong",
            FormatTag::Italic => "em",
        }
    }

    /// Whether an existing element already carries this format.
    /// Legacy `<b>`/`<i>` count, so toggling can remove them.
    pub fn matches(&self, tag: &str) -> bool {
        match self {
            FormatTag::Bold => matches!(tag, "strong" | "b"),
            FormatTag::Italic => matches!(tag, "em" | "i"),
        }
    }
}

/// Which formats enclose a selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatState {
    pub bold: bool,
    pub italic: bool,
    pub link: bool,
}

impl FormatState {
    pub fn has(&self, tag: FormatTag) -> bool {
        match tag {
            FormatTag::Bold => self.bold,
            FormatTag::Italic => self.italic,
        }
    }
}
