//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("Parse error: {0}")]
    Parse(#[from] autoletter_parser::ParseError),

    #[error("Mutation error: {0}")]
    Mutation(#[from] crate::mutations::MutationError),
}

impl EditorError {
    /// The mutation failure, if this is one
    pub fn as_mutation(&self) -> Option<&crate::mutations::MutationError> {
        match self {
            EditorError::Mutation(err) => Some(err),
            EditorError::Parse(_) => None,
        }
    }
}
