use autoletter_parser::ParseError;
use thiserror::Error;

/// Errors that can occur while rendering a preview
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PreviewError {
    #[error("Body is not valid markup: {0}")]
    Parse(#[from] ParseError),

    #[error("Preview error: {0}")]
    Generic(String),
}

impl From<String> for PreviewError {
    fn from(s: String) -> Self {
        PreviewError::Generic(s)
    }
}

impl From<&str> for PreviewError {
    fn from(s: &str) -> Self {
        PreviewError::Generic(s.to_string())
    }
}
