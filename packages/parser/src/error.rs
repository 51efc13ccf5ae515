use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected end of input at {pos}: expected {expected}")]
    UnexpectedEof { pos: usize, expected: String },

    #[error("Invalid syntax at {pos}: {message}")]
    InvalidSyntax { pos: usize, message: String },

    #[error("Lexer error at {pos}")]
    LexerError { pos: usize },

    #[error("Elements nested deeper than {max} at {pos}")]
    NestingTooDeep { pos: usize, max: usize },
}

impl ParseError {
    pub fn unexpected_eof(pos: usize, expected: impl Into<String>) -> Self {
        Self::UnexpectedEof {
            pos,
            expected: expected.into(),
        }
    }

    pub fn invalid_syntax(pos: usize, message: impl Into<String>) -> Self {
        Self::InvalidSyntax {
            pos,
            message: message.into(),
        }
    }

    pub fn lexer_error(pos: usize) -> Self {
        Self::LexerError { pos }
    }

    /// Byte offset the error points at
    pub fn pos(&self) -> usize {
        match self {
            ParseError::UnexpectedEof { pos, .. }
            | ParseError::InvalidSyntax { pos, .. }
            | ParseError::LexerError { pos }
            | ParseError::NestingTooDeep { pos, .. } => *pos,
        }
    }
}

/// Pretty-print an error with source context using ariadne
#[cfg(feature = "pretty-errors")]
pub fn format_error(source: &str, filename: &str, error: &ParseError) -> String {
    use ariadne::{Color, Label, Report, ReportKind, Source};

    let start = error.pos().min(source.len().saturating_sub(1));
    let end = (start + 1).min(source.len()).max(start);

    let label = match error {
        ParseError::UnexpectedEof { expected, .. } => format!("expected {}", expected),
        ParseError::InvalidSyntax { message, .. } => message.clone(),
        ParseError::LexerError { .. } => "unrecognized input".to_string(),
        ParseError::NestingTooDeep { max, .. } => format!("more than {} open elements", max),
    };

    let mut output = Vec::new();
    let report = Report::build(ReportKind::Error, filename, start)
        .with_message(error.to_string())
        .with_label(
            Label::new((filename, start..end))
                .with_color(Color::Red)
                .with_message(label),
        )
        .finish();

    if report
        .write((filename, Source::from(source)), &mut output)
        .is_err()
    {
        return error.to_string();
    }

    String::from_utf8(output).unwrap_or_else(|_| error.to_string())
}
