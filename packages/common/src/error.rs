use thiserror::Error;

/// Common error type shared by the autoletter crates
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommonError {
    #[error("Unknown merge variable: {0}")]
    UnknownVariable(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variables::MergeVariable;

    #[test]
    fn test_unknown_variable_message() {
        let err = MergeVariable::resolve("nickname").unwrap_err();
        assert_eq!(err, CommonError::UnknownVariable("nickname".to_string()));
        assert_eq!(err.to_string(), "Unknown merge variable: nickname");
    }
}
