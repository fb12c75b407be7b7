//! Error types for field construction and evaluation

use thiserror::Error;

/// Field result type
pub type Result<T> = std::result::Result<T, FieldError>;

/// Errors raised while materialising a field or computing its value
#[derive(Debug, Error)]
pub enum FieldError {
    /// An attribute is present but has the wrong JSON type
    #[error("Attribute '{name}' must be {expected}")]
    InvalidAttribute {
        /// Attribute key
        name: String,
        /// Expected JSON type
        expected: &'static str,
    },

    /// A required attribute is missing
    #[error("Missing attribute '{0}'")]
    MissingAttribute(&'static str),

    /// Attribute values contradict each other
    #[error("Invalid field definition: {0}")]
    InvalidDefinition(String),

    /// A number answer is outside the field's range
    #[error("{0}")]
    OutOfRange(String),

    /// A date pattern uses a letter that has no chrono equivalent
    #[error("Unsupported date pattern letter '{letter}' in '{pattern}'")]
    UnsupportedPattern {
        /// The offending pattern letter
        letter: char,
        /// The full pattern
        pattern: String,
    },

    /// A date value could not be formatted
    #[error("Failed to format date with pattern '{0}'")]
    Format(String),

    /// The referenced snippet does not exist
    #[error("Snippet not found: {0}")]
    SnippetNotFound(String),

    /// An answer does not fit the field kind
    #[error("Field '{field}' does not accept {answer} answers")]
    AnswerMismatch {
        /// Field type id
        field: String,
        /// Answer kind
        answer: &'static str,
    },

    /// A select answer is not one of the offered options
    #[error("'{0}' is not one of the options")]
    UnknownOption(String),

    /// A computed value is not available in this environment
    #[error("Value unavailable: {0}")]
    Unavailable(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FieldError {
    pub(crate) fn invalid_attribute(name: &str, expected: &'static str) -> Self {
        FieldError::InvalidAttribute {
            name: name.to_string(),
            expected,
        }
    }
}
