//! Error taxonomy shared by declaration, parsing and value access.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A codec could not turn the token(s) into a value.
    #[error("invalid value for '{key}': {message}")]
    ValueDecode { key: String, message: String },

    /// A codec could not produce a textual representation.
    #[error("failed to encode value of '{key}': {message}")]
    ValueEncode { key: String, message: String },

    #[error("option '{key}' expects {expected} value token(s), {available} available")]
    MissingScalarValue {
        key: String,
        expected: usize,
        available: usize,
    },

    #[error("option '{key}' needs at least {min} item(s), got {got}")]
    InsufficientVectorItems { key: String, got: usize, min: usize },

    #[error("option '{key}' accepts at most {max} item(s), got {got}")]
    VectorItemsExceedMaximum { key: String, got: usize, max: usize },

    /// A vector item was cut short by end of input or by a declared key.
    #[error("option '{key}' has an incomplete item: expected {expected} token(s), found {found}")]
    IncompleteVectorItem {
        key: String,
        expected: usize,
        found: usize,
    },

    #[error("undeclared option '{key}' rejected by parsing policy")]
    UndeclaredKeyRejected { key: String },

    #[error("no option declared for key '{key}'")]
    UndeclaredKeyAccess { key: String },

    #[error("option '{key}' does not hold a value of type {expected}")]
    ValueTypeMismatch { key: String, expected: &'static str },

    #[error("codec for '{key}' is unusable: {reason}")]
    CodecBinding { key: String, reason: String },

    #[error("option key '{key}' is declared more than once")]
    DuplicateKey { key: String },

    #[error("option '{key}' has min items {min} greater than max items {max}")]
    InvalidQuantifier { key: String, min: usize, max: usize },

    #[error("invalid option schema: {0}")]
    Schema(String),
}

impl Error {
    /// The option key (or offending token) this error refers to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::ValueDecode { key, .. }
            | Self::ValueEncode { key, .. }
            | Self::MissingScalarValue { key, .. }
            | Self::InsufficientVectorItems { key, .. }
            | Self::VectorItemsExceedMaximum { key, .. }
            | Self::IncompleteVectorItem { key, .. }
            | Self::UndeclaredKeyRejected { key }
            | Self::UndeclaredKeyAccess { key }
            | Self::ValueTypeMismatch { key, .. }
            | Self::CodecBinding { key, .. }
            | Self::DuplicateKey { key }
            | Self::InvalidQuantifier { key, .. } => Some(key.as_str()),
            Self::Schema(_) => None,
        }
    }

    /// Re-attribute a key-less error raised below the option layer.
    pub(crate) fn with_key(self, key: &str) -> Self {
        match self {
            Self::InsufficientVectorItems { got, min, .. } => Self::InsufficientVectorItems {
                key: key.to_string(),
                got,
                min,
            },
            Self::VectorItemsExceedMaximum { got, max, .. } => Self::VectorItemsExceedMaximum {
                key: key.to_string(),
                got,
                max,
            },
            Self::InvalidQuantifier { min, max, .. } => Self::InvalidQuantifier {
                key: key.to_string(),
                min,
                max,
            },
            other => other,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Schema(e.to_string())
    }
}
