//! Template error types.

use thiserror::Error;

/// Errors produced while parsing or rendering a template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A `{` placeholder opener was never closed.
    #[error("unclosed '{{' at byte {position} in template {raw:?}")]
    UnclosedPlaceholder {
        /// The raw template string.
        raw: String,
        /// Byte offset of the offending bracket.
        position: usize,
    },

    /// A `}` appeared with no matching opener.
    #[error("unexpected '}}' at byte {position} in template {raw:?}")]
    UnexpectedClose {
        /// The raw template string.
        raw: String,
        /// Byte offset of the offending bracket.
        position: usize,
    },

    /// A placeholder name is empty or contains invalid characters.
    #[error("invalid placeholder name {name:?} in template {raw:?}")]
    InvalidPlaceholderName {
        /// The raw template string.
        raw: String,
        /// The offending placeholder name.
        name: String,
    },

    /// Rendering referenced a placeholder with no bound value.
    #[error("no binding for placeholder {name:?}")]
    UnboundPlaceholder {
        /// The placeholder that had no binding.
        name: String,
    },
}
