//! Structural validation errors.
//!
//! Message strings are part of the operator-facing contract; callers match
//! on the rendered text in diagnostics and alerting, so the wording here is
//! stable.

use thiserror::Error;

/// A structural violation found while validating a specification set.
///
/// Validation is fail-fast: the first violation encountered is returned and
/// the specification is rejected wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// An environment spec has an empty ID.
    #[error("environment spec IDs must be non-empty")]
    EmptySpecificationId,

    /// Two environment specs share an ID.
    #[error("environment spec IDs must be unique, got multiple {0}")]
    DuplicateSpecificationId(String),

    /// An API spec has an empty ID.
    #[error("API spec IDs must be non-empty")]
    EmptyApiId,

    /// Two API specs within one environment spec share an ID.
    #[error("API spec IDs within each environment spec must be unique, got multiple {0}")]
    DuplicateApiId(String),

    /// Two API specs within one environment spec share a base path.
    #[error("API spec basepaths within each environment spec must be unique, got multiple {0}")]
    DuplicateBasePath(String),

    /// An operation has an empty name.
    #[error("operation names must be non-empty")]
    EmptyOperationName,

    /// Two operations within one API share a name.
    #[error("operation names within each API must be unique, got multiple {0}")]
    DuplicateOperationName(String),

    /// An HTTP match uses a method outside the known set.
    #[error("operation {name:?} uses an invalid HTTP method {method:?}")]
    InvalidHttpMethod {
        /// The operation carrying the match.
        name: String,
        /// The unrecognized method.
        method: String,
    },

    /// A JWT requirement has an empty name.
    #[error("JWT authentication requirement names must be non-empty")]
    EmptyJwtRequirementName,

    /// Two JWT requirements within one API or operation tree share a name.
    #[error(
        "JWT authentication requirement names within each API or operation must be unique, got multiple {0}"
    )]
    DuplicateJwtRequirementName(String),

    /// A claim binding references a JWT requirement that is not in scope.
    #[error("JWT claim requirement {0:?} does not exist")]
    UnknownJwtClaimRequirement(String),

    /// A header match target is empty.
    #[error("header in API operation parameter match must be non-empty")]
    EmptyHeaderMatch,

    /// A query match target is empty.
    #[error("query in API operation parameter match must be non-empty")]
    EmptyQueryMatch,

    /// A JWT claim match target has an empty claim name.
    #[error("JWT claim name in API operation parameter match must be non-empty")]
    EmptyJwtClaimName,
}
