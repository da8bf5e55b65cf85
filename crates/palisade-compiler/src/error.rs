//! Compilation errors.

use palisade_template::TemplateError;
use thiserror::Error;

/// Errors that reject a specification during compilation.
///
/// Compilation never partially applies: any error here means the whole
/// specification was refused.
#[derive(Debug, Error)]
pub enum CompileError {
    /// A template anywhere in the specification failed to parse.
    #[error("template compilation failed: {0}")]
    Template(#[from] TemplateError),

    /// A CORS origin pattern is not a valid regular expression.
    #[error("invalid CORS origin pattern {pattern:?}: {source}")]
    OriginPattern {
        /// The raw pattern from the CORS policy.
        pattern: String,
        /// The regex compile failure.
        #[source]
        source: regex::Error,
    },
}
