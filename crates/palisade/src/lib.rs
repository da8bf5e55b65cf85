//! # Palisade
//!
//! **Policy-compilation core for an API gateway sidecar**
//!
//! Palisade turns a declarative, hierarchical API specification — base
//! paths, operations, authentication requirements, consumer authorization,
//! CORS, request transforms — into validated, pre-compiled structures the
//! gateway's request filter queries on every request:
//!
//! - 🧭 **Path resolution** – segment tries mapping request paths to APIs
//!   and operations, most specific match first
//! - 🔐 **Authentication trees** – recursive any-of/all-of/JWT requirement
//!   composition with strict decode and emptiness semantics
//! - ✂️ **Template compilation** – `{name}` placeholder templates for path
//!   rewrites and credential extraction, parsed once and shared
//! - 🌐 **CORS precomputation** – per-API origin sets, compiled matchers and
//!   the must-vary flag
//!
//! ## Pipeline
//!
//! ```text
//! loaded Specification ──► validate_specifications ──► CompiledSpecification
//!                              (fail-fast invariants)      (immutable, shared)
//! ```
//!
//! The wire servers, JWT verification engine, analytics pipeline and
//! configuration loading are external collaborators: Palisade only consumes
//! the already-deserialized specification tree and exposes read-only
//! lookups on the compiled result.
//!
//! ## Quick Start
//!
//! ```rust
//! use palisade::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut specs: Vec<Specification> = vec![/* from the config loader */];
//! validate_specifications(&mut specs)?;
//!
//! for spec in specs {
//!     let compiled = CompiledSpecification::new(spec)?;
//!     assert!(compiled.resolve_api("/v1/pets/42").is_none());
//! }
//! # Ok(())
//! # }
//! ```

// Re-export the specification model and validator
pub use palisade_spec as spec;

// Re-export the compiler
pub use palisade_compiler as compiler;

// Re-export the path trie
pub use palisade_router as router;

// Re-export the template engine
pub use palisade_template as template;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use palisade::prelude::*;
/// ```
pub mod prelude {
    pub use palisade_compiler::{CompileError, CompiledSpecification, OperationMatch};
    pub use palisade_spec::{
        validate_specifications, Api, AuthenticationRequirement, JwtRequirement, Operation,
        Specification, ValidationError,
    };
    pub use palisade_template::{Bindings, Template, TemplateError};
}
