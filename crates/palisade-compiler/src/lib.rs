//! Specification compiler for the Palisade gateway sidecar.
//!
//! Given an already-validated [`palisade_spec::Specification`], this crate
//! builds the immutable, request-time-queryable form consumed by the
//! gateway's filter: two path tries, a shared template cache, and
//! precomputed CORS lookup sets.
//!
//! # Architecture
//!
//! ```text
//!   Specification (validated)
//!            │
//!            ▼
//!   ┌─────────────────────────────┐
//!   │   CompiledSpecification     │
//!   │                             │
//!   │  base-path trie ──► API     │
//!   │  op trie ────────► Operation│
//!   │  template cache             │
//!   │  CORS origin sets + flags   │
//!   └──────────┬──────────────────┘
//!              │ read-only accessors
//!              ▼
//!   request filter / JWT verifier
//! ```
//!
//! Construction is single-threaded and synchronous, runs once at startup or
//! configuration reload, and performs no I/O. It fails fast: the first
//! template syntax error or invalid CORS pattern rejects the whole
//! specification, because a partially-compiled routing/auth structure is
//! unsafe to serve traffic against. The result is immutable and freely
//! shared across request-handling threads; a reload builds a brand-new
//! instance and swaps it in, so in-flight requests keep the instance they
//! started with.
//!
//! # Example
//!
//! ```rust
//! use palisade_compiler::CompiledSpecification;
//! use palisade_spec::{validate_specifications, Specification};
//!
//! # fn load() -> Vec<Specification> { vec![Specification { id: "env".into(), ..Default::default() }] }
//! let mut specs: Vec<Specification> = load();
//! validate_specifications(&mut specs).expect("specification must be valid");
//!
//! let compiled = CompiledSpecification::new(specs.remove(0)).unwrap();
//! assert!(compiled.resolve_api("/nowhere").is_none());
//! ```

mod compiled;
mod cors;
mod error;

pub use compiled::{CompiledSpecification, OperationMatch};
pub use cors::CorsPolicyView;
pub use error::CompileError;
