//! Placeholder template compiler and cache for Palisade.
//!
//! Templates are literal text interleaved with `{name}` placeholders, e.g.
//! `/target_prefix/{path}` or `Bearer {token}`. They drive path rewriting,
//! header and query value construction, and credential extraction in the
//! compiled gateway specification.
//!
//! # Overview
//!
//! - [`Template::parse`] validates bracket balance and placeholder identifier
//!   syntax and records the ordered list of placeholder names. Syntax is the
//!   only thing checked at compile time.
//! - [`Template::render`] substitutes placeholder values from a [`Bindings`]
//!   map; a placeholder with no binding is an error for that render call.
//! - [`Template::extract`] runs a template in reverse, capturing placeholder
//!   values out of an input string (`Bearer {token}` against `Bearer abc`
//!   yields `token = abc`).
//! - [`TemplateCache`] interns compiled templates by their exact raw string,
//!   so a template repeated across a specification is parsed once and
//!   shared. One cache is owned per compiled specification instance.
//!
//! # Example
//!
//! ```rust
//! use palisade_template::{Bindings, Template};
//!
//! let template = Template::parse("/users/{id}/pets").unwrap();
//! assert_eq!(template.placeholder_names(), ["id"]);
//!
//! let mut bindings = Bindings::new();
//! bindings.insert("id", "42");
//! assert_eq!(template.render(&bindings).unwrap(), "/users/42/pets");
//!
//! let captured = template.extract("/users/7/pets").unwrap();
//! assert_eq!(captured.get("id"), Some("7"));
//! ```

mod cache;
mod error;
mod template;

pub use cache::TemplateCache;
pub use error::TemplateError;
pub use template::{Bindings, Template};
