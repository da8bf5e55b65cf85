//! Segment trie for Palisade path resolution.
//!
//! This crate provides [`PathTrie`], a generic segment-indexed tree used by
//! the specification compiler for two independent indexes: base-path
//! segments to the owning API, and `[api-id, method, path-segments…]` keys
//! to the matching operation.
//!
//! # Segment kinds
//!
//! Pattern segments come in three kinds, in matching precedence order:
//!
//! 1. **Literal** — exact string match (`users`)
//! 2. **Parameter capture** — `{name}` matches any single segment and binds
//!    its value to `name`
//! 3. **Wildcard** — `*` matches any single segment and binds nothing
//!
//! Precedence is purely segment-kind based; insertion order never affects
//! the outcome.
//!
//! # Prefix matching
//!
//! Lookup returns the value of the *deepest* node holding one along the
//! walk, so a pattern registered for `["v1"]` matches the input
//! `["v1", "petstore"]`. This is what lets a base path own every request
//! underneath it, and lets the `[api, *, *]` fallback operation catch paths
//! of any depth.
//!
//! # Example
//!
//! ```rust
//! use palisade_router::PathTrie;
//!
//! let mut trie = PathTrie::new();
//! trie.insert(["v1", "pets", "{id}"], "getPet");
//! trie.insert(["v1", "pets"], "listPets");
//!
//! let m = trie.find(&["v1", "pets", "42"]).unwrap();
//! assert_eq!(*m.value, "getPet");
//! assert_eq!(m.params.get("id"), Some("42"));
//! ```

mod node;
mod params;
mod trie;

pub use params::Params;
pub use trie::{path_segments, PathTrie};

/// A successful trie lookup: the matched value plus captured parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrieMatch<'a, T> {
    /// The value stored at the deepest matching node.
    pub value: &'a T,
    /// Parameter-capture bindings accumulated along the match.
    pub params: Params,
}
