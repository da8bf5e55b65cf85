//! Public trie wrapper.

use crate::node::{parse_segment, Node};
use crate::params::Params;
use crate::TrieMatch;

/// Splits a slash-separated path into its non-empty segments.
///
/// Leading, trailing and doubled slashes are ignored, so `/v1/pets/` and
/// `v1/pets` produce the same segments.
pub fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// A segment trie mapping patterns to values.
///
/// See the [crate docs](crate) for segment kinds, precedence and prefix
/// matching. The trie is built once during specification compilation and
/// only read afterwards.
#[derive(Debug, Clone)]
pub struct PathTrie<T> {
    root: Node<T>,
    len: usize,
}

impl<T> Default for PathTrie<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PathTrie<T> {
    /// Creates an empty trie.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            len: 0,
        }
    }

    /// Inserts `value` under the given pattern segments.
    ///
    /// Each segment is parsed for its kind (`{name}` capture, `*` wildcard,
    /// anything else literal). Re-inserting an existing pattern replaces the
    /// stored value.
    pub fn insert<I, S>(&mut self, pattern: I, value: T)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let segments: Vec<_> = pattern
            .into_iter()
            .map(|s| parse_segment(s.as_ref()))
            .collect();
        if self.root.insert(&segments, value).is_none() {
            self.len += 1;
        }
    }

    /// Resolves input segments to the most specific matching value.
    ///
    /// Returns the value of the deepest valued node reached, plus any
    /// parameter captures accumulated on the way there.
    #[must_use]
    pub fn find(&self, path: &[&str]) -> Option<TrieMatch<'_, T>> {
        let mut params = Params::new();
        let value = self.root.find(path, &mut params)?;
        Some(TrieMatch { value, params })
    }

    /// Returns the number of patterns holding a value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if no patterns are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
