//! Trie node implementation.

use crate::params::Params;

/// Kind of a pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SegmentKind {
    /// Exact string match.
    Literal,
    /// `{name}` — matches any single segment, binds its value.
    Param(String),
    /// `*` — matches any single segment, binds nothing.
    Wildcard,
}

/// Parses one pattern segment into its kind.
pub(crate) fn parse_segment(segment: &str) -> (String, SegmentKind) {
    if let Some(name) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        (segment.to_owned(), SegmentKind::Param(name.to_owned()))
    } else if segment == "*" {
        (segment.to_owned(), SegmentKind::Wildcard)
    } else {
        (segment.to_owned(), SegmentKind::Literal)
    }
}

/// A node in the segment trie.
///
/// Literal children are kept sorted for binary search; at most one parameter
/// child and one wildcard child exist per node.
#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    segment: String,
    kind: SegmentKind,
    value: Option<T>,
    literal_children: Vec<Node<T>>,
    param_child: Option<Box<Node<T>>>,
    wildcard_child: Option<Box<Node<T>>>,
}

impl<T> Node<T> {
    fn new(segment: String, kind: SegmentKind) -> Self {
        Self {
            segment,
            kind,
            value: None,
            literal_children: Vec::new(),
            param_child: None,
            wildcard_child: None,
        }
    }

    /// Creates the root node.
    pub(crate) fn root() -> Self {
        Self::new(String::new(), SegmentKind::Literal)
    }

    /// Inserts `value` at the node addressed by `segments`, creating nodes on
    /// demand. Returns the value previously stored there, if any.
    pub(crate) fn insert(&mut self, segments: &[(String, SegmentKind)], value: T) -> Option<T> {
        let Some(((segment, kind), remaining)) = segments.split_first() else {
            return self.value.replace(value);
        };

        match kind {
            SegmentKind::Literal => {
                match self
                    .literal_children
                    .binary_search_by(|c| c.segment.as_str().cmp(segment))
                {
                    Ok(i) => self.literal_children[i].insert(remaining, value),
                    Err(i) => {
                        self.literal_children
                            .insert(i, Node::new(segment.clone(), kind.clone()));
                        self.literal_children[i].insert(remaining, value)
                    }
                }
            }
            SegmentKind::Param(_) => {
                let child = self
                    .param_child
                    .get_or_insert_with(|| Box::new(Node::new(segment.clone(), kind.clone())));
                child.insert(remaining, value)
            }
            SegmentKind::Wildcard => {
                let child = self
                    .wildcard_child
                    .get_or_insert_with(|| Box::new(Node::new(segment.clone(), kind.clone())));
                child.insert(remaining, value)
            }
        }
    }

    /// Walks `segments`, returning the value of the deepest matching node.
    ///
    /// At each level the literal child is preferred, then the parameter
    /// child, then the wildcard child, backtracking on failure. When no
    /// deeper match produces a value, the current node's own value (if any)
    /// matches as a prefix.
    pub(crate) fn find<'a>(&'a self, segments: &[&str], params: &mut Params) -> Option<&'a T> {
        let Some((segment, remaining)) = segments.split_first() else {
            return self.value.as_ref();
        };

        if let Ok(i) = self
            .literal_children
            .binary_search_by(|c| c.segment.as_str().cmp(segment))
        {
            if let Some(found) = self.literal_children[i].find(remaining, params) {
                return Some(found);
            }
        }

        if let Some(child) = &self.param_child {
            if let SegmentKind::Param(name) = &child.kind {
                params.push(name.clone(), (*segment).to_owned());
                if let Some(found) = child.find(remaining, params) {
                    return Some(found);
                }
                params.pop();
            }
        }

        if let Some(child) = &self.wildcard_child {
            if let Some(found) = child.find(remaining, params) {
                return Some(found);
            }
        }

        // Unconsumed input below this node: prefix match.
        self.value.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(segments: &[&str]) -> Vec<(String, SegmentKind)> {
        segments.iter().map(|s| parse_segment(s)).collect()
    }

    fn find<'a, T>(root: &'a Node<T>, path: &[&str]) -> Option<(&'a T, Params)> {
        let mut params = Params::new();
        root.find(path, &mut params).map(|v| (v, params))
    }

    #[test]
    fn test_parse_segment_kinds() {
        assert_eq!(parse_segment("users").1, SegmentKind::Literal);
        assert_eq!(parse_segment("{id}").1, SegmentKind::Param("id".to_owned()));
        assert_eq!(parse_segment("*").1, SegmentKind::Wildcard);
        // A lone asterisk embedded in text is a literal, not a wildcard.
        assert_eq!(parse_segment("a*b").1, SegmentKind::Literal);
    }

    #[test]
    fn test_literal_beats_param_beats_wildcard() {
        let mut root = Node::root();
        root.insert(&pattern(&["users", "me"]), "current");
        root.insert(&pattern(&["users", "{id}"]), "by-id");
        root.insert(&pattern(&["users", "*"]), "any");

        assert_eq!(*find(&root, &["users", "me"]).unwrap().0, "current");
        let (value, params) = find(&root, &["users", "42"]).unwrap();
        assert_eq!(*value, "by-id");
        assert_eq!(params.get("id"), Some("42"));
    }

    #[test]
    fn test_wildcard_matches_single_segment_without_binding() {
        let mut root = Node::root();
        root.insert(&pattern(&["files", "*"]), "file");

        let (value, params) = find(&root, &["files", "logo.png"]).unwrap();
        assert_eq!(*value, "file");
        assert!(params.is_empty());
    }

    #[test]
    fn test_backtracks_out_of_dead_literal_branch() {
        let mut root = Node::root();
        root.insert(&pattern(&["a", "b", "c"]), "deep");
        root.insert(&pattern(&["a", "{x}", "d"]), "param");

        // "a/b/d" enters the literal "b" branch, fails at "d", and must back
        // out into the parameter branch.
        let (value, params) = find(&root, &["a", "b", "d"]).unwrap();
        assert_eq!(*value, "param");
        assert_eq!(params.get("x"), Some("b"));
    }

    #[test]
    fn test_failed_param_branch_drops_its_capture() {
        let mut root = Node::root();
        root.insert(&pattern(&["a", "{x}", "c"]), "param");
        root.insert(&pattern(&["a", "*", "d"]), "wild");

        let (value, params) = find(&root, &["a", "b", "d"]).unwrap();
        assert_eq!(*value, "wild");
        assert!(params.is_empty());
    }

    #[test]
    fn test_prefix_match_returns_deepest_value() {
        let mut root = Node::root();
        root.insert(&pattern(&["v1"]), "shallow");
        root.insert(&pattern(&["v1", "pets"]), "deeper");

        assert_eq!(*find(&root, &["v1", "pets", "42"]).unwrap().0, "deeper");
        assert_eq!(*find(&root, &["v1", "other"]).unwrap().0, "shallow");
        assert!(find(&root, &["v2"]).is_none());
    }

    #[test]
    fn test_value_at_root_matches_everything() {
        let mut root = Node::root();
        root.insert(&pattern(&[]), "root");

        assert_eq!(*find(&root, &[]).unwrap().0, "root");
        assert_eq!(*find(&root, &["anything"]).unwrap().0, "root");
    }

    #[test]
    fn test_insert_replaces_existing_value() {
        let mut root = Node::root();
        assert!(root.insert(&pattern(&["a"]), 1).is_none());
        assert_eq!(root.insert(&pattern(&["a"]), 2), Some(1));
        assert_eq!(*find(&root, &["a"]).unwrap().0, 2);
    }
}
