//! Precomputed CORS lookup state.

use std::collections::HashSet;

use regex::Regex;

/// The universal wildcard origin.
pub(crate) const WILDCARD_ORIGIN: &str = "*";

/// Per-API CORS state computed at compile time.
///
/// Regex patterns are stored by their raw string; the compiled forms live in
/// the specification-wide regex cache so each distinct pattern is compiled
/// once no matter how many APIs share it.
#[derive(Debug, Clone)]
pub(crate) struct CorsIndex {
    pub(crate) allowed_origins: HashSet<String>,
    pub(crate) regex_patterns: Vec<String>,
    pub(crate) must_vary: bool,
}

/// A request-time view of one API's CORS policy.
#[derive(Debug, Clone)]
pub struct CorsPolicyView<'a> {
    /// Literal allowed origins, including the wildcard if configured.
    pub allowed_origins: &'a HashSet<String>,
    /// Compiled origin matchers.
    pub origin_regexes: Vec<&'a Regex>,
    /// Whether responses must carry a `Vary: Origin` header: true when the
    /// wildcard origin is allowed, any regex matcher exists, or more than
    /// one literal origin is configured.
    pub must_vary: bool,
}

impl CorsPolicyView<'_> {
    /// Returns true when `origin` is allowed by literal set or any matcher.
    #[must_use]
    pub fn origin_allowed(&self, origin: &str) -> bool {
        self.allowed_origins.contains(origin)
            || self.allowed_origins.contains(WILDCARD_ORIGIN)
            || self.origin_regexes.iter().any(|re| re.is_match(origin))
    }
}
