//! The environment specification tree.
//!
//! These types are the already-deserialized form handed to the validator and
//! compiler; configuration syntax and file I/O live with the embedding
//! process.

use serde::{Deserialize, Serialize};

use crate::auth::{AuthenticationRequirement, JwtRequirement};
use crate::binding::ConsumerAuthorization;

/// The method token matching any HTTP method.
pub const ANY_METHOD: &str = "ANY";

/// True for a requirement that was never configured. Unset requirements are
/// omitted on encode; an explicit empty mapping would fail the decode-time
/// variant check.
fn authentication_is_unset(requirement: &AuthenticationRequirement) -> bool {
    !requirement.disabled && requirement.requirements.is_none()
}

/// Returns true for a method in the known set, including [`ANY_METHOD`].
pub(crate) fn is_known_method(method: &str) -> bool {
    method == ANY_METHOD
        || matches!(
            method,
            "GET" | "POST" | "PUT" | "DELETE" | "PATCH" | "HEAD" | "OPTIONS" | "CONNECT" | "TRACE"
        )
}

/// An environment specification: an identified collection of APIs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Specification {
    /// Unique, non-empty ID across the whole loaded set.
    pub id: String,
    /// The APIs this specification declares.
    pub apis: Vec<Api>,
}

/// One API: a base path plus the policies and operations under it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Api {
    /// Unique, non-empty ID within the specification.
    pub id: String,
    /// Path prefix identifying requests that belong to this API.
    pub base_path: String,
    /// API-level authentication requirement tree.
    #[serde(skip_serializing_if = "authentication_is_unset")]
    pub authentication: AuthenticationRequirement,
    /// API-level consumer authorization.
    pub consumer_authorization: ConsumerAuthorization,
    /// Operations, in declaration order.
    pub operations: Vec<Operation>,
    /// Request rewrites applied for this API.
    #[serde(rename = "http_request_transforms")]
    pub request_transforms: HttpRequestTransforms,
    /// Cross-origin policy.
    pub cors: CorsPolicy,
    /// JWT requirements flattened out of [`Self::authentication`].
    /// Populated by validation; empty until then.
    #[serde(skip)]
    pub jwt_requirements: Vec<JwtRequirement>,
}

/// A named unit within an API carrying its own policy overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Operation {
    /// Unique, non-empty name within the API.
    pub name: String,
    /// Method/path matches; an empty list matches any method and any path
    /// under the API.
    pub http_matches: Vec<HttpMatch>,
    /// Operation-level authentication, layered on top of the API's.
    #[serde(skip_serializing_if = "authentication_is_unset")]
    pub authentication: AuthenticationRequirement,
    /// Operation-level consumer authorization, layered on top of the API's.
    pub consumer_authorization: ConsumerAuthorization,
    /// Request rewrites applied for this operation.
    #[serde(rename = "http_request_transforms")]
    pub request_transforms: HttpRequestTransforms,
    /// JWT requirements flattened out of [`Self::authentication`].
    /// Populated by validation; empty until then.
    #[serde(skip)]
    pub jwt_requirements: Vec<JwtRequirement>,
}

/// One method-plus-path match for an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpMatch {
    /// HTTP method, or [`ANY_METHOD`]; omitting it matches any method.
    pub method: String,
    /// Path template relative to the API base path; may contain `{name}`
    /// capture segments and `*` wildcards.
    pub path_template: String,
}

impl Default for HttpMatch {
    fn default() -> Self {
        Self {
            method: ANY_METHOD.to_owned(),
            path_template: String::new(),
        }
    }
}

/// Request rewrites: an optional path rewrite plus header and query edits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpRequestTransforms {
    /// Path rewrite template; empty means no rewrite.
    pub path_transform: String,
    /// Header edits.
    pub header_transforms: NameValueTransforms,
    /// Query parameter edits.
    pub query_transforms: NameValueTransforms,
}

impl HttpRequestTransforms {
    /// Returns true when no rewrite of any kind is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.header_transforms.is_empty()
            && self.query_transforms.is_empty()
            && self.path_transform.trim().is_empty()
    }
}

/// An ordered add-list plus a remove-set for headers or query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NameValueTransforms {
    /// Name/value-template pairs to add, in order.
    pub add: Vec<AddNameValue>,
    /// Names to remove.
    pub remove: Vec<String>,
}

impl NameValueTransforms {
    /// Returns true when there is nothing to add or remove.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

/// One name/value pair to add, with overwrite semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AddNameValue {
    /// The header or query parameter name.
    pub name: String,
    /// Value template; may reference captured path parameters.
    pub value: String,
    /// Replace an existing value instead of appending.
    pub overwrite: bool,
}

/// Cross-origin resource sharing policy for one API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsPolicy {
    /// Literal allowed origins; `*` allows any origin.
    pub allow_origins: Vec<String>,
    /// Regular expressions matched against the request origin.
    pub allow_origins_regexes: Vec<String>,
    /// Methods allowed for cross-origin requests.
    pub allow_methods: Vec<String>,
    /// Request headers allowed for cross-origin requests.
    pub allow_headers: Vec<String>,
    /// Response headers exposed to the browser.
    pub expose_headers: Vec<String>,
    /// Preflight cache lifetime in seconds.
    pub max_age: Option<u64>,
    /// Whether credentialed requests are allowed.
    pub allow_credentials: bool,
}

impl CorsPolicy {
    /// Returns true when no origins are configured at all.
    ///
    /// Only the two origin lists decide emptiness; the remaining fields are
    /// meaningless without at least one allowed origin.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allow_origins.is_empty() && self.allow_origins_regexes.is_empty()
    }
}
