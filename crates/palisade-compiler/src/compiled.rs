//! The compiled specification object.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use http::Method;
use indexmap::IndexMap;
use regex::Regex;
use tracing::debug;

use palisade_router::{path_segments, Params, PathTrie};
use palisade_spec::{
    Api, HttpRequestTransforms, JwtRequirement, Operation, ParameterBinding, Specification,
    ANY_METHOD,
};
use palisade_template::{Template, TemplateCache};

use crate::cors::{CorsIndex, CorsPolicyView, WILDCARD_ORIGIN};
use crate::error::CompileError;

/// The wildcard trie segment.
const WILDCARD: &str = "*";

/// Value stored in the operation trie: indices into the owning
/// specification plus the compiled path-match template, if any.
#[derive(Debug, Clone)]
struct OpRef {
    api: usize,
    operation: usize,
    path_template: Option<Arc<Template>>,
}

/// A resolved operation: the operation, its API, the path-parameter
/// captures, and the compiled template of the matched path.
///
/// The captures and template together let the filter render path rewrites
/// with the values bound by `{name}` segments.
#[derive(Debug, Clone)]
pub struct OperationMatch<'a> {
    /// The API the operation belongs to.
    pub api: &'a Api,
    /// The matched operation.
    pub operation: &'a Operation,
    /// Path-parameter bindings captured while matching.
    pub params: Params,
    /// Compiled template of the matched path, absent for the
    /// any-method/any-path fallback.
    pub path_template: Option<Arc<Template>>,
}

/// An immutable, request-time-queryable compilation of one validated
/// [`Specification`].
///
/// Built once, then only read; safe for unlimited concurrent access. See
/// the [crate docs](crate) for the construction/reload contract.
#[derive(Debug, Clone)]
pub struct CompiledSpecification {
    spec: Specification,
    api_paths: PathTrie<usize>,
    op_paths: PathTrie<OpRef>,
    templates: TemplateCache,
    cors: HashMap<String, CorsIndex>,
    origin_regexes: IndexMap<String, Regex>,
}

impl CompiledSpecification {
    /// Compiles a validated specification.
    ///
    /// The caller must have run
    /// [`validate_specifications`](palisade_spec::validate_specifications)
    /// first: compilation relies on the invariants and the flattened JWT
    /// lists that validation establishes. The first template syntax error or
    /// invalid CORS pattern rejects the whole specification.
    pub fn new(spec: Specification) -> Result<Self, CompileError> {
        let mut api_paths = PathTrie::new();
        let mut op_paths = PathTrie::new();
        let mut templates = TemplateCache::new();
        let mut cors = HashMap::with_capacity(spec.apis.len());
        let mut origin_regexes: IndexMap<String, Regex> = IndexMap::new();

        for (api_index, api) in spec.apis.iter().enumerate() {
            api_paths.insert(path_segments(&api.base_path), api_index);

            let mut allowed_origins = HashSet::with_capacity(api.cors.allow_origins.len());
            let mut wildcard_origin = false;
            for origin in &api.cors.allow_origins {
                if origin == WILDCARD_ORIGIN {
                    wildcard_origin = true;
                }
                allowed_origins.insert(origin.clone());
            }
            for pattern in &api.cors.allow_origins_regexes {
                if !origin_regexes.contains_key(pattern) {
                    let compiled =
                        Regex::new(pattern).map_err(|source| CompileError::OriginPattern {
                            pattern: pattern.clone(),
                            source,
                        })?;
                    origin_regexes.insert(pattern.clone(), compiled);
                }
            }
            cors.insert(
                api.id.clone(),
                CorsIndex {
                    allowed_origins,
                    regex_patterns: api.cors.allow_origins_regexes.clone(),
                    must_vary: wildcard_origin
                        || !api.cors.allow_origins_regexes.is_empty()
                        || api.cors.allow_origins.len() > 1,
                },
            );

            compile_binding_transformations(
                &mut templates,
                &api.consumer_authorization.bindings,
            )?;
            compile_request_transforms(&mut templates, &api.request_transforms)?;

            for (op_index, operation) in api.operations.iter().enumerate() {
                if operation.http_matches.is_empty() {
                    // No explicit matches: this operation is the fallback
                    // for any method and any path under the API.
                    op_paths.insert(
                        [api.id.as_str(), WILDCARD, WILDCARD],
                        OpRef {
                            api: api_index,
                            operation: op_index,
                            path_template: None,
                        },
                    );
                } else {
                    for http_match in &operation.http_matches {
                        let method = if http_match.method == ANY_METHOD {
                            WILDCARD
                        } else {
                            http_match.method.as_str()
                        };
                        let path_template = templates.compile(&http_match.path_template)?;
                        op_paths.insert(
                            [api.id.as_str(), method]
                                .into_iter()
                                .chain(path_segments(&http_match.path_template)),
                            OpRef {
                                api: api_index,
                                operation: op_index,
                                path_template,
                            },
                        );
                    }
                }

                compile_binding_transformations(
                    &mut templates,
                    &operation.consumer_authorization.bindings,
                )?;
                compile_request_transforms(&mut templates, &operation.request_transforms)?;
            }
        }

        // Token-carrier transformations from every flattened JWT definition.
        for api in &spec.apis {
            for jwt in api.jwt_requirements.iter().chain(
                api.operations
                    .iter()
                    .flat_map(|operation| operation.jwt_requirements.iter()),
            ) {
                compile_binding_transformations(&mut templates, &jwt.bindings)?;
            }
        }

        debug!(
            spec = %spec.id,
            apis = spec.apis.len(),
            templates = templates.len(),
            "compiled environment specification"
        );

        Ok(Self {
            spec,
            api_paths,
            op_paths,
            templates,
            cors,
            origin_regexes,
        })
    }

    /// Returns the underlying specification.
    #[must_use]
    pub fn specification(&self) -> &Specification {
        &self.spec
    }

    /// Resolves a request path to the API owning its base path.
    ///
    /// Base paths match as prefixes: `/v1` owns `/v1/petstore`.
    #[must_use]
    pub fn resolve_api(&self, path: &str) -> Option<&Api> {
        let segments: Vec<&str> = path_segments(path).collect();
        let matched = self.api_paths.find(&segments)?;
        self.spec.apis.get(*matched.value)
    }

    /// Resolves method and path (relative to the API base path) to the most
    /// specific operation of `api_id`.
    ///
    /// Operations without explicit HTTP matches act as the fallback when
    /// nothing more specific matches. A miss is a normal "not found" result,
    /// not an error; the caller decides the no-match policy.
    #[must_use]
    pub fn resolve_operation(
        &self,
        api_id: &str,
        method: &Method,
        path: &str,
    ) -> Option<OperationMatch<'_>> {
        let mut key = vec![api_id, method.as_str()];
        key.extend(path_segments(path));
        let matched = self.op_paths.find(&key)?;
        let op_ref = matched.value;
        let api = self.spec.apis.get(op_ref.api)?;
        let operation = api.operations.get(op_ref.operation)?;
        Some(OperationMatch {
            api,
            operation,
            params: matched.params,
            path_template: op_ref.path_template.clone(),
        })
    }

    /// Looks up the compiled template for an exact raw string seen anywhere
    /// in the specification.
    #[must_use]
    pub fn template(&self, raw: &str) -> Option<&Arc<Template>> {
        self.templates.get(raw)
    }

    /// Number of distinct templates compiled from the specification.
    #[must_use]
    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    /// Returns the precomputed CORS view for an API.
    #[must_use]
    pub fn cors_policy_for(&self, api_id: &str) -> Option<CorsPolicyView<'_>> {
        let index = self.cors.get(api_id)?;
        Some(CorsPolicyView {
            allowed_origins: &index.allowed_origins,
            origin_regexes: index
                .regex_patterns
                .iter()
                .filter_map(|pattern| self.origin_regexes.get(pattern))
                .collect(),
            must_vary: index.must_vary,
        })
    }

    /// Whether responses for an API must carry `Vary: Origin`.
    #[must_use]
    pub fn cors_vary(&self, api_id: &str) -> bool {
        self.cors.get(api_id).is_some_and(|index| index.must_vary)
    }

    /// Every JWT requirement in the specification: for each API in
    /// declaration order, its own flattened requirements followed by its
    /// operations'. The verification collaborator builds one key source per
    /// entry.
    pub fn jwt_requirements(&self) -> impl Iterator<Item = &JwtRequirement> {
        self.spec.apis.iter().flat_map(|api| {
            api.jwt_requirements.iter().chain(
                api.operations
                    .iter()
                    .flat_map(|operation| operation.jwt_requirements.iter()),
            )
        })
    }
}

/// Registers the path rewrite and header/query value templates of one
/// transforms block.
fn compile_request_transforms(
    templates: &mut TemplateCache,
    transforms: &HttpRequestTransforms,
) -> Result<(), CompileError> {
    templates.compile(&transforms.path_transform)?;
    for add in &transforms.header_transforms.add {
        templates.compile(&add.value)?;
    }
    for add in &transforms.query_transforms.add {
        templates.compile(&add.value)?;
    }
    Ok(())
}

/// Registers the extraction/substitution template pairs of parameter
/// bindings.
fn compile_binding_transformations(
    templates: &mut TemplateCache,
    bindings: &[ParameterBinding],
) -> Result<(), CompileError> {
    for binding in bindings {
        if binding.transformation.is_empty() {
            continue;
        }
        templates.compile(&binding.transformation.template)?;
        templates.compile(&binding.transformation.substitution)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use palisade_spec::{
        validate_specifications, AddNameValue, CorsPolicy, HttpMatch, NameValueTransforms,
    };
    use palisade_template::Bindings;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_compiled_specification_is_send_sync() {
        assert_send_sync::<CompiledSpecification>();
    }

    fn compile(spec: Specification) -> CompiledSpecification {
        let mut specs = vec![spec];
        validate_specifications(&mut specs).unwrap();
        CompiledSpecification::new(specs.remove(0)).unwrap()
    }

    fn pets_api() -> Api {
        Api {
            id: "pets".to_owned(),
            base_path: "/v1".to_owned(),
            operations: vec![Operation {
                name: "getPet".to_owned(),
                http_matches: vec![HttpMatch {
                    method: "GET".to_owned(),
                    path_template: "/pets/{id}".to_owned(),
                }],
                request_transforms: HttpRequestTransforms {
                    path_transform: "/backend/pets/{id}".to_owned(),
                    ..Default::default()
                },
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_capture_feeds_path_rewrite() {
        let compiled = compile(Specification {
            id: "env".to_owned(),
            apis: vec![pets_api()],
        });

        let matched = compiled
            .resolve_operation("pets", &Method::GET, "/pets/42")
            .unwrap();
        assert_eq!(matched.operation.name, "getPet");
        assert_eq!(matched.params.get("id"), Some("42"));

        // The captured bindings render the operation's path rewrite.
        let rewrite = compiled
            .template(&matched.operation.request_transforms.path_transform)
            .unwrap();
        let bindings: Bindings = matched
            .params
            .iter()
            .map(|(n, v)| (n.to_owned(), v.to_owned()))
            .collect();
        assert_eq!(rewrite.render(&bindings).unwrap(), "/backend/pets/42");
    }

    #[test]
    fn test_templates_deduplicated_across_apis() {
        let mut second = pets_api();
        second.id = "pets2".to_owned();
        second.base_path = "/v2".to_owned();
        let compiled = compile(Specification {
            id: "env".to_owned(),
            apis: vec![pets_api(), second],
        });

        // Both APIs reference the same two raw strings.
        assert_eq!(compiled.template_count(), 2);
    }

    #[test]
    fn test_template_syntax_error_rejects_specification() {
        let mut api = pets_api();
        api.request_transforms = HttpRequestTransforms {
            header_transforms: NameValueTransforms {
                add: vec![AddNameValue {
                    name: "x".to_owned(),
                    value: "{unclosed".to_owned(),
                    overwrite: false,
                }],
                remove: vec![],
            },
            ..Default::default()
        };
        let mut specs = vec![Specification {
            id: "env".to_owned(),
            apis: vec![api],
        }];
        validate_specifications(&mut specs).unwrap();
        let err = CompiledSpecification::new(specs.remove(0)).unwrap_err();
        assert!(matches!(err, CompileError::Template(_)));
    }

    #[test]
    fn test_invalid_origin_pattern_rejects_specification() {
        let mut api = pets_api();
        api.cors = CorsPolicy {
            allow_origins_regexes: vec!["(".to_owned()],
            ..Default::default()
        };
        let mut specs = vec![Specification {
            id: "env".to_owned(),
            apis: vec![api],
        }];
        validate_specifications(&mut specs).unwrap();
        let err = CompiledSpecification::new(specs.remove(0)).unwrap_err();
        assert!(matches!(err, CompileError::OriginPattern { .. }));
    }

    #[test]
    fn test_cors_vary_rules() {
        let case = |allow_origins: &[&str], regexes: &[&str]| {
            let mut api = pets_api();
            api.cors = CorsPolicy {
                allow_origins: allow_origins.iter().map(|s| (*s).to_owned()).collect(),
                allow_origins_regexes: regexes.iter().map(|s| (*s).to_owned()).collect(),
                ..Default::default()
            };
            let compiled = compile(Specification {
                id: "env".to_owned(),
                apis: vec![api],
            });
            compiled.cors_vary("pets")
        };

        assert!(case(&["*"], &[]), "wildcard origin must vary");
        assert!(case(&["https://a", "https://b"], &[]), "two origins must vary");
        assert!(case(&[], &["^https://.*$"]), "regex matcher must vary");
        assert!(!case(&["https://only"], &[]), "single literal origin need not vary");
        assert!(!case(&[], &[]));
    }

    #[test]
    fn test_origin_regex_compiled_once_and_matching() {
        let pattern = r"^https://[a-z]+\.example\.com$";
        let mut first = pets_api();
        first.cors.allow_origins_regexes = vec![pattern.to_owned()];
        let mut second = pets_api();
        second.id = "pets2".to_owned();
        second.base_path = "/v2".to_owned();
        second.cors.allow_origins_regexes = vec![pattern.to_owned()];

        let compiled = compile(Specification {
            id: "env".to_owned(),
            apis: vec![first, second],
        });

        for api_id in ["pets", "pets2"] {
            let view = compiled.cors_policy_for(api_id).unwrap();
            assert!(view.origin_allowed("https://shop.example.com"));
            assert!(!view.origin_allowed("https://shop.example.org"));
            assert!(view.must_vary);
        }
    }

    #[test]
    fn test_unknown_api_has_no_cors_view() {
        let compiled = compile(Specification {
            id: "env".to_owned(),
            apis: vec![pets_api()],
        });
        assert!(compiled.cors_policy_for("nope").is_none());
        assert!(!compiled.cors_vary("nope"));
    }
}
