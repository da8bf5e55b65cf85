//! Authentication requirement trees.
//!
//! A requirement is either a single JWT requirement, or a boolean
//! composition ("all of" / "any of") of further requirements. The tree is a
//! strict parent-to-child ownership hierarchy with no back edges.
//!
//! # Decode contract
//!
//! The textual form keys the variant: precisely one of `jwt`, `any` or `all`
//! must be present — unless the node is `disabled`, in which case the check
//! is skipped entirely and whatever is present is taken leniently. A
//! disabled requirement need not be well-formed; "disabled" is itself state
//! the gateway must carry rather than silently repair.

use std::time::Duration;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::binding::ParameterBinding;

/// JWKS cache duration applied when the configuration omits one.
const DEFAULT_JWKS_CACHE_DURATION: Duration = Duration::from_secs(30 * 60);

/// The variant content of an [`AuthenticationRequirement`].
#[derive(Debug, Clone, PartialEq)]
pub enum AuthenticationRequirements {
    /// A single JWT requirement.
    Jwt(JwtRequirement),
    /// Satisfied when any child requirement is satisfied.
    AnyOf(Vec<AuthenticationRequirement>),
    /// Satisfied only when every child requirement is satisfied.
    AllOf(Vec<AuthenticationRequirement>),
}

/// A node in the authentication requirement tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthenticationRequirement {
    /// Disables enforcement for the scope carrying this requirement.
    pub disabled: bool,
    /// The variant content; absent on a default (unconfigured) node.
    pub requirements: Option<AuthenticationRequirements>,
}

impl AuthenticationRequirement {
    /// Returns true when this requirement is enabled yet requires nothing.
    ///
    /// A disabled requirement is never empty, regardless of content:
    /// downstream code must observe "disabled" rather than treat the
    /// requirement as absent.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.disabled && Self::content_empty(self)
    }

    /// Recursive emptiness: a composition is empty iff every child is
    /// (vacuously true for no children); a JWT leaf never is.
    fn content_empty(requirement: &Self) -> bool {
        match &requirement.requirements {
            None => true,
            Some(AuthenticationRequirements::Jwt(_)) => false,
            Some(AuthenticationRequirements::AnyOf(children))
            | Some(AuthenticationRequirements::AllOf(children)) => {
                children.iter().all(Self::content_empty)
            }
        }
    }
}

#[derive(Deserialize)]
struct RawAuthenticationRequirement {
    #[serde(default)]
    disabled: bool,
    jwt: Option<JwtRequirement>,
    any: Option<Vec<AuthenticationRequirement>>,
    all: Option<Vec<AuthenticationRequirement>>,
}

impl<'de> Deserialize<'de> for AuthenticationRequirement {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawAuthenticationRequirement::deserialize(deserializer)?;
        let set = usize::from(raw.jwt.is_some())
            + usize::from(raw.any.is_some())
            + usize::from(raw.all.is_some());
        if set != 1 && !raw.disabled {
            return Err(D::Error::custom("precisely one of jwt, any or all should be set"));
        }
        let requirements = if let Some(jwt) = raw.jwt {
            Some(AuthenticationRequirements::Jwt(jwt))
        } else if let Some(any) = raw.any {
            Some(AuthenticationRequirements::AnyOf(any))
        } else {
            raw.all.map(AuthenticationRequirements::AllOf)
        };
        Ok(Self {
            disabled: raw.disabled,
            requirements,
        })
    }
}

#[derive(Serialize)]
struct RawAuthenticationRequirementRef<'a> {
    #[serde(skip_serializing_if = "is_false")]
    disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    jwt: Option<&'a JwtRequirement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    any: Option<&'a Vec<AuthenticationRequirement>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    all: Option<&'a Vec<AuthenticationRequirement>>,
}

impl Serialize for AuthenticationRequirement {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut raw = RawAuthenticationRequirementRef {
            disabled: self.disabled,
            jwt: None,
            any: None,
            all: None,
        };
        match &self.requirements {
            None => {}
            Some(AuthenticationRequirements::Jwt(jwt)) => raw.jwt = Some(jwt),
            Some(AuthenticationRequirements::AnyOf(children)) => raw.any = Some(children),
            Some(AuthenticationRequirements::AllOf(children)) => raw.all = Some(children),
        }
        raw.serialize(serializer)
    }
}

/// A single verifiable JWT definition.
///
/// Names are unique within the requirement tree of one API or one
/// operation; the verification collaborator builds one key source per
/// definition from the flattened list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JwtRequirement {
    /// Requirement name, referenced by claim bindings.
    pub name: String,
    /// Expected token issuer.
    pub issuer: String,
    /// Accepted audiences; empty accepts any.
    pub audiences: Vec<String>,
    /// Where the verification keys come from.
    pub jwks_source: JwksSource,
    /// Locations the token may be carried in, tried in order.
    pub bindings: Vec<ParameterBinding>,
    /// Header to forward the verified payload under, if any.
    pub forward_payload_header: Option<String>,
}

#[derive(Deserialize)]
struct RawJwtRequirement {
    #[serde(default)]
    name: String,
    #[serde(default)]
    issuer: String,
    #[serde(default)]
    audiences: Vec<String>,
    remote_jwks: Option<RemoteJwks>,
    #[serde(default, rename = "in")]
    bindings: Vec<ParameterBinding>,
    #[serde(default)]
    forward_payload_header: Option<String>,
}

impl<'de> Deserialize<'de> for JwtRequirement {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawJwtRequirement::deserialize(deserializer)?;
        let jwks_source = raw
            .remote_jwks
            .map(JwksSource::Remote)
            .ok_or_else(|| D::Error::custom("remote jwks not found"))?;
        Ok(Self {
            name: raw.name,
            issuer: raw.issuer,
            audiences: raw.audiences,
            jwks_source,
            bindings: raw.bindings,
            forward_payload_header: raw.forward_payload_header,
        })
    }
}

#[derive(Serialize)]
struct RawJwtRequirementRef<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "str_is_empty")]
    issuer: &'a str,
    #[serde(skip_serializing_if = "slice_is_empty")]
    audiences: &'a [String],
    remote_jwks: &'a RemoteJwks,
    #[serde(rename = "in", skip_serializing_if = "slice_is_empty")]
    bindings: &'a [ParameterBinding],
    #[serde(skip_serializing_if = "Option::is_none")]
    forward_payload_header: Option<&'a String>,
}

impl Serialize for JwtRequirement {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let JwksSource::Remote(remote_jwks) = &self.jwks_source;
        RawJwtRequirementRef {
            name: &self.name,
            issuer: &self.issuer,
            audiences: &self.audiences,
            remote_jwks,
            bindings: &self.bindings,
            forward_payload_header: self.forward_payload_header.as_ref(),
        }
        .serialize(serializer)
    }
}

/// Where JWKS verification keys are fetched from.
///
/// Only the remote variant is currently defined; the enum stays closed so
/// new variants force every consumer through the compiler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JwksSource {
    /// Keys fetched from a remote JWKS endpoint.
    Remote(RemoteJwks),
}

impl Default for JwksSource {
    fn default() -> Self {
        Self::Remote(RemoteJwks::default())
    }
}

/// A remote JWKS endpoint and its fetch cache policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteJwks {
    /// Endpoint URL.
    pub url: String,
    /// How long fetched keys are served before refetching.
    #[serde(with = "humantime_serde")]
    pub cache_duration: Duration,
}

impl Default for RemoteJwks {
    fn default() -> Self {
        Self {
            url: String::new(),
            cache_duration: DEFAULT_JWKS_CACHE_DURATION,
        }
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn str_is_empty(value: &&str) -> bool {
    value.is_empty()
}

fn slice_is_empty<T>(value: &&[T]) -> bool {
    value.is_empty()
}

/// Duration fields in humantime format (`30s`, `10m`, `1h`).
mod humantime_serde {
    use std::time::Duration;

    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = format!("{}s", duration.as_secs());
        serializer.serialize_str(&s)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    fn parse_duration(s: &str) -> Result<Duration, String> {
        let s = s.trim();
        let (number, unit_secs) = if let Some(stripped) = s.strip_suffix("ms") {
            let n: u64 = stripped.trim().parse().map_err(|_| "invalid duration")?;
            return Ok(Duration::from_millis(n));
        } else if let Some(stripped) = s.strip_suffix('s') {
            (stripped, 1)
        } else if let Some(stripped) = s.strip_suffix('m') {
            (stripped, 60)
        } else if let Some(stripped) = s.strip_suffix('h') {
            (stripped, 3600)
        } else {
            // Bare numbers are seconds.
            (s, 1)
        };
        let n: u64 = number.trim().parse().map_err(|_| "invalid duration")?;
        Ok(Duration::from_secs(n * unit_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::ParameterMatch;

    fn jwt(name: &str) -> JwtRequirement {
        JwtRequirement {
            name: name.to_owned(),
            issuer: "issuer".to_owned(),
            jwks_source: JwksSource::Remote(RemoteJwks {
                url: "https://keys.example.com/jwks".to_owned(),
                cache_duration: Duration::from_secs(3600),
            }),
            bindings: vec![ParameterBinding::new(ParameterMatch::Header(
                "authorization".to_owned(),
            ))],
            ..Default::default()
        }
    }

    fn leaf(name: &str) -> AuthenticationRequirement {
        AuthenticationRequirement {
            disabled: false,
            requirements: Some(AuthenticationRequirements::Jwt(jwt(name))),
        }
    }

    #[test]
    fn test_is_empty_laws() {
        let cases: Vec<(&str, AuthenticationRequirement, bool)> = vec![
            ("default node", AuthenticationRequirement::default(), true),
            ("just jwt", leaf("foo"), false),
            (
                "empty any",
                AuthenticationRequirement {
                    disabled: false,
                    requirements: Some(AuthenticationRequirements::AnyOf(vec![])),
                },
                true,
            ),
            (
                "empty all",
                AuthenticationRequirement {
                    disabled: false,
                    requirements: Some(AuthenticationRequirements::AllOf(vec![])),
                },
                true,
            ),
            (
                "jwt in all",
                AuthenticationRequirement {
                    disabled: false,
                    requirements: Some(AuthenticationRequirements::AllOf(vec![leaf("foo")])),
                },
                false,
            ),
            (
                "nested empty",
                AuthenticationRequirement {
                    disabled: false,
                    requirements: Some(AuthenticationRequirements::AnyOf(vec![
                        AuthenticationRequirement {
                            disabled: false,
                            requirements: Some(AuthenticationRequirements::AllOf(vec![
                                AuthenticationRequirement {
                                    disabled: false,
                                    requirements: Some(AuthenticationRequirements::AnyOf(vec![])),
                                },
                            ])),
                        },
                    ])),
                },
                true,
            ),
            (
                "nested jwt",
                AuthenticationRequirement {
                    disabled: false,
                    requirements: Some(AuthenticationRequirements::AllOf(vec![
                        AuthenticationRequirement {
                            disabled: false,
                            requirements: Some(AuthenticationRequirements::AnyOf(vec![
                                AuthenticationRequirement::default(),
                                leaf("foo"),
                            ])),
                        },
                    ])),
                },
                false,
            ),
        ];

        for (desc, requirement, want) in cases {
            assert_eq!(requirement.is_empty(), want, "{desc}");
        }
    }

    #[test]
    fn test_disabled_is_never_empty() {
        let disabled_default = AuthenticationRequirement {
            disabled: true,
            requirements: None,
        };
        assert!(!disabled_default.is_empty());

        let disabled_vacuous = AuthenticationRequirement {
            disabled: true,
            requirements: Some(AuthenticationRequirements::AnyOf(vec![])),
        };
        assert!(!disabled_vacuous.is_empty());
    }

    #[test]
    fn test_roundtrip_jwt_leaf() {
        let requirement = AuthenticationRequirement {
            disabled: true,
            requirements: Some(AuthenticationRequirements::Jwt(jwt("foo"))),
        };
        let yaml = serde_yaml::to_string(&requirement).unwrap();
        let back: AuthenticationRequirement = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(requirement, back);
    }

    #[test]
    fn test_roundtrip_any_of_jwts() {
        let requirement = AuthenticationRequirement {
            disabled: false,
            requirements: Some(AuthenticationRequirements::AnyOf(vec![
                leaf("foo"),
                leaf("bar"),
            ])),
        };
        let yaml = serde_yaml::to_string(&requirement).unwrap();
        let back: AuthenticationRequirement = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(requirement, back);
    }

    #[test]
    fn test_roundtrip_any_enclosing_all_and_jwt() {
        let requirement = AuthenticationRequirement {
            disabled: false,
            requirements: Some(AuthenticationRequirements::AnyOf(vec![
                AuthenticationRequirement {
                    disabled: false,
                    requirements: Some(AuthenticationRequirements::AllOf(vec![
                        AuthenticationRequirement {
                            disabled: true,
                            requirements: Some(AuthenticationRequirements::Jwt(jwt("foo"))),
                        },
                        leaf("bar"),
                    ])),
                },
                leaf("bac"),
            ])),
        };
        let yaml = serde_yaml::to_string(&requirement).unwrap();
        let back: AuthenticationRequirement = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(requirement, back);
    }

    #[test]
    fn test_decode_rejects_coexisting_variants() {
        for data in [
            // any + jwt
            "any:\n- jwt:\n    name: foo\n    remote_jwks:\n      url: u\njwt:\n  name: bar\n  remote_jwks:\n    url: u\n",
            // all + jwt
            "all:\n- jwt:\n    name: foo\n    remote_jwks:\n      url: u\njwt:\n  name: bar\n  remote_jwks:\n    url: u\n",
            // all + any
            "all:\n- jwt:\n    name: foo\n    remote_jwks:\n      url: u\nany:\n- jwt:\n    name: foo\n    remote_jwks:\n      url: u\n",
        ] {
            let err = serde_yaml::from_str::<AuthenticationRequirement>(data).unwrap_err();
            assert!(
                err.to_string().contains("precisely one of jwt, any or all should be set"),
                "unexpected error: {err}"
            );
        }
    }

    #[test]
    fn test_decode_rejects_no_variant() {
        let err = serde_yaml::from_str::<AuthenticationRequirement>("{}").unwrap_err();
        assert!(err
            .to_string()
            .contains("precisely one of jwt, any or all should be set"));
    }

    #[test]
    fn test_disabled_skips_variant_check() {
        // Both `any` and `all` present, but disabled: decodes leniently.
        let data = "disabled: true\nall:\n- jwt:\n    name: foo\n    remote_jwks:\n      url: u\nany:\n- jwt:\n    name: foo\n    remote_jwks:\n      url: u\n";
        let requirement: AuthenticationRequirement = serde_yaml::from_str(data).unwrap();
        assert!(requirement.disabled);
        assert!(requirement.requirements.is_some());

        // Disabled with no variant at all is also fine.
        let requirement: AuthenticationRequirement =
            serde_yaml::from_str("disabled: true\n").unwrap();
        assert!(requirement.requirements.is_none());
    }

    #[test]
    fn test_jwt_decode_requires_jwks_source() {
        let err = serde_yaml::from_str::<JwtRequirement>(
            "name: foo\nissuer: bar\nin:\n- header: header\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("remote jwks not found"));
    }

    #[test]
    fn test_jwt_roundtrip() {
        let requirement = JwtRequirement {
            audiences: vec!["aud-1".to_owned(), "aud-2".to_owned()],
            forward_payload_header: Some("x-jwt-payload".to_owned()),
            ..jwt("foo")
        };
        let yaml = serde_yaml::to_string(&requirement).unwrap();
        let back: JwtRequirement = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(requirement, back);
    }

    #[test]
    fn test_decode_contract_is_format_agnostic() {
        // The variant-key rules hold for any self-describing format, not
        // just the YAML configuration form.
        let err = serde_json::from_str::<AuthenticationRequirement>(
            r#"{"jwt": {"name": "a", "remote_jwks": {"url": "u"}}, "any": []}"#,
        )
        .unwrap_err();
        assert!(err
            .to_string()
            .contains("precisely one of jwt, any or all should be set"));

        let requirement: AuthenticationRequirement = serde_json::from_str(
            r#"{"jwt": {"name": "a", "remote_jwks": {"url": "u"}}}"#,
        )
        .unwrap();
        assert!(!requirement.is_empty());
    }

    #[test]
    fn test_cache_duration_formats() {
        let remote: RemoteJwks =
            serde_yaml::from_str("url: u\ncache_duration: 1h\n").unwrap();
        assert_eq!(remote.cache_duration, Duration::from_secs(3600));

        let remote: RemoteJwks =
            serde_yaml::from_str("url: u\ncache_duration: 10m\n").unwrap();
        assert_eq!(remote.cache_duration, Duration::from_secs(600));

        // Omitted: the default applies.
        let remote: RemoteJwks = serde_yaml::from_str("url: u\n").unwrap();
        assert_eq!(remote.cache_duration, Duration::from_secs(30 * 60));
    }
}
