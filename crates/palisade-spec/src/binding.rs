//! Parameter bindings: where a credential or value is carried in a request.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The location a bound value is read from.
///
/// Exactly one location is set per binding; the decode contract enforces
/// this with a counted-keys check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterMatch {
    /// A request header, by name.
    Header(String),
    /// A query parameter, by name.
    Query(String),
    /// A claim extracted from a verified JWT.
    JwtClaim(JwtClaimRef),
}

/// A claim reference: the claim name plus the JWT requirement whose verified
/// payload carries it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtClaimRef {
    /// Name of the JWT requirement the claim is read from.
    pub requirement: String,
    /// The claim name.
    pub name: String,
}

/// An optional rewrite applied to an extracted value: capture via
/// `template`, rebuild via `substitution`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StringTransformation {
    /// Extraction template, e.g. `Bearer {token}`.
    pub template: String,
    /// Substitution template rendered from the captures, e.g. `{token}`.
    pub substitution: String,
}

impl StringTransformation {
    /// Returns true when neither template is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.template.is_empty() && self.substitution.is_empty()
    }
}

/// One place a value may be found, with an optional transformation applied
/// to it after extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterBinding {
    /// Where the value is read from.
    pub match_target: ParameterMatch,
    /// Rewrite applied to the extracted value.
    pub transformation: StringTransformation,
}

impl ParameterBinding {
    /// Creates a binding with no transformation.
    #[must_use]
    pub fn new(match_target: ParameterMatch) -> Self {
        Self {
            match_target,
            transformation: StringTransformation::default(),
        }
    }
}

#[derive(Deserialize)]
struct RawParameterBinding {
    header: Option<String>,
    query: Option<String>,
    jwt_claim: Option<JwtClaimRef>,
    #[serde(default)]
    transformation: StringTransformation,
}

impl<'de> Deserialize<'de> for ParameterBinding {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawParameterBinding::deserialize(deserializer)?;
        let set = usize::from(raw.header.is_some())
            + usize::from(raw.query.is_some())
            + usize::from(raw.jwt_claim.is_some());
        let match_target = match (raw.header, raw.query, raw.jwt_claim) {
            (Some(header), None, None) => ParameterMatch::Header(header),
            (None, Some(query), None) => ParameterMatch::Query(query),
            (None, None, Some(claim)) => ParameterMatch::JwtClaim(claim),
            _ => {
                return Err(D::Error::custom(format!(
                    "precisely one header, query or jwt_claim should be set, got {set}"
                )))
            }
        };
        Ok(Self {
            match_target,
            transformation: raw.transformation,
        })
    }
}

#[derive(Serialize)]
struct RawParameterBindingRef<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    header: Option<&'a String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    query: Option<&'a String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    jwt_claim: Option<&'a JwtClaimRef>,
    #[serde(skip_serializing_if = "StringTransformation::is_empty")]
    transformation: &'a StringTransformation,
}

impl Serialize for ParameterBinding {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut raw = RawParameterBindingRef {
            header: None,
            query: None,
            jwt_claim: None,
            transformation: &self.transformation,
        };
        match &self.match_target {
            ParameterMatch::Header(header) => raw.header = Some(header),
            ParameterMatch::Query(query) => raw.query = Some(query),
            ParameterMatch::JwtClaim(claim) => raw.jwt_claim = Some(claim),
        }
        raw.serialize(serializer)
    }
}

/// Where a consumer credential may be found for authorization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsumerAuthorization {
    /// Disables consumer authorization for the scope carrying it.
    pub disabled: bool,
    /// Candidate credential locations, tried in order.
    #[serde(rename = "in")]
    pub bindings: Vec<ParameterBinding>,
}

impl ConsumerAuthorization {
    /// Returns true when the block is enabled but configures nothing.
    ///
    /// A disabled block is never empty; "disabled" is meaningful state.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.disabled && self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_header_binding() {
        let binding = ParameterBinding::new(ParameterMatch::Header("x-api-key".to_owned()));
        let yaml = serde_yaml::to_string(&binding).unwrap();
        let back: ParameterBinding = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(binding, back);
    }

    #[test]
    fn test_roundtrip_claim_binding_with_transformation() {
        let binding = ParameterBinding {
            match_target: ParameterMatch::JwtClaim(JwtClaimRef {
                requirement: "foo".to_owned(),
                name: "bar".to_owned(),
            }),
            transformation: StringTransformation {
                template: "temp".to_owned(),
                substitution: "sub".to_owned(),
            },
        };
        let yaml = serde_yaml::to_string(&binding).unwrap();
        let back: ParameterBinding = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(binding, back);
    }

    #[test]
    fn test_two_locations_rejected() {
        let err = serde_yaml::from_str::<ParameterBinding>("header: h\nquery: q\n").unwrap_err();
        assert!(err
            .to_string()
            .contains("precisely one header, query or jwt_claim should be set, got 2"));
    }

    #[test]
    fn test_no_location_rejected() {
        let err = serde_yaml::from_str::<ParameterBinding>("transformation:\n  template: t\n")
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("precisely one header, query or jwt_claim should be set, got 0"));
    }

    #[test]
    fn test_consumer_authorization_emptiness() {
        let mut authz = ConsumerAuthorization::default();
        assert!(authz.is_empty());

        authz.disabled = true;
        assert!(!authz.is_empty());

        authz.disabled = false;
        authz
            .bindings
            .push(ParameterBinding::new(ParameterMatch::Query("key".to_owned())));
        assert!(!authz.is_empty());
    }
}
