//! Structural validation.
//!
//! One fail-fast pass over the whole specification set, run before
//! compilation. Besides enforcing the uniqueness and reference invariants,
//! validation flattens every reachable JWT requirement into its owning
//! API's or operation's list — the caches later consumed by the compiled
//! specification's aggregate accessor.

use std::collections::HashSet;

use tracing::debug;

use crate::auth::{AuthenticationRequirement, AuthenticationRequirements, JwtRequirement};
use crate::binding::{ParameterBinding, ParameterMatch};
use crate::error::ValidationError;
use crate::model::{is_known_method, Api, Specification};

/// Validates a full specification set.
///
/// Checks every invariant of the data model and returns the first violation
/// found; on success the per-API and per-operation flattened JWT requirement
/// lists are populated. A specification set either validates completely or
/// is rejected wholesale.
pub fn validate_specifications(specs: &mut [Specification]) -> Result<(), ValidationError> {
    let mut spec_ids = HashSet::new();
    for spec in specs.iter_mut() {
        if spec.id.is_empty() {
            return Err(ValidationError::EmptySpecificationId);
        }
        if !spec_ids.insert(spec.id.clone()) {
            return Err(ValidationError::DuplicateSpecificationId(spec.id.clone()));
        }
        validate_specification(spec)?;
    }
    Ok(())
}

fn validate_specification(spec: &mut Specification) -> Result<(), ValidationError> {
    let mut api_ids = HashSet::new();
    let mut base_paths = HashSet::new();
    for api in &mut spec.apis {
        if api.id.is_empty() {
            return Err(ValidationError::EmptyApiId);
        }
        if !api_ids.insert(api.id.clone()) {
            return Err(ValidationError::DuplicateApiId(api.id.clone()));
        }
        if !base_paths.insert(api.base_path.clone()) {
            return Err(ValidationError::DuplicateBasePath(api.base_path.clone()));
        }
        validate_api(api)?;
    }
    debug!(spec = %spec.id, apis = spec.apis.len(), "validated environment spec");
    Ok(())
}

fn validate_api(api: &mut Api) -> Result<(), ValidationError> {
    let mut api_jwts = Vec::new();
    collect_jwt_requirements(&api.authentication, &mut api_jwts)?;

    let api_names: HashSet<&str> = api_jwts.iter().map(|j| j.name.as_str()).collect();
    validate_bindings(&api.consumer_authorization.bindings, &api_names)?;
    for jwt in &api_jwts {
        validate_bindings(&jwt.bindings, &api_names)?;
    }
    let api_names: Vec<String> = api_jwts.iter().map(|j| j.name.clone()).collect();

    let mut operation_names = HashSet::new();
    for operation in &mut api.operations {
        if operation.name.is_empty() {
            return Err(ValidationError::EmptyOperationName);
        }
        if !operation_names.insert(operation.name.clone()) {
            return Err(ValidationError::DuplicateOperationName(operation.name.clone()));
        }
        for http_match in &operation.http_matches {
            if !is_known_method(&http_match.method) {
                return Err(ValidationError::InvalidHttpMethod {
                    name: operation.name.clone(),
                    method: http_match.method.clone(),
                });
            }
        }

        let mut operation_jwts = Vec::new();
        collect_jwt_requirements(&operation.authentication, &mut operation_jwts)?;

        // Claim references inside an operation see the operation's own names
        // plus the API-level ones.
        let mut visible: HashSet<&str> = api_names.iter().map(String::as_str).collect();
        visible.extend(operation_jwts.iter().map(|j| j.name.as_str()));
        validate_bindings(&operation.consumer_authorization.bindings, &visible)?;
        for jwt in &operation_jwts {
            validate_bindings(&jwt.bindings, &visible)?;
        }
        operation.jwt_requirements = operation_jwts;
    }

    api.jwt_requirements = api_jwts;
    Ok(())
}

/// Depth-first collection of JWT leaves, enforcing non-empty names and
/// uniqueness within the tree being collected.
fn collect_jwt_requirements(
    requirement: &AuthenticationRequirement,
    out: &mut Vec<JwtRequirement>,
) -> Result<(), ValidationError> {
    match &requirement.requirements {
        None => Ok(()),
        Some(AuthenticationRequirements::Jwt(jwt)) => {
            if jwt.name.is_empty() {
                return Err(ValidationError::EmptyJwtRequirementName);
            }
            if out.iter().any(|seen| seen.name == jwt.name) {
                return Err(ValidationError::DuplicateJwtRequirementName(jwt.name.clone()));
            }
            out.push(jwt.clone());
            Ok(())
        }
        Some(AuthenticationRequirements::AnyOf(children))
        | Some(AuthenticationRequirements::AllOf(children)) => {
            for child in children {
                collect_jwt_requirements(child, out)?;
            }
            Ok(())
        }
    }
}

/// Checks match targets for emptiness and claim references for existence.
fn validate_bindings(
    bindings: &[ParameterBinding],
    visible_jwt_names: &HashSet<&str>,
) -> Result<(), ValidationError> {
    for binding in bindings {
        match &binding.match_target {
            ParameterMatch::Header(header) => {
                if header.is_empty() {
                    return Err(ValidationError::EmptyHeaderMatch);
                }
            }
            ParameterMatch::Query(query) => {
                if query.is_empty() {
                    return Err(ValidationError::EmptyQueryMatch);
                }
            }
            ParameterMatch::JwtClaim(claim) => {
                if claim.name.is_empty() {
                    return Err(ValidationError::EmptyJwtClaimName);
                }
                if !visible_jwt_names.contains(claim.requirement.as_str()) {
                    return Err(ValidationError::UnknownJwtClaimRequirement(
                        claim.requirement.clone(),
                    ));
                }
            }
        }
    }
    Ok(())
}
