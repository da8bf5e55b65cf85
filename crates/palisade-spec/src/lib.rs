//! Declarative gateway specification model for Palisade.
//!
//! This crate defines the in-memory form of an environment specification —
//! APIs with base paths, operations, authentication requirement trees,
//! consumer authorization, request transforms and CORS policies — together
//! with the structural validator that must pass before the specification is
//! compiled into its request-time form.
//!
//! # Overview
//!
//! - [`Specification`], [`Api`], [`Operation`] and friends model the
//!   configuration tree (deserialized elsewhere; this crate never touches
//!   files).
//! - [`AuthenticationRequirement`] is the recursive single / all-of / any-of
//!   composition of [`JwtRequirement`] leaves, with its decode contract
//!   (precisely one variant key unless the requirement is disabled) and
//!   emptiness semantics (a disabled requirement is never empty).
//! - [`validate_specifications`] enforces global uniqueness and
//!   cross-reference invariants in one fail-fast pass and populates the
//!   flattened per-API / per-operation JWT requirement lists consumed
//!   downstream.
//!
//! The specification tree is built once, validated once, compiled once, and
//! never mutated afterwards; configuration changes build and swap in a whole
//! new instance.

mod auth;
mod binding;
mod error;
mod model;
mod validate;

pub use auth::{
    AuthenticationRequirement, AuthenticationRequirements, JwksSource, JwtRequirement, RemoteJwks,
};
pub use binding::{
    ConsumerAuthorization, JwtClaimRef, ParameterBinding, ParameterMatch, StringTransformation,
};
pub use error::ValidationError;
pub use model::{
    AddNameValue, Api, CorsPolicy, HttpMatch, HttpRequestTransforms, NameValueTransforms,
    Operation, Specification, ANY_METHOD,
};
pub use validate::validate_specifications;
