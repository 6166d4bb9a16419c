//! `AuthZ` Predicates
//!
//! Decides whether an authenticated principal, holding a set of role
//! assignments, may act on a given entity or batch of entities. Ownership of
//! entities (their space and project) comes from an
//! [`OwnershipResolver`](authz_predicates_sdk::OwnershipResolver) plugin.
//!
//! - [`SinglePredicate`] - one entity
//! - [`CollectionPredicate`] - a batch, all or nothing
//! - [`AccessFilter`] - a batch, split into accessible and inaccessible
//! - [`AccessController`] - operation roles plus guarded arguments
//! - [`catalog`] - predicates for the common checks
//!
//! Denials are `Ok(Status::Error(..))`; `Err` is reserved for caller
//! mistakes and resolver failures.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod catalog;
pub mod config;
pub mod domain;
pub mod error;

pub use config::AuthzPredicatesConfig;
pub use domain::{
    AccessController, AccessFilter, ArgumentGuard, CapabilityMap, CollectionPredicate, Guarded,
    GuardedArgument, GuardedCollection, MethodSpec, MissingTargetPolicy, Partition,
    PredicateDescriptor, ScopeTarget, SinglePredicate,
};
pub use error::PredicateError;
