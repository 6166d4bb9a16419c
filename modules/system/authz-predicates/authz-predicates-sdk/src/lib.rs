#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! `AuthZ` Predicates SDK
//!
//! This crate provides the public types shared by the `authz_predicates`
//! engine and its data-source plugins:
//!
//! - [`OwnershipResolver`] - Consumed API: where does an entity live
//! - [`AuthorizationConfig`] - Project-level matching switch
//! - [`EntityKind`], [`EntityRef`], [`TechId`], [`PermId`], [`Identifier`],
//!   [`EntityUpdates`] - What predicates are evaluated against
//! - [`parse_identifier`] - Structural identifier parsing
//! - [`Status`] - Decision outcome
//! - [`ResolverError`] - Error types

pub mod api;
pub mod config;
pub mod error;
pub mod identifier;
pub mod models;
pub mod status;

pub use api::OwnershipResolver;
pub use config::AuthorizationConfig;
pub use error::ResolverError;
pub use identifier::{IdentifierError, parse_identifier};
pub use models::{EntityKind, EntityRef, EntityUpdates, Identifier, PermId, TechId};
pub use status::Status;
