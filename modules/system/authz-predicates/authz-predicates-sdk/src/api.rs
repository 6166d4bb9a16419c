//! Ownership resolver API, implemented by data-source plugins and consumed
//! by authorization predicates.

use std::collections::HashMap;

use async_trait::async_trait;
use modkit_security::{EntityScope, ProjectRef};

use crate::config::AuthorizationConfig;
use crate::error::ResolverError;
use crate::models::{EntityKind, EntityRef};

/// Answers "where does this entity live?" for authorization.
///
/// Implementations are read-only. Missing entities are reported as absent,
/// never as errors.
#[async_trait]
pub trait OwnershipResolver: Send + Sync {
    /// Authorization switches of the deployment this resolver serves.
    fn authorization_config(&self) -> &AuthorizationConfig;

    /// Resolve the full scope (space and project) of one entity.
    ///
    /// Returns `Ok(None)` when the entity does not exist.
    ///
    /// # Errors
    ///
    /// - `Unavailable` / `Internal` for data-source failures
    async fn resolve_one(
        &self,
        kind: EntityKind,
        id: &EntityRef,
    ) -> Result<Option<EntityScope>, ResolverError>;

    /// Resolve the owning space of many entities in one round trip.
    ///
    /// Returned scopes are only guaranteed to carry the space. Ids absent
    /// from the map do not exist.
    ///
    /// # Errors
    ///
    /// - `Unavailable` / `Internal` for data-source failures
    async fn resolve_many(
        &self,
        kind: EntityKind,
        ids: &[EntityRef],
    ) -> Result<HashMap<EntityRef, EntityScope>, ResolverError>;

    /// Resolve the owning project of many entities in one round trip.
    ///
    /// Entities that do not exist or are not owned by a project are absent.
    ///
    /// # Errors
    ///
    /// - `Unavailable` / `Internal` for data-source failures
    async fn resolve_projects(
        &self,
        kind: EntityKind,
        ids: &[EntityRef],
    ) -> Result<HashMap<EntityRef, ProjectRef>, ResolverError>;
}
