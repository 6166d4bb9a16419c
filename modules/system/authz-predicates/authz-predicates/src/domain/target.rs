//! What a predicate can be evaluated against, and how each target locates
//! its owning scope.

use authz_predicates_sdk::{EntityRef, EntityUpdates, Identifier, PermId, TechId};
use modkit_security::{EntityScope, ProjectRef, SpaceRef};

/// How a target type is described in usage errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetShape {
    TechId,
    PermId,
    Identifier,
    /// An entity object or update request rather than a bare key.
    Entity,
}

impl TargetShape {
    /// Noun used in "No <KIND> <noun> collection specified.".
    #[must_use]
    pub fn noun(self) -> Option<&'static str> {
        match self {
            Self::TechId => Some("technical id"),
            Self::PermId => Some("perm id"),
            Self::Identifier => Some("identifier"),
            Self::Entity => None,
        }
    }
}

/// Where the scope of a target comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup {
    /// The target carries its scope.
    Known(EntityScope),
    /// The target must be looked up (or, for structured identifiers, parsed).
    ByRef(EntityRef),
}

/// A value a predicate can authorize.
pub trait ScopeTarget: Send + Sync {
    const SHAPE: TargetShape;

    /// `None` when the value carries no usable key.
    fn lookup(&self) -> Option<Lookup>;
}

impl ScopeTarget for TechId {
    const SHAPE: TargetShape = TargetShape::TechId;

    fn lookup(&self) -> Option<Lookup> {
        Some(Lookup::ByRef(EntityRef::from(self)))
    }
}

impl ScopeTarget for PermId {
    const SHAPE: TargetShape = TargetShape::PermId;

    fn lookup(&self) -> Option<Lookup> {
        Some(Lookup::ByRef(EntityRef::from(self)))
    }
}

impl ScopeTarget for Identifier {
    const SHAPE: TargetShape = TargetShape::Identifier;

    fn lookup(&self) -> Option<Lookup> {
        Some(Lookup::ByRef(EntityRef::from(self)))
    }
}

impl ScopeTarget for EntityUpdates {
    const SHAPE: TargetShape = TargetShape::Entity;

    fn lookup(&self) -> Option<Lookup> {
        self.entity_ref().map(Lookup::ByRef)
    }
}

impl ScopeTarget for ProjectRef {
    const SHAPE: TargetShape = TargetShape::Entity;

    fn lookup(&self) -> Option<Lookup> {
        Some(Lookup::Known(EntityScope::in_project(self.clone())))
    }
}

impl ScopeTarget for SpaceRef {
    const SHAPE: TargetShape = TargetShape::Entity;

    fn lookup(&self) -> Option<Lookup> {
        Some(Lookup::Known(EntityScope::in_space(self.clone())))
    }
}
