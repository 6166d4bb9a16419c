//! Per-predicate configuration: which entity kind, which roles suffice, and
//! how denials and usage errors read.

use authz_predicates_sdk::{EntityKind, Status};
use modkit_security::{Principal, RoleWithHierarchy};

use super::target::TargetShape;

/// What to do when the target does not exist.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MissingTargetPolicy {
    /// Deny unless an instance-level role applies.
    #[default]
    Deny,
    /// Creation precheck: the entity is about to be created under its perm
    /// id, so any sufficient space or project role is enough.
    AllowForCreation,
}

/// Describes one predicate variant.
///
/// Defaults: read access (`PROJECT_OBSERVER` and everything implying it),
/// no message qualifier, missing targets denied.
#[derive(Clone, Debug)]
pub struct PredicateDescriptor {
    kind: EntityKind,
    allowed_roles: Vec<RoleWithHierarchy>,
    qualifier: Option<String>,
    missing_target: MissingTargetPolicy,
}

impl PredicateDescriptor {
    #[must_use]
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            allowed_roles: vec![RoleWithHierarchy::ProjectObserver],
            qualifier: None,
            missing_target: MissingTargetPolicy::Deny,
        }
    }

    /// Roles any of which (or anything implying them) is sufficient.
    #[must_use]
    pub fn allowed_roles(mut self, roles: &[RoleWithHierarchy]) -> Self {
        self.allowed_roles = roles.to_vec();
        self
    }

    /// Appended to denial messages, e.g. `"to modify instance level entities"`.
    #[must_use]
    pub fn qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    #[must_use]
    pub fn missing_target(mut self, policy: MissingTargetPolicy) -> Self {
        self.missing_target = policy;
        self
    }

    #[must_use]
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    #[must_use]
    pub fn roles(&self) -> &[RoleWithHierarchy] {
        &self.allowed_roles
    }

    #[must_use]
    pub fn missing_target_policy(&self) -> MissingTargetPolicy {
        self.missing_target
    }

    /// `User '<id>' does not have enough privileges[ <qualifier>].`
    #[must_use]
    pub fn denial(&self, principal: &Principal) -> Status {
        let message = match &self.qualifier {
            Some(qualifier) => format!(
                "User '{}' does not have enough privileges {qualifier}.",
                principal.user_id()
            ),
            None => format!(
                "User '{}' does not have enough privileges.",
                principal.user_id()
            ),
        };
        Status::error(message)
    }

    /// Usage error text for a missing single target. Plain values share one
    /// message; entity objects name their kind.
    #[must_use]
    pub fn missing_value_message(&self, shape: TargetShape) -> String {
        match shape {
            TargetShape::TechId | TargetShape::PermId | TargetShape::Identifier => {
                "Unspecified value".to_owned()
            }
            TargetShape::Entity => format!("No {} specified.", self.kind.display_name()),
        }
    }

    /// Usage error text for a missing collection.
    #[must_use]
    pub fn missing_collection_message(&self, shape: TargetShape) -> String {
        match shape.noun() {
            Some(noun) => format!("No {} {noun} collection specified.", self.kind.label()),
            None => format!("No {} collection specified.", self.kind.label()),
        }
    }
}
