//! Ready-made predicates for the common checks.
//!
//! Each constructor returns an uninitialized predicate; call `init` with the
//! ownership resolver before the first evaluation.

use authz_predicates_sdk::{EntityKind, EntityUpdates, Identifier, PermId, TechId};
use modkit_security::{ProjectRef, RoleWithHierarchy, SpaceRef};

use crate::domain::{
    AccessFilter, CollectionPredicate, MissingTargetPolicy, PredicateDescriptor, SinglePredicate,
};

const MODIFY_INSTANCE_LEVEL: &str = "to modify instance level entities";

#[must_use]
pub fn space_read() -> SinglePredicate<SpaceRef> {
    SinglePredicate::new(PredicateDescriptor::new(EntityKind::Space))
}

#[must_use]
pub fn project_read() -> SinglePredicate<ProjectRef> {
    SinglePredicate::new(PredicateDescriptor::new(EntityKind::Project))
}

#[must_use]
pub fn project_updates() -> SinglePredicate<EntityUpdates> {
    SinglePredicate::new(
        PredicateDescriptor::new(EntityKind::Project)
            .allowed_roles(&[RoleWithHierarchy::ProjectPowerUser]),
    )
}

#[must_use]
pub fn experiment_tech_id() -> SinglePredicate<TechId> {
    SinglePredicate::new(PredicateDescriptor::new(EntityKind::Experiment))
}

#[must_use]
pub fn experiment_perm_id() -> SinglePredicate<PermId> {
    SinglePredicate::new(PredicateDescriptor::new(EntityKind::Experiment))
}

#[must_use]
pub fn experiment_identifier() -> SinglePredicate<Identifier> {
    SinglePredicate::new(PredicateDescriptor::new(EntityKind::Experiment))
}

#[must_use]
pub fn experiment_tech_ids() -> CollectionPredicate<TechId> {
    CollectionPredicate::new(PredicateDescriptor::new(EntityKind::Experiment))
}

#[must_use]
pub fn sample_tech_ids() -> CollectionPredicate<TechId> {
    CollectionPredicate::new(PredicateDescriptor::new(EntityKind::Sample))
}

/// Write access to the sample being updated.
#[must_use]
pub fn sample_updates() -> SinglePredicate<EntityUpdates> {
    SinglePredicate::new(
        PredicateDescriptor::new(EntityKind::Sample)
            .allowed_roles(&[RoleWithHierarchy::ProjectUser]),
    )
}

/// Search result filtering for samples.
#[must_use]
pub fn sample_filter() -> AccessFilter<TechId> {
    AccessFilter::new(PredicateDescriptor::new(EntityKind::Sample))
}

#[must_use]
pub fn data_set_codes() -> CollectionPredicate<PermId> {
    CollectionPredicate::new(PredicateDescriptor::new(EntityKind::DataSet))
}

/// Precheck before registering a data set under `perm_id`. The data set
/// usually does not exist yet, so any sufficient space or project role is
/// enough in that case.
#[must_use]
pub fn data_set_creation() -> SinglePredicate<PermId> {
    SinglePredicate::new(
        PredicateDescriptor::new(EntityKind::DataSet)
            .allowed_roles(&[RoleWithHierarchy::ProjectUser, RoleWithHierarchy::SpaceEtlServer])
            .missing_target(MissingTargetPolicy::AllowForCreation),
    )
}

/// Materials are instance-level: only an instance admin may change them.
#[must_use]
pub fn material_modification() -> SinglePredicate<TechId> {
    SinglePredicate::new(
        PredicateDescriptor::new(EntityKind::Material)
            .allowed_roles(&[RoleWithHierarchy::InstanceAdmin])
            .qualifier(MODIFY_INSTANCE_LEVEL),
    )
}
