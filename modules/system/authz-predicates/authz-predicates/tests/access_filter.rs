#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Splitting search results by access.

mod common;

use authz_predicates::{
    AccessFilter, MissingTargetPolicy, Partition, PredicateDescriptor, PredicateError, catalog,
};
use authz_predicates_sdk::{EntityKind, EntityRef, PermId, TechId};
use common::{
    E1, E2, E3, FakeResolver, MISSING, OTHER_SPACE, PROJECT, SPACE, instance_admin, project,
    project_role, shared, space_role,
};
use modkit_security::{Principal, RoleCode, RoleWithHierarchy};

fn megapixel() -> Principal {
    Principal::new("megapixel")
}

fn ids(values: &[i64]) -> Vec<TechId> {
    values.iter().copied().map(TechId).collect()
}

#[tokio::test]
async fn splits_by_space_and_keeps_order() {
    let (resolver, dynamic) = shared(FakeResolver::seeded(false));
    let filter = catalog::sample_filter();
    filter.init(dynamic).unwrap();

    let partition = filter
        .partition(
            &megapixel(),
            &space_role(RoleCode::Observer, SPACE),
            Some(ids(&[E3, E2, MISSING, E1])),
        )
        .await
        .unwrap();

    assert_eq!(partition.with_access, ids(&[E3, E1]));
    assert_eq!(partition.without_access, ids(&[E2, MISSING]));
    assert_eq!(resolver.calls(), (0, 1, 0));
}

#[tokio::test]
async fn project_roles_are_decided_per_element() {
    let (resolver, dynamic) = shared(FakeResolver::seeded(true));
    let filter = catalog::sample_filter();
    filter.init(dynamic).unwrap();

    let partition = filter
        .partition(
            &megapixel(),
            &project_role(RoleCode::Observer, SPACE, PROJECT),
            Some(ids(&[E1, E2, E3])),
        )
        .await
        .unwrap();

    assert_eq!(partition.with_access, ids(&[E1]));
    assert_eq!(partition.without_access, ids(&[E2, E3]));
    assert_eq!(resolver.calls(), (0, 1, 1));
}

#[tokio::test]
async fn instance_role_keeps_everything() {
    let (resolver, dynamic) = shared(FakeResolver::seeded(false));
    let filter = catalog::sample_filter();
    filter.init(dynamic).unwrap();

    let partition = filter
        .partition(&megapixel(), &instance_admin(), Some(ids(&[E1, MISSING])))
        .await
        .unwrap();

    assert_eq!(partition.with_access, ids(&[E1, MISSING]));
    assert!(partition.without_access.is_empty());
    assert_eq!(resolver.total_calls(), 0);
}

#[tokio::test]
async fn empty_and_missing_inputs() {
    let (resolver, dynamic) = shared(FakeResolver::seeded(false));
    let filter = catalog::sample_filter();
    filter.init(dynamic).unwrap();

    let empty = filter
        .partition(&megapixel(), &instance_admin(), Some(Vec::new()))
        .await
        .unwrap();
    assert_eq!(empty, Partition::default());

    let err = filter
        .partition(&megapixel(), &instance_admin(), None)
        .await
        .unwrap_err();
    assert!(matches!(err, PredicateError::Unspecified(_)));
    assert_eq!(err.to_string(), "No SAMPLE technical id collection specified.");

    assert_eq!(resolver.total_calls(), 0);
}

#[tokio::test]
async fn creation_filter_keeps_unregistered_data_sets() {
    let (resolver, dynamic) = shared(
        FakeResolver::seeded(false).with(
            EntityRef::PermId("DS-OTHER".to_owned()),
            project(OTHER_SPACE, "OTHER"),
        ),
    );
    let filter: AccessFilter<PermId> = AccessFilter::new(
        PredicateDescriptor::new(EntityKind::DataSet)
            .allowed_roles(&[RoleWithHierarchy::ProjectUser])
            .missing_target(MissingTargetPolicy::AllowForCreation),
    );
    filter.init(dynamic).unwrap();

    let partition = filter
        .partition(
            &megapixel(),
            &space_role(RoleCode::User, SPACE),
            Some(vec![PermId::from("DS-OTHER"), PermId::from("DS-NEW")]),
        )
        .await
        .unwrap();

    assert_eq!(partition.with_access, vec![PermId::from("DS-NEW")]);
    assert_eq!(partition.without_access, vec![PermId::from("DS-OTHER")]);
    assert_eq!(resolver.calls(), (0, 1, 0));
}
