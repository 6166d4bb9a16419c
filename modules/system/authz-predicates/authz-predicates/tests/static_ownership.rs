#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Predicates wired to the static ownership plugin loaded from YAML.

use std::sync::Arc;

use authz_predicates::catalog;
use authz_predicates_sdk::{OwnershipResolver, TechId};
use modkit_security::{Principal, ProjectRef, Role, RoleCode, RoleSet};
use static_ownership_plugin::{Service, StaticOwnershipPluginConfig};

const OWNERSHIP: &str = r#"
authorization:
  project_level_enabled: true
spaces:
  - code: CISD
    tech_id: 1
  - code: TEST
    tech_id: 2
projects:
  - space: CISD
    code: NEMO
    tech_id: 10
    perm_id: "20120814110011738-103"
entities:
  - kind: experiment
    tech_id: 100
    space: CISD
    project: NEMO
  - kind: experiment
    tech_id: 101
    space: CISD
  - kind: sample
    tech_id: 200
    space: TEST
  - kind: sample
    tech_id: 201
    space: CISD
    project: NEMO
  - kind: material
    tech_id: 300
"#;

fn resolver() -> Arc<dyn OwnershipResolver> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ownership.yaml");
    std::fs::write(&path, OWNERSHIP).unwrap();

    let config = StaticOwnershipPluginConfig::load(&path).unwrap();
    Arc::new(Service::from_config(&config).unwrap())
}

fn user() -> Principal {
    Principal::new("megapixel")
}

fn nemo_user() -> RoleSet {
    RoleSet::from(vec![Role::project(
        RoleCode::User,
        ProjectRef::new("CISD", "NEMO"),
    )])
}

#[tokio::test]
async fn project_role_reads_project_experiment() {
    let predicate = catalog::experiment_tech_id();
    predicate.init(resolver()).unwrap();

    let in_project = predicate
        .evaluate(&user(), &nemo_user(), Some(&TechId(100)))
        .await
        .unwrap();
    let in_space_only = predicate
        .evaluate(&user(), &nemo_user(), Some(&TechId(101)))
        .await
        .unwrap();

    assert!(in_project.is_ok());
    assert!(in_space_only.is_error());
}

#[tokio::test]
async fn batch_needs_every_experiment_in_the_project() {
    let predicate = catalog::experiment_tech_ids();
    predicate.init(resolver()).unwrap();

    let status = predicate
        .evaluate(&user(), &nemo_user(), Some(&[TechId(100), TechId(101)][..]))
        .await
        .unwrap();
    assert!(status.is_error());

    let space_observer = RoleSet::from(vec![Role::space(RoleCode::Observer, "CISD")]);
    let status = predicate
        .evaluate(&user(), &space_observer, Some(&[TechId(100), TechId(101)][..]))
        .await
        .unwrap();
    assert!(status.is_ok());
}

#[tokio::test]
async fn sample_search_results_are_filtered() {
    let filter = catalog::sample_filter();
    filter.init(resolver()).unwrap();

    let partition = filter
        .partition(
            &user(),
            &nemo_user(),
            Some(vec![TechId(200), TechId(201), TechId(999)]),
        )
        .await
        .unwrap();

    assert_eq!(partition.with_access, vec![TechId(201)]);
    assert_eq!(partition.without_access, vec![TechId(200), TechId(999)]);
}

#[tokio::test]
async fn shared_materials_need_an_instance_admin() {
    let predicate = catalog::material_modification();
    predicate.init(resolver()).unwrap();

    let space_admin = RoleSet::from(vec![Role::space(RoleCode::Admin, "CISD")]);
    let denied = predicate
        .evaluate(&user(), &space_admin, Some(&TechId(300)))
        .await
        .unwrap();
    assert_eq!(
        denied.to_string(),
        "ERROR: \"User 'megapixel' does not have enough privileges to modify instance level entities.\""
    );

    let instance_admin = RoleSet::from(vec![Role::instance(RoleCode::Admin)]);
    let granted = predicate
        .evaluate(&user(), &instance_admin, Some(&TechId(300)))
        .await
        .unwrap();
    assert!(granted.is_ok());
}
