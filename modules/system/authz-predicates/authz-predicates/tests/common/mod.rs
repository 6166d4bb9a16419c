//! Shared fixtures: an in-memory ownership resolver that counts its calls.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use authz_predicates_sdk::{
    AuthorizationConfig, EntityKind, EntityRef, OwnershipResolver, ResolverError,
};
use modkit_security::{EntityScope, ProjectRef, Role, RoleCode, RoleSet, SpaceRef};

pub const SPACE: &str = "SPACE";
pub const PROJECT: &str = "PROJECT";
pub const OTHER_SPACE: &str = "ANOTHER_SPACE";

/// Experiment 1 lives in `/SPACE/PROJECT`, experiment 2 in
/// `/ANOTHER_SPACE/OTHER`, experiment 3 in `/SPACE/SECOND`.
pub const E1: i64 = 1;
pub const E2: i64 = 2;
pub const E3: i64 = 3;
pub const MISSING: i64 = 404;

#[derive(Default)]
pub struct FakeResolver {
    config: AuthorizationConfig,
    scopes: HashMap<EntityRef, EntityScope>,
    failure: Option<ResolverError>,
    pub one_calls: AtomicUsize,
    pub many_calls: AtomicUsize,
    pub project_calls: AtomicUsize,
}

impl FakeResolver {
    pub fn new(config: AuthorizationConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Three experiments in two spaces.
    pub fn seeded(project_level: bool) -> Self {
        Self::new(AuthorizationConfig::project_level(project_level))
            .with(EntityRef::TechId(E1), project(SPACE, PROJECT))
            .with(EntityRef::TechId(E2), project(OTHER_SPACE, "OTHER"))
            .with(EntityRef::TechId(E3), project(SPACE, "SECOND"))
            .with(
                EntityRef::PermId("20120814110011738-104".to_owned()),
                project(SPACE, PROJECT),
            )
    }

    pub fn with(mut self, id: EntityRef, scope: EntityScope) -> Self {
        self.scopes.insert(id, scope);
        self
    }

    pub fn failing(mut self, error: ResolverError) -> Self {
        self.failure = Some(error);
        self
    }

    pub fn calls(&self) -> (usize, usize, usize) {
        (
            self.one_calls.load(Ordering::SeqCst),
            self.many_calls.load(Ordering::SeqCst),
            self.project_calls.load(Ordering::SeqCst),
        )
    }

    pub fn total_calls(&self) -> usize {
        let (one, many, projects) = self.calls();
        one + many + projects
    }

    fn check(&self) -> Result<(), ResolverError> {
        match &self.failure {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl OwnershipResolver for FakeResolver {
    fn authorization_config(&self) -> &AuthorizationConfig {
        &self.config
    }

    async fn resolve_one(
        &self,
        _kind: EntityKind,
        id: &EntityRef,
    ) -> Result<Option<EntityScope>, ResolverError> {
        self.one_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.scopes.get(id).cloned())
    }

    async fn resolve_many(
        &self,
        _kind: EntityKind,
        ids: &[EntityRef],
    ) -> Result<HashMap<EntityRef, EntityScope>, ResolverError> {
        self.many_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(ids
            .iter()
            .filter_map(|id| {
                let scope = self.scopes.get(id)?;
                let space_only = match scope.space() {
                    Some(space) => EntityScope::in_space(space.clone()),
                    None => EntityScope::shared(),
                };
                Some((id.clone(), space_only))
            })
            .collect())
    }

    async fn resolve_projects(
        &self,
        _kind: EntityKind,
        ids: &[EntityRef],
    ) -> Result<HashMap<EntityRef, ProjectRef>, ResolverError> {
        self.project_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(ids
            .iter()
            .filter_map(|id| {
                let project = self.scopes.get(id)?.project()?;
                Some((id.clone(), project.clone()))
            })
            .collect())
    }
}

pub fn project(space: &str, code: &str) -> EntityScope {
    EntityScope::in_project_of(SpaceRef::new(space), ProjectRef::new(space, code))
}

pub fn shared(resolver: FakeResolver) -> (Arc<FakeResolver>, Arc<dyn OwnershipResolver>) {
    let resolver = Arc::new(resolver);
    let dynamic: Arc<dyn OwnershipResolver> = resolver.clone();
    (resolver, dynamic)
}

pub fn instance_admin() -> RoleSet {
    RoleSet::from(vec![Role::instance(RoleCode::Admin)])
}

pub fn space_role(code: RoleCode, space: &str) -> RoleSet {
    RoleSet::from(vec![Role::space(code, space)])
}

pub fn project_role(code: RoleCode, space: &str, project: &str) -> RoleSet {
    RoleSet::from(vec![Role::project(code, ProjectRef::new(space, project))])
}
