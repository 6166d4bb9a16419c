//! Client implementation for the static ownership resolver plugin.
//!
//! Implements `OwnershipResolver` using the domain service.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use authz_predicates_sdk::{
    AuthorizationConfig, EntityKind, EntityRef, OwnershipResolver, ResolverError,
};
use modkit_security::{EntityScope, ProjectRef};

use super::service::Service;

#[async_trait]
impl OwnershipResolver for Service {
    fn authorization_config(&self) -> &AuthorizationConfig {
        &self.authorization
    }

    async fn resolve_one(
        &self,
        kind: EntityKind,
        id: &EntityRef,
    ) -> Result<Option<EntityScope>, ResolverError> {
        Ok(self.lookup(kind, id).cloned())
    }

    async fn resolve_many(
        &self,
        kind: EntityKind,
        ids: &[EntityRef],
    ) -> Result<HashMap<EntityRef, EntityScope>, ResolverError> {
        let mut result = HashMap::new();
        let mut seen = HashSet::new();

        for id in ids {
            if !seen.insert(id) {
                continue; // Skip duplicate IDs
            }
            // Only the space is answered here; projects come from `resolve_projects`.
            if let Some(scope) = self.lookup(kind, id) {
                let space_only = scope
                    .space()
                    .cloned()
                    .map_or_else(EntityScope::shared, EntityScope::in_space);
                result.insert(id.clone(), space_only);
            }
            // Missing IDs are silently skipped
        }

        tracing::debug!(
            %kind,
            requested = ids.len(),
            found = result.len(),
            "resolved owning spaces"
        );
        Ok(result)
    }

    async fn resolve_projects(
        &self,
        kind: EntityKind,
        ids: &[EntityRef],
    ) -> Result<HashMap<EntityRef, ProjectRef>, ResolverError> {
        let mut result = HashMap::new();

        for id in ids {
            if result.contains_key(id) {
                continue;
            }
            if let Some(project) = self.lookup(kind, id).and_then(EntityScope::project) {
                result.insert(id.clone(), project.clone());
            }
        }

        tracing::debug!(
            %kind,
            requested = ids.len(),
            found = result.len(),
            "resolved owning projects"
        );
        Ok(result)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::{EntityConfig, ProjectConfig, SpaceConfig, StaticOwnershipPluginConfig};
    use modkit_security::SpaceRef;

    const EXPERIMENT_IN_PROJECT: i64 = 100;
    const EXPERIMENT_IN_SPACE: i64 = 200;
    const SHARED_EXPERIMENT: i64 = 300;

    fn service() -> Service {
        let cfg = StaticOwnershipPluginConfig {
            authorization: AuthorizationConfig::project_level(true),
            spaces: vec![SpaceConfig {
                code: "CISD".to_owned(),
                tech_id: Some(1),
            }],
            projects: vec![ProjectConfig {
                space: "CISD".to_owned(),
                code: "NEMO".to_owned(),
                tech_id: Some(10),
                perm_id: None,
            }],
            entities: vec![
                EntityConfig {
                    kind: EntityKind::Experiment,
                    tech_id: Some(EXPERIMENT_IN_PROJECT),
                    perm_id: Some("E-PERM".to_owned()),
                    identifier: None,
                    space: Some("CISD".to_owned()),
                    project: Some("NEMO".to_owned()),
                },
                EntityConfig {
                    kind: EntityKind::Experiment,
                    tech_id: Some(EXPERIMENT_IN_SPACE),
                    perm_id: None,
                    identifier: None,
                    space: Some("CISD".to_owned()),
                    project: None,
                },
                EntityConfig {
                    kind: EntityKind::Experiment,
                    tech_id: Some(SHARED_EXPERIMENT),
                    perm_id: None,
                    identifier: None,
                    space: None,
                    project: None,
                },
            ],
        };
        Service::from_config(&cfg).unwrap()
    }

    #[test]
    fn exposes_authorization_config() {
        let service = service();
        assert!(service.authorization_config().is_project_level_enabled());
    }

    #[tokio::test]
    async fn resolve_one_returns_full_scope() {
        let service = service();

        let scope = service
            .resolve_one(EntityKind::Experiment, &EntityRef::PermId("E-PERM".to_owned()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(scope.project().map(ProjectRef::code), Some("NEMO"));
    }

    #[tokio::test]
    async fn resolve_one_missing_is_none() {
        let service = service();

        let scope = service
            .resolve_one(EntityKind::Experiment, &EntityRef::TechId(999))
            .await
            .unwrap();
        assert!(scope.is_none());
    }

    #[tokio::test]
    async fn resolve_many_dedups_and_skips_missing() {
        let service = service();
        let ids = [
            EntityRef::TechId(EXPERIMENT_IN_PROJECT),
            EntityRef::TechId(EXPERIMENT_IN_PROJECT),
            EntityRef::TechId(SHARED_EXPERIMENT),
            EntityRef::TechId(999),
        ];

        let scopes = service.resolve_many(EntityKind::Experiment, &ids).await.unwrap();

        assert_eq!(scopes.len(), 2);
        let in_project = &scopes[&EntityRef::TechId(EXPERIMENT_IN_PROJECT)];
        assert_eq!(in_project.space().map(SpaceRef::code), Some("CISD"));
        assert!(in_project.project().is_none(), "projects come from resolve_projects");
        assert!(scopes[&EntityRef::TechId(SHARED_EXPERIMENT)].is_shared());
    }

    #[tokio::test]
    async fn resolve_projects_only_returns_project_owned_entities() {
        let service = service();
        let ids = [
            EntityRef::TechId(EXPERIMENT_IN_PROJECT),
            EntityRef::TechId(EXPERIMENT_IN_SPACE),
            EntityRef::TechId(999),
        ];

        let projects = service
            .resolve_projects(EntityKind::Experiment, &ids)
            .await
            .unwrap();

        assert_eq!(projects.len(), 1);
        assert_eq!(
            projects[&EntityRef::TechId(EXPERIMENT_IN_PROJECT)].tech_id(),
            Some(10)
        );
    }
}
