//! Domain service for the static ownership resolver plugin.

use std::collections::HashMap;

use anyhow::{Context as _, bail};
use authz_predicates_sdk::{AuthorizationConfig, EntityKind, EntityRef};
use modkit_security::{EntityScope, ProjectRef, SpaceRef};

use crate::config::{EntityConfig, StaticOwnershipPluginConfig};

/// Static ownership resolver service.
///
/// Spaces and projects are resolvable as entities of their own kind by
/// technical id, perm id and identifier (`/SPACE`, `/SPACE/PROJECT`).
pub struct Service {
    pub(super) authorization: AuthorizationConfig,
    /// Entity scopes indexed by kind and every key the entity was given.
    pub(super) scopes: HashMap<(EntityKind, EntityRef), EntityScope>,
}

impl Service {
    /// Creates a new service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when a project names an unknown space, an entity
    /// names an unknown space or project, or an entity has no key.
    pub fn from_config(cfg: &StaticOwnershipPluginConfig) -> anyhow::Result<Self> {
        let mut spaces: HashMap<&str, SpaceRef> = HashMap::new();
        for space in &cfg.spaces {
            let mut space_ref = SpaceRef::new(space.code.as_str());
            if let Some(id) = space.tech_id {
                space_ref = space_ref.with_tech_id(id);
            }
            spaces.insert(space.code.as_str(), space_ref);
        }

        let mut projects: HashMap<(&str, &str), ProjectRef> = HashMap::new();
        for project in &cfg.projects {
            if !spaces.contains_key(project.space.as_str()) {
                bail!(
                    "project '{}' belongs to unknown space '{}'",
                    project.code,
                    project.space
                );
            }
            let mut project_ref = ProjectRef::new(project.space.as_str(), project.code.as_str());
            if let Some(id) = project.tech_id {
                project_ref = project_ref.with_tech_id(id);
            }
            if let Some(perm_id) = &project.perm_id {
                project_ref = project_ref.with_perm_id(perm_id.as_str());
            }
            projects.insert((project.space.as_str(), project.code.as_str()), project_ref);
        }

        let mut scopes = HashMap::new();

        for space in spaces.values() {
            let scope = EntityScope::in_space(space.clone());
            let mut keys = vec![EntityRef::Identifier(space.to_string())];
            keys.extend(space.tech_id().map(EntityRef::TechId));
            index(&mut scopes, EntityKind::Space, keys, &scope);
        }

        for project in projects.values() {
            let scope = scoped_to_project(&spaces, project);
            let mut keys = vec![EntityRef::Identifier(project.identifier())];
            keys.extend(project.tech_id().map(EntityRef::TechId));
            keys.extend(project.perm_id().map(|p| EntityRef::PermId(p.to_owned())));
            index(&mut scopes, EntityKind::Project, keys, &scope);
        }

        for (position, entity) in cfg.entities.iter().enumerate() {
            let scope = entity_scope(&spaces, &projects, entity)
                .with_context(|| format!("invalid entity #{position} ({})", entity.kind))?;
            let keys = entity_keys(entity);
            if keys.is_empty() {
                bail!("entity #{position} ({}) has no tech_id, perm_id or identifier", entity.kind);
            }
            index(&mut scopes, entity.kind, keys, &scope);
        }

        tracing::info!(
            spaces = spaces.len(),
            projects = projects.len(),
            entities = cfg.entities.len(),
            project_level_enabled = cfg.authorization.project_level_enabled,
            "static ownership data loaded"
        );

        Ok(Self {
            authorization: cfg.authorization.clone(),
            scopes,
        })
    }

    /// Full scope of one entity, if known.
    #[must_use]
    pub fn lookup(&self, kind: EntityKind, id: &EntityRef) -> Option<&EntityScope> {
        self.scopes.get(&(kind, id.clone()))
    }
}

fn index(
    scopes: &mut HashMap<(EntityKind, EntityRef), EntityScope>,
    kind: EntityKind,
    keys: Vec<EntityRef>,
    scope: &EntityScope,
) {
    for key in keys {
        scopes.insert((kind, key), scope.clone());
    }
}

fn scoped_to_project(spaces: &HashMap<&str, SpaceRef>, project: &ProjectRef) -> EntityScope {
    match spaces.get(project.space_code()) {
        Some(space) => EntityScope::in_project_of(space.clone(), project.clone()),
        None => EntityScope::in_project(project.clone()),
    }
}

fn entity_scope(
    spaces: &HashMap<&str, SpaceRef>,
    projects: &HashMap<(&str, &str), ProjectRef>,
    entity: &EntityConfig,
) -> anyhow::Result<EntityScope> {
    match (entity.space.as_deref(), entity.project.as_deref()) {
        (None, None) => Ok(EntityScope::shared()),
        (None, Some(project)) => bail!("project '{project}' given without a space"),
        (Some(space), None) => {
            let space_ref = spaces
                .get(space)
                .with_context(|| format!("unknown space '{space}'"))?;
            Ok(EntityScope::in_space(space_ref.clone()))
        }
        (Some(space), Some(project)) => {
            let project_ref = projects
                .get(&(space, project))
                .with_context(|| format!("unknown project '/{space}/{project}'"))?;
            Ok(scoped_to_project(spaces, project_ref))
        }
    }
}

fn entity_keys(entity: &EntityConfig) -> Vec<EntityRef> {
    let mut keys = Vec::new();
    keys.extend(entity.tech_id.map(EntityRef::TechId));
    keys.extend(entity.perm_id.clone().map(EntityRef::PermId));
    keys.extend(entity.identifier.clone().map(EntityRef::Identifier));
    keys
}
