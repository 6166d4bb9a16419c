//! Matching of role assignments against entity scopes.

use modkit_security::{
    EntityScope, ProjectRef, Role, RoleLevel, RoleSet, RoleWithHierarchy, SpaceRef,
};

use super::descriptor::MissingTargetPolicy;

/// The sufficient roles of one evaluation, grouped by level.
///
/// Project roles are only collected when project-level matching is enabled
/// for the principal; otherwise they never cover anything.
pub struct Coverage<'a> {
    instance: bool,
    spaces: Vec<SpaceRef>,
    projects: Vec<&'a ProjectRef>,
}

impl<'a> Coverage<'a> {
    pub fn new(roles: &'a RoleSet, allowed: &[RoleWithHierarchy], project_level: bool) -> Self {
        let mut coverage = Self {
            instance: false,
            spaces: Vec::new(),
            projects: Vec::new(),
        };

        for role in roles.iter().filter(|r| r.is_sufficient_for(allowed)) {
            coverage.add(role, project_level);
        }

        coverage
    }

    fn add(&mut self, role: &'a Role, project_level: bool) {
        match role.level() {
            RoleLevel::Instance => self.instance = true,
            RoleLevel::Space => self.spaces.extend(role.scope_space()),
            RoleLevel::Project if project_level => self.projects.extend(role.scope_project()),
            RoleLevel::Project => {}
        }
    }

    /// A sufficient instance-level role dominates everything else.
    pub fn instance(&self) -> bool {
        self.instance
    }

    pub fn has_project_roles(&self) -> bool {
        !self.projects.is_empty()
    }

    /// Any sufficient space role, or an enabled project role.
    pub fn has_scoped_roles(&self) -> bool {
        !self.spaces.is_empty() || self.has_project_roles()
    }

    pub fn covers_space(&self, space: &SpaceRef) -> bool {
        self.spaces.iter().any(|s| s.matches(space))
    }

    pub fn covers_project(&self, project: &ProjectRef) -> bool {
        self.projects.iter().any(|p| p.matches(project))
    }

    /// Instance role, then a space role naming the entity's space, then a
    /// project role naming the entity's project.
    pub fn covers(&self, scope: &EntityScope) -> bool {
        self.instance
            || scope.space().is_some_and(|s| self.covers_space(s))
            || scope.project().is_some_and(|p| self.covers_project(p))
    }

    /// Decision for a target that does not exist.
    pub fn covers_missing(&self, policy: MissingTargetPolicy) -> bool {
        match policy {
            MissingTargetPolicy::Deny => self.instance,
            MissingTargetPolicy::AllowForCreation => self.instance || self.has_scoped_roles(),
        }
    }
}
