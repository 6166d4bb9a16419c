use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hierarchy::RoleWithHierarchy;
use crate::scope::{ProjectRef, SpaceRef};

/// Scoping level of a role assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleLevel {
    Instance,
    Space,
    Project,
}

/// Capability code of a role assignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleCode {
    Admin,
    PowerUser,
    User,
    Observer,
    EtlServer,
}

/// What a role assignment is attached to.
///
/// The variant fixes the level: instance roles carry nothing, space roles
/// carry a space code, project roles carry a project (which names its space).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleScope {
    Instance,
    Space(String),
    Project(ProjectRef),
}

/// A role granted to a principal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Role {
    code: RoleCode,
    scope: RoleScope,
}

impl Role {
    #[must_use]
    pub fn instance(code: RoleCode) -> Self {
        Self {
            code,
            scope: RoleScope::Instance,
        }
    }

    #[must_use]
    pub fn space(code: RoleCode, space: impl Into<String>) -> Self {
        Self {
            code,
            scope: RoleScope::Space(space.into()),
        }
    }

    #[must_use]
    pub fn project(code: RoleCode, project: ProjectRef) -> Self {
        Self {
            code,
            scope: RoleScope::Project(project),
        }
    }

    #[must_use]
    pub fn code(&self) -> RoleCode {
        self.code
    }

    #[must_use]
    pub fn scope(&self) -> &RoleScope {
        &self.scope
    }

    #[must_use]
    pub fn level(&self) -> RoleLevel {
        match self.scope {
            RoleScope::Instance => RoleLevel::Instance,
            RoleScope::Space(_) => RoleLevel::Space,
            RoleScope::Project(_) => RoleLevel::Project,
        }
    }

    /// Space named by a space-level role.
    #[must_use]
    pub fn scope_space(&self) -> Option<SpaceRef> {
        match &self.scope {
            RoleScope::Space(code) => Some(SpaceRef::new(code.as_str())),
            RoleScope::Instance | RoleScope::Project(_) => None,
        }
    }

    /// Project named by a project-level role.
    #[must_use]
    pub fn scope_project(&self) -> Option<&ProjectRef> {
        match &self.scope {
            RoleScope::Project(project) => Some(project),
            RoleScope::Instance | RoleScope::Space(_) => None,
        }
    }

    #[must_use]
    pub fn hierarchy_role(&self) -> Option<RoleWithHierarchy> {
        RoleWithHierarchy::of(self.level(), self.code)
    }

    /// A role is sufficient when its hierarchy role implies one of `allowed`.
    #[must_use]
    pub fn is_sufficient_for(&self, allowed: &[RoleWithHierarchy]) -> bool {
        self.hierarchy_role()
            .is_some_and(|role| role.implies_any(allowed))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level() {
            RoleLevel::Instance => "INSTANCE",
            RoleLevel::Space => "SPACE",
            RoleLevel::Project => "PROJECT",
        };
        let code = match self.code {
            RoleCode::Admin => "ADMIN",
            RoleCode::PowerUser => "POWER_USER",
            RoleCode::User => "USER",
            RoleCode::Observer => "OBSERVER",
            RoleCode::EtlServer => "ETL_SERVER",
        };
        match &self.scope {
            RoleScope::Instance => write!(f, "{level}({code})"),
            RoleScope::Space(space) => write!(f, "{level}({code}, {space})"),
            RoleScope::Project(project) => write!(f, "{level}({code}, {project})"),
        }
    }
}

/// Roles handed to one evaluation. Order is preserved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoleSet {
    roles: Vec<Role>,
}

impl RoleSet {
    #[must_use]
    pub fn new(roles: Vec<Role>) -> Self {
        Self { roles }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Role> {
        self.roles.iter()
    }

    /// Keep the roles sufficient for at least one of `allowed`.
    #[must_use]
    pub fn retain_sufficient(&self, allowed: &[RoleWithHierarchy]) -> RoleSet {
        self.roles
            .iter()
            .filter(|r| r.is_sufficient_for(allowed))
            .cloned()
            .collect()
    }
}

impl From<Vec<Role>> for RoleSet {
    fn from(roles: Vec<Role>) -> Self {
        Self { roles }
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<I: IntoIterator<Item = Role>>(iter: I) -> Self {
        Self {
            roles: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a RoleSet {
    type Item = &'a Role;
    type IntoIter = std::slice::Iter<'a, Role>;

    fn into_iter(self) -> Self::IntoIter {
        self.roles.iter()
    }
}
