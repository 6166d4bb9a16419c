use std::fmt;

use serde::{Deserialize, Serialize};

/// A space as seen by authorization: its code, plus the technical id when
/// the data source knows it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpaceRef {
    code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tech_id: Option<i64>,
}

impl SpaceRef {
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            tech_id: None,
        }
    }

    #[must_use]
    pub fn with_tech_id(mut self, tech_id: i64) -> Self {
        self.tech_id = Some(tech_id);
        self
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn tech_id(&self) -> Option<i64> {
        self.tech_id
    }

    /// Two spaces match when their technical ids agree (if both carry one)
    /// or, failing that, when their codes are equal.
    #[must_use]
    pub fn matches(&self, other: &SpaceRef) -> bool {
        match (self.tech_id, other.tech_id) {
            (Some(a), Some(b)) => a == b,
            _ => self.code == other.code,
        }
    }
}

impl fmt::Display for SpaceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.code)
    }
}

/// A project reference.
///
/// The owning space code is part of the reference, so a project can never be
/// detached from its space. Technical id and perm id are optional: references
/// parsed from identifiers carry neither, references coming from a data
/// source usually carry both.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectRef {
    space: String,
    code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tech_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    perm_id: Option<String>,
}

impl ProjectRef {
    #[must_use]
    pub fn new(space: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            space: space.into(),
            code: code.into(),
            tech_id: None,
            perm_id: None,
        }
    }

    #[must_use]
    pub fn with_tech_id(mut self, tech_id: i64) -> Self {
        self.tech_id = Some(tech_id);
        self
    }

    #[must_use]
    pub fn with_perm_id(mut self, perm_id: impl Into<String>) -> Self {
        self.perm_id = Some(perm_id.into());
        self
    }

    #[must_use]
    pub fn space_code(&self) -> &str {
        &self.space
    }

    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    #[must_use]
    pub fn tech_id(&self) -> Option<i64> {
        self.tech_id
    }

    #[must_use]
    pub fn perm_id(&self) -> Option<&str> {
        self.perm_id.as_deref()
    }

    /// `/SPACE/PROJECT`
    #[must_use]
    pub fn identifier(&self) -> String {
        format!("/{}/{}", self.space, self.code)
    }

    /// Decide whether two references denote the same project.
    ///
    /// Keys are compared from strongest to weakest:
    /// 1. technical ids, when both sides have one; a mismatch is final
    /// 2. perm ids, when both sides have one; a mismatch is final
    /// 3. if either key was compared (and agreed) the projects match
    /// 4. otherwise the `/SPACE/PROJECT` identifiers decide
    #[must_use]
    pub fn matches(&self, other: &ProjectRef) -> bool {
        let tech_ids = self.tech_id.zip(other.tech_id).map(|(a, b)| a == b);
        let perm_ids = self
            .perm_id
            .as_deref()
            .zip(other.perm_id.as_deref())
            .map(|(a, b)| a == b);

        match (tech_ids, perm_ids) {
            (Some(false), _) | (_, Some(false)) => false,
            (None, None) => self.space == other.space && self.code == other.code,
            _ => true,
        }
    }
}

impl fmt::Display for ProjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.space, self.code)
    }
}

/// Ownership of an entity: the space and, optionally, the project it lives in.
///
/// Invariant: a project implies a space, and that space is the project's own.
/// Neither set means an instance-level (shared) entity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityScope {
    space: Option<SpaceRef>,
    project: Option<ProjectRef>,
}

impl EntityScope {
    /// Instance-level entity with no owning space.
    #[must_use]
    pub fn shared() -> Self {
        Self {
            space: None,
            project: None,
        }
    }

    #[must_use]
    pub fn in_space(space: SpaceRef) -> Self {
        Self {
            space: Some(space),
            project: None,
        }
    }

    /// Entity owned by `project`; the space is taken from the project.
    #[must_use]
    pub fn in_project(project: ProjectRef) -> Self {
        Self {
            space: Some(SpaceRef::new(project.space_code())),
            project: Some(project),
        }
    }

    /// Like [`EntityScope::in_project`] but keeps a fully populated space
    /// reference. Falls back to the project's space when the codes disagree.
    #[must_use]
    pub fn in_project_of(space: SpaceRef, project: ProjectRef) -> Self {
        if space.code() == project.space_code() {
            Self {
                space: Some(space),
                project: Some(project),
            }
        } else {
            Self::in_project(project)
        }
    }

    #[must_use]
    pub fn space(&self) -> Option<&SpaceRef> {
        self.space.as_ref()
    }

    #[must_use]
    pub fn project(&self) -> Option<&ProjectRef> {
        self.project.as_ref()
    }

    #[must_use]
    pub fn is_shared(&self) -> bool {
        self.space.is_none()
    }

    /// Attach a project to a space-only scope. Ignored when the project
    /// belongs to another space.
    #[must_use]
    pub fn with_project(self, project: ProjectRef) -> Self {
        match self.space {
            Some(space) => Self::in_project_of(space, project),
            None => self,
        }
    }
}
