//! Role hierarchy.
//!
//! Every valid (level, code) combination is a [`RoleWithHierarchy`]. Roles
//! imply weaker roles through a fixed set of edges; `implies` is the
//! reflexive-transitive closure of those edges.

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::role::{RoleCode, RoleLevel};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleWithHierarchy {
    InstanceAdmin,
    InstanceEtlServer,
    InstanceObserver,
    SpaceAdmin,
    SpacePowerUser,
    SpaceUser,
    SpaceObserver,
    SpaceEtlServer,
    ProjectAdmin,
    ProjectPowerUser,
    ProjectUser,
    ProjectObserver,
}

/// Error returned when a role name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct ParseRoleError(pub String);

impl RoleWithHierarchy {
    pub const ALL: [Self; 12] = [
        Self::InstanceAdmin,
        Self::InstanceEtlServer,
        Self::InstanceObserver,
        Self::SpaceAdmin,
        Self::SpacePowerUser,
        Self::SpaceUser,
        Self::SpaceObserver,
        Self::SpaceEtlServer,
        Self::ProjectAdmin,
        Self::ProjectPowerUser,
        Self::ProjectUser,
        Self::ProjectObserver,
    ];

    /// Look up the hierarchy role for a (level, code) pair. Combinations with
    /// no hierarchy entry, such as an instance-level `USER`, yield `None`.
    #[must_use]
    pub fn of(level: RoleLevel, code: RoleCode) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.level() == level && r.code() == code)
    }

    #[must_use]
    pub fn level(self) -> RoleLevel {
        match self {
            Self::InstanceAdmin | Self::InstanceEtlServer | Self::InstanceObserver => {
                RoleLevel::Instance
            }
            Self::SpaceAdmin
            | Self::SpacePowerUser
            | Self::SpaceUser
            | Self::SpaceObserver
            | Self::SpaceEtlServer => RoleLevel::Space,
            Self::ProjectAdmin
            | Self::ProjectPowerUser
            | Self::ProjectUser
            | Self::ProjectObserver => RoleLevel::Project,
        }
    }

    #[must_use]
    pub fn code(self) -> RoleCode {
        match self {
            Self::InstanceAdmin | Self::SpaceAdmin | Self::ProjectAdmin => RoleCode::Admin,
            Self::InstanceEtlServer | Self::SpaceEtlServer => RoleCode::EtlServer,
            Self::InstanceObserver | Self::SpaceObserver | Self::ProjectObserver => {
                RoleCode::Observer
            }
            Self::SpacePowerUser | Self::ProjectPowerUser => RoleCode::PowerUser,
            Self::SpaceUser | Self::ProjectUser => RoleCode::User,
        }
    }

    /// Roles this role directly includes.
    #[must_use]
    pub fn implied_roles(self) -> &'static [Self] {
        match self {
            Self::InstanceAdmin => &[Self::SpaceAdmin, Self::InstanceEtlServer],
            Self::InstanceEtlServer => &[Self::SpaceEtlServer, Self::InstanceObserver],
            Self::InstanceObserver | Self::SpaceEtlServer => &[Self::SpaceObserver],
            Self::SpaceAdmin => &[Self::SpacePowerUser, Self::ProjectAdmin],
            Self::SpacePowerUser => &[Self::SpaceUser, Self::ProjectPowerUser],
            Self::SpaceUser => &[Self::SpaceObserver, Self::ProjectUser],
            Self::SpaceObserver | Self::ProjectUser => &[Self::ProjectObserver],
            Self::ProjectAdmin => &[Self::ProjectPowerUser],
            Self::ProjectPowerUser => &[Self::ProjectUser],
            Self::ProjectObserver => &[],
        }
    }

    /// `true` if holding `self` grants everything `other` grants.
    #[must_use]
    pub fn implies(self, other: Self) -> bool {
        if self == other {
            return true;
        }
        self.implied_roles().iter().any(|r| r.implies(other))
    }

    /// `true` if `self` implies at least one of `allowed`.
    #[must_use]
    pub fn implies_any(self, allowed: &[Self]) -> bool {
        allowed.iter().any(|a| self.implies(*a))
    }

    /// Every role that implies `self`, starting with `self`, nearest first.
    ///
    /// `SPACE_POWER_USER` yields `[SPACE_POWER_USER, SPACE_ADMIN, INSTANCE_ADMIN]`.
    #[must_use]
    pub fn satisfying_roles(self) -> Vec<Self> {
        expand(&[self])
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InstanceAdmin => "INSTANCE_ADMIN",
            Self::InstanceEtlServer => "INSTANCE_ETL_SERVER",
            Self::InstanceObserver => "INSTANCE_OBSERVER",
            Self::SpaceAdmin => "SPACE_ADMIN",
            Self::SpacePowerUser => "SPACE_POWER_USER",
            Self::SpaceUser => "SPACE_USER",
            Self::SpaceObserver => "SPACE_OBSERVER",
            Self::SpaceEtlServer => "SPACE_ETL_SERVER",
            Self::ProjectAdmin => "PROJECT_ADMIN",
            Self::ProjectPowerUser => "PROJECT_POWER_USER",
            Self::ProjectUser => "PROJECT_USER",
            Self::ProjectObserver => "PROJECT_OBSERVER",
        }
    }
}

/// Breadth-first union of [`RoleWithHierarchy::satisfying_roles`] over
/// `roles`, without duplicates.
#[must_use]
pub fn expand(roles: &[RoleWithHierarchy]) -> Vec<RoleWithHierarchy> {
    let mut seen: HashSet<RoleWithHierarchy> = HashSet::new();
    let mut queue: VecDeque<RoleWithHierarchy> = VecDeque::new();
    let mut result = Vec::new();

    for role in roles {
        if seen.insert(*role) {
            queue.push_back(*role);
        }
    }

    while let Some(current) = queue.pop_front() {
        result.push(current);
        for candidate in RoleWithHierarchy::ALL {
            if candidate.implied_roles().contains(&current) && seen.insert(candidate) {
                queue.push_back(candidate);
            }
        }
    }

    result
}

/// Renders roles as `[A, B, C]`.
#[must_use]
pub fn format_roles(roles: &[RoleWithHierarchy]) -> String {
    let names: Vec<&str> = roles.iter().copied().map(RoleWithHierarchy::as_str).collect();
    format!("[{}]", names.join(", "))
}

impl fmt::Display for RoleWithHierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleWithHierarchy {
    type Err = ParseRoleError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseRoleError(wanted.to_owned()))
    }
}
