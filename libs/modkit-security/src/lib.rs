#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Security primitives shared by authorization code: who is acting
//! ([`Principal`]), what they were granted ([`Role`], [`RoleSet`],
//! [`RoleWithHierarchy`]) and where entities live ([`EntityScope`]).
pub mod hierarchy;
pub mod principal;
pub mod role;
pub mod scope;

pub use hierarchy::{ParseRoleError, RoleWithHierarchy, expand, format_roles};
pub use principal::{Principal, PrincipalBuilder};
pub use role::{Role, RoleCode, RoleLevel, RoleScope, RoleSet};
pub use scope::{EntityScope, ProjectRef, SpaceRef};
