#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static Ownership Resolver Plugin
//!
//! Serves entity ownership (space and project) from configuration. Intended
//! for development, tests and small deployments whose data never changes.
//!
//! ## Configuration
//!
//! ```yaml
//! authorization:
//!   project_level_enabled: true
//! spaces:
//!   - code: CISD
//!     tech_id: 1
//! projects:
//!   - space: CISD
//!     code: NEMO
//!     tech_id: 10
//!     perm_id: "20120814110011738-103"
//! entities:
//!   - kind: experiment
//!     tech_id: 100
//!     perm_id: "20120814110011738-104"
//!     space: CISD
//!     project: NEMO
//!   - kind: material
//!     tech_id: 300
//! ```

pub mod config;
pub mod domain;

pub use config::StaticOwnershipPluginConfig;
pub use domain::service::Service;
