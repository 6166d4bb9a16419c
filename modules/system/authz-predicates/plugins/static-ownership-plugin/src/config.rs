//! Configuration for the static ownership resolver plugin.

use std::path::Path;

use anyhow::Context as _;
use authz_predicates_sdk::{AuthorizationConfig, EntityKind};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

/// Environment variable prefix. Nested keys are separated by `__`, e.g.
/// `STATIC_OWNERSHIP_AUTHORIZATION__PROJECT_LEVEL_ENABLED=true`.
pub const ENV_PREFIX: &str = "STATIC_OWNERSHIP_";

/// Plugin configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticOwnershipPluginConfig {
    /// Authorization switches served to predicates.
    pub authorization: AuthorizationConfig,

    /// Known spaces.
    pub spaces: Vec<SpaceConfig>,

    /// Known projects. Each must belong to a configured space.
    pub projects: Vec<ProjectConfig>,

    /// Entities owned by spaces, projects or the instance.
    pub entities: Vec<EntityConfig>,
}

/// Space definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpaceConfig {
    pub code: String,
    #[serde(default)]
    pub tech_id: Option<i64>,
}

/// Project definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    pub space: String,
    pub code: String,
    #[serde(default)]
    pub tech_id: Option<i64>,
    #[serde(default)]
    pub perm_id: Option<String>,
}

/// Entity definition. At least one of the keys must be set.
///
/// `project` requires `space`; neither set means a shared entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityConfig {
    pub kind: EntityKind,
    #[serde(default)]
    pub tech_id: Option<i64>,
    #[serde(default)]
    pub perm_id: Option<String>,
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(default)]
    pub space: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
}

impl StaticOwnershipPluginConfig {
    /// Load from a YAML file, overridden by `STATIC_OWNERSHIP_*` variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be parsed or a value has the
    /// wrong shape.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("failed to load ownership config from {}", path.display()))
    }
}
