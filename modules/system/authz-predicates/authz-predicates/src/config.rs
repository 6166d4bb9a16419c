//! Configuration for authorization predicates.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use serde::{Deserialize, Serialize};

use crate::domain::CapabilityMap;

/// Environment variable prefix, e.g. `AUTHZ_PREDICATES_CAPABILITIES_FILE`.
pub const ENV_PREFIX: &str = "AUTHZ_PREDICATES_";

/// Configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthzPredicatesConfig {
    /// Capability override file, in the `NAME: ROLES; ARG = ROLES` format.
    pub capabilities_file: Option<PathBuf>,

    /// Inline capability lines, applied after the file.
    pub capabilities: Vec<String>,
}

impl AuthzPredicatesConfig {
    /// Load from a YAML file, overridden by `AUTHZ_PREDICATES_*` variables.
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
            .with_context(|| {
                format!(
                    "failed to load authz predicates config from {}",
                    path.display()
                )
            })
    }

    /// Build the capability map this configuration describes.
    ///
    /// # Errors
    ///
    /// Returns an error if `capabilities_file` is set but cannot be read.
    pub fn capability_map(&self) -> anyhow::Result<CapabilityMap> {
        let mut map = match &self.capabilities_file {
            Some(path) => CapabilityMap::from_file(path)?,
            None => CapabilityMap::default(),
        };
        for line in &self.capabilities {
            map.extend_from(line);
        }
        tracing::info!(capabilities = map.len(), "capability overrides loaded");
        Ok(map)
    }
}
