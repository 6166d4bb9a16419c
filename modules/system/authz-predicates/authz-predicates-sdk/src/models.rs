//! Entity kinds and the references predicates are evaluated against.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of entity a predicate protects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Space,
    Project,
    Experiment,
    Sample,
    DataSet,
    Material,
}

impl EntityKind {
    /// Lower-case name used in sentences, e.g. `"data set"`.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Space => "space",
            Self::Project => "project",
            Self::Experiment => "experiment",
            Self::Sample => "sample",
            Self::DataSet => "data set",
            Self::Material => "material",
        }
    }

    /// Upper-case label, e.g. `"DATA_SET"`.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Space => "SPACE",
            Self::Project => "PROJECT",
            Self::Experiment => "EXPERIMENT",
            Self::Sample => "SAMPLE",
            Self::DataSet => "DATA_SET",
            Self::Material => "MATERIAL",
        }
    }

    /// Whether identifiers of this kind encode their owning space and
    /// project, so they can be resolved without asking the data source.
    #[must_use]
    pub fn parses_identifiers(self) -> bool {
        matches!(
            self,
            Self::Space | Self::Project | Self::Experiment | Self::Sample
        )
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Database technical id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TechId(pub i64);

/// Permanent id, stable across databases.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermId(pub String);

/// Textual identifier such as `/SPACE/PROJECT/CODE`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(pub String);

impl From<i64> for TechId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl From<&str> for PermId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<&str> for Identifier {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Key under which the ownership resolver looks an entity up.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityRef {
    TechId(i64),
    PermId(String),
    Identifier(String),
}

impl From<&TechId> for EntityRef {
    fn from(id: &TechId) -> Self {
        Self::TechId(id.0)
    }
}

impl From<&PermId> for EntityRef {
    fn from(id: &PermId) -> Self {
        Self::PermId(id.0.clone())
    }
}

impl From<&Identifier> for EntityRef {
    fn from(id: &Identifier) -> Self {
        Self::Identifier(id.0.clone())
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TechId(id) => write!(f, "tech id {id}"),
            Self::PermId(id) => write!(f, "perm id {id}"),
            Self::Identifier(id) => write!(f, "identifier {id}"),
        }
    }
}

/// Update request for an entity. Any combination of keys may be populated;
/// the identifier wins over the perm id, which wins over the technical id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityUpdates {
    pub identifier: Option<String>,
    pub perm_id: Option<String>,
    pub tech_id: Option<i64>,
}

impl EntityUpdates {
    #[must_use]
    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    #[must_use]
    pub fn with_perm_id(mut self, perm_id: impl Into<String>) -> Self {
        self.perm_id = Some(perm_id.into());
        self
    }

    #[must_use]
    pub fn with_tech_id(mut self, tech_id: i64) -> Self {
        self.tech_id = Some(tech_id);
        self
    }

    /// The strongest populated key, or `None` when nothing is set.
    #[must_use]
    pub fn entity_ref(&self) -> Option<EntityRef> {
        if let Some(identifier) = &self.identifier {
            return Some(EntityRef::Identifier(identifier.clone()));
        }
        if let Some(perm_id) = &self.perm_id {
            return Some(EntityRef::PermId(perm_id.clone()));
        }
        self.tech_id.map(EntityRef::TechId)
    }
}
