//! Deployment-wide authorization switches.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Authorization configuration visible to every predicate evaluation.
///
/// ```yaml
/// project_level_enabled: true
/// project_level_users: ["alice", "bob"]   # omit to enable for everyone
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthorizationConfig {
    /// Whether project-level role assignments take part in matching.
    pub project_level_enabled: bool,

    /// Restrict project-level matching to these user ids. `None` means all
    /// users.
    pub project_level_users: Option<BTreeSet<String>>,
}

impl AuthorizationConfig {
    #[must_use]
    pub fn project_level(enabled: bool) -> Self {
        Self {
            project_level_enabled: enabled,
            project_level_users: None,
        }
    }

    #[must_use]
    pub fn with_project_level_users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.project_level_users = Some(users.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn is_project_level_enabled(&self) -> bool {
        self.project_level_enabled
    }

    /// Project-level matching applies to `user_id` only when the global
    /// switch is on and the user is not excluded by the allow-list.
    #[must_use]
    pub fn is_project_level_enabled_for(&self, user_id: &str) -> bool {
        self.project_level_enabled
            && self
                .project_level_users
                .as_ref()
                .is_none_or(|users| users.contains(user_id))
    }
}
