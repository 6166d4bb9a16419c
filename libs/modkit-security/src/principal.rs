/// `Principal` identifies who is acting in a request.
///
/// Built by the authentication layer and passed through the request lifecycle.
/// It carries no authorization logic: predicates only use it to attribute
/// decisions and render denial messages.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Principal {
    /// Stable user id, e.g. the login name.
    user_id: String,
    /// Human-readable name. Falls back to `user_id` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
}

impl Principal {
    /// Create a new `Principal` builder
    #[must_use]
    pub fn builder() -> PrincipalBuilder {
        PrincipalBuilder::default()
    }

    /// Shortcut for a principal with only a user id.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self::builder().user_id(user_id).build()
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Display name, or the user id when no display name was given.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.user_id)
    }
}

#[derive(Default)]
pub struct PrincipalBuilder {
    user_id: Option<String>,
    display_name: Option<String>,
}

impl PrincipalBuilder {
    #[must_use]
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    #[must_use]
    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    #[must_use]
    pub fn build(self) -> Principal {
        Principal {
            user_id: self.user_id.unwrap_or_default(),
            display_name: self.display_name,
        }
    }
}
