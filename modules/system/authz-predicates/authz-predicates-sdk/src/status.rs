use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of an authorization decision.
///
/// Denial is a value, not an error: infrastructure failures and misuse are
/// reported through `Result::Err` by the caller-facing APIs instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Ok,
    Error(String),
}

impl Status {
    #[must_use]
    pub fn ok() -> Self {
        Self::Ok
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(message.into())
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    #[must_use]
    pub fn is_error(&self) -> bool {
        !self.is_ok()
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Ok => None,
            Self::Error(message) => Some(message),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => f.write_str("OK"),
            Self::Error(message) => write!(f, "ERROR: \"{message}\""),
        }
    }
}
