//! Error types for predicate evaluation.

use authz_predicates_sdk::{IdentifierError, ResolverError};
use thiserror::Error;

/// Errors returned instead of a decision.
///
/// Everything except [`PredicateError::Resolver`] is a usage error: the
/// caller passed malformed input or used the predicate out of order. Denial
/// is never an error, it is `Status::Error`.
#[derive(Debug, Error)]
pub enum PredicateError {
    /// Required input was not provided.
    #[error("{0}")]
    Unspecified(String),

    /// An identifier does not fit its kind's grammar.
    #[error(transparent)]
    InvalidIdentifier(#[from] IdentifierError),

    /// `evaluate` was called before `init`.
    #[error("predicate used before init")]
    NotInitialized,

    /// `init` was called twice.
    #[error("predicate already initialized")]
    AlreadyInitialized,

    /// The ownership resolver failed; passed through unchanged.
    #[error(transparent)]
    Resolver(#[from] ResolverError),
}

impl PredicateError {
    pub(crate) fn unspecified(message: impl Into<String>) -> Self {
        Self::Unspecified(message.into())
    }

    /// `true` for caller mistakes, `false` for infrastructure failures.
    #[must_use]
    pub fn is_usage_error(&self) -> bool {
        !matches!(self, Self::Resolver(_))
    }
}
