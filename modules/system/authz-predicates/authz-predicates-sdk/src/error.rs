//! Error types for the ownership resolver.

use thiserror::Error;

/// Errors that can occur when resolving entity ownership.
///
/// These represent infrastructure/transport failures only.
/// A missing entity is not an error: it is reported as an absent result
/// and feeds the authorization decision.
#[derive(Debug, Clone, Error)]
pub enum ResolverError {
    /// The backing data source cannot be reached.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}
